//! Identifier value objects
//!
//! Storage assigns integer keys; these newtypes keep a vote id from being
//! passed where a member id is expected.

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn new(value: i64) -> Self {
                Self(value)
            }

            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

id_type!(
    /// Identifier of a governance vote
    VoteId
);
id_type!(
    /// Identifier of an association member
    MemberId
);
id_type!(
    /// Identifier of a persisted push notification
    NotificationId
);
id_type!(
    /// Identifier of a persisted SMS record
    SmsId
);
id_type!(
    /// Identifier of a single vote response
    ResponseId
);
