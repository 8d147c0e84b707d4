//! Notification records and the values they are built from.
//!
//! Two delivery channels share one contract ("deliver message M to member U,
//! recording the attempt"):
//!
//! - [`push`] — real-time notifications, persisted before delivery
//! - [`sms`] — templated text messages with delivery bookkeeping

pub mod phone;
pub mod push;
pub mod sms;
pub mod template;

pub use phone::PhoneNumber;
pub use push::{NewPushNotification, NotificationPayload, PushFilter, PushNotification};
pub use sms::{
    DispatchOutcome, NewSms, SmsCounters, SmsFilter, SmsRecord, SmsStatistics, SmsStatus,
};
pub use template::{SmsTemplate, TemplateVars, merge_vars, notification_type_for, render};
