//! The object a vote decides on

use super::vote_type::CatalogueEntry;
use serde::{Deserialize, Serialize};

/// Kind of object a vote is bound to
///
/// Unknown kinds are kept verbatim in [`ObjetType::Other`] so new object
/// types can be voted on before anything knows how to apply them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ObjetType {
    /// A claim (sinistre) awaiting approval
    Sinistre,
    /// A decision concerning a member
    Membre,
    /// A general assembly or group decision
    Decision,
    Other(String),
}

impl ObjetType {
    pub fn as_str(&self) -> &str {
        match self {
            ObjetType::Sinistre => "sinistre",
            ObjetType::Membre => "membre",
            ObjetType::Decision => "decision",
            ObjetType::Other(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ObjetType::Other(_))
    }

    pub fn catalogue() -> Vec<CatalogueEntry> {
        vec![
            CatalogueEntry {
                value: "sinistre",
                label: "Sinistre",
                description: "Validation d'un sinistre",
            },
            CatalogueEntry {
                value: "membre",
                label: "Membre",
                description: "Décision concernant un membre",
            },
            CatalogueEntry {
                value: "decision",
                label: "Décision générale",
                description: "Décision d'assemblée ou de groupe",
            },
        ]
    }
}

impl From<String> for ObjetType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "sinistre" => ObjetType::Sinistre,
            "membre" => ObjetType::Membre,
            "decision" => ObjetType::Decision,
            _ => ObjetType::Other(value),
        }
    }
}

impl From<&str> for ObjetType {
    fn from(value: &str) -> Self {
        ObjetType::from(value.to_string())
    }
}

impl From<ObjetType> for String {
    fn from(value: ObjetType) -> Self {
        match value {
            ObjetType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ObjetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
