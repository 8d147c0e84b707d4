use crate::core::error::DomainError;
use crate::core::ids::MemberId;
use serde::{Deserialize, Serialize};

/// Membership status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    #[default]
    Actif,
    Suspendu,
    Inactif,
}

impl MemberStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, MemberStatus::Actif)
    }
}

/// Role held by a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Tresorier,
    Membre,
}

impl std::str::FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "tresorier" => Ok(Role::Tresorier),
            "membre" => Ok(Role::Membre),
            other => Err(DomainError::UnknownRole(other.to_string())),
        }
    }
}

/// Contact projection of a member: who to notify and where
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberContact {
    pub id: MemberId,
    pub nom_complet: String,
    /// Raw phone number as stored in the directory (not normalized)
    pub telephone: String,
}

impl MemberContact {
    pub fn new(
        id: impl Into<MemberId>,
        nom_complet: impl Into<String>,
        telephone: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            nom_complet: nom_complet.into(),
            telephone: telephone.into(),
        }
    }
}

/// A member as held by the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub nom_complet: String,
    pub telephone: String,
    #[serde(default)]
    pub statut: MemberStatus,
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::Membre
}

impl Member {
    pub fn contact(&self) -> MemberContact {
        MemberContact {
            id: self.id,
            nom_complet: self.nom_complet.clone(),
            telephone: self.telephone.clone(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.statut.is_active()
    }
}
