//! Seed data for the in-memory store
//!
//! The `serve` command starts from a TOML file listing members, claims
//! and SMS templates:
//!
//! ```toml
//! [[members]]
//! id = 1
//! nom_complet = "Awa Nji"
//! telephone = "+237 699 00 00 01"
//! role = "admin"
//!
//! [[claims]]
//! id = 3
//! membre_id = 1
//!
//! [[templates]]
//! nom = "Nouveau vote"
//! type_notification = "nouveau_vote"
//! template = "{{nom_complet}}, nouveau vote: {{titre}}"
//! ```

use super::memory::MemoryStore;
use combis_application::ports::notification_store::SmsStore;
use combis_domain::notification::template::NEW_VOTE_TEMPLATE;
use combis_domain::{Claim, Member, SmsTemplate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Template used to announce new votes when the seed file defines none
pub const DEFAULT_NEW_VOTE_TEMPLATE: &str = "Bonjour {{nom_complet}}, nouveau vote: \"{{titre}}\". \
     Fin le {{date_fin}}. Votez ici: {{lien_vote}}";

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid seed file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to store seed data: {0}")]
    Storage(String),
}

/// Contents of a seed file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedData {
    pub members: Vec<Member>,
    pub claims: Vec<Claim>,
    pub templates: Vec<SmsTemplate>,
}

impl SeedData {
    pub fn from_toml_str(content: &str) -> Result<Self, SeedError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, SeedError> {
        let content = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Templates including the new-vote template when it is missing
    pub fn templates_with_defaults(&self) -> Vec<SmsTemplate> {
        let mut templates = self.templates.clone();
        if !templates.iter().any(|t| t.nom == NEW_VOTE_TEMPLATE) {
            templates.push(SmsTemplate::new(
                NEW_VOTE_TEMPLATE,
                "nouveau_vote",
                DEFAULT_NEW_VOTE_TEMPLATE,
            ));
        }
        templates
    }

    /// Load everything into `store`
    pub async fn apply(&self, store: &MemoryStore) -> Result<(), SeedError> {
        for member in &self.members {
            store.upsert_member(member.clone()).await;
        }
        for claim in &self.claims {
            store.upsert_claim(claim.clone()).await;
        }
        for template in self.templates_with_defaults() {
            store
                .upsert_template(template)
                .await
                .map_err(|e| SeedError::Storage(e.to_string()))?;
        }
        info!(
            "Seeded {} members, {} claims, {} templates",
            self.members.len(),
            self.claims.len(),
            self.templates.len()
        );
        Ok(())
    }
}
