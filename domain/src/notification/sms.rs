//! SMS delivery records

use super::phone::PhoneNumber;
use crate::core::error::DomainError;
use crate::core::ids::{MemberId, SmsId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Delivery status of an SMS
///
/// Moves forward only: `EnAttente → Envoye | Echec`, `Echec → Envoye` on a
/// successful retry, and `Envoye → Livre` when the provider reports delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SmsStatus {
    #[default]
    EnAttente,
    Envoye,
    Livre,
    Echec,
}

impl SmsStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SmsStatus::EnAttente => "en_attente",
            SmsStatus::Envoye => "envoye",
            SmsStatus::Livre => "livre",
            SmsStatus::Echec => "echec",
        }
    }

    /// Accepted by the provider
    pub fn is_success(&self) -> bool {
        matches!(self, SmsStatus::Envoye | SmsStatus::Livre)
    }

    pub fn can_transition_to(&self, next: SmsStatus) -> bool {
        matches!(
            (self, next),
            (SmsStatus::EnAttente, SmsStatus::Envoye)
                | (SmsStatus::EnAttente, SmsStatus::Echec)
                | (SmsStatus::Echec, SmsStatus::Envoye)
                | (SmsStatus::Envoye, SmsStatus::Livre)
        )
    }
}

impl std::fmt::Display for SmsStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SmsStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en_attente" | "pending" => Ok(SmsStatus::EnAttente),
            "envoye" | "sent" => Ok(SmsStatus::Envoye),
            "livre" | "delivered" => Ok(SmsStatus::Livre),
            "echec" | "failed" => Ok(SmsStatus::Echec),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}

/// Result of one provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent {
        reference: Option<String>,
        cout: u32,
    },
    Failed {
        erreur: String,
    },
}

impl DispatchOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, DispatchOutcome::Sent { .. })
    }
}

/// Persisted SMS record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmsRecord {
    pub id: SmsId,
    pub destinataire_id: MemberId,
    pub telephone: PhoneNumber,
    pub message: String,
    pub type_notification: String,
    pub expediteur_id: Option<MemberId>,
    pub statut: SmsStatus,
    pub reference_externe: Option<String>,
    /// Cost in FCFA
    pub cout: u32,
    pub erreur: Option<String>,
    pub tentatives: u32,
    pub created_at: DateTime<Utc>,
    pub date_envoi: Option<DateTime<Utc>>,
}

impl SmsRecord {
    /// Record the result of a dispatch attempt
    ///
    /// The attempt counter always increments. The status only changes when
    /// the transition is allowed.
    pub fn record_attempt(&mut self, outcome: &DispatchOutcome, at: DateTime<Utc>) {
        self.tentatives += 1;
        self.date_envoi = Some(at);
        match outcome {
            DispatchOutcome::Sent { reference, cout } => {
                if self.statut.can_transition_to(SmsStatus::Envoye) {
                    self.statut = SmsStatus::Envoye;
                }
                self.reference_externe = reference.clone();
                self.cout = *cout;
                self.erreur = None;
            }
            DispatchOutcome::Failed { erreur } => {
                if self.statut.can_transition_to(SmsStatus::Echec) {
                    self.statut = SmsStatus::Echec;
                }
                self.erreur = Some(erreur.clone());
            }
        }
    }

    /// Provider-reported delivery
    pub fn mark_delivered(&mut self) -> bool {
        if self.statut.can_transition_to(SmsStatus::Livre) {
            self.statut = SmsStatus::Livre;
            true
        } else {
            false
        }
    }
}

/// An SMS about to be stored (status pending, no attempts)
#[derive(Debug, Clone, PartialEq)]
pub struct NewSms {
    pub destinataire_id: MemberId,
    pub telephone: PhoneNumber,
    pub message: String,
    pub type_notification: String,
    pub expediteur_id: Option<MemberId>,
    pub created_at: DateTime<Utc>,
}

/// Filters for SMS listings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsFilter {
    pub statut: Option<SmsStatus>,
    pub type_notification: Option<String>,
    pub range: Option<crate::vote::DateRange>,
}

impl SmsFilter {
    pub fn matches(&self, record: &SmsRecord) -> bool {
        self.statut.is_none_or(|s| s == record.statut)
            && self
                .type_notification
                .as_ref()
                .is_none_or(|t| *t == record.type_notification)
            && self.range.is_none_or(|r| r.contains(record.created_at))
    }
}

/// Per-status counters and cost
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsCounters {
    pub total: u64,
    pub envoyes: u64,
    pub livres: u64,
    pub echecs: u64,
    pub cout_total: u64,
}

impl SmsCounters {
    pub fn add(&mut self, record: &SmsRecord) {
        self.total += 1;
        match record.statut {
            SmsStatus::Envoye => self.envoyes += 1,
            SmsStatus::Livre => self.livres += 1,
            SmsStatus::Echec => self.echecs += 1,
            SmsStatus::EnAttente => {}
        }
        self.cout_total += u64::from(record.cout);
    }
}

/// Aggregate SMS statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsStatistics {
    pub global: SmsCounters,
    /// Breakdown per notification type, largest first
    pub par_type: Vec<(String, SmsCounters)>,
}

impl SmsStatistics {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a SmsRecord>) -> Self {
        let mut global = SmsCounters::default();
        let mut by_type: std::collections::BTreeMap<String, SmsCounters> = Default::default();
        for record in records {
            global.add(record);
            by_type
                .entry(record.type_notification.clone())
                .or_default()
                .add(record);
        }
        let mut par_type: Vec<_> = by_type.into_iter().collect();
        par_type.sort_by(|a, b| b.1.total.cmp(&a.1.total));
        Self { global, par_type }
    }
}
