//! Send SMS use case
//!
//! Templated, provider-abstracted half of the notification gateway. Every
//! dispatch leaves a record: created `en_attente` once the phone number is
//! known to be valid, then updated with the provider's answer.

use crate::config::SmsParams;
use crate::ports::clock::Clock;
use crate::ports::notification_store::SmsStore;
use crate::ports::sms_provider::{DeliveryError, SmsProvider};
use crate::use_cases::notification_error::NotificationError;
use combis_domain::notification::template::merge_vars;
use combis_domain::{
    DateRange, DispatchOutcome, MemberId, NewSms, Page, PageInfo, Pagination, PhoneNumber,
    SmsFilter, SmsId, SmsRecord, SmsStatistics, SmsTemplate, TemplateVars,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A single message to send
#[derive(Debug, Clone)]
pub struct SmsRequest {
    pub destinataire_id: MemberId,
    /// Raw phone number, normalized before anything is stored
    pub telephone: String,
    pub message: String,
    pub type_notification: String,
    pub expediteur_id: Option<MemberId>,
}

/// One recipient of a bulk send
#[derive(Debug, Clone)]
pub struct SmsRecipient {
    pub membre_id: MemberId,
    pub nom_complet: String,
    pub telephone: String,
    /// Recipient-specific template variables; they win over global ones
    pub variables: TemplateVars,
}

impl SmsRecipient {
    pub fn new(
        membre_id: MemberId,
        nom_complet: impl Into<String>,
        telephone: impl Into<String>,
    ) -> Self {
        Self {
            membre_id,
            nom_complet: nom_complet.into(),
            telephone: telephone.into(),
            variables: TemplateVars::new(),
        }
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Variables for this recipient: name and phone, then explicit ones
    fn own_vars(&self) -> TemplateVars {
        let mut vars = TemplateVars::new();
        vars.insert("nom_complet".to_string(), self.nom_complet.clone());
        vars.insert("telephone".to_string(), self.telephone.clone());
        vars.extend(self.variables.clone());
        vars
    }
}

/// Outcome for one recipient of a bulk send
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipientResult {
    pub membre_id: MemberId,
    pub membre: String,
    pub telephone: String,
    pub success: bool,
    pub sms_id: Option<SmsId>,
    pub error: Option<String>,
}

/// Use case for SMS dispatch and its bookkeeping
pub struct SendSmsUseCase<S: SmsStore + 'static> {
    store: Arc<S>,
    provider: Arc<dyn SmsProvider>,
    clock: Arc<dyn Clock>,
    params: SmsParams,
}

impl<S: SmsStore + 'static> SendSmsUseCase<S> {
    pub fn new(store: Arc<S>, provider: Arc<dyn SmsProvider>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            provider,
            clock,
            params: SmsParams::default(),
        }
    }

    pub fn with_params(mut self, params: SmsParams) -> Self {
        self.params = params;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.params.enabled
    }

    /// Send one message
    ///
    /// Fails without writing anything when SMS is disabled or the phone
    /// number does not normalize. Otherwise returns the stored record, whose
    /// status tells whether the provider accepted the message.
    pub async fn send(&self, request: SmsRequest) -> Result<SmsRecord, NotificationError> {
        if !self.params.enabled {
            debug!("SMS disabled, not sending to member {}", request.destinataire_id);
            return Err(DeliveryError::Disabled.into());
        }

        let telephone =
            PhoneNumber::parse_with_country(&request.telephone, &self.params.country_code)
                .map_err(|_| DeliveryError::InvalidPhone(request.telephone.clone()))?;

        let mut record = self
            .store
            .insert_sms(NewSms {
                destinataire_id: request.destinataire_id,
                telephone,
                message: request.message,
                type_notification: request.type_notification,
                expediteur_id: request.expediteur_id,
                created_at: self.clock.now(),
            })
            .await?;

        self.dispatch(&mut record).await?;
        Ok(record)
    }

    /// Retry a stored message that failed
    pub async fn retry(&self, mut record: SmsRecord) -> Result<SmsRecord, NotificationError> {
        if !self.params.enabled {
            return Err(DeliveryError::Disabled.into());
        }
        self.dispatch(&mut record).await?;
        Ok(record)
    }

    async fn dispatch(&self, record: &mut SmsRecord) -> Result<(), NotificationError> {
        let outcome = match self.provider.send(&record.telephone, &record.message).await {
            Ok(receipt) => {
                info!(
                    "SMS {} sent to {} via {}",
                    record.id,
                    record.telephone,
                    self.provider.name()
                );
                DispatchOutcome::Sent {
                    reference: receipt.reference,
                    cout: receipt.cost,
                }
            }
            Err(e) => {
                warn!("SMS {} to {} failed: {}", record.id, record.telephone, e);
                DispatchOutcome::Failed {
                    erreur: e.to_string(),
                }
            }
        };
        record.record_attempt(&outcome, self.clock.now());
        self.store.update_sms(record).await?;
        Ok(())
    }

    /// Render a template for each recipient and send one by one
    ///
    /// An unknown or inactive template fails before anything is sent. After
    /// that, recipients are independent: each gets its own entry in the
    /// result, in input order. Sends are spaced by the configured throttle.
    pub async fn send_bulk(
        &self,
        recipients: &[SmsRecipient],
        template_name: &str,
        global: &TemplateVars,
        expediteur_id: Option<MemberId>,
    ) -> Result<Vec<RecipientResult>, NotificationError> {
        let template = self
            .store
            .find_active_template(template_name)
            .await?
            .ok_or_else(|| NotificationError::TemplateNotFound(template_name.to_string()))?;
        let type_notification = template.notification_type();

        info!(
            "Bulk SMS '{}' to {} recipients",
            template.nom,
            recipients.len()
        );

        let mut results = Vec::with_capacity(recipients.len());
        for (i, recipient) in recipients.iter().enumerate() {
            if i > 0 && !self.params.throttle.is_zero() {
                tokio::time::sleep(self.params.throttle).await;
            }

            let vars = merge_vars(global, &recipient.own_vars());
            let request = SmsRequest {
                destinataire_id: recipient.membre_id,
                telephone: recipient.telephone.clone(),
                message: template.render(&vars),
                type_notification: type_notification.clone(),
                expediteur_id,
            };

            let (success, sms_id, error) = match self.send(request).await {
                Ok(record) => (record.statut.is_success(), Some(record.id), record.erreur),
                Err(e) => (false, None, Some(e.to_string())),
            };
            results.push(RecipientResult {
                membre_id: recipient.membre_id,
                membre: recipient.nom_complet.clone(),
                telephone: recipient.telephone.clone(),
                success,
                sms_id,
                error,
            });
        }

        let sent = results.iter().filter(|r| r.success).count();
        info!("Bulk SMS '{}': {}/{} sent", template.nom, sent, results.len());
        Ok(results)
    }

    pub async fn upsert_template(&self, template: SmsTemplate) -> Result<(), NotificationError> {
        info!("SMS template '{}' saved", template.nom);
        Ok(self.store.upsert_template(template).await?)
    }

    pub async fn list_templates(&self) -> Result<Vec<SmsTemplate>, NotificationError> {
        Ok(self.store.list_templates().await?)
    }

    pub async fn statistics(
        &self,
        range: Option<DateRange>,
    ) -> Result<SmsStatistics, NotificationError> {
        let records = self.store.sms_in_range(range).await?;
        Ok(SmsStatistics::from_records(&records))
    }

    pub async fn list(
        &self,
        filter: &SmsFilter,
        page: Pagination,
    ) -> Result<Page<SmsRecord>, NotificationError> {
        let (items, total) = self.store.list_sms(filter, page).await?;
        Ok(Page {
            items,
            pagination: PageInfo::new(page, total),
        })
    }
}
