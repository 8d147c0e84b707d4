//! Notify New Vote use case
//!
//! Announces a freshly created vote to its eligible members: a stored push
//! notification for each of them, then the "Nouveau vote" SMS template.
//! Runs detached from vote creation; failures are logged and go no further.

use crate::config::VoteParams;
use crate::ports::notification_store::{NotificationStore, SmsStore};
use crate::ports::vote_announcer::VoteAnnouncer;
use crate::use_cases::push_notifications::PushNotificationsUseCase;
use crate::use_cases::send_sms::{SendSmsUseCase, SmsRecipient};
use combis_domain::notification::template::NEW_VOTE_TEMPLATE;
use combis_domain::{MemberContact, NotificationPayload, TemplateVars, Vote};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Use case for the new-vote fan-out
pub struct NotifyNewVoteUseCase<P: NotificationStore + 'static, S: SmsStore + 'static> {
    push: Arc<PushNotificationsUseCase<P>>,
    sms: Arc<SendSmsUseCase<S>>,
    params: VoteParams,
}

impl<P: NotificationStore + 'static, S: SmsStore + 'static> NotifyNewVoteUseCase<P, S> {
    pub fn new(
        push: Arc<PushNotificationsUseCase<P>>,
        sms: Arc<SendSmsUseCase<S>>,
        params: VoteParams,
    ) -> Self {
        Self { push, sms, params }
    }

    /// Push payload announcing `vote`
    pub fn payload(vote: &Vote) -> NotificationPayload {
        NotificationPayload::new(
            "Nouveau vote",
            format!(
                "Nouveau vote disponible: \"{}\". Échéance: {}",
                vote.titre,
                vote.date_fin.format("%d/%m/%Y")
            ),
        )
        .with_type("vote")
        .with_extra("vote_id", vote.id.value())
        .with_link(format!("/votes/{}", vote.id))
    }

    /// SMS recipients with their per-member template variables
    pub fn recipients(&self, vote: &Vote, eligible: &[MemberContact]) -> Vec<SmsRecipient> {
        let date_fin = vote.date_fin.format("%d/%m/%Y %H:%M").to_string();
        let lien = self.params.vote_link(vote.id);
        eligible
            .iter()
            .map(|member| {
                SmsRecipient::new(member.id, &member.nom_complet, &member.telephone)
                    .with_var("titre", &vote.titre)
                    .with_var("date_fin", &date_fin)
                    .with_var("lien_vote", &lien)
            })
            .collect()
    }

    /// Run the whole fan-out
    pub async fn execute(&self, vote: &Vote, eligible: &[MemberContact]) {
        let ids: Vec<_> = eligible.iter().map(|m| m.id).collect();
        let pushed = self.push.send_to_many(&ids, &Self::payload(vote)).await;
        info!(
            "Vote {} announced to {}/{} members",
            vote.id,
            pushed.len(),
            ids.len()
        );

        if !self.sms.is_enabled() {
            debug!("SMS disabled, vote {} not announced by SMS", vote.id);
            return;
        }
        let recipients = self.recipients(vote, eligible);
        match self
            .sms
            .send_bulk(
                &recipients,
                NEW_VOTE_TEMPLATE,
                &TemplateVars::new(),
                Some(vote.cree_par),
            )
            .await
        {
            Ok(results) => {
                let failed = results.iter().filter(|r| !r.success).count();
                if failed > 0 {
                    warn!(
                        "Vote {}: {} of {} SMS could not be sent",
                        vote.id,
                        failed,
                        results.len()
                    );
                }
            }
            Err(e) => error!("SMS announcement of vote {} failed: {}", vote.id, e),
        }
    }
}

impl<P: NotificationStore + 'static, S: SmsStore + 'static> VoteAnnouncer
    for NotifyNewVoteUseCase<P, S>
{
    fn announce(&self, vote: &Vote, eligible: &[MemberContact]) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("No async runtime, vote {} not announced", vote.id);
            return;
        };
        let task = Self {
            push: Arc::clone(&self.push),
            sms: Arc::clone(&self.sms),
            params: self.params.clone(),
        };
        let vote = vote.clone();
        let eligible = eligible.to_vec();
        runtime.spawn(async move {
            task.execute(&vote, &eligible).await;
        });
    }
}
