//! Engine wired over the in-memory adapters

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use combis_application::{
    CastResponseUseCase, CloseExpiredVotesUseCase, CloseVoteUseCase, CreateVoteUseCase,
    PushNotificationsUseCase, SendSmsUseCase, SmsParams, VoteQueriesUseCase,
};
use combis_domain::{Member, MemberId, MemberStatus, Role, SmsTemplate};
use combis_infrastructure::{
    FixedClock, MemberTokenAuthenticator, MemoryStore, RecordingSmsProvider, SessionRegistry,
};
use std::sync::Arc;
use std::time::Duration;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
}

pub struct Engine {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<FixedClock>,
    pub registry: Arc<SessionRegistry>,
    pub sms_provider: Arc<RecordingSmsProvider>,
    pub create: CreateVoteUseCase<MemoryStore, MemoryStore>,
    pub cast: CastResponseUseCase<MemoryStore>,
    pub close: Arc<CloseVoteUseCase<MemoryStore>>,
    pub sweep: CloseExpiredVotesUseCase<MemoryStore>,
    pub queries: VoteQueriesUseCase<MemoryStore, MemoryStore>,
    pub push: Arc<PushNotificationsUseCase<MemoryStore>>,
    pub sms: Arc<SendSmsUseCase<MemoryStore>>,
}

impl Engine {
    pub async fn with_members(count: i64) -> Self {
        Self::build(count, RecordingSmsProvider::new()).await
    }

    pub async fn build(count: i64, provider: RecordingSmsProvider) -> Self {
        let store = Arc::new(MemoryStore::new());
        for id in 1..=count {
            store
                .upsert_member(Member {
                    id: MemberId(id),
                    nom_complet: format!("Membre {}", id),
                    telephone: format!("+237 6 99 00 {:02} {:02}", id / 100, id % 100),
                    statut: MemberStatus::Actif,
                    role: if id == 1 { Role::Admin } else { Role::Membre },
                })
                .await;
        }

        let clock = Arc::new(FixedClock::new(t0()));
        let registry = Arc::new(SessionRegistry::new(16));
        let sms_provider = Arc::new(provider);

        let close = Arc::new(CloseVoteUseCase::new(Arc::clone(&store), clock.clone()));
        let push = Arc::new(PushNotificationsUseCase::new(
            Arc::clone(&store),
            registry.clone(),
            Arc::new(MemberTokenAuthenticator::new(Arc::clone(&store))),
            clock.clone(),
        ));
        let sms = Arc::new(
            SendSmsUseCase::new(Arc::clone(&store), sms_provider.clone(), clock.clone())
                .with_params(SmsParams::enabled().with_throttle(Duration::ZERO)),
        );

        Self {
            create: CreateVoteUseCase::new(Arc::clone(&store), Arc::clone(&store), clock.clone()),
            cast: CastResponseUseCase::new(Arc::clone(&store), Arc::clone(&close), clock.clone()),
            sweep: CloseExpiredVotesUseCase::new(
                Arc::clone(&store),
                Arc::clone(&close),
                clock.clone(),
            ),
            queries: VoteQueriesUseCase::new(Arc::clone(&store), Arc::clone(&store), clock.clone()),
            close,
            push,
            sms,
            store,
            clock,
            registry,
            sms_provider,
        }
    }

    pub async fn add_template(&self, template: SmsTemplate) {
        self.sms.upsert_template(template).await.unwrap();
    }
}
