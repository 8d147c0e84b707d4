//! `combis serve`: real-time notification server with the expiry sweep

use crate::audit_logger;
use anyhow::{Context, Result};
use combis_application::{
    CloseExpiredVotesUseCase, CloseVoteUseCase, PushNotificationsUseCase,
};
use combis_infrastructure::{
    FileConfig, MemberTokenAuthenticator, MemoryStore, RealtimeServer, SeedData, SessionRegistry,
    SystemClock,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub async fn run(config: FileConfig, seed: &Path, port: Option<u16>) -> Result<()> {
    // === Dependency Injection ===
    let store = Arc::new(MemoryStore::new());
    SeedData::load(seed)?.apply(&store).await?;

    let clock = Arc::new(SystemClock);
    let registry = Arc::new(SessionRegistry::new(config.realtime.channel_capacity));

    let mut close = CloseVoteUseCase::new(Arc::clone(&store), clock.clone());
    if let Some(audit) = audit_logger(&config)? {
        close = close.with_audit(audit);
    }
    let sweep = CloseExpiredVotesUseCase::new(Arc::clone(&store), Arc::new(close), clock.clone());

    let push = Arc::new(
        PushNotificationsUseCase::new(
            Arc::clone(&store),
            registry.clone(),
            Arc::new(MemberTokenAuthenticator::new(Arc::clone(&store))),
            clock,
        )
        .with_params(config.notifications.to_params()),
    );
    match push.purge_expired().await {
        Ok(0) => {}
        Ok(purged) => info!("Purged {} old notifications", purged),
        Err(e) => warn!("Notification purge failed: {}", e),
    }

    let mut settings = config.realtime.to_settings();
    if let Some(port) = port {
        settings.port = port;
    }
    let server = RealtimeServer::new(settings, push, registry);

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested");
        }
        shutdown.cancel();
    });

    let period = Duration::from_secs(config.vote.sweep_interval_seconds);
    let sweep_cancel = cancel.clone();
    let sweeper = tokio::spawn(async move {
        sweep.run_every(period, sweep_cancel).await;
    });

    server
        .serve(cancel.clone())
        .await
        .context("Real-time server failed")?;
    cancel.cancel();
    sweeper.await.context("Expiry sweep task panicked")?;
    Ok(())
}
