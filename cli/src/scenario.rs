//! `combis simulate`: replay a scenario against the engine
//!
//! A scenario is a seed file (members, claims, templates) plus a list of
//! votes with their responses. Time is simulated: responses may advance the
//! clock, and an optional final sweep closes whatever has expired.
//!
//! ```toml
//! start = "2024-05-01T08:00:00Z"
//!
//! [[members]]
//! id = 1
//! nom_complet = "Awa Nji"
//! telephone = "699000001"
//!
//! [[claims]]
//! id = 3
//! membre_id = 1
//!
//! [[votes]]
//! titre = "Sinistre #3"
//! objet_type = "sinistre"
//! objet_id = 3
//! cree_par = 1
//! responses = [{ membre = 1, reponse = "pour" }]
//!
//! [sweep]
//! advance_hours = 80
//! ```

use crate::audit_logger;
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use combis_application::ports::member_directory::MemberDirectory;
use combis_application::ports::notification_store::SmsStore;
use combis_application::{
    CastResponseInput, CastResponseUseCase, CloseExpiredVotesUseCase, CloseVoteUseCase,
    CreateVoteInput, CreateVoteUseCase, NoPushChannel, NotifyNewVoteUseCase,
    PushNotificationsUseCase, SendSmsUseCase, VoteQueriesUseCase,
};
use combis_domain::{
    Claim, ClosedVoteResult, MemberId, ObjetType, ResponseChoice, SmsRecord, SmsStatistics,
    VoteId, VoteStatistics, VoteType, VoteView,
};
use combis_infrastructure::{
    FileConfig, FixedClock, MemberTokenAuthenticator, MemoryStore, RecordingSmsProvider, SeedData,
};
use combis_presentation::{ConsoleFormatter, OutputFormat};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Simulated time at which the scenario starts
    #[serde(default = "Utc::now")]
    pub start: DateTime<Utc>,
    #[serde(flatten)]
    pub seed: SeedData,
    #[serde(default)]
    pub votes: Vec<ScenarioVote>,
    pub sweep: Option<SweepStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioVote {
    pub titre: String,
    #[serde(default)]
    pub description: String,
    pub objet_type: ObjetType,
    pub objet_id: i64,
    #[serde(default)]
    pub type_vote: VoteType,
    pub duree_heures: Option<u32>,
    pub quorum: Option<u32>,
    pub cree_par: MemberId,
    #[serde(default)]
    pub responses: Vec<ScenarioResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioResponse {
    pub membre: MemberId,
    pub reponse: ResponseChoice,
    pub commentaire: Option<String>,
    /// Hours to advance the clock before this response
    #[serde(default)]
    pub after_hours: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SweepStep {
    pub advance_hours: u32,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid scenario {}", path.display()))
    }
}

/// A response the engine refused
#[derive(Debug, Clone, Serialize)]
pub struct RejectedResponse {
    pub vote_id: VoteId,
    pub membre_id: MemberId,
    pub erreur: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub votes: Vec<VoteView>,
    pub rejected: Vec<RejectedResponse>,
    pub closed_by_sweep: Vec<ClosedVoteResult>,
    pub claims: Vec<Claim>,
    pub sms: Vec<SmsRecord>,
    pub sms_statistics: SmsStatistics,
    pub vote_statistics: VoteStatistics,
}

pub async fn run(config: FileConfig, path: &Path, output: OutputFormat) -> Result<()> {
    let scenario = Scenario::load(path)?;
    let report = simulate(&config, scenario).await?;
    match output {
        OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(&report)),
        OutputFormat::Text => println!("{}", render_text(&report)),
    }
    Ok(())
}

pub async fn simulate(config: &FileConfig, scenario: Scenario) -> Result<SimulationReport> {
    // === Dependency Injection ===
    let store = Arc::new(MemoryStore::new());
    scenario.seed.apply(&store).await?;

    let clock = Arc::new(FixedClock::new(scenario.start));
    let provider = Arc::new(RecordingSmsProvider::new());
    let vote_params = config.vote.to_params();

    let mut close = CloseVoteUseCase::new(Arc::clone(&store), clock.clone());
    let mut create = CreateVoteUseCase::new(Arc::clone(&store), Arc::clone(&store), clock.clone())
        .with_params(vote_params.clone());
    let audit = audit_logger(config)?;
    if let Some(audit) = &audit {
        close = close.with_audit(audit.clone());
        create = create.with_audit(audit.clone());
    }
    let close = Arc::new(close);
    let mut cast = CastResponseUseCase::new(Arc::clone(&store), Arc::clone(&close), clock.clone());
    if let Some(audit) = audit {
        cast = cast.with_audit(audit);
    }
    let sweep = CloseExpiredVotesUseCase::new(Arc::clone(&store), close, clock.clone());
    let queries = VoteQueriesUseCase::new(Arc::clone(&store), Arc::clone(&store), clock.clone());

    let push = Arc::new(
        PushNotificationsUseCase::new(
            Arc::clone(&store),
            Arc::new(NoPushChannel),
            Arc::new(MemberTokenAuthenticator::new(Arc::clone(&store))),
            clock.clone(),
        )
        .with_params(config.notifications.to_params()),
    );
    let sms = Arc::new(
        SendSmsUseCase::new(Arc::clone(&store), provider, clock.clone())
            .with_params(config.sms.to_params().with_throttle(std::time::Duration::ZERO)),
    );
    // Announced inline so every message exists before the report is built
    let announcer = NotifyNewVoteUseCase::new(push, Arc::clone(&sms), vote_params);

    let mut vote_ids = Vec::with_capacity(scenario.votes.len());
    let mut rejected = Vec::new();
    for step in scenario.votes {
        let mut input =
            CreateVoteInput::new(step.objet_type, step.objet_id, step.titre, step.cree_par)
                .with_description(step.description)
                .with_type(step.type_vote);
        if let Some(hours) = step.duree_heures {
            input = input.with_duration_hours(hours);
        }
        if let Some(quorum) = step.quorum {
            input = input.with_quorum(quorum);
        }
        let vote = create.execute(input).await?.vote;
        let eligible = store.list_active_members(None).await?;
        announcer.execute(&vote, &eligible).await;
        vote_ids.push(vote.id);

        for response in step.responses {
            clock.advance(Duration::hours(i64::from(response.after_hours)));
            let mut input = CastResponseInput::new(vote.id, response.membre, response.reponse);
            if let Some(commentaire) = response.commentaire {
                input = input.with_comment(commentaire);
            }
            if let Err(e) = cast.execute(input).await {
                info!(
                    "Response of member {} to vote {} refused: {}",
                    response.membre, vote.id, e
                );
                rejected.push(RejectedResponse {
                    vote_id: vote.id,
                    membre_id: response.membre,
                    erreur: e.to_string(),
                });
            }
        }
    }

    let closed_by_sweep = match scenario.sweep {
        Some(step) => {
            clock.advance(Duration::hours(i64::from(step.advance_hours)));
            sweep.execute().await?
        }
        None => Vec::new(),
    };

    let mut votes = Vec::with_capacity(vote_ids.len());
    for id in vote_ids {
        votes.push(queries.details(id, None).await?);
    }
    let mut claims = Vec::with_capacity(scenario.seed.claims.len());
    for claim in &scenario.seed.claims {
        if let Some(current) = store.claim(claim.id).await {
            claims.push(current);
        }
    }

    Ok(SimulationReport {
        votes,
        rejected,
        closed_by_sweep,
        claims,
        sms: store.sms_in_range(None).await?,
        sms_statistics: sms.statistics(None).await?,
        vote_statistics: queries.statistics(None).await?,
    })
}

fn render_text(report: &SimulationReport) -> String {
    let mut output = String::new();
    for view in &report.votes {
        output.push_str(&ConsoleFormatter::format_vote(view));
    }
    if !report.rejected.is_empty() {
        output.push_str(&format!("\n{}\n", "Réponses refusées:".yellow().bold()));
        for r in &report.rejected {
            output.push_str(&format!(
                "  vote #{} membre {}: {}\n",
                r.vote_id, r.membre_id, r.erreur
            ));
        }
    }
    output.push_str(&ConsoleFormatter::format_closed(&report.closed_by_sweep));
    if !report.claims.is_empty() {
        output.push_str(&format!("\n{}\n", "Sinistres:".cyan().bold()));
        for claim in &report.claims {
            output.push_str(&format!("  #{:<5} {}\n", claim.id, claim.statut));
        }
    }
    output.push_str(&ConsoleFormatter::format_vote_statistics(&report.vote_statistics));
    output.push_str(&ConsoleFormatter::format_sms_statistics(&report.sms_statistics));
    output
}
