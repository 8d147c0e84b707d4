//! Vote read side: details, listings, participation and statistics.

use crate::ports::clock::Clock;
use crate::ports::member_directory::MemberDirectory;
use crate::ports::vote_repository::VoteRepository;
use crate::use_cases::vote_error::VoteError;
use combis_domain::{
    DateRange, MemberId, ObjetType, ObjetTypeStats, OwnResponse, Page, PageInfo, Pagination,
    ParticipationEntry, ResponseEntry, VoteFilter, VoteId, VoteResponse, VoteStatistics,
    VoteStatus, VoteSummary, VoteView,
};
use std::collections::BTreeMap;
use std::sync::Arc;

fn own(response: VoteResponse) -> OwnResponse {
    OwnResponse {
        reponse: response.reponse,
        commentaire: response.commentaire,
        date_reponse: response.date_reponse,
    }
}

/// Use case bundle for vote queries
pub struct VoteQueriesUseCase<R: VoteRepository + 'static, M: MemberDirectory + 'static> {
    repository: Arc<R>,
    directory: Arc<M>,
    clock: Arc<dyn Clock>,
}

impl<R: VoteRepository + 'static, M: MemberDirectory + 'static> VoteQueriesUseCase<R, M> {
    pub fn new(repository: Arc<R>, directory: Arc<M>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            directory,
            clock,
        }
    }

    /// Full view of a vote, from the point of view of `requester`
    pub async fn details(
        &self,
        vote_id: VoteId,
        requester: Option<MemberId>,
    ) -> Result<VoteView, VoteError> {
        let vote = self
            .repository
            .find_vote(vote_id)
            .await?
            .ok_or_else(|| VoteError::vote_not_found(vote_id))?;
        let tally = self.repository.tally(vote_id).await?;
        let mon_vote = match requester {
            Some(member) => self
                .repository
                .find_response(vote_id, member)
                .await?
                .map(own),
            None => None,
        };
        Ok(VoteView::build(vote, tally, mon_vote, self.clock.now()))
    }

    /// Page of votes, newest first
    pub async fn list(
        &self,
        filter: &VoteFilter,
        page: Pagination,
        requester: Option<MemberId>,
    ) -> Result<Page<VoteSummary>, VoteError> {
        let (votes, total) = self.repository.list_votes(filter, page).await?;
        let now = self.clock.now();

        let mut items = Vec::with_capacity(votes.len());
        for vote in votes {
            let tally = self.repository.tally(vote.id).await?;
            let a_vote = match requester {
                Some(member) => self
                    .repository
                    .find_response(vote.id, member)
                    .await?
                    .is_some(),
                None => false,
            };
            items.push(VoteSummary::build(vote, tally, a_vote, now));
        }

        Ok(Page {
            items,
            pagination: PageInfo::new(page, total),
        })
    }

    /// Every vote about one object, newest first
    pub async fn for_object(
        &self,
        objet_type: &ObjetType,
        objet_id: i64,
    ) -> Result<Vec<VoteSummary>, VoteError> {
        let now = self.clock.now();
        let mut summaries = Vec::new();
        for vote in self
            .repository
            .votes_for_object(objet_type, objet_id)
            .await?
        {
            let tally = self.repository.tally(vote.id).await?;
            summaries.push(VoteSummary::build(vote, tally, false, now));
        }
        Ok(summaries)
    }

    /// Responses of a vote with responder names, newest first
    pub async fn responses(&self, vote_id: VoteId) -> Result<Vec<ResponseEntry>, VoteError> {
        if self.repository.find_vote(vote_id).await?.is_none() {
            return Err(VoteError::vote_not_found(vote_id));
        }

        let mut entries = Vec::new();
        for response in self.repository.responses_for_vote(vote_id).await? {
            let nom_complet = self
                .directory
                .find_member(response.membre_id)
                .await?
                .map(|m| m.nom_complet);
            entries.push(ResponseEntry {
                membre_id: response.membre_id,
                nom_complet,
                reponse: response.reponse,
                commentaire: response.commentaire,
                date_reponse: response.date_reponse,
            });
        }
        Ok(entries)
    }

    /// Votes a member took part in, with their response
    pub async fn member_participation(
        &self,
        membre_id: MemberId,
        statut: Option<VoteStatus>,
    ) -> Result<Vec<ParticipationEntry>, VoteError> {
        let mut entries = Vec::new();
        for response in self.repository.responses_by_member(membre_id).await? {
            let Some(vote) = self.repository.find_vote(response.vote_id).await? else {
                continue;
            };
            if statut.is_some_and(|s| s != vote.statut) {
                continue;
            }
            let tally = self.repository.tally(vote.id).await?;
            entries.push(ParticipationEntry {
                vote,
                tally,
                ma_reponse: own(response),
            });
        }
        Ok(entries)
    }

    /// Aggregate figures over votes started within `range`
    pub async fn statistics(&self, range: Option<DateRange>) -> Result<VoteStatistics, VoteError> {
        let votes = self.repository.votes_in_range(range).await?;

        let mut stats = VoteStatistics {
            total_votes: votes.len() as u64,
            ..VoteStatistics::default()
        };
        let mut closed_turnout = Vec::new();
        let mut by_type: BTreeMap<String, ObjetTypeStats> = BTreeMap::new();

        for vote in &votes {
            match vote.statut {
                VoteStatus::Ouvert => stats.votes_ouverts += 1,
                VoteStatus::Approuve => stats.votes_approuves += 1,
                VoteStatus::Rejete => stats.votes_rejetes += 1,
            }
            if vote.statut.is_terminal() {
                closed_turnout.push(self.repository.tally(vote.id).await?.total());
            }

            let entry = by_type
                .entry(vote.objet_type.as_str().to_string())
                .or_insert_with(|| ObjetTypeStats {
                    objet_type: vote.objet_type.clone(),
                    nombre: 0,
                    approuves: 0,
                });
            entry.nombre += 1;
            if vote.statut == VoteStatus::Approuve {
                entry.approuves += 1;
            }
        }

        if !closed_turnout.is_empty() {
            let sum: u64 = closed_turnout.iter().map(|t| u64::from(*t)).sum();
            stats.participation_moyenne = Some(sum as f64 / closed_turnout.len() as f64);
        }
        let mut par_type: Vec<_> = by_type.into_values().collect();
        par_type.sort_by(|a, b| b.nombre.cmp(&a.nombre));
        stats.par_type = par_type;

        Ok(stats)
    }
}
