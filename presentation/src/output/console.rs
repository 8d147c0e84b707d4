//! Console output formatter for votes and notification results

use colored::{ColoredString, Colorize};
use combis_application::RecipientResult;
use combis_domain::{ClosedVoteResult, SmsStatistics, VoteStatistics, VoteStatus, VoteView};
use serde::Serialize;

/// Formats engine results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a vote with its tallies and the requester's situation
    pub fn format_vote(view: &VoteView) -> String {
        let vote = &view.vote;
        let mut output = String::new();

        output.push_str(&Self::header(&format!("Vote #{}", vote.id)));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Titre:".cyan().bold(), vote.titre));
        if !vote.description.is_empty() {
            output.push_str(&format!("{}\n", vote.description.dimmed()));
        }
        output.push_str(&format!(
            "{} {} #{}\n",
            "Objet:".cyan().bold(),
            vote.objet_type,
            vote.objet_id
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Type:".cyan().bold(),
            vote.type_vote.label()
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Statut:".cyan().bold(),
            Self::status(vote.statut)
        ));
        output.push_str(&format!(
            "{} {}{}\n",
            "Échéance:".cyan().bold(),
            vote.date_fin.format("%d/%m/%Y %H:%M"),
            if view.est_expire {
                " (expiré)".red().to_string()
            } else {
                String::new()
            }
        ));

        output.push_str(&Self::section_header("Résultats"));
        let p = &view.pourcentages;
        output.push_str(&format!(
            "  {:<12} {:>4}  ({}%)\n",
            "Pour".green(),
            view.tally.pour,
            p.pour
        ));
        output.push_str(&format!(
            "  {:<12} {:>4}  ({}%)\n",
            "Contre".red(),
            view.tally.contre,
            p.contre
        ));
        output.push_str(&format!(
            "  {:<12} {:>4}  ({}%)\n",
            "Abstention".yellow(),
            view.tally.abstention,
            p.abstention
        ));
        output.push_str(&format!(
            "\n{} {}/{} ({}%){}\n",
            "Quorum:".cyan().bold(),
            view.total_votes,
            vote.quorum_requis,
            view.pourcentage_quorum,
            if view.quorum_atteint {
                " atteint".green().to_string()
            } else {
                String::new()
            }
        ));

        if let Some(mine) = &view.mon_vote {
            output.push_str(&format!(
                "{} {}",
                "Mon vote:".cyan().bold(),
                mine.reponse
            ));
            if let Some(commentaire) = &mine.commentaire {
                output.push_str(&format!(" - {}", commentaire.dimmed()));
            }
            output.push('\n');
        } else if view.peut_voter {
            output.push_str(&format!("{}\n", "Vous pouvez voter".green()));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format the votes closed by an expiry sweep
    pub fn format_closed(results: &[ClosedVoteResult]) -> String {
        if results.is_empty() {
            return format!("{}\n", "Aucun vote expiré".dimmed());
        }

        let mut output = Self::section_header("Votes clôturés");
        for result in results {
            output.push_str(&format!(
                "  #{:<5} {:<10} pour {:>3}  contre {:>3}  total {:>3}\n",
                result.vote_id,
                Self::status(result.statut),
                result.votes_pour,
                result.votes_contre,
                result.total_votes
            ));
        }
        output
    }

    /// Format the per-recipient outcome of a bulk SMS send
    pub fn format_bulk(results: &[RecipientResult]) -> String {
        let sent = results.iter().filter(|r| r.success).count();
        let mut output = Self::section_header(&format!("SMS: {}/{} envoyés", sent, results.len()));
        for result in results {
            let mark = if result.success {
                "✓".green()
            } else {
                "✗".red()
            };
            output.push_str(&format!(
                "  {} {:<24} {}",
                mark, result.membre, result.telephone
            ));
            if let Some(error) = &result.error {
                output.push_str(&format!("  {}", error.red()));
            }
            output.push('\n');
        }
        output
    }

    pub fn format_vote_statistics(stats: &VoteStatistics) -> String {
        let mut output = Self::section_header("Statistiques des votes");
        output.push_str(&format!(
            "  total {}  ouverts {}  approuvés {}  rejetés {}\n",
            stats.total_votes, stats.votes_ouverts, stats.votes_approuves, stats.votes_rejetes
        ));
        if let Some(participation) = stats.participation_moyenne {
            output.push_str(&format!("  participation moyenne {:.1}\n", participation));
        }
        for entry in &stats.par_type {
            output.push_str(&format!(
                "  {:<12} {} ({} approuvés)\n",
                entry.objet_type, entry.nombre, entry.approuves
            ));
        }
        output
    }

    pub fn format_sms_statistics(stats: &SmsStatistics) -> String {
        let g = &stats.global;
        let mut output = Self::section_header("Statistiques SMS");
        output.push_str(&format!(
            "  total {}  envoyés {}  livrés {}  échecs {}  coût {} FCFA\n",
            g.total, g.envoyes, g.livres, g.echecs, g.cout_total
        ));
        for (type_notification, counters) in &stats.par_type {
            output.push_str(&format!(
                "  {:<20} {}\n",
                type_notification, counters.total
            ));
        }
        output
    }

    /// Format any result as JSON
    pub fn format_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn status(statut: VoteStatus) -> ColoredString {
        match statut {
            VoteStatus::Ouvert => statut.as_str().yellow(),
            VoteStatus::Approuve => statut.as_str().green().bold(),
            VoteStatus::Rejete => statut.as_str().red().bold(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use combis_domain::{
        MemberId, ObjetType, OwnResponse, ResponseChoice, Tally, Vote, VoteId, VoteType,
    };

    fn vote() -> Vote {
        let debut = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        Vote {
            id: VoteId(7),
            objet_type: ObjetType::Sinistre,
            objet_id: 12,
            titre: "Prise en charge hospitalisation".to_string(),
            description: String::new(),
            type_vote: VoteType::SimpleMajority,
            quorum_requis: 3,
            date_debut: debut,
            date_fin: debut + chrono::Duration::hours(72),
            statut: VoteStatus::Ouvert,
            cree_par: MemberId(1),
            updated_at: None,
        }
    }

    #[test]
    fn test_format_vote() {
        let v = vote();
        let now = v.date_debut;
        let view = VoteView::build(
            v,
            Tally::new(2, 1, 0),
            Some(OwnResponse {
                reponse: ResponseChoice::Pour,
                commentaire: Some("D'accord".to_string()),
                date_reponse: now,
            }),
            now,
        );

        let output = ConsoleFormatter::format_vote(&view);
        assert!(output.contains("Vote #7"));
        assert!(output.contains("Prise en charge hospitalisation"));
        assert!(output.contains("04/05/2024 08:00"));
        assert!(output.contains("(67%)"));
        assert!(output.contains("3/3"));
        assert!(output.contains("D'accord"));
        assert!(!output.contains("expiré"));
    }

    #[test]
    fn test_format_closed_empty() {
        assert!(ConsoleFormatter::format_closed(&[]).contains("Aucun vote expiré"));
    }

    #[test]
    fn test_format_bulk_counts_successes() {
        let results = vec![
            RecipientResult {
                membre_id: MemberId(1),
                membre: "Awa".to_string(),
                telephone: "699000001".to_string(),
                success: true,
                sms_id: None,
                error: None,
            },
            RecipientResult {
                membre_id: MemberId(2),
                membre: "Paul".to_string(),
                telephone: "123".to_string(),
                success: false,
                sms_id: None,
                error: Some("Invalid phone number: 123".to_string()),
            },
        ];
        let output = ConsoleFormatter::format_bulk(&results);
        assert!(output.contains("1/2"));
        assert!(output.contains("Invalid phone number: 123"));
    }

    #[test]
    fn test_format_json() {
        let result = ClosedVoteResult {
            vote_id: VoteId(3),
            statut: VoteStatus::Approuve,
            votes_pour: 2,
            votes_contre: 0,
            total_votes: 2,
        };
        let json: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_json(&result)).unwrap();
        assert_eq!(json["statut"], "approuve");
        assert_eq!(json["votes_pour"], 2);
    }
}
