//! Response tallies

use serde::{Deserialize, Serialize};

/// Count of responses per choice for a single vote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub pour: u32,
    pub contre: u32,
    pub abstention: u32,
}

/// Share of each choice, rounded to whole percents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Percentages {
    pub pour: u32,
    pub contre: u32,
    pub abstention: u32,
}

impl Tally {
    pub fn new(pour: u32, contre: u32, abstention: u32) -> Self {
        Self {
            pour,
            contre,
            abstention,
        }
    }

    /// Total responses, abstentions included
    pub fn total(&self) -> u32 {
        self.pour + self.contre + self.abstention
    }

    pub fn record(&mut self, choice: super::response::ResponseChoice) {
        use super::response::ResponseChoice;
        match choice {
            ResponseChoice::Pour => self.pour += 1,
            ResponseChoice::Contre => self.contre += 1,
            ResponseChoice::Abstention => self.abstention += 1,
        }
    }

    pub fn percentages(&self) -> Percentages {
        let total = self.total();
        let share = |count: u32| -> u32 {
            if total == 0 {
                0
            } else {
                (count as f64 / total as f64 * 100.0).round() as u32
            }
        };
        Percentages {
            pour: share(self.pour),
            contre: share(self.contre),
            abstention: share(self.abstention),
        }
    }

    pub fn quorum_reached(&self, quorum: u32) -> bool {
        self.total() >= quorum
    }

    /// Turnout relative to the quorum, in percent (may exceed 100)
    pub fn quorum_percentage(&self, quorum: u32) -> u32 {
        if quorum == 0 {
            return 0;
        }
        (self.total() as f64 / quorum as f64 * 100.0).round() as u32
    }
}

impl FromIterator<super::response::ResponseChoice> for Tally {
    fn from_iter<I: IntoIterator<Item = super::response::ResponseChoice>>(iter: I) -> Self {
        let mut tally = Tally::default();
        for choice in iter {
            tally.record(choice);
        }
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vote::response::ResponseChoice;

    #[test]
    fn test_total_includes_abstentions() {
        assert_eq!(Tally::new(2, 1, 3).total(), 6);
    }

    #[test]
    fn test_percentages_rounded() {
        let p = Tally::new(1, 1, 1).percentages();
        assert_eq!(p, Percentages { pour: 33, contre: 33, abstention: 33 });

        let p = Tally::new(2, 1, 0).percentages();
        assert_eq!(p.pour, 67);
        assert_eq!(p.contre, 33);
    }

    #[test]
    fn test_percentages_empty() {
        assert_eq!(Tally::default().percentages(), Percentages::default());
    }

    #[test]
    fn test_quorum_percentage() {
        let tally = Tally::new(2, 1, 0);
        assert_eq!(tally.quorum_percentage(5), 60);
        assert_eq!(tally.quorum_percentage(2), 150);
        assert_eq!(tally.quorum_percentage(0), 0);
        assert!(tally.quorum_reached(3));
        assert!(!tally.quorum_reached(4));
    }

    #[test]
    fn test_collect_from_choices() {
        let tally: Tally = [
            ResponseChoice::Pour,
            ResponseChoice::Contre,
            ResponseChoice::Pour,
            ResponseChoice::Abstention,
        ]
        .into_iter()
        .collect();
        assert_eq!(tally, Tally::new(2, 1, 1));
    }
}
