use serde::{Deserialize, Serialize};

/// What to do with an intent no canonical entry matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionAction {
    /// Enough volume to justify a new canonical intent.
    Promote,
    /// Too little volume yet; revisit on a later run.
    Wait,
}

/// An assigned intent with no canonical counterpart, ranked for promotion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotionCandidate {
    pub label: String,
    pub ticket_count: usize,
    pub action: PromotionAction,
    pub example_query: Option<String>,
}

impl PromotionCandidate {
    /// Candidate before ranking; the action is assigned by
    /// [`rank_candidates`].
    pub fn unranked(label: String, ticket_count: usize, example_query: Option<String>) -> Self {
        Self {
            label,
            ticket_count,
            action: PromotionAction::Wait,
            example_query,
        }
    }
}

/// Rank candidates by ticket count descending (ties alphabetically) and
/// mark low-volume ones "wait" instead of promoting them.
pub fn rank_candidates(
    mut candidates: Vec<PromotionCandidate>,
    min_tickets: usize,
) -> Vec<PromotionCandidate> {
    for candidate in candidates.iter_mut() {
        candidate.action = if candidate.ticket_count >= min_tickets {
            PromotionAction::Promote
        } else {
            PromotionAction::Wait
        };
    }
    candidates.sort_unstable_by(|a, b| {
        b.ticket_count
            .cmp(&a.ticket_count)
            .then_with(|| a.label.cmp(&b.label))
    });
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(label: &str, count: usize) -> PromotionCandidate {
        PromotionCandidate::unranked(label.into(), count, None)
    }

    #[test]
    fn ranked_by_volume_with_wait_marking() {
        let ranked = rank_candidates(
            vec![candidate("Rare", 2), candidate("Common", 40), candidate("Mid", 9)],
            5,
        );

        let labels: Vec<&str> = ranked.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Common", "Mid", "Rare"]);
        assert_eq!(ranked[0].action, PromotionAction::Promote);
        assert_eq!(ranked[1].action, PromotionAction::Promote);
        assert_eq!(ranked[2].action, PromotionAction::Wait);
    }

    #[test]
    fn ties_break_alphabetically() {
        let ranked = rank_candidates(vec![candidate("Beta", 7), candidate("Alpha", 7)], 5);
        assert_eq!(ranked[0].label, "Alpha");
    }
}
