use serde::{Deserialize, Serialize};

/// Sentinel intent id used when no canonical intent matched.
pub const NONE_INTENT: &str = "NONE";

/// Which tier of the matching cascade produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMethod {
    Regex,
    Semantic,
    Fuzzy,
}

/// Nearest-canonical match for a query vector or assigned label.
///
/// Score semantics vary by method: regex matches are always 1.0, semantic
/// scores are cosine similarity, fuzzy scores are the weighted label
/// similarity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub method: MatchMethod,
    pub score: f32,
    pub matched_intent_id: String,
}

impl MatchResult {
    /// The "no match" sentinel, returned when the canonical set is empty.
    pub fn none() -> Self {
        Self {
            method: MatchMethod::Semantic,
            score: 0.0,
            matched_intent_id: NONE_INTENT.to_string(),
        }
    }

    pub fn is_none(&self) -> bool {
        self.matched_intent_id == NONE_INTENT
    }
}

/// Decision for a discovery cluster, derived from its centroid's nearest
/// canonical match. Tiers are mutually exclusive and exhaustive over [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterVerdict {
    MapToExisting,
    Ambiguous,
    ProposeNewIntent,
}

/// Operational signals attached to a cluster, independent of its verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityFlag {
    /// Similarity fell in the manual-verification band.
    MiddleZone,
    /// Reopen rate among members exceeds the risk threshold.
    HighRisk,
    /// Auto-closeable rate among members exceeds the automation threshold.
    HighAutomationPotential,
}

/// Outcome of auditing one existing (ticket -> intent) assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditClassification {
    Correct,
    Incorrect,
    Ambiguous,
}

/// Concrete remediation proposed for a non-CORRECT audit finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "fix", rename_all = "snake_case")]
pub enum ProposedFix {
    /// Regex-tier fault: the pattern matches more broadly than intended.
    TightenRegex {
        rule_name: String,
        /// Tokens distinctive to the wrongly-matched label, to exclude.
        exclude_tokens: Vec<String>,
        /// Suggested negative-lookahead fragment to prepend to the pattern.
        suggested_guard: String,
    },
    /// Semantic/fuzzy fault: the assigned label needs an explicit alias.
    AdjustNormalization {
        assigned_intent: String,
        matched_intent: String,
        suggested_alias: String,
    },
    /// Ambiguous match: ask the user which of the two candidates applies.
    AddDisambiguation {
        question: String,
        options: [String; 2],
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_sentinel() {
        let m = MatchResult::none();
        assert!(m.is_none());
        assert_eq!(m.score, 0.0);
        assert_eq!(m.matched_intent_id, NONE_INTENT);
    }

    #[test]
    fn verdict_serializes_snake_case() {
        let json = serde_json::to_string(&ClusterVerdict::ProposeNewIntent).unwrap();
        assert_eq!(json, "\"propose_new_intent\"");
    }

    #[test]
    fn flags_serialize_screaming_snake_case() {
        let json = serde_json::to_string(&QualityFlag::HighAutomationPotential).unwrap();
        assert_eq!(json, "\"HIGH_AUTOMATION_POTENTIAL\"");
    }
}
