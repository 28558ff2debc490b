//! Classification decision table for audit matches.
//!
//! One pure function over (method, score, token overlap, label similarity).
//! Embedding similarity alone is not trusted: two genuinely different
//! intents can describe textually similar situations, so the label-token
//! corroboration column is part of the table, not an afterthought.

use miner_core::{AuditClassification, MatchMethod, ProposedFix};

use crate::labels::label_tokens;

/// Everything the decision table looks at for one audited assignment.
#[derive(Debug, Clone)]
pub struct DecisionInput {
    pub method: MatchMethod,
    pub score: f32,
    /// Word tokens shared between the assigned and matched labels.
    pub shared_tokens: usize,
    /// Combined label similarity between the assigned and matched labels.
    pub label_similarity: f64,
}

/// Score above which a semantic match needs no corroboration.
const SEMANTIC_DIRECT: f32 = 0.85;
/// Semantic band floor where token corroboration decides.
const SEMANTIC_CORROBORATED: f32 = 0.78;
/// Fuzzy score treated as a confirmed match.
const FUZZY_STRONG: f32 = 0.85;
/// Fuzzy score floor of the ambiguous band.
const FUZZY_AMBIGUOUS: f32 = 0.65;
/// Label similarity that clears a regex match outright.
const REGEX_LABEL_CLEAR: f64 = 0.60;
/// Label similarity below which a regex match with no shared tokens is an
/// overmatch.
const REGEX_LABEL_OVERMATCH: f64 = 0.35;

/// Apply the decision table.
pub fn classify(input: &DecisionInput) -> AuditClassification {
    match input.method {
        MatchMethod::Regex => {
            if input.shared_tokens >= 2 || input.label_similarity >= REGEX_LABEL_CLEAR {
                AuditClassification::Correct
            } else if input.shared_tokens == 0 && input.label_similarity < REGEX_LABEL_OVERMATCH {
                // The pattern fired on text for an unrelated label: overmatch.
                AuditClassification::Incorrect
            } else {
                // One shared token or mid-band similarity: likely too broad.
                AuditClassification::Ambiguous
            }
        }
        MatchMethod::Semantic => {
            if input.score >= SEMANTIC_DIRECT {
                AuditClassification::Correct
            } else if input.score >= SEMANTIC_CORROBORATED && input.shared_tokens >= 2 {
                AuditClassification::Correct
            } else {
                AuditClassification::Ambiguous
            }
        }
        MatchMethod::Fuzzy => {
            if input.score >= FUZZY_STRONG {
                AuditClassification::Correct
            } else if input.score >= FUZZY_AMBIGUOUS {
                AuditClassification::Ambiguous
            } else {
                AuditClassification::Incorrect
            }
        }
    }
}

/// Exactly one proposed fix per non-CORRECT finding.
///
/// Regex faults get a pattern guard regardless of classification (a broad
/// pattern is the root cause in both the ambiguous and incorrect rows);
/// semantic/fuzzy incorrect findings get an alias mapping; remaining
/// ambiguous findings get a clarifying question.
pub fn propose_fix(
    input: &DecisionInput,
    classification: AuditClassification,
    assigned_intent: &str,
    matched_intent: &str,
) -> Option<ProposedFix> {
    if classification == AuditClassification::Correct {
        return None;
    }

    match input.method {
        MatchMethod::Regex => {
            // Tokens distinctive to the assigned label; excluding them stops
            // the pattern from swallowing that label's traffic.
            let matched_tokens = label_tokens(matched_intent);
            let mut exclude_tokens: Vec<String> = label_tokens(assigned_intent)
                .into_iter()
                .filter(|t| !matched_tokens.contains(t))
                .collect();
            exclude_tokens.sort();
            if exclude_tokens.is_empty() {
                exclude_tokens.push(assigned_intent.to_lowercase());
            }
            let suggested_guard = format!("(?!.*(?:{}))", exclude_tokens.join("|"));
            Some(ProposedFix::TightenRegex {
                rule_name: matched_intent.to_string(),
                exclude_tokens,
                suggested_guard,
            })
        }
        MatchMethod::Semantic | MatchMethod::Fuzzy => {
            if classification == AuditClassification::Incorrect {
                let mut tokens: Vec<String> = label_tokens(assigned_intent).into_iter().collect();
                tokens.sort();
                Some(ProposedFix::AdjustNormalization {
                    assigned_intent: assigned_intent.to_string(),
                    matched_intent: matched_intent.to_string(),
                    suggested_alias: tokens.join("_"),
                })
            } else {
                Some(ProposedFix::AddDisambiguation {
                    question: format!(
                        "Is this request about \"{assigned_intent}\" or \"{matched_intent}\"?"
                    ),
                    options: [assigned_intent.to_string(), matched_intent.to_string()],
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(
        method: MatchMethod,
        score: f32,
        shared_tokens: usize,
        label_similarity: f64,
    ) -> DecisionInput {
        DecisionInput {
            method,
            score,
            shared_tokens,
            label_similarity,
        }
    }

    #[test]
    fn regex_rows() {
        // Two shared tokens clear the match.
        let i = input(MatchMethod::Regex, 1.0, 2, 0.1);
        assert_eq!(classify(&i), AuditClassification::Correct);

        // High label similarity clears it too.
        let i = input(MatchMethod::Regex, 1.0, 0, 0.7);
        assert_eq!(classify(&i), AuditClassification::Correct);

        // One shared token: likely too broad.
        let i = input(MatchMethod::Regex, 1.0, 1, 0.2);
        assert_eq!(classify(&i), AuditClassification::Ambiguous);

        // Mid-band similarity with no shared tokens: still ambiguous.
        let i = input(MatchMethod::Regex, 1.0, 0, 0.5);
        assert_eq!(classify(&i), AuditClassification::Ambiguous);

        // Nothing in common: overmatch.
        let i = input(MatchMethod::Regex, 1.0, 0, 0.2);
        assert_eq!(classify(&i), AuditClassification::Incorrect);
    }

    #[test]
    fn semantic_rows() {
        let i = input(MatchMethod::Semantic, 0.90, 0, 0.0);
        assert_eq!(classify(&i), AuditClassification::Correct);

        let i = input(MatchMethod::Semantic, 0.80, 2, 0.0);
        assert_eq!(classify(&i), AuditClassification::Correct);

        let i = input(MatchMethod::Semantic, 0.80, 1, 0.0);
        assert_eq!(classify(&i), AuditClassification::Ambiguous);
    }

    #[test]
    fn fuzzy_rows() {
        let i = input(MatchMethod::Fuzzy, 0.90, 0, 0.9);
        assert_eq!(classify(&i), AuditClassification::Correct);

        let i = input(MatchMethod::Fuzzy, 0.70, 0, 0.7);
        assert_eq!(classify(&i), AuditClassification::Ambiguous);

        let i = input(MatchMethod::Fuzzy, 0.40, 0, 0.4);
        assert_eq!(classify(&i), AuditClassification::Incorrect);
    }

    #[test]
    fn regex_overmatch_gets_tighten_regex_fix() {
        let i = input(MatchMethod::Regex, 1.0, 0, 0.2);
        let classification = classify(&i);
        assert_eq!(classification, AuditClassification::Incorrect);

        let fix = propose_fix(&i, classification, "QRTagActivation", "QRTagLost").unwrap();
        match fix {
            ProposedFix::TightenRegex {
                rule_name,
                exclude_tokens,
                suggested_guard,
            } => {
                assert_eq!(rule_name, "QRTagLost");
                assert_eq!(exclude_tokens, vec!["activation".to_string()]);
                assert!(suggested_guard.contains("activation"));
            }
            other => panic!("unexpected fix: {other:?}"),
        }
    }

    #[test]
    fn incorrect_fuzzy_gets_alias_fix() {
        let i = input(MatchMethod::Fuzzy, 0.4, 0, 0.4);
        let fix = propose_fix(&i, classify(&i), "InvoiceOverdue", "BillingQuestion").unwrap();
        assert!(matches!(fix, ProposedFix::AdjustNormalization { .. }));
    }

    #[test]
    fn ambiguous_semantic_gets_disambiguation_fix() {
        let i = input(MatchMethod::Semantic, 0.80, 1, 0.5);
        let fix = propose_fix(&i, classify(&i), "CardBlocked", "CardLost").unwrap();
        match fix {
            ProposedFix::AddDisambiguation { options, question } => {
                assert_eq!(options[0], "CardBlocked");
                assert_eq!(options[1], "CardLost");
                assert!(question.contains("CardBlocked"));
            }
            other => panic!("unexpected fix: {other:?}"),
        }
    }

    #[test]
    fn correct_findings_carry_no_fix() {
        let i = input(MatchMethod::Semantic, 0.95, 0, 0.0);
        assert!(propose_fix(&i, classify(&i), "A", "B").is_none());
    }
}
