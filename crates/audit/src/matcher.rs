//! Multi-method audit cascade: regex → semantic → fuzzy.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use miner_core::config::{AuditConfig, EmbeddingConfig};
use miner_core::{AuditClassification, MatchMethod, MatchResult, MinerError, ProposedFix};
use miner_discovery::CanonicalMatcher;
use miner_embedding::{embed_in_batches, Embedder, EmbeddingCache};

use crate::decision::{classify, propose_fix, DecisionInput};
use crate::labels::{label_similarity, shared_tokens};
use crate::promotion::{rank_candidates, PromotionCandidate};
use crate::report::AuditReport;
use crate::rules::RuleTable;

/// One upstream-classifier assignment to re-validate: the intent label it
/// produced, the queries it grouped under that label, and their volume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignedIntent {
    pub label: String,
    #[serde(default)]
    pub example_queries: Vec<String>,
    #[serde(default)]
    pub ticket_count: usize,
}

impl AssignedIntent {
    fn representative_example(&self) -> Option<&str> {
        self.example_queries.first().map(|s| s.as_str())
    }
}

/// Audit verdict for one assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditFinding {
    pub assigned_intent: String,
    pub result: MatchResult,
    pub shared_tokens: usize,
    pub label_similarity: f64,
    pub classification: AuditClassification,
    pub proposed_fix: Option<ProposedFix>,
    pub example_query: Option<String>,
    pub ticket_count: usize,
}

/// Re-validate a batch of assignments through the three-tier cascade.
///
/// Regex runs first over every record; the records it misses are embedded
/// in one batched pass; semantic scores below the acceptance threshold are
/// handed to the fuzzy tier for corroboration. Assignments no tier can
/// match become promotion candidates instead of findings.
pub async fn audit_assignments(
    assignments: &[AssignedIntent],
    rules: &RuleTable,
    canonical: &CanonicalMatcher,
    embedder: &dyn Embedder,
    cache: &mut EmbeddingCache,
    audit_config: &AuditConfig,
    embedding_config: &EmbeddingConfig,
) -> Result<AuditReport, MinerError> {
    info!(
        assignments = assignments.len(),
        rules = rules.len(),
        canonical_intents = canonical.len(),
        "audit run started"
    );

    // Tier 1: regex, first match wins with score 1.0.
    let mut matches: Vec<Option<MatchResult>> = assignments
        .iter()
        .map(|assignment| {
            let example = assignment.representative_example()?;
            rules.first_match(example).map(|rule| MatchResult {
                method: MatchMethod::Regex,
                score: 1.0,
                matched_intent_id: rule.name.clone(),
            })
        })
        .collect();

    // Tier 2: one batched embedding pass for everything regex missed.
    let pending: Vec<usize> = (0..assignments.len())
        .filter(|&i| matches[i].is_none())
        .collect();
    let composites: Vec<String> = pending
        .iter()
        .map(|&i| {
            let assignment = &assignments[i];
            match assignment.representative_example() {
                Some(example) => format!("{}: {}", assignment.label, example),
                None => assignment.label.clone(),
            }
        })
        .collect();
    let outcome = if canonical.is_empty() {
        None
    } else {
        Some(embed_in_batches(embedder, cache, &composites, embedding_config.batch_size).await)
    };

    for (slot, &i) in pending.iter().enumerate() {
        let assignment = &assignments[i];

        let semantic = match &outcome {
            Some(outcome) => match &outcome.vectors[slot] {
                Some(vector) => {
                    let nearest = canonical.nearest(vector)?;
                    (!nearest.is_none()).then_some(nearest)
                }
                None => None,
            },
            None => None,
        };

        let accepted = semantic
            .as_ref()
            .is_some_and(|nearest| nearest.score >= audit_config.semantic_accept);
        if accepted {
            matches[i] = semantic;
            continue;
        }
        if let Some(nearest) = &semantic {
            debug!(
                label = %assignment.label,
                score = nearest.score,
                "semantic score below acceptance, consulting fuzzy tier"
            );
        }

        // Tier 3: fuzzy label similarity against every canonical id; also
        // reached when the semantic score is very low, not only in the
        // corroboration band.
        let fuzzy = fuzzy_best(&assignment.label, canonical.ids(), audit_config.fuzzy_keep);

        matches[i] = match (fuzzy, semantic) {
            (Some(fuzzy), _) => Some(fuzzy),
            // Uncorroborated mid-band semantic candidate: keep it and let
            // the decision table mark it ambiguous.
            (None, Some(nearest)) if nearest.score >= audit_config.semantic_floor => Some(nearest),
            (None, _) => None,
        };
    }

    // Decision table over every matched assignment.
    let mut findings = Vec::new();
    let mut unmatched = Vec::new();
    for (assignment, matched) in assignments.iter().zip(matches) {
        match matched {
            Some(result) => {
                let input = DecisionInput {
                    method: result.method,
                    score: result.score,
                    shared_tokens: shared_tokens(&assignment.label, &result.matched_intent_id),
                    label_similarity: label_similarity(
                        &assignment.label,
                        &result.matched_intent_id,
                    ),
                };
                let classification = classify(&input);
                let fix = propose_fix(
                    &input,
                    classification,
                    &assignment.label,
                    &result.matched_intent_id,
                );
                findings.push(AuditFinding {
                    assigned_intent: assignment.label.clone(),
                    shared_tokens: input.shared_tokens,
                    label_similarity: input.label_similarity,
                    classification,
                    proposed_fix: fix,
                    example_query: assignment.representative_example().map(String::from),
                    ticket_count: assignment.ticket_count,
                    result,
                });
            }
            None => unmatched.push(PromotionCandidate::unranked(
                assignment.label.clone(),
                assignment.ticket_count,
                assignment.representative_example().map(String::from),
            )),
        }
    }

    let promotion_candidates = rank_candidates(unmatched, audit_config.promotion_min_tickets);
    let report = AuditReport::assemble(findings, promotion_candidates);
    info!(
        findings = report.findings.len(),
        incorrect = report.summary.incorrect,
        ambiguous = report.summary.ambiguous,
        promotions = report.promotion_candidates.len(),
        "audit run finished"
    );
    Ok(report)
}

/// Best fuzzy label match at or above the keep threshold.
fn fuzzy_best(label: &str, canonical_ids: &[String], keep: f32) -> Option<MatchResult> {
    canonical_ids
        .iter()
        .map(|id| (id, label_similarity(label, id) as f32))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .filter(|(_, score)| *score >= keep)
        .map(|(id, score)| MatchResult {
            method: MatchMethod::Fuzzy,
            score,
            matched_intent_id: id.clone(),
        })
}
