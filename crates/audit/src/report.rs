use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use miner_core::{AuditClassification, MatchMethod, ProposedFix};

use crate::matcher::AuditFinding;
use crate::promotion::{PromotionAction, PromotionCandidate};

/// Headline counts over an audit run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditSummary {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub ambiguous: usize,
    pub unmatched: usize,
}

/// Structured audit result plus the promotion plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub summary: AuditSummary,
    /// Sorted worst-first: INCORRECT, then AMBIGUOUS, then CORRECT.
    pub findings: Vec<AuditFinding>,
    pub promotion_candidates: Vec<PromotionCandidate>,
}

fn severity(classification: AuditClassification) -> u8 {
    match classification {
        AuditClassification::Incorrect => 0,
        AuditClassification::Ambiguous => 1,
        AuditClassification::Correct => 2,
    }
}

fn classification_tag(classification: AuditClassification) -> &'static str {
    match classification {
        AuditClassification::Correct => "CORRECT",
        AuditClassification::Incorrect => "INCORRECT",
        AuditClassification::Ambiguous => "AMBIGUOUS",
    }
}

fn method_tag(method: MatchMethod) -> &'static str {
    match method {
        MatchMethod::Regex => "regex",
        MatchMethod::Semantic => "semantic",
        MatchMethod::Fuzzy => "fuzzy",
    }
}

/// Verbal strength of a fuzzy score, used in the rendered report.
fn fuzzy_strength(score: f32) -> &'static str {
    if score >= 0.75 {
        "strong"
    } else if score >= 0.65 {
        "moderate"
    } else {
        "weak"
    }
}

impl AuditReport {
    /// Build a report from raw findings: sorts worst-first (ties by ticket
    /// count descending, then label) and derives the summary counts.
    pub fn assemble(
        mut findings: Vec<AuditFinding>,
        promotion_candidates: Vec<PromotionCandidate>,
    ) -> Self {
        findings.sort_by(|a, b| {
            severity(a.classification)
                .cmp(&severity(b.classification))
                .then_with(|| b.ticket_count.cmp(&a.ticket_count))
                .then_with(|| a.assigned_intent.cmp(&b.assigned_intent))
        });

        let count = |c: AuditClassification| {
            findings.iter().filter(|f| f.classification == c).count()
        };
        let summary = AuditSummary {
            total: findings.len() + promotion_candidates.len(),
            correct: count(AuditClassification::Correct),
            incorrect: count(AuditClassification::Incorrect),
            ambiguous: count(AuditClassification::Ambiguous),
            unmatched: promotion_candidates.len(),
        };

        Self {
            summary,
            findings,
            promotion_candidates,
        }
    }

    /// Render the human-readable review document.
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "== Intent audit summary ==");
        let _ = writeln!(
            out,
            "audited: {}  correct: {}  incorrect: {}  ambiguous: {}  unmatched: {}",
            self.summary.total,
            self.summary.correct,
            self.summary.incorrect,
            self.summary.ambiguous,
            self.summary.unmatched
        );

        let _ = writeln!(out, "\n== Findings (worst first) ==");
        for finding in &self.findings {
            let _ = writeln!(
                out,
                "[{}] {} -> {} ({}, score {:.2}, shared tokens {}, label similarity {:.2})",
                classification_tag(finding.classification),
                finding.assigned_intent,
                finding.result.matched_intent_id,
                match finding.result.method {
                    MatchMethod::Fuzzy => {
                        format!("fuzzy/{}", fuzzy_strength(finding.result.score))
                    }
                    other => method_tag(other).to_string(),
                },
                finding.result.score,
                finding.shared_tokens,
                finding.label_similarity,
            );
            if let Some(example) = &finding.example_query {
                let _ = writeln!(out, "    example: {example}");
            }
            if let Some(fix) = &finding.proposed_fix {
                let _ = writeln!(out, "    fix: {}", render_fix(fix));
            }
        }

        let _ = writeln!(out, "\n== Prioritized fixes ==");
        let mut rank = 1;
        for finding in &self.findings {
            if let Some(fix) = &finding.proposed_fix {
                let _ = writeln!(
                    out,
                    "{rank}. [{}] {}: {}",
                    classification_tag(finding.classification),
                    finding.assigned_intent,
                    render_fix(fix)
                );
                rank += 1;
            }
        }
        if rank == 1 {
            let _ = writeln!(out, "nothing to fix");
        }

        let _ = writeln!(out, "\n== Promotion plan ==");
        if self.promotion_candidates.is_empty() {
            let _ = writeln!(out, "no unmatched intents");
        } else {
            let _ = writeln!(out, "{:<40} {:>8}  action", "intent", "tickets");
            for candidate in &self.promotion_candidates {
                let _ = writeln!(
                    out,
                    "{:<40} {:>8}  {}",
                    candidate.label,
                    candidate.ticket_count,
                    match candidate.action {
                        PromotionAction::Promote => "promote",
                        PromotionAction::Wait => "wait",
                    }
                );
            }
        }

        out
    }
}

fn render_fix(fix: &ProposedFix) -> String {
    match fix {
        ProposedFix::TightenRegex {
            rule_name,
            suggested_guard,
            ..
        } => format!("tighten_regex on `{rule_name}`: prepend {suggested_guard}"),
        ProposedFix::AdjustNormalization {
            assigned_intent,
            matched_intent,
            suggested_alias,
        } => format!(
            "adjust_normalization: alias `{suggested_alias}` for {assigned_intent} (nearest: {matched_intent})"
        ),
        ProposedFix::AddDisambiguation { question, options } => {
            format!("add_disambiguation: \"{question}\" [{} | {}]", options[0], options[1])
        }
    }
}
