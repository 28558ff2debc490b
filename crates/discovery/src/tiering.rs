use serde::{Deserialize, Serialize};

use miner_core::config::TieringConfig;
use miner_core::{ClusterVerdict, MatchResult, QualityFlag, TicketRecord};

use crate::algorithms::single_linkage::Cluster;
use crate::keywords::top_keywords;

/// Convert a centroid's nearest-canonical score into a verdict.
///
/// Tiers are mutually exclusive and exhaustive over [0, 1]: at or above the
/// map threshold the cluster maps to the existing intent, below the propose
/// threshold it becomes a new-intent candidate, the band between is
/// ambiguous and needs manual verification.
pub fn verdict_for(score: f32, config: &TieringConfig) -> ClusterVerdict {
    if score >= config.map_threshold {
        ClusterVerdict::MapToExisting
    } else if score >= config.propose_threshold {
        ClusterVerdict::Ambiguous
    } else {
        ClusterVerdict::ProposeNewIntent
    }
}

/// Operational flags for a cluster, independent of its verdict except for
/// MIDDLE_ZONE, which marks the ambiguous band itself.
pub fn quality_flags(
    verdict: ClusterVerdict,
    reopen_rate: f32,
    auto_closeable_rate: f32,
    config: &TieringConfig,
) -> Vec<QualityFlag> {
    let mut flags = Vec::new();
    if verdict == ClusterVerdict::Ambiguous {
        flags.push(QualityFlag::MiddleZone);
    }
    if reopen_rate > config.high_risk_reopen_rate {
        flags.push(QualityFlag::HighRisk);
    }
    if auto_closeable_rate > config.high_automation_rate {
        flags.push(QualityFlag::HighAutomationPotential);
    }
    flags
}

/// Per-cluster summary carried into the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub cluster_id: usize,
    pub size: usize,
    pub verdict: ClusterVerdict,
    pub flags: Vec<QualityFlag>,
    pub nearest: MatchResult,
    pub avg_prior_confidence: f32,
    pub reopen_rate: f32,
    pub auto_closeable_rate: f32,
    pub keywords: Vec<String>,
    pub examples: Vec<String>,
    pub member_ticket_ids: Vec<String>,
}

/// Summarize a cluster against its members and nearest canonical match.
///
/// `tickets` is the run's embedded-ticket arena that the cluster's member
/// indices point into.
pub fn summarize_cluster(
    cluster: &Cluster,
    tickets: &[TicketRecord],
    nearest: MatchResult,
    config: &TieringConfig,
) -> ClusterSummary {
    let members: Vec<&TicketRecord> = cluster.members.iter().map(|&i| &tickets[i]).collect();
    let size = members.len();
    let count = size as f32;

    let reopen_rate = members.iter().filter(|t| t.reopened).count() as f32 / count;
    let auto_closeable_rate = members.iter().filter(|t| t.auto_closeable).count() as f32 / count;
    let avg_prior_confidence =
        members.iter().map(|t| t.prior_confidence).sum::<f32>() / count;

    let verdict = verdict_for(nearest.score, config);
    let flags = quality_flags(verdict, reopen_rate, auto_closeable_rate, config);

    let texts: Vec<&str> = members.iter().map(|t| t.text.as_str()).collect();
    let keywords = top_keywords(&texts, config.max_keywords);
    let examples = members
        .iter()
        .take(config.max_examples)
        .map(|t| t.text.clone())
        .collect();
    let member_ticket_ids = members.iter().map(|t| t.id.clone()).collect();

    ClusterSummary {
        cluster_id: cluster.id,
        size,
        verdict,
        flags,
        nearest,
        avg_prior_confidence,
        reopen_rate,
        auto_closeable_rate,
        keywords,
        examples,
        member_ticket_ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use miner_core::MatchMethod;

    fn config() -> TieringConfig {
        TieringConfig::defaults()
    }

    fn ticket(id: &str, reopened: bool, auto_closeable: bool) -> TicketRecord {
        TicketRecord {
            id: id.into(),
            text: format!("ticket {id} about password reset"),
            prior_intent: None,
            prior_confidence: 0.5,
            auto_closeable,
            reopened,
        }
    }

    fn semantic(score: f32, intent: &str) -> MatchResult {
        MatchResult {
            method: MatchMethod::Semantic,
            score,
            matched_intent_id: intent.into(),
        }
    }

    #[test]
    fn verdict_boundaries() {
        let c = config();
        assert_eq!(verdict_for(0.78, &c), ClusterVerdict::MapToExisting);
        assert_eq!(verdict_for(0.77999, &c), ClusterVerdict::Ambiguous);
        assert_eq!(verdict_for(0.65, &c), ClusterVerdict::Ambiguous);
        assert_eq!(verdict_for(0.649999, &c), ClusterVerdict::ProposeNewIntent);
        assert_eq!(verdict_for(0.0, &c), ClusterVerdict::ProposeNewIntent);
        assert_eq!(verdict_for(1.0, &c), ClusterVerdict::MapToExisting);
    }

    #[test]
    fn middle_zone_flag_accompanies_ambiguous() {
        let c = config();
        let flags = quality_flags(ClusterVerdict::Ambiguous, 0.0, 0.0, &c);
        assert_eq!(flags, vec![QualityFlag::MiddleZone]);

        let flags = quality_flags(ClusterVerdict::MapToExisting, 0.0, 0.0, &c);
        assert!(flags.is_empty());
    }

    #[test]
    fn risk_and_automation_flags_are_rate_driven() {
        let c = config();
        let flags = quality_flags(ClusterVerdict::MapToExisting, 0.2, 0.8, &c);
        assert!(flags.contains(&QualityFlag::HighRisk));
        assert!(flags.contains(&QualityFlag::HighAutomationPotential));

        // At the thresholds exactly, nothing fires.
        let flags = quality_flags(ClusterVerdict::MapToExisting, 0.15, 0.70, &c);
        assert!(flags.is_empty());
    }

    #[test]
    fn strong_match_maps_to_existing_without_extra_flags() {
        let tickets: Vec<TicketRecord> =
            (0..6).map(|i| ticket(&format!("T{i}"), false, false)).collect();
        let cluster = Cluster {
            id: 0,
            members: (0..6).collect(),
            centroid: vec![1.0, 0.0],
        };

        let summary = summarize_cluster(&cluster, &tickets, semantic(0.95, "LoginIssue"), &config());

        assert_eq!(summary.verdict, ClusterVerdict::MapToExisting);
        assert_eq!(summary.nearest.matched_intent_id, "LoginIssue");
        assert!(summary.flags.is_empty());
        assert_eq!(summary.size, 6);
        assert_eq!(summary.examples.len(), 3);
    }

    #[test]
    fn summary_rates_and_confidence() {
        let tickets = vec![
            ticket("A", true, true),
            ticket("B", false, true),
            ticket("C", false, true),
            ticket("D", false, true),
            ticket("E", false, false),
        ];
        let cluster = Cluster {
            id: 3,
            members: (0..5).collect(),
            centroid: vec![1.0],
        };

        let summary = summarize_cluster(&cluster, &tickets, semantic(0.5, "X"), &config());

        assert_eq!(summary.cluster_id, 3);
        assert!((summary.reopen_rate - 0.2).abs() < 1e-6);
        assert!((summary.auto_closeable_rate - 0.8).abs() < 1e-6);
        assert!((summary.avg_prior_confidence - 0.5).abs() < 1e-6);
        assert_eq!(summary.verdict, ClusterVerdict::ProposeNewIntent);
        assert!(summary.flags.contains(&QualityFlag::HighRisk));
        assert!(summary.flags.contains(&QualityFlag::HighAutomationPotential));
        assert!(summary.keywords.contains(&"password".to_string()));
        assert_eq!(summary.member_ticket_ids.len(), 5);
    }
}
