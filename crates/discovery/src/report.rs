use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use miner_core::ClusterVerdict;

use crate::tiering::ClusterSummary;

/// Cap on noise ticket ids included in the report sample.
pub const NOISE_SAMPLE_CAP: usize = 50;

/// Run-level counters reported alongside the cluster buckets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    /// Tickets handed to the run before normalization.
    pub tickets_seen: usize,
    /// Tickets surviving normalization and the input cap.
    pub tickets_eligible: usize,
    /// Tickets that received an embedding vector.
    pub tickets_embedded: usize,
    /// Provider batches that failed; reduces the embedded count.
    pub embed_batches_failed: usize,
    pub total_clusters: usize,
    pub noise_count: usize,
}

/// Structured discovery result handed to human review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryReport {
    pub metadata: RunMetadata,
    pub proposed_new_intents: Vec<ClusterSummary>,
    pub map_to_existing: Vec<ClusterSummary>,
    pub ambiguous_clusters: Vec<ClusterSummary>,
    /// Sample of noise ticket ids, capped at [`NOISE_SAMPLE_CAP`].
    pub noise_sample: Vec<String>,
}

impl DiscoveryReport {
    /// Total clusters across the three buckets.
    pub fn cluster_count(&self) -> usize {
        self.proposed_new_intents.len() + self.map_to_existing.len() + self.ambiguous_clusters.len()
    }

    /// Total tickets across all cluster buckets (noise not included).
    pub fn clustered_ticket_count(&self) -> usize {
        self.proposed_new_intents
            .iter()
            .chain(&self.map_to_existing)
            .chain(&self.ambiguous_clusters)
            .map(|c| c.size)
            .sum()
    }
}

/// Partition cluster summaries into verdict buckets and finalize counters.
///
/// Each bucket is sorted by cluster size descending (ties by cluster id so
/// output is stable across runs). `metadata.total_clusters` and
/// `metadata.noise_count` are derived here so the report can never disagree
/// with its own buckets.
pub fn assemble(
    mut metadata: RunMetadata,
    summaries: Vec<ClusterSummary>,
    noise_ticket_ids: Vec<String>,
) -> DiscoveryReport {
    let mut proposed_new_intents = Vec::new();
    let mut map_to_existing = Vec::new();
    let mut ambiguous_clusters = Vec::new();

    for summary in summaries {
        match summary.verdict {
            ClusterVerdict::ProposeNewIntent => proposed_new_intents.push(summary),
            ClusterVerdict::MapToExisting => map_to_existing.push(summary),
            ClusterVerdict::Ambiguous => ambiguous_clusters.push(summary),
        }
    }

    for bucket in [
        &mut proposed_new_intents,
        &mut map_to_existing,
        &mut ambiguous_clusters,
    ] {
        bucket.sort_unstable_by(|a, b| {
            b.size.cmp(&a.size).then_with(|| a.cluster_id.cmp(&b.cluster_id))
        });
    }

    metadata.total_clusters =
        proposed_new_intents.len() + map_to_existing.len() + ambiguous_clusters.len();
    metadata.noise_count = noise_ticket_ids.len();

    let mut noise_sample = noise_ticket_ids;
    noise_sample.truncate(NOISE_SAMPLE_CAP);

    DiscoveryReport {
        metadata,
        proposed_new_intents,
        map_to_existing,
        ambiguous_clusters,
        noise_sample,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use miner_core::{MatchMethod, MatchResult};

    fn metadata() -> RunMetadata {
        RunMetadata {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            duration_ms: 0,
            tickets_seen: 0,
            tickets_eligible: 0,
            tickets_embedded: 0,
            embed_batches_failed: 0,
            total_clusters: 0,
            noise_count: 0,
        }
    }

    fn summary(cluster_id: usize, size: usize, verdict: ClusterVerdict) -> ClusterSummary {
        ClusterSummary {
            cluster_id,
            size,
            verdict,
            flags: vec![],
            nearest: MatchResult {
                method: MatchMethod::Semantic,
                score: 0.5,
                matched_intent_id: "X".into(),
            },
            avg_prior_confidence: 0.0,
            reopen_rate: 0.0,
            auto_closeable_rate: 0.0,
            keywords: vec![],
            examples: vec![],
            member_ticket_ids: (0..size).map(|i| format!("c{cluster_id}-{i}")).collect(),
        }
    }

    #[test]
    fn buckets_sorted_by_size_descending() {
        let summaries = vec![
            summary(0, 5, ClusterVerdict::ProposeNewIntent),
            summary(1, 9, ClusterVerdict::ProposeNewIntent),
            summary(2, 7, ClusterVerdict::MapToExisting),
            summary(3, 12, ClusterVerdict::MapToExisting),
            summary(4, 6, ClusterVerdict::Ambiguous),
        ];

        let report = assemble(metadata(), summaries, vec![]);

        let sizes: Vec<usize> = report.proposed_new_intents.iter().map(|c| c.size).collect();
        assert_eq!(sizes, vec![9, 5]);
        let sizes: Vec<usize> = report.map_to_existing.iter().map(|c| c.size).collect();
        assert_eq!(sizes, vec![12, 7]);
        assert_eq!(report.ambiguous_clusters.len(), 1);
    }

    #[test]
    fn metadata_counts_derive_from_buckets() {
        let summaries = vec![
            summary(0, 5, ClusterVerdict::ProposeNewIntent),
            summary(1, 6, ClusterVerdict::Ambiguous),
        ];
        let noise: Vec<String> = (0..3).map(|i| format!("N{i}")).collect();

        let report = assemble(metadata(), summaries, noise);

        assert_eq!(report.metadata.total_clusters, 2);
        assert_eq!(report.metadata.noise_count, 3);
        assert_eq!(report.cluster_count(), report.metadata.total_clusters);
    }

    #[test]
    fn round_trip_counts_are_conserved() {
        let summaries = vec![
            summary(0, 5, ClusterVerdict::ProposeNewIntent),
            summary(1, 8, ClusterVerdict::MapToExisting),
            summary(2, 6, ClusterVerdict::Ambiguous),
        ];
        let noise: Vec<String> = (0..4).map(|i| format!("N{i}")).collect();

        let mut meta = metadata();
        meta.tickets_embedded = 5 + 8 + 6 + 4;

        let report = assemble(meta, summaries, noise);

        // Re-aggregating the buckets reproduces the metadata exactly:
        // nothing lost, nothing double-counted.
        assert_eq!(
            report.clustered_ticket_count() + report.metadata.noise_count,
            report.metadata.tickets_embedded
        );
        assert_eq!(report.cluster_count(), report.metadata.total_clusters);
    }

    #[test]
    fn noise_sample_is_capped() {
        let noise: Vec<String> = (0..200).map(|i| format!("N{i}")).collect();
        let report = assemble(metadata(), vec![], noise);

        assert_eq!(report.noise_sample.len(), NOISE_SAMPLE_CAP);
        assert_eq!(report.metadata.noise_count, 200);
    }
}
