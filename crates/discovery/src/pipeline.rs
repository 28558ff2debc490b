//! Discovery run orchestrator.
//!
//! Owns the run context explicitly: ticket arena, embeddings, matcher, and
//! counters all live on the stack of this function and flow stage to stage.
//! The only suspension points are the embedding calls; everything after is
//! pure computation.

use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use miner_core::{CanonicalIntent, Config, MinerError, RawTicket, TicketRecord};
use miner_embedding::{embed_in_batches, Embedder, EmbeddingCache};

use crate::algorithms::single_linkage::{single_linkage, ClusterParams};
use crate::matcher::CanonicalMatcher;
use crate::normalize;
use crate::report::{assemble, DiscoveryReport, RunMetadata};
use crate::tiering::summarize_cluster;

/// Run the discovery path over a ticket snapshot.
///
/// Embedding failures degrade the run (fewer embedded tickets, counters in
/// the metadata) instead of aborting it; an empty eligible set or an empty
/// canonical registry are valid inputs producing an empty report.
pub async fn run_discovery(
    raw_tickets: &[RawTicket],
    intents: &[CanonicalIntent],
    embedder: &dyn Embedder,
    cache: &mut EmbeddingCache,
    config: &Config,
) -> Result<DiscoveryReport, MinerError> {
    let started = Instant::now();
    let started_at = Utc::now();
    let run_id = Uuid::new_v4();
    let tickets_seen = raw_tickets.len();

    // Stage 1: normalize and drop boilerplate.
    let mut records: Vec<TicketRecord> = raw_tickets
        .iter()
        .filter_map(|raw| {
            normalize::normalize(&raw.subject, &raw.question)
                .map(|text| TicketRecord::from_raw(raw, text))
        })
        .collect();

    if records.len() > config.clustering.max_tickets {
        warn!(
            eligible = records.len(),
            cap = config.clustering.max_tickets,
            "ticket snapshot exceeds run cap, truncating"
        );
        records.truncate(config.clustering.max_tickets);
    }
    let tickets_eligible = records.len();
    info!(run_id = %run_id, tickets_seen, tickets_eligible, "discovery run started");

    let mut embed_batches_failed = 0usize;

    // Stage 2: canonical-intent embeddings, once per run.
    let intent_texts: Vec<String> = intents.iter().map(|i| i.embedding_text()).collect();
    let intent_outcome =
        embed_in_batches(embedder, cache, &intent_texts, config.embedding.batch_size).await;
    embed_batches_failed += intent_outcome.failed_batches;

    let matcher = CanonicalMatcher::new(
        intents
            .iter()
            .zip(intent_outcome.vectors)
            .filter_map(|(intent, vector)| vector.map(|v| (intent.intent_id.clone(), v)))
            .collect(),
    )?;
    info!(canonical_intents = matcher.len(), "canonical matcher ready");

    // Stage 3: ticket embeddings; failed batches drop their tickets.
    let ticket_texts: Vec<String> = records.iter().map(|r| r.text.clone()).collect();
    let ticket_outcome =
        embed_in_batches(embedder, cache, &ticket_texts, config.embedding.batch_size).await;
    embed_batches_failed += ticket_outcome.failed_batches;

    let mut tickets: Vec<TicketRecord> = Vec::with_capacity(ticket_outcome.embedded);
    let mut vectors: Vec<Vec<f32>> = Vec::with_capacity(ticket_outcome.embedded);
    for (record, vector) in records.drain(..).zip(ticket_outcome.vectors) {
        if let Some(v) = vector {
            tickets.push(record);
            vectors.push(v);
        }
    }
    let tickets_embedded = tickets.len();

    // Stage 4: similarity-graph clustering.
    let result = single_linkage(&vectors, &ClusterParams::from(&config.clustering));
    info!(
        clusters = result.clusters.len(),
        noise = result.noise.len(),
        "clustering complete"
    );

    // Stage 5: nearest canonical match and verdict per cluster.
    let mut summaries = Vec::with_capacity(result.clusters.len());
    for cluster in &result.clusters {
        let nearest = matcher.nearest(&cluster.centroid)?;
        summaries.push(summarize_cluster(
            cluster,
            &tickets,
            nearest,
            &config.tiering,
        ));
    }

    let noise_ticket_ids: Vec<String> = result
        .noise
        .iter()
        .map(|&i| tickets[i].id.clone())
        .collect();

    let metadata = RunMetadata {
        run_id,
        started_at,
        duration_ms: started.elapsed().as_millis() as u64,
        tickets_seen,
        tickets_eligible,
        tickets_embedded,
        embed_batches_failed,
        total_clusters: 0,
        noise_count: 0,
    };

    let report = assemble(metadata, summaries, noise_ticket_ids);
    info!(
        run_id = %run_id,
        proposed = report.proposed_new_intents.len(),
        mapped = report.map_to_existing.len(),
        ambiguous = report.ambiguous_clusters.len(),
        duration_ms = report.metadata.duration_ms,
        "discovery run finished"
    );
    Ok(report)
}
