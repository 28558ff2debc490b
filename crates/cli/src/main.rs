//! miner-cli — batch worker for intent discovery and audit runs.
//!
//! Both subcommands are pure batch jobs: read JSON snapshots, call the
//! embedding provider, write a JSON report. Nothing is persisted by the
//! core itself; the caller owns the output files.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing::info;
use tracing_subscriber::EnvFilter;

use miner_audit::rules::RuleEntry;
use miner_audit::{audit_assignments, AssignedIntent, RuleTable};
use miner_core::{config, CanonicalIntent, Config, RawTicket};
use miner_discovery::{run_discovery, CanonicalMatcher};
use miner_embedding::{
    embed_in_batches, Embedder, EmbeddingCache, OllamaEmbedder, OpenAiEmbedder,
};

// ── CLI ─────────────────────────────────────────────────────────────

/// Support-intent discovery and audit worker.
#[derive(Parser, Debug)]
#[command(name = "miner-cli", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cluster unmatched tickets and surface candidate intents.
    Discover {
        /// JSON array of raw tickets.
        #[arg(long)]
        tickets: PathBuf,
        /// JSON array of canonical intents.
        #[arg(long)]
        intents: PathBuf,
        /// Report destination; stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Re-validate upstream intent assignments.
    Audit {
        /// JSON array of assigned intents with example queries.
        #[arg(long)]
        assignments: PathBuf,
        /// JSON array of canonical intents.
        #[arg(long)]
        intents: PathBuf,
        /// JSON array of named regex rules, in evaluation order.
        #[arg(long)]
        rules: Option<PathBuf>,
        /// Report destination; stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Print the human-readable report instead of JSON.
        #[arg(long)]
        text: bool,
    },
}

// ── Wiring ──────────────────────────────────────────────────────────

fn build_embedder(config: &Config) -> Result<Box<dyn Embedder>> {
    let embedding = &config.embedding;
    match embedding.provider.as_str() {
        "openai" => {
            let api_key = embedding
                .api_key
                .clone()
                .context("OPENAI_API_KEY is required for the openai embedding provider")?;
            Ok(Box::new(OpenAiEmbedder::new(
                api_key,
                embedding.model.clone(),
                embedding.base_url.clone(),
                embedding.dimensions,
            )))
        }
        "ollama" => Ok(Box::new(OllamaEmbedder::new(
            embedding.ollama_url.clone(),
            embedding.model.clone(),
            embedding.dimensions,
        ))),
        other => bail!("unknown embedding provider `{other}` (expected openai or ollama)"),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))
}

fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{content}"),
    }
    Ok(())
}

/// Embed the canonical registry once and build the shared matcher.
async fn build_canonical_matcher(
    intents: &[CanonicalIntent],
    embedder: &dyn Embedder,
    cache: &mut EmbeddingCache,
    config: &Config,
) -> Result<CanonicalMatcher> {
    let texts: Vec<String> = intents.iter().map(|i| i.embedding_text()).collect();
    let outcome = embed_in_batches(embedder, cache, &texts, config.embedding.batch_size).await;
    if outcome.failed_batches > 0 {
        bail!(
            "{} canonical embedding batches failed; audit needs the full registry",
            outcome.failed_batches
        );
    }
    let entries = intents
        .iter()
        .zip(outcome.vectors)
        .filter_map(|(intent, vector)| vector.map(|v| (intent.intent_id.clone(), v)))
        .collect();
    Ok(CanonicalMatcher::new(entries)?)
}

// ── Main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    config::load_dotenv();
    let config = Config::from_env();
    let cli = Cli::parse();

    let embedder = build_embedder(&config)?;
    let mut cache = EmbeddingCache::new(config.embedding.cache_capacity);

    match cli.command {
        Command::Discover {
            tickets,
            intents,
            output,
        } => {
            let tickets: Vec<RawTicket> = read_json(&tickets)?;
            let intents: Vec<CanonicalIntent> = read_json(&intents)?;

            let report =
                run_discovery(&tickets, &intents, embedder.as_ref(), &mut cache, &config).await?;

            info!(
                clusters = report.metadata.total_clusters,
                noise = report.metadata.noise_count,
                cache_hit_rate = cache.hit_rate(),
                "discovery complete"
            );
            write_output(output.as_deref(), &serde_json::to_string_pretty(&report)?)?;
        }
        Command::Audit {
            assignments,
            intents,
            rules,
            output,
            text,
        } => {
            let assignments: Vec<AssignedIntent> = read_json(&assignments)?;
            let intents: Vec<CanonicalIntent> = read_json(&intents)?;
            let rule_table = match rules {
                Some(path) => {
                    let entries: Vec<RuleEntry> = read_json(&path)?;
                    RuleTable::compile(&entries)?
                }
                None => RuleTable::empty(),
            };

            let canonical =
                build_canonical_matcher(&intents, embedder.as_ref(), &mut cache, &config).await?;
            let report = audit_assignments(
                &assignments,
                &rule_table,
                &canonical,
                embedder.as_ref(),
                &mut cache,
                &config.audit,
                &config.embedding,
            )
            .await?;

            info!(
                findings = report.findings.len(),
                promotions = report.promotion_candidates.len(),
                cache_hit_rate = cache.hit_rate(),
                "audit complete"
            );
            let rendered = if text {
                report.render_text()
            } else {
                serde_json::to_string_pretty(&report)?
            };
            write_output(output.as_deref(), &rendered)?;
        }
    }

    Ok(())
}
