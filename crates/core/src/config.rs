use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_usize(key: &str, default: usize) -> usize {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_f32(key: &str, default: f32) -> f32 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub embedding: EmbeddingConfig,
    pub clustering: ClusteringConfig,
    pub tiering: TieringConfig,
    pub audit: AuditConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            embedding: EmbeddingConfig::from_env(),
            clustering: ClusteringConfig::from_env(),
            tiering: TieringConfig::from_env(),
            audit: AuditConfig::from_env(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            embedding: EmbeddingConfig::defaults(),
            clustering: ClusteringConfig::defaults(),
            tiering: TieringConfig::defaults(),
            audit: AuditConfig::defaults(),
        }
    }
}

// ── Embedding provider ────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// `openai` or `ollama`.
    pub provider: String,
    pub api_key: Option<String>,
    pub model: String,
    /// Override for OpenAI-compatible endpoints; default is api.openai.com.
    pub base_url: Option<String>,
    pub ollama_url: String,
    pub dimensions: usize,
    /// Texts per provider call; provider limits cap this at 100.
    pub batch_size: usize,
    pub cache_capacity: usize,
}

impl EmbeddingConfig {
    pub fn from_env() -> Self {
        Self {
            provider: env_or("MINER_EMBEDDING_PROVIDER", "openai"),
            api_key: env_opt("OPENAI_API_KEY"),
            model: env_or("MINER_EMBEDDING_MODEL", "text-embedding-3-small"),
            base_url: env_opt("MINER_EMBEDDING_BASE_URL"),
            ollama_url: env_or("OLLAMA_URL", "http://localhost:11434"),
            dimensions: env_usize("MINER_EMBEDDING_DIMENSIONS", 1536),
            batch_size: env_usize("MINER_EMBEDDING_BATCH_SIZE", 100).min(100),
            cache_capacity: env_usize("MINER_EMBEDDING_CACHE_CAPACITY", 4096),
        }
    }

    pub fn defaults() -> Self {
        Self {
            provider: "openai".into(),
            api_key: None,
            model: "text-embedding-3-small".into(),
            base_url: None,
            ollama_url: "http://localhost:11434".into(),
            dimensions: 1536,
            batch_size: 100,
            cache_capacity: 4096,
        }
    }
}

// ── Similarity clustering ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// Pairs below this similarity never enter the candidate edge set.
    pub edge_prefilter: f32,
    /// Edges below this similarity are never unioned.
    pub merge_threshold: f32,
    /// Groups smaller than this become noise.
    pub min_cluster_size: usize,
    /// Hard cap on tickets per run; pairwise similarity is O(n^2).
    pub max_tickets: usize,
}

impl ClusteringConfig {
    pub fn from_env() -> Self {
        Self {
            edge_prefilter: env_f32("MINER_EDGE_PREFILTER", 0.5),
            merge_threshold: env_f32("MINER_MERGE_THRESHOLD", 0.65),
            min_cluster_size: env_usize("MINER_MIN_CLUSTER_SIZE", 5),
            max_tickets: env_usize("MINER_MAX_TICKETS", 5000),
        }
    }

    pub fn defaults() -> Self {
        Self {
            edge_prefilter: 0.5,
            merge_threshold: 0.65,
            min_cluster_size: 5,
            max_tickets: 5000,
        }
    }
}

// ── Verdict tiering and quality flags ─────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TieringConfig {
    /// At or above: map the cluster to the matched canonical intent.
    pub map_threshold: f32,
    /// Below: propose a new intent. Between the two: ambiguous.
    pub propose_threshold: f32,
    /// Reopen fraction above which a cluster is flagged HIGH_RISK.
    pub high_risk_reopen_rate: f32,
    /// Auto-closeable fraction above which HIGH_AUTOMATION_POTENTIAL fires.
    pub high_automation_rate: f32,
    /// Representative example texts kept per cluster.
    pub max_examples: usize,
    pub max_keywords: usize,
}

impl TieringConfig {
    pub fn from_env() -> Self {
        Self {
            map_threshold: env_f32("MINER_MAP_THRESHOLD", 0.78),
            propose_threshold: env_f32("MINER_PROPOSE_THRESHOLD", 0.65),
            high_risk_reopen_rate: env_f32("MINER_HIGH_RISK_REOPEN_RATE", 0.15),
            high_automation_rate: env_f32("MINER_HIGH_AUTOMATION_RATE", 0.70),
            max_examples: env_usize("MINER_MAX_EXAMPLES", 3),
            max_keywords: env_usize("MINER_MAX_KEYWORDS", 10),
        }
    }

    pub fn defaults() -> Self {
        Self {
            map_threshold: 0.78,
            propose_threshold: 0.65,
            high_risk_reopen_rate: 0.15,
            high_automation_rate: 0.70,
            max_examples: 3,
            max_keywords: 10,
        }
    }
}

// ── Audit cascade ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Semantic score accepted directly, without corroboration.
    pub semantic_accept: f32,
    /// Semantic scores in [floor, accept) fall through to the fuzzy tier.
    pub semantic_floor: f32,
    /// Minimum fuzzy label similarity for a fuzzy match to be kept.
    pub fuzzy_keep: f32,
    /// Unmatched intents below this ticket count are marked "wait"
    /// instead of being promoted.
    pub promotion_min_tickets: usize,
}

impl AuditConfig {
    pub fn from_env() -> Self {
        Self {
            semantic_accept: env_f32("MINER_SEMANTIC_ACCEPT", 0.78),
            semantic_floor: env_f32("MINER_SEMANTIC_FLOOR", 0.60),
            fuzzy_keep: env_f32("MINER_FUZZY_KEEP", 0.50),
            promotion_min_tickets: env_usize("MINER_PROMOTION_MIN_TICKETS", 5),
        }
    }

    pub fn defaults() -> Self {
        Self {
            semantic_accept: 0.78,
            semantic_floor: 0.60,
            fuzzy_keep: 0.50,
            promotion_min_tickets: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_thresholds() {
        let config = Config::default();
        assert_eq!(config.clustering.merge_threshold, 0.65);
        assert_eq!(config.clustering.min_cluster_size, 5);
        assert_eq!(config.tiering.map_threshold, 0.78);
        assert_eq!(config.tiering.propose_threshold, 0.65);
        assert_eq!(config.audit.semantic_accept, 0.78);
        assert_eq!(config.audit.fuzzy_keep, 0.50);
    }

    #[test]
    fn batch_size_is_capped_at_provider_limit() {
        // Defaults already sit at the limit.
        let config = EmbeddingConfig::defaults();
        assert!(config.batch_size <= 100);
    }
}
