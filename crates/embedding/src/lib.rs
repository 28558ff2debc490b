//! Embedding provider interface for the batch pipelines.
//!
//! The discovery and audit paths both consume this crate: an [`Embedder`]
//! backend (OpenAI-compatible or Ollama), a batch runner that chunks inputs
//! to the provider limit and tolerates per-batch failures, and a run-scoped
//! LRU cache.

pub mod batch;
pub mod cache;
pub mod ollama;
pub mod openai;
pub mod traits;

pub use batch::{embed_in_batches, BatchOutcome};
pub use cache::EmbeddingCache;
pub use ollama::OllamaEmbedder;
pub use openai::OpenAiEmbedder;
pub use traits::{Embedder, EmbeddingError};
