use serde::{Deserialize, Serialize};

/// Raw ticket fields as exported by the help-desk system.
///
/// The caller is expected to have filtered out auto-closed tickets and
/// tickets that already carry an approved canonical intent; this core only
/// rejects boilerplate content during normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTicket {
    pub id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub question: String,
    /// Intent label assigned by the upstream classifier, if any.
    #[serde(default)]
    pub prior_intent: Option<String>,
    /// Confidence the upstream classifier reported for `prior_intent`.
    #[serde(default)]
    pub prior_confidence: f32,
    #[serde(default)]
    pub auto_closeable: bool,
    #[serde(default)]
    pub reopened: bool,
}

/// A ticket admitted into a run, carrying its derived comparison text.
///
/// Immutable once built; every downstream stage refers to tickets by index
/// into the run's ticket arena.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketRecord {
    pub id: String,
    /// Compact comparison string built by the normalizer.
    pub text: String,
    pub prior_intent: Option<String>,
    pub prior_confidence: f32,
    pub auto_closeable: bool,
    pub reopened: bool,
}

impl TicketRecord {
    /// Build a record from raw fields and an already-normalized text.
    pub fn from_raw(raw: &RawTicket, text: String) -> Self {
        Self {
            id: raw.id.clone(),
            text,
            prior_intent: raw.prior_intent.clone(),
            prior_confidence: raw.prior_confidence,
            auto_closeable: raw.auto_closeable,
            reopened: raw.reopened,
        }
    }
}
