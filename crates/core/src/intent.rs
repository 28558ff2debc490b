use serde::{Deserialize, Serialize};

/// An approved support-request category from the canonical registry.
///
/// Read-only reference data for a run; the registry's CRUD layer lives
/// outside this core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalIntent {
    pub intent_id: String,
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl CanonicalIntent {
    /// Descriptive text used to derive this intent's embedding.
    ///
    /// Concatenates id, category path, description and keywords so the
    /// vector captures both the label and the reference wording.
    pub fn embedding_text(&self) -> String {
        let mut parts: Vec<&str> = vec![&self.intent_id, &self.category];
        if let Some(sub) = &self.subcategory {
            parts.push(sub);
        }
        if let Some(desc) = &self.description {
            parts.push(desc);
        }
        let mut text = parts.join(" | ");
        if !self.keywords.is_empty() {
            text.push_str(" | ");
            text.push_str(&self.keywords.join(", "));
        }
        text
    }
}
