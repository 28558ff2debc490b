use regex::Regex;
use serde::Deserialize;

use miner_core::MinerError;

/// One expert-authored pattern targeting a canonical intent.
#[derive(Debug)]
pub struct RegexRule {
    /// Canonical intent id this pattern recognizes.
    pub name: String,
    pub pattern: Regex,
}

/// Declarative rule entry as it appears in the rule file.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleEntry {
    pub name: String,
    pub pattern: String,
}

/// Ordered, first-match-wins regex rule table.
///
/// Order is meaningful: domain experts place the most specific patterns
/// first. Malformed patterns are a configuration error and are rejected
/// here, at load time, never at match time.
#[derive(Debug)]
pub struct RuleTable {
    rules: Vec<RegexRule>,
}

impl RuleTable {
    pub fn compile(entries: &[RuleEntry]) -> Result<Self, MinerError> {
        let mut rules = Vec::with_capacity(entries.len());
        for entry in entries {
            let pattern = Regex::new(&entry.pattern).map_err(|e| MinerError::InvalidPattern {
                name: entry.name.clone(),
                reason: e.to_string(),
            })?;
            rules.push(RegexRule {
                name: entry.name.clone(),
                pattern,
            });
        }
        Ok(Self { rules })
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// First rule whose pattern matches `text`, in table order.
    pub fn first_match(&self, text: &str) -> Option<&RegexRule> {
        self.rules.iter().find(|rule| rule.pattern.is_match(text))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
