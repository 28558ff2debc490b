//! Intent-label tokenization and similarity.
//!
//! Labels arrive in mixed conventions (`QRTagLost`, `qr-tag-lost`,
//! `qr_tag_lost`); similarity works on the token level so convention
//! differences do not count as distance.

use std::collections::HashSet;

use strsim::normalized_levenshtein;

/// Tokens shorter than this carry no signal (articles, acronym fragments).
const MIN_TOKEN_LEN: usize = 3;

/// Relative weight of edit-distance similarity in the combined score.
const LEVENSHTEIN_WEIGHT: f64 = 0.4;

/// Relative weight of token overlap in the combined score.
const JACCARD_WEIGHT: f64 = 0.6;

/// Split an identifier into lowercase word tokens.
///
/// Handles camelCase (acronym runs included: `QRTagLost` → qr, tag, lost),
/// kebab-case, snake_case and plain spaces. Tokens of two characters or
/// fewer are discarded.
pub fn label_tokens(label: &str) -> HashSet<String> {
    let mut words: Vec<String> = Vec::new();

    for segment in label.split(|c: char| !c.is_alphanumeric()) {
        if segment.is_empty() {
            continue;
        }
        let chars: Vec<char> = segment.chars().collect();
        let mut word = String::new();
        for (i, &c) in chars.iter().enumerate() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1);
            let starts_word = match prev {
                None => false,
                Some(p) => {
                    // lower/digit -> upper starts a word; the last capital
                    // of an acronym run starts a word when followed by
                    // lowercase (the "T" in "QRTag").
                    (c.is_uppercase() && (p.is_lowercase() || p.is_numeric()))
                        || (c.is_uppercase()
                            && p.is_uppercase()
                            && next.map(|n| n.is_lowercase()).unwrap_or(false))
                }
            };
            if starts_word && !word.is_empty() {
                words.push(word.clone());
                word.clear();
            }
            word.extend(c.to_lowercase());
        }
        if !word.is_empty() {
            words.push(word);
        }
    }

    words
        .into_iter()
        .filter(|w| w.chars().count() >= MIN_TOKEN_LEN)
        .collect()
}

/// Jaccard overlap of two token sets: |A ∩ B| / |A ∪ B|, 0 when both empty.
pub fn jaccard_overlap(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Number of word tokens two labels share.
pub fn shared_tokens(a: &str, b: &str) -> usize {
    label_tokens(a).intersection(&label_tokens(b)).count()
}

/// Combined label similarity: weighted normalized Levenshtein plus Jaccard
/// token overlap. Case-insensitive on the raw identifiers.
pub fn label_similarity(a: &str, b: &str) -> f64 {
    let edit = normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase());
    let overlap = jaccard_overlap(&label_tokens(a), &label_tokens(b));
    LEVENSHTEIN_WEIGHT * edit + JACCARD_WEIGHT * overlap
}
