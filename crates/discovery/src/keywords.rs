use std::collections::{HashMap, HashSet};

/// Stopwords across the languages seen in the ticket corpus.
const STOPWORDS: &[&str] = &[
    // English
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her", "was", "one",
    "our", "out", "has", "have", "this", "that", "with", "from", "they", "been", "will", "would",
    "there", "their", "what", "when", "how", "why", "who", "which", "your", "please", "hello",
    "dear", "thanks", "thank", "regards", "does", "did", "don", "can't", "cannot", "get", "got",
    "still", "just", "also", "any", "some", "could", "should", "about", "after", "before",
    // German
    "der", "die", "das", "und", "ich", "sie", "ist", "nicht", "ein", "eine", "mit", "auf", "für",
    "von", "dem", "den", "mein", "meine", "bitte", "danke", "hallo", "kann", "habe", "wird",
    // French
    "les", "des", "est", "pas", "que", "qui", "une", "mais", "pour", "avec", "vous", "nous",
    "mon", "mes", "bonjour", "merci", "je", "j'ai", "être", "avoir",
    // Dutch
    "het", "een", "niet", "naar", "ook", "mijn", "deze", "hebben", "wordt", "graag", "bedankt",
];

/// Minimum keyword length; anything shorter is noise.
const MIN_KEYWORD_LEN: usize = 3;

/// Frequency-ranked keywords over a set of ticket texts.
///
/// Case-insensitive, stopword-filtered, one count per ticket per distinct
/// word. Ties break alphabetically so the ranking is deterministic.
pub fn top_keywords(texts: &[&str], limit: usize) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for text in texts {
        let distinct: HashSet<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .map(|w| w.to_lowercase())
            .filter(|w| w.chars().count() >= MIN_KEYWORD_LEN)
            .filter(|w| !STOPWORDS.contains(&w.as_str()))
            .collect();
        for word in distinct {
            *counts.entry(word).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().take(limit).map(|(w, _)| w).collect()
}
