/// Ceiling on the comparison string length, in characters.
pub const MAX_COMPARISON_CHARS: usize = 450;

/// Portion of the cap reserved for the question body.
const MAX_QUESTION_CHARS: usize = 350;

/// Marker emitted when a ticket has no usable content.
pub const EMPTY_MARKER: &str = "(empty)";

/// Substrings identifying auto-generated replies, lowercased.
const BOILERPLATE_MARKERS: &[&str] = &[
    "automatic reply",
    "auto-reply",
    "autoreply",
    "out of office",
    "do not reply",
    "abwesenheitsnotiz",
    "réponse automatique",
    "automatisch antwoord",
];

/// Minimum character count below which text is treated as a bare
/// confirmation ("ok", "thanks", "merci") rather than a support question.
const MIN_USABLE_CHARS: usize = 10;

/// Build the compact comparison string for a ticket: subject plus the
/// truncated question body, or [`EMPTY_MARKER`] when neither field carries
/// usable content. Truncation respects char boundaries; support text is
/// multilingual.
pub fn comparison_text(subject: &str, question: &str) -> String {
    let subject = subject.trim();
    let question = question.trim();

    let mut text = String::new();
    if !subject.is_empty() {
        text.push_str(subject);
    }
    if !question.is_empty() {
        if !text.is_empty() {
            text.push_str(": ");
        }
        text.push_str(&truncate_chars(question, MAX_QUESTION_CHARS));
    }

    if text.is_empty() {
        return EMPTY_MARKER.to_string();
    }
    truncate_chars(&text, MAX_COMPARISON_CHARS)
}

/// Whether a comparison string is pure boilerplate and must not enter the
/// run: the empty marker, auto-reply phrases, or confirmation-only text too
/// short to carry an intent.
pub fn is_boilerplate(text: &str) -> bool {
    if text == EMPTY_MARKER {
        return true;
    }
    let lowered = text.to_lowercase();
    if BOILERPLATE_MARKERS.iter().any(|m| lowered.contains(m)) {
        return true;
    }
    text.chars().count() < MIN_USABLE_CHARS
}

/// Normalize a ticket's fields into a usable comparison string, or `None`
/// when the ticket is boilerplate and should be skipped.
pub fn normalize(subject: &str, question: &str) -> Option<String> {
    let text = comparison_text(subject, question);
    if is_boilerplate(&text) {
        None
    } else {
        Some(text)
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_and_question_are_joined() {
        let text = normalize("Printer broken", "The office printer shows error E42").unwrap();
        assert!(text.starts_with("Printer broken"));
        assert!(text.contains("error E42"));
    }

    #[test]
    fn empty_fields_yield_marker_and_rejection() {
        assert_eq!(comparison_text("", "  "), EMPTY_MARKER);
        assert!(normalize("", "").is_none());
    }

    #[test]
    fn auto_reply_is_rejected() {
        assert!(normalize("Automatic reply: vacation", "I am out of office until Monday").is_none());
        assert!(normalize("Réponse automatique", "absent jusqu'au lundi").is_none());
    }

    #[test]
    fn confirmation_only_text_is_rejected() {
        assert!(normalize("", "ok thanks").is_none());
        assert!(normalize("Merci", "").is_none());
    }

    #[test]
    fn long_question_is_truncated_at_the_cap() {
        let question = "word ".repeat(200);
        let text = normalize("Subject", &question).unwrap();
        assert!(text.chars().count() <= MAX_COMPARISON_CHARS);
    }

    #[test]
    fn truncation_respects_multibyte_boundaries() {
        let question = "ü".repeat(600);
        let text = normalize("Umlaut flood", &question).unwrap();
        assert!(text.chars().count() <= MAX_COMPARISON_CHARS);
        // Still valid UTF-8 and still carrying the umlauts.
        assert!(text.contains('ü'));
    }
}
