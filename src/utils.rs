/// Text helpers shared by the filter, dedup and summarization stages.

/// Truncate to at most `max_chars` characters, never splitting a character.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    text.chars().take(max_chars).collect()
}

/// Truncate trying to end at a sentence boundary, falling back to a word
/// boundary with an ellipsis.
pub fn smart_truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let truncated = truncate_chars(text, max_chars);
    if let Some(last_sentence) = truncated.rfind('.') {
        truncated[..last_sentence + 1].to_string()
    } else if let Some(last_space) = truncated.rfind(' ') {
        format!("{}...", &truncated[..last_space])
    } else {
        format!("{}...", truncated)
    }
}

pub fn is_stop_word(word: &str) -> bool {
    matches!(
        word,
        "the" | "and" | "or" | "but" | "in" | "on" | "at" | "to" | "for" | "of" | "with" | "by"
            | "a" | "an" | "is" | "are" | "was" | "were" | "be" | "been" | "have" | "has" | "had"
            | "do" | "does" | "did" | "will" | "would" | "could" | "should" | "may" | "might"
            | "must" | "can" | "this" | "that" | "these" | "those"
    )
}
