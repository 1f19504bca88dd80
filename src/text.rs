//! Small helpers for scanning rules text.

/// Removes parenthesized reminder text, e.g. `"Reach (This creature can block creatures
/// with flying.)"` becomes `"Reach "`.
pub fn strip_reminder_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for ch in text.chars() {
        match ch {
            '(' => depth += 1,
            ')' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out
}

/// True when `phrase` occurs in `haystack` bounded by non-alphanumeric characters
/// (or the ends of the string). Both are expected lowercase.
pub fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    find_phrase(haystack, phrase).is_some()
}

/// Byte offset of the first word-bounded occurrence of `phrase`.
pub fn find_phrase(haystack: &str, phrase: &str) -> Option<usize> {
    if phrase.is_empty() {
        return None;
    }
    let mut start = 0;
    while let Some(found) = haystack[start..].find(phrase) {
        let at = start + found;
        let end = at + phrase.len();
        let before_ok = haystack[..at]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return Some(at);
        }
        start = at + phrase.chars().next().map_or(1, char::len_utf8);
    }
    None
}

/// Parses a count written as digits, a number word, or an article (`a`/`an` = 1).
pub fn parse_count(word: &str) -> Option<u32> {
    let word = word.trim_matches(|c: char| !c.is_alphanumeric());
    if let Ok(n) = word.parse::<u32>() {
        return Some(n);
    }
    let n = match word {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        _ => return None,
    };
    Some(n)
}

/// The word directly before byte offset `at`, if any.
pub fn word_before(text: &str, at: usize) -> Option<&str> {
    text[..at].split_whitespace().next_back()
}

/// The word directly after `prefix` ends at byte offset `at`.
pub fn word_after(text: &str, at: usize) -> Option<&str> {
    text[at..].split_whitespace().next()
}

/// Splits rules text into sentence-level clauses, keeping activated-ability lines whole.
pub fn clauses(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.contains(':') {
            out.push(line.to_string());
            continue;
        }
        out.extend(
            line.split(". ")
                .map(|s| s.trim().trim_end_matches('.').trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_reminder_text() {
        assert_eq!(
            strip_reminder_text("Reach (This creature can block creatures with flying.)").trim(),
            "Reach"
        );
    }

    #[test]
    fn test_contains_phrase_respects_word_boundaries() {
        assert!(contains_phrase("flying, haste", "haste"));
        assert!(!contains_phrase("hastened", "haste"));
        assert!(contains_phrase("double strike", "double strike"));
        assert!(!contains_phrase("double strike", "first strike"));
        assert!(contains_phrase("flash", "flash"));
        assert!(!contains_phrase("flashback", "flash"));
    }

    #[test]
    fn test_parse_count_words() {
        assert_eq!(parse_count("a"), Some(1));
        assert_eq!(parse_count("three"), Some(3));
        assert_eq!(parse_count("4,"), Some(4));
        assert_eq!(parse_count("target"), None);
    }

    #[test]
    fn test_clauses_split_sentences_but_not_activated_lines() {
        let parts = clauses("Flying. When this enters, draw a card.\n{2}, {T}: You gain 2 life.");
        assert_eq!(
            parts,
            vec![
                "Flying".to_string(),
                "When this enters, draw a card".to_string(),
                "{2}, {T}: You gain 2 life.".to_string(),
            ]
        );
    }
}
