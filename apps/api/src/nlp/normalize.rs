//! Canonical text form used for every skill/corpus comparison.

/// Lower-cases `text`, collapses every run of characters that are neither
/// letters nor digits into a single space, and trims the result.
///
/// Unicode-aware: Cyrillic and other scripts survive as letters.
/// `normalize(normalize(x)) == normalize(x)` for all inputs.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        } else {
            pending_space = true;
        }
    }

    out
}

/// True iff `needle` occurs in `haystack` as a run of whole words.
///
/// Both arguments must already be normalized. An empty needle never matches.
pub fn contains_phrase(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let hay = format!(" {haystack} ");
    let needle = format!(" {needle} ");
    hay.contains(&needle)
}

/// Splits an already-normalized string into its tokens.
pub fn tokens(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split(' ').filter(|t| !t.is_empty())
}
