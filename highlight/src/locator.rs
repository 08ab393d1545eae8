/// Quote characters stripped from both ends of a raw span.
const QUOTE_CHARS: [char; 6] = ['"', '\'', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}'];

/// Find every occurrence of `needle` in `text`.
///
/// Returns `(start, end)` pairs in character offsets. The scan is
/// non-overlapping: after a hit at `j` the search resumes at
/// `j + len(needle)`, so `"aa"` in `"aaaa"` yields two hits, not three.
/// A blank needle never matches.
pub fn find_all_occurrences(text: &str, needle: &str) -> Vec<(usize, usize)> {
    if needle.trim().is_empty() {
        return Vec::new();
    }

    let needle_chars = needle.chars().count();
    let mut occurrences = Vec::new();
    let mut byte_pos = 0;
    let mut char_pos = 0;

    while let Some(found) = text[byte_pos..].find(needle) {
        let start = char_pos + text[byte_pos..byte_pos + found].chars().count();
        let end = start + needle_chars;
        occurrences.push((start, end));
        byte_pos += found + needle.len();
        char_pos = end;
    }

    occurrences
}

/// Strip surrounding quotes and whitespace from a raw span.
///
/// Returns `None` when fewer than `min_chars` characters survive.
pub fn clean_span(raw: &str, min_chars: usize) -> Option<&str> {
    let cleaned = raw.trim_matches(|c: char| c.is_whitespace() || QUOTE_CHARS.contains(&c));
    if cleaned.is_empty() || cleaned.chars().count() < min_chars {
        return None;
    }
    Some(cleaned)
}
