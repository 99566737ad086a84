//! Case-insensitive matching and snippet extraction.
//!
//! All offsets are byte offsets into the original text and always fall on
//! UTF-8 character boundaries.

/// Bytes of context kept on each side of a match.
pub const SNIPPET_CONTEXT: usize = 50;

/// Length of the fallback snippet when the text does not contain the query.
pub const SNIPPET_FALLBACK_LEN: usize = 100;

/// Finds the first case-insensitive occurrence of `needle` in `haystack`.
///
/// Returns the byte range of the match in `haystack`. Matching compares the
/// lowercase forms character by character, so characters whose lowercase
/// form has a different byte length are handled correctly.
pub fn find_ignore_case(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    let needle: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return None;
    }

    'start: for (start, _) in haystack.char_indices() {
        let mut matched = 0;
        for (offset, c) in haystack[start..].char_indices() {
            for lower in c.to_lowercase() {
                if needle.get(matched) != Some(&lower) {
                    continue 'start;
                }
                matched += 1;
            }
            if matched == needle.len() {
                return Some((start, start + offset + c.len_utf8()));
            }
        }
        // The rest of the haystack is a strict prefix of the needle.
        return None;
    }
    None
}

/// Returns `true` if `haystack` contains `needle`, ignoring case.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    find_ignore_case(haystack, needle).is_some()
}

fn floor_boundary(s: &str, mut index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_boundary(s: &str, mut index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(index) {
        index += 1;
    }
    index
}

/// Extracts the text around the first match of `query`.
///
/// Keeps up to [`SNIPPET_CONTEXT`] bytes on either side, rounded inwards to
/// character boundaries, and marks truncated ends with `...`. Without a match
/// the first [`SNIPPET_FALLBACK_LEN`] bytes are returned.
pub fn create_snippet(content: &str, query: &str) -> String {
    let Some((match_start, match_end)) = find_ignore_case(content, query) else {
        return truncate(content, SNIPPET_FALLBACK_LEN);
    };

    let start = ceil_boundary(content, match_start.saturating_sub(SNIPPET_CONTEXT));
    let end = floor_boundary(content, match_end.saturating_add(SNIPPET_CONTEXT));

    let mut snippet = String::with_capacity(end - start + 6);
    if start > 0 {
        snippet.push_str("...");
    }
    snippet.push_str(&content[start..end]);
    if end < content.len() {
        snippet.push_str("...");
    }
    snippet
}

/// Cuts `s` to at most `max_len` bytes on a character boundary, appending
/// `...` when anything was removed.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let end = floor_boundary(s, max_len);
    format!("{}...", &s[..end])
}
