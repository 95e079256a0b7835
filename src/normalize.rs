use crate::error::BfhlError;

const STRIPPED: &[char] = &[
    '*', '`', '.', ',', '!', '?', ';', ':', '"', '(', ')', '[', ']', '{', '}',
];

// Emphasis underscores and quotes only count at the edges of a word, so
// `O'Brien` and `snake_case` survive intact.
const EDGE_ONLY: &[char] = &['_', '\''];

/// Reduces a raw model answer to its first bare word.
///
/// Markdown emphasis, code ticks and punctuation are dropped before the
/// first whitespace-delimited token is taken, so `"**Paris.**"` becomes
/// `"Paris"`.
pub fn normalize_answer(raw: &str) -> Result<String, BfhlError> {
    let cleaned: String = raw.chars().filter(|c| !STRIPPED.contains(c)).collect();

    cleaned
        .split_whitespace()
        .map(|token| token.trim_matches(EDGE_ONLY))
        .find(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or(BfhlError::EmptyResponse)
}
