//! Heuristic name matching between free-text descriptions and contract members.
//!
//! Matching is a plain case-insensitive substring test. It over-matches on
//! coincidental substrings ("Transfer" inside "TransferOwnership") and misses
//! paraphrased references; callers treat the result as an annotation only.

/// Case-insensitive substring test
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Whether `name` appears in any `.`-delimited sentence of `description`
pub fn mentioned_in_sentences(description: &str, name: &str) -> bool {
    let name = name.to_lowercase();
    description
        .split('.')
        .any(|sentence| sentence.to_lowercase().contains(&name))
}
