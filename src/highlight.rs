/// Domain terms worth emphasizing, matched case-insensitively as
/// substrings so inflections ("Indexing", "indexes") hit too.
const VOCABULARY: &[&str] = &[
    "index",
    "schema",
    "search",
    "vector",
    "aggregation",
    "atlas",
    "query",
    "shard",
    "replica",
    "cluster",
    "pipeline",
    "performance",
    "cache",
    "transaction",
    "timeseries",
    "trigger",
];

fn hits_vocabulary(token: &str) -> bool {
    let lower = token.to_lowercase();
    VOCABULARY.iter().any(|v| lower.contains(v))
}

/// Picks the single word a thumbnail title emphasizes.
///
/// First whitespace token containing a vocabulary term wins; otherwise
/// the second token, then the first. Empty titles emphasize nothing.
pub fn emphasis_word(title: &str) -> Option<&str> {
    let tokens: Vec<&str> = title.split_whitespace().collect();
    if let Some(hit) = tokens.iter().copied().find(|t| hits_vocabulary(t)) {
        return Some(hit);
    }
    tokens.get(1).copied().or_else(|| tokens.first().copied())
}
