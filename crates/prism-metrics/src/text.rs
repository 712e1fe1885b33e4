use std::collections::BTreeSet;

pub(crate) fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Lowercase alphanumeric tokens.
pub(crate) fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

const STOPWORDS: &[&str] = &[
    "about", "above", "after", "again", "also", "been", "before", "being", "below", "between",
    "both", "could", "does", "doing", "down", "during", "each", "from", "further", "give",
    "have", "having", "here", "into", "itself", "just", "make", "more", "most", "much", "only",
    "other", "over", "please", "provide", "same", "should", "some", "such", "than", "that",
    "their", "them", "then", "there", "these", "they", "this", "those", "through", "under",
    "until", "very", "want", "were", "what", "when", "where", "which", "while", "will", "with",
    "would", "write", "your", "yours",
];

/// Content words of at least four characters, deduplicated.
pub(crate) fn keywords(text: &str) -> BTreeSet<String> {
    tokens(text)
        .filter(|t| t.chars().count() >= 4 && !STOPWORDS.contains(&t.as_str()))
        .collect()
}

pub(crate) fn clamp10(v: f64) -> f64 {
    v.clamp(0.0, 10.0)
}
