//! Ranked fuzzy matching for the table search box.

/// How well a cell matched the query, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchRank {
    Exact,
    StartsWith,
    WordStartsWith,
    Contains,
    Acronym,
    Subsequence,
}

fn is_separator(c: char) -> bool {
    !c.is_alphanumeric()
}

/// Rank `text` against `query`, case-insensitively. `None` means no match.
pub fn rank(text: &str, query: &str) -> Option<MatchRank> {
    let text = text.trim().to_lowercase();
    let query = query.trim().to_lowercase();
    if query.is_empty() || text.is_empty() {
        return None;
    }

    if text == query {
        return Some(MatchRank::Exact);
    }
    if text.starts_with(&query) {
        return Some(MatchRank::StartsWith);
    }

    let mut prev_is_separator = false;
    for (i, c) in text.char_indices() {
        if prev_is_separator && !is_separator(c) && text[i..].starts_with(&query) {
            return Some(MatchRank::WordStartsWith);
        }
        prev_is_separator = is_separator(c);
    }

    if text.contains(&query) {
        return Some(MatchRank::Contains);
    }

    let acronym: String = text
        .split(is_separator)
        .filter_map(|word| word.chars().next())
        .collect();
    let compact: String = query.chars().filter(|c| !is_separator(*c)).collect();
    if !compact.is_empty() && acronym.contains(&compact) {
        return Some(MatchRank::Acronym);
    }

    let mut haystack = text.chars();
    if query.chars().all(|q| haystack.any(|c| c == q)) {
        return Some(MatchRank::Subsequence);
    }

    None
}

/// Best rank over several cells.
pub fn best_rank<'a>(cells: impl IntoIterator<Item = &'a str>, query: &str) -> Option<MatchRank> {
    cells.into_iter().filter_map(|cell| rank(cell, query)).min()
}
