//! Single-column tri-state sorting.

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Active sort, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    column: Option<(String, SortDirection)>,
}

impl SortState {
    pub fn column(&self) -> Option<&str> {
        self.column.as_ref().map(|(id, _)| id.as_str())
    }

    pub fn direction_for(&self, column: &str) -> Option<SortDirection> {
        self.column
            .as_ref()
            .filter(|(id, _)| id == column)
            .map(|(_, dir)| *dir)
    }

    /// Header click: none, ascending, descending, none. Another column starts ascending.
    pub fn cycle(&mut self, column: &str) {
        self.column = match self.direction_for(column) {
            None => Some((column.to_string(), SortDirection::Asc)),
            Some(SortDirection::Asc) => Some((column.to_string(), SortDirection::Desc)),
            Some(SortDirection::Desc) => None,
        };
    }

    pub fn clear(&mut self) {
        self.column = None;
    }
}

/// Cell value as sorted: finite numbers first in numeric order, then text
/// case-insensitively with a byte-wise tiebreak.
#[derive(Debug, Clone)]
pub enum SortKey {
    Num(f64),
    Text { folded: String, raw: String },
}

impl SortKey {
    pub fn parse(cell: &str) -> Self {
        match cell.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => SortKey::Num(n),
            _ => SortKey::Text {
                folded: cell.to_lowercase(),
                raw: cell.to_string(),
            },
        }
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Num(x), SortKey::Num(y)) => x.total_cmp(y),
            (SortKey::Num(_), SortKey::Text { .. }) => Ordering::Less,
            (SortKey::Text { .. }, SortKey::Num(_)) => Ordering::Greater,
            (
                SortKey::Text { folded: fa, raw: ra },
                SortKey::Text { folded: fb, raw: rb },
            ) => fa.cmp(fb).then_with(|| ra.cmp(rb)),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}

pub fn compare_cells(a: &str, b: &str) -> Ordering {
    SortKey::parse(a).cmp(&SortKey::parse(b))
}
