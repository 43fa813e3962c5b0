//! Page number list with ellipsis gaps.

use std::collections::BTreeSet;

/// Entry in the pager. Pages are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// Pages shown on either side of the current one.
const SIBLINGS: usize = 2;

/// First, last, and current ± 2 pages, with an ellipsis for every gap.
pub fn page_numbers(current: usize, page_count: usize) -> Vec<PageItem> {
    if page_count == 0 {
        return Vec::new();
    }
    let last = page_count - 1;
    let current = current.min(last);

    let mut pages = BTreeSet::from([0, last]);
    pages.extend(current.saturating_sub(SIBLINGS)..=(current + SIBLINGS).min(last));

    let mut items = Vec::with_capacity(pages.len() + 2);
    let mut previous: Option<usize> = None;
    for page in pages {
        if previous.is_some_and(|p| page > p + 1) {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page(page));
        previous = Some(page);
    }
    items
}
