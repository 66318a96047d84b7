//! Page range selection for pagination controls

use serde::Serialize;
use std::collections::BTreeSet;

use super::url::pagination_url;
use crate::wordpress::PostFilter;

/// One slot in the rendered page list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// Pages to show around `current`: the first, the last, and the direct
/// neighbours of `current`, with an ellipsis wherever numbers are skipped.
///
/// # Examples
/// ```ignore
/// page_range(5, 10) // -> [1, …, 4, 5, 6, …, 10]
/// ```
pub fn page_range(current: usize, total: usize) -> Vec<PageItem> {
    if total == 0 {
        return Vec::new();
    }

    let mut kept = BTreeSet::new();
    kept.insert(1);
    kept.insert(total);
    for page in current.saturating_sub(1)..=current.saturating_add(1) {
        if (1..=total).contains(&page) {
            kept.insert(page);
        }
    }

    let mut items = Vec::with_capacity(kept.len() * 2);
    let mut previous: Option<usize> = None;
    for page in kept {
        if previous.is_some_and(|p| page - p > 1) {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page(page));
        previous = Some(page);
    }

    items
}

/// A numbered page link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub number: usize,
    pub url: String,
    pub active: bool,
    /// Render an ellipsis before this link
    pub ellipsis_before: bool,
}

/// Everything the pagination partial needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current: usize,
    pub total: usize,
    pub prev_link: Option<String>,
    pub next_link: Option<String>,
    pub links: Vec<PageLink>,
}

impl Pagination {
    /// Build the controls, or `None` when there is at most one page
    pub fn build(current: usize, total: usize, base: &str, filter: &PostFilter) -> Option<Self> {
        if total <= 1 {
            return None;
        }

        let mut links = Vec::new();
        let mut ellipsis_before = false;
        for item in page_range(current, total) {
            match item {
                PageItem::Ellipsis => ellipsis_before = true,
                PageItem::Page(number) => {
                    links.push(PageLink {
                        number,
                        url: pagination_url(base, number, filter),
                        active: number == current,
                        ellipsis_before,
                    });
                    ellipsis_before = false;
                }
            }
        }

        Some(Self {
            current,
            total,
            prev_link: (current > 1).then(|| pagination_url(base, current - 1, filter)),
            next_link: (current < total).then(|| pagination_url(base, current + 1, filter)),
            links,
        })
    }
}
