use crate::{Page, PagingConfig};

/// A snapshot of what a list has loaded so far, handed to [`crate::PagedLoader::refresh_key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagingState<T> {
    /// The loaded pages, in key order.
    pub pages: Vec<Page<T>>,
    /// The flat item index the list was most recently showing, if known.
    pub anchor_position: Option<usize>,
    /// The config the pages were loaded with.
    pub config: PagingConfig,
}

impl<T> PagingState<T> {
    /// An empty state, nothing loaded yet.
    pub fn new(config: PagingConfig) -> Self {
        Self {
            pages: vec![],
            anchor_position: None,
            config,
        }
    }

    /// Whether no items are loaded, empty pages don't count.
    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(|page| page.is_empty())
    }

    /// Total items across all loaded pages.
    pub fn item_count(&self) -> usize {
        self.pages.iter().map(|page| page.len()).sum()
    }

    /// The page containing the flat item index `position`.
    ///
    /// Positions past the end resolve to the last non-empty page.
    pub fn closest_page_to_position(&self, position: usize) -> Option<&Page<T>> {
        let mut remaining = position;
        let mut last_non_empty = None;
        for page in &self.pages {
            if page.is_empty() {
                continue;
            }
            if remaining < page.len() {
                return Some(page);
            }
            remaining -= page.len();
            last_non_empty = Some(page);
        }
        last_non_empty
    }

    /// The item at the flat index `position`, clamped into the loaded range.
    pub fn closest_item_to_position(&self, position: usize) -> Option<&T> {
        let count = self.item_count();
        if count == 0 {
            return None;
        }
        self.pages
            .iter()
            .flat_map(|page| page.items.iter())
            .nth(position.min(count - 1))
    }
}
