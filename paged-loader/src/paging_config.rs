pub(crate) const DEFAULT_PAGE_SIZE: usize = 20;

/// Configuration to be used with [`crate::PagedLoader`] and [`crate::Pager`].
///
/// Create one at startup (usually [`PagingConfig::default`]) and hand it to each loader,
/// rather than reading paging settings from somewhere global.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PagingConfig {
    page_size: Option<usize>,
    max_pages: Option<usize>,
}

impl PagingConfig {
    /// Create new [`PagingConfig`] with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of items requested per page, the `limit` passed to the fetch function.
    ///
    /// A page size of `0` is treated as `1`.
    ///
    /// Default: `20`
    #[track_caller]
    pub fn set_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size.max(1));
        self
    }

    /// Set the maximum number of pages a [`crate::Pager`] keeps in memory.
    ///
    /// Once exceeded, the oldest pages are dropped after each append.
    /// A limit of `0` is treated as `1`.
    ///
    /// Default: No limit
    #[track_caller]
    pub fn set_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages.max(1));
        self
    }

    /// The number of items requested per page.
    ///
    /// Default: `20`
    pub fn page_size(&self) -> usize {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// The maximum number of pages a [`crate::Pager`] keeps in memory, if any.
    ///
    /// Default: No limit
    pub fn max_pages(&self) -> Option<usize> {
        self.max_pages
    }
}

/// Overlay the explicitly set values of `specific` onto `base`.
pub fn config_combine(base: PagingConfig, specific: Option<PagingConfig>) -> PagingConfig {
    if let Some(specific) = specific {
        PagingConfig {
            page_size: specific.page_size.or(base.page_size),
            max_pages: specific.max_pages.or(base.max_pages),
        }
    } else {
        base
    }
}
