/// A successfully loaded page, with the keys to request its neighbours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// The items of this page, in the order the fetch function returned them.
    pub items: Vec<T>,
    /// The key of the page before this one, `None` on the first page.
    pub prev_key: Option<i64>,
    /// The key of the page after this one, `None` once the fetch came back empty.
    pub next_key: Option<i64>,
}

impl<T> Page<T> {
    /// Whether this page has no items. An empty page always marks the end of the data.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// The result of [`crate::PagedLoader::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageResult<T, E> {
    /// The fetch succeeded.
    Page(Page<T>),
    /// The fetch failed, holding the error exactly as the fetch function returned it.
    Failure(E),
}

impl<T, E> PageResult<T, E> {
    /// Whether this is a [`PageResult::Page`].
    pub fn is_page(&self) -> bool {
        matches!(self, Self::Page(_))
    }

    /// Whether this is a [`PageResult::Failure`].
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// The loaded page, if the fetch succeeded.
    pub fn page(&self) -> Option<&Page<T>> {
        match self {
            Self::Page(page) => Some(page),
            Self::Failure(_) => None,
        }
    }

    /// The failure cause, if the fetch failed.
    pub fn cause(&self) -> Option<&E> {
        match self {
            Self::Page(_) => None,
            Self::Failure(cause) => Some(cause),
        }
    }

    /// Convert into a [`Result`], to use `?` on the loaded page.
    pub fn into_result(self) -> Result<Page<T>, E> {
        match self {
            Self::Page(page) => Ok(page),
            Self::Failure(cause) => Err(cause),
        }
    }
}

impl<T, E> From<PageResult<T, E>> for Result<Page<T>, E> {
    fn from(result: PageResult<T, E>) -> Self {
        result.into_result()
    }
}
