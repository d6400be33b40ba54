use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::{
    Page, PageResult, PagedLoader, PagedLoaderLocal, PagingConfig, PagingState, utils::OnDrop,
};

/// Where the trailing end of a [`Pager`] or [`PagerLocal`] stands between appends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing in flight, `next_key` is what the next append requests (`None` = first page).
    Ready {
        /// The key the next append will request.
        next_key: Option<i64>,
    },
    /// An append for `key` is in flight.
    Loading {
        /// The key being loaded.
        key: Option<i64>,
    },
    /// The append for `key` failed, the next append or retry requests it again.
    Failed {
        /// The key that failed.
        key: Option<i64>,
    },
    /// The last fetch came back empty, there's nothing more to append.
    EndReached,
}

impl LoadStatus {
    const INITIAL: Self = Self::Ready { next_key: None };
}

#[derive(Debug)]
struct PagerState<T> {
    pages: Vec<Page<T>>,
    status: LoadStatus,
    last_loaded_at: Option<DateTime<Utc>>,
}

impl<T> PagerState<T> {
    fn new() -> Self {
        Self {
            pages: vec![],
            status: LoadStatus::INITIAL,
            last_loaded_at: None,
        }
    }

    fn append(&mut self, key: Option<i64>, page: &Page<T>, max_pages: Option<usize>)
    where
        T: Clone,
    {
        self.status = match page.next_key {
            Some(next_key) => LoadStatus::Ready {
                next_key: Some(next_key),
            },
            None => {
                tracing::debug!(?key, "end of pagination reached");
                LoadStatus::EndReached
            }
        };
        if !page.is_empty() {
            self.pages.push(page.clone());
        }
        if let Some(max_pages) = max_pages {
            if self.pages.len() > max_pages {
                let excess = self.pages.len() - max_pages;
                tracing::debug!(excess, max_pages, "dropping leading pages");
                self.pages.drain(..excess);
            }
        }
        self.last_loaded_at = Some(Utc::now());
        tracing::debug!(?key, item_count = page.len(), "page appended");
    }

    fn prepend(&mut self, key: i64, page: &Page<T>, max_pages: Option<usize>)
    where
        T: Clone,
    {
        if !page.is_empty() {
            self.pages.insert(0, page.clone());
        }
        if let Some(max_pages) = max_pages {
            if self.pages.len() > max_pages {
                let excess = self.pages.len() - max_pages;
                tracing::debug!(excess, max_pages, "dropping trailing pages");
                self.pages.truncate(max_pages);
                // The tail is gone, appends continue from the new last page:
                self.status = LoadStatus::Ready {
                    next_key: self.pages.last().and_then(|last| last.next_key),
                };
            }
        }
        self.last_loaded_at = Some(Utc::now());
        tracing::debug!(key, item_count = page.len(), "page prepended");
    }
}

struct PagerInner<T> {
    state: Mutex<PagerState<T>>,
    // Held for the whole of each load, so pages are applied strictly in key order:
    update_lock: futures::lock::Mutex<()>,
}

macro_rules! define {
    ($name:ident, $loader:ident, $sname:literal, $sloader:literal) => {
        /// Drives a
        #[doc = $sloader]
        /// page after page, keeping what has been loaded.
        ///
        /// The loader itself is stateless; the pager threads the keys each page returns into the next request,
        /// serializes loads so pages land in order, and keeps the failed key around so it can be retried.
        /// With [`PagingConfig::set_max_pages`], pages dropped from one end are loaded again by
        /// paging back towards them.
        /// Clones share the same pages.
        pub struct $name<T, E> {
            loader: $loader<T, E>,
            inner: Arc<PagerInner<T>>,
        }

        impl<T, E> Clone for $name<T, E> {
            fn clone(&self) -> Self {
                Self {
                    loader: self.loader.clone(),
                    inner: self.inner.clone(),
                }
            }
        }

        impl<T, E> std::fmt::Debug for $name<T, E> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let state = self.inner.state.lock();
                f.debug_struct(stringify!($name))
                    .field("loader", &self.loader)
                    .field("page_count", &state.pages.len())
                    .field("status", &state.status)
                    .finish()
            }
        }

        impl<T, E> $name<T, E>
        where
            T: Clone,
        {
            /// Create a new
            #[doc = $sname]
            ///, nothing is loaded until `load_next` is called.
            pub fn new(loader: $loader<T, E>) -> Self {
                Self {
                    loader,
                    inner: Arc::new(PagerInner {
                        state: Mutex::new(PagerState::new()),
                        update_lock: futures::lock::Mutex::new(()),
                    }),
                }
            }

            /// The wrapped loader.
            pub fn loader(&self) -> &$loader<T, E> {
                &self.loader
            }

            /// The loader's [`PagingConfig`].
            pub fn config(&self) -> PagingConfig {
                self.loader.config()
            }

            /// Append the next page.
            ///
            /// Starts at the first page, then follows the last page's `next_key`.
            /// After a failure the same key is requested again.
            /// Returns `None` without fetching once the end has been reached.
            pub async fn load_next(&self) -> Option<PageResult<T, E>> {
                let _update_guard = self.inner.update_lock.lock().await;
                let key = match self.status() {
                    LoadStatus::Ready { next_key } => next_key,
                    LoadStatus::Failed { key } => key,
                    // Cancelled loads restore the previous status, so this isn't seen while holding the lock:
                    LoadStatus::Loading { key } => key,
                    LoadStatus::EndReached => {
                        tracing::debug!("end of pagination reached, not loading");
                        return None;
                    }
                };
                Some(self.load_and_append(key).await)
            }

            /// Prepend the page before the first loaded one, following its `prev_key`.
            ///
            /// Only needed once [`PagingConfig::set_max_pages`] has dropped leading pages.
            /// When over the limit afterwards, trailing pages are dropped instead,
            /// and appends pick up from the new last page.
            /// A failure leaves the pages untouched, calling this again requests the same key.
            /// Returns `None` without fetching when nothing is loaded or the first page is loaded.
            pub async fn load_prev(&self) -> Option<PageResult<T, E>> {
                let _update_guard = self.inner.update_lock.lock().await;
                let key = self
                    .inner
                    .state
                    .lock()
                    .pages
                    .first()
                    .and_then(|first| first.prev_key)?;
                Some(self.load_and_prepend(key).await)
            }

            /// Re-request the key whose append last failed.
            ///
            /// Returns `None` without fetching if the last append didn't fail.
            pub async fn retry(&self) -> Option<PageResult<T, E>> {
                let _update_guard = self.inner.update_lock.lock().await;
                match self.status() {
                    LoadStatus::Failed { key } => {
                        tracing::debug!(?key, "retrying failed page");
                        Some(self.load_and_append(key).await)
                    }
                    _ => None,
                }
            }

            /// Drop everything loaded and load again from the loader's refresh key.
            ///
            /// The refresh key is always the first page, refreshing doesn't keep the scroll position.
            pub async fn refresh(&self) -> PageResult<T, E> {
                let _update_guard = self.inner.update_lock.lock().await;
                let key = self.loader.refresh_key(&self.paging_state(None));
                {
                    let mut state = self.inner.state.lock();
                    tracing::debug!(dropped_pages = state.pages.len(), ?key, "refreshing");
                    state.pages.clear();
                    state.status = LoadStatus::Ready { next_key: key };
                }
                self.load_and_append(key).await
            }

            /// The current [`LoadStatus`] of the trailing end.
            pub fn status(&self) -> LoadStatus {
                self.inner.state.lock().status
            }

            /// Whether the last append came back empty.
            pub fn end_of_pagination_reached(&self) -> bool {
                self.status() == LoadStatus::EndReached
            }

            /// All loaded items, in order.
            pub fn items(&self) -> Vec<T> {
                self.inner
                    .state
                    .lock()
                    .pages
                    .iter()
                    .flat_map(|page| page.items.iter().cloned())
                    .collect()
            }

            /// The number of loaded items.
            pub fn item_count(&self) -> usize {
                self.inner.state.lock().pages.iter().map(|page| page.len()).sum()
            }

            /// The loaded pages, in key order. Empty pages are never kept.
            pub fn pages(&self) -> Vec<Page<T>> {
                self.inner.state.lock().pages.clone()
            }

            /// When the most recent page was applied.
            pub fn last_loaded_at(&self) -> Option<DateTime<Utc>> {
                self.inner.state.lock().last_loaded_at
            }

            /// A snapshot of the loaded pages.
            pub fn paging_state(&self, anchor_position: Option<usize>) -> PagingState<T> {
                PagingState {
                    pages: self.pages(),
                    anchor_position,
                    config: self.config(),
                }
            }

            /// Must be called with the update lock held.
            async fn load_and_append(&self, key: Option<i64>) -> PageResult<T, E> {
                let previous_status = {
                    let mut state = self.inner.state.lock();
                    std::mem::replace(&mut state.status, LoadStatus::Loading { key })
                };
                // Put the status back if this future is dropped mid-fetch:
                let restore_status = OnDrop::new(|| {
                    self.inner.state.lock().status = previous_status;
                });

                let result = self.loader.load(key).await;
                restore_status.disarm();

                let mut state = self.inner.state.lock();
                match &result {
                    PageResult::Page(page) => state.append(key, page, self.config().max_pages()),
                    PageResult::Failure(_) => {
                        tracing::debug!(?key, "page append failed");
                        state.status = LoadStatus::Failed { key };
                    }
                }
                result
            }

            /// Must be called with the update lock held.
            async fn load_and_prepend(&self, key: i64) -> PageResult<T, E> {
                let result = self.loader.load(Some(key)).await;

                let mut state = self.inner.state.lock();
                match &result {
                    PageResult::Page(page) => state.prepend(key, page, self.config().max_pages()),
                    PageResult::Failure(_) => tracing::debug!(key, "page prepend failed"),
                }
                result
            }
        }
    };
}

define! { Pager, PagedLoader, "[`Pager`]", "[`PagedLoader`]" }
define! { PagerLocal, PagedLoaderLocal, "[`PagerLocal`]", "[`PagedLoaderLocal`]" }
