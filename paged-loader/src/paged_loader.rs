use paste::paste;
use std::{
    fmt::{self, Debug, Formatter},
    future::Future,
    pin::Pin,
    sync::Arc,
};

use crate::{FetchOutcome, Page, PageResult, PagingConfig, PagingState, config_combine};

/// The page loaded when no key is given.
pub const FIRST_PAGE: i64 = 1;

/// Resolve the requested key into `(page, offset)`.
///
/// Keys aren't validated, zero or negative pages give zero or negative offsets.
/// Saturates at the `i64` bounds.
pub(crate) fn page_and_offset(requested_key: Option<i64>, page_size: usize) -> (i64, i64) {
    let page = requested_key.unwrap_or(FIRST_PAGE);
    let page_size = i64::try_from(page_size).unwrap_or(i64::MAX);
    (page, page.saturating_sub(1).saturating_mul(page_size))
}

/// Attach the neighbour keys to the items fetched for `page`.
///
/// Only an empty fetch ends the data, a short page still points at a next page.
pub(crate) fn page_from_items<T>(page: i64, items: Vec<T>) -> Page<T> {
    Page {
        prev_key: (page > FIRST_PAGE).then(|| page - 1),
        next_key: if items.is_empty() {
            None
        } else {
            page.checked_add(1)
        },
        items,
    }
}

macro_rules! define {
    ([$($impl_fut_generics:tt)*], [$($impl_fn_generics:tt)*], $name:ident, $sname:literal, $sthread:literal) => {
        /// A
        #[doc = $sthread]
        /// incremental page loader, wrapping a `(limit, offset)` fetch function.
        ///
        /// Each [`load`](Self::load) maps a page key onto an offset, calls the fetch function exactly once,
        /// and attaches the keys of the neighbouring pages to the result.
        /// Nothing is cached, the loader only holds the fetch function and its [`PagingConfig`],
        /// so it can be cloned freely and loads can run concurrently.
        pub struct $name<T, E> {
            fetcher: Arc<dyn Fn(usize, i64) -> Pin<Box<dyn Future<Output = FetchOutcome<T, E>> $($impl_fut_generics)*>> $($impl_fn_generics)*>,
            config: PagingConfig,
        }

        impl<T, E> Clone for $name<T, E> {
            fn clone(&self) -> Self {
                Self {
                    fetcher: self.fetcher.clone(),
                    config: self.config,
                }
            }
        }

        impl<T, E> Debug for $name<T, E> {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("fetcher", &"Arc<dyn Fn(usize, i64) -> Pin<Box<dyn Future<Output = FetchOutcome<T, E>>>>")
                    .field("config", &self.config)
                    .finish()
            }
        }

        paste! {
            impl<T, E> $name<T, E> {
                /// Create a new
                #[doc = $sname]
                /// using the default [`PagingConfig`].
                ///
                /// The fetch function receives `(limit, offset)`, where `limit` is the page size.
                #[track_caller]
                pub fn new(
                    fetcher: impl [<$name Fetcher>]<T, E> $($impl_fn_generics)* + 'static,
                ) -> Self
                where
                    T: 'static,
                    E: 'static,
                {
                    Self {
                        fetcher: Arc::new(move |limit, offset| {
                            Box::pin(fetcher.fetch(limit, offset))
                                as Pin<Box<dyn Future<Output = FetchOutcome<T, E>> $($impl_fut_generics)*>>
                        }),
                        config: PagingConfig::default(),
                    }
                }

                /// Apply a [`PagingConfig`] to this loader.
                ///
                /// Only the values explicitly set on `config` replace the loader's current ones.
                pub fn set_config(mut self, config: PagingConfig) -> Self {
                    self.config = config_combine(self.config, Some(config));
                    self
                }

                /// The active [`PagingConfig`].
                pub fn config(&self) -> PagingConfig {
                    self.config
                }

                /// The page size, the `limit` passed to every fetch.
                pub fn page_size(&self) -> usize {
                    self.config.page_size()
                }

                /// The key to restart from when the list is refreshed.
                ///
                /// Always `None`: refreshes don't anchor to the visible position and restart at the first page.
                pub fn refresh_key(&self, _state: &PagingState<T>) -> Option<i64> {
                    None
                }

                /// Load the page with `requested_key`, `None` being the first page.
                ///
                /// Fetches `page_size` items at offset `(page - 1) * page_size`.
                /// A fetch error comes back as [`PageResult::Failure`] as-is,
                /// it isn't retried or wrapped.
                ///
                /// Dropping the returned future drops the in-flight fetch.
                pub async fn load(&self, requested_key: Option<i64>) -> PageResult<T, E> {
                    let page_size = self.page_size();
                    let (page, offset) = page_and_offset(requested_key, page_size);
                    tracing::trace!(page, limit = page_size, offset, "fetching page");
                    match (self.fetcher)(page_size, offset).await {
                        FetchOutcome::Success(items) => {
                            tracing::trace!(page, item_count = items.len(), "page fetched");
                            PageResult::Page(page_from_items(page, items))
                        }
                        FetchOutcome::Error(cause) => PageResult::Failure(cause),
                    }
                }
            }

            /// A fetch function accepted by
            #[doc = $sname]
            ///.
            ///
            /// Implemented for any `Fn(usize, i64) -> impl Future<Output = FetchOutcome<T, E>>`.
            pub trait [<$name Fetcher>]<T, E> {
                /// Fetch at most `limit` items starting at `offset`.
                fn fetch(&self, limit: usize, offset: i64) -> impl Future<Output = FetchOutcome<T, E>> $($impl_fut_generics)* + 'static;
            }

            impl<T, E, F, Fut> [<$name Fetcher>]<T, E> for F
            where
                F: Fn(usize, i64) -> Fut + 'static,
                Fut: Future<Output = FetchOutcome<T, E>> $($impl_fut_generics)* + 'static,
            {
                fn fetch(&self, limit: usize, offset: i64) -> impl Future<Output = FetchOutcome<T, E>> $($impl_fut_generics)* + 'static {
                    self(limit, offset)
                }
            }
        }
    };
}

define! { [+ Send], [+ Send + Sync], PagedLoader, "PagedLoader", "threadsafe" }
define! { [], [], PagedLoaderLocal, "PagedLoaderLocal", "non-threadsafe" }
