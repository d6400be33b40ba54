#![allow(clippy::type_complexity)]
#![warn(clippy::disallowed_types)]
#![warn(missing_docs)]
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

mod fetch_outcome;
mod page;
mod paged_loader;
mod pager;
mod paging_config;
mod paging_state;
mod utils;

pub use fetch_outcome::*;
pub use page::*;
pub use paged_loader::*;
pub use pager::*;
pub use paging_config::*;
pub use paging_state::*;
