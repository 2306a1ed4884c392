pub mod content;
pub mod context;
pub mod engine;
pub mod generator;
pub mod launcher;
pub mod opportunity;
pub mod product;
pub mod sales_page;
pub mod search;
pub mod social;
pub mod strategy;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{Opportunity, SearchResult};
pub use crate::domain::ports::{SearchProvider, Storage, TextGenerator};
pub use crate::utils::error::Result;

use chrono::NaiveDateTime;

pub(crate) fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// `YYYYmmddHHMMSS`, used in every stored object name.
pub(crate) fn compact_timestamp(now: NaiveDateTime) -> String {
    now.format("%Y%m%d%H%M%S").to_string()
}
