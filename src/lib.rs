//! APP STORE REVIEW HARVESTER
//! Walks the customer-review feed of one app across every storefront
//! and flattens the entries into a single table.

mod config;
pub mod country;
pub mod dataset;
mod error;
#[doc(hidden)]
pub mod macros;
pub mod parse;
pub mod process;
pub mod request;
pub mod storefront;

pub use config::HarvestConfig;
pub use error::{Error, Result};

pub const APP_ID: &str = "373311252";
pub const FEED_BASE_URL: &str = "https://itunes.apple.com";
pub const COUNTRIES_FILE: &str = "app-store-countries.csv";
pub const OUTPUT_FILE: &str = "reviews.csv";
/// Pause taken after the feed answers 503.
pub const UNAVAILABLE_DELAY_SECS: u64 = 1;
/// If set to 0 the limit is set to u32::MAX
pub const PAGE_LIMIT: u32 = 0;
/// The feed serves at most 50 entries per page.
const ENTRIES_PER_PAGE: usize = 50;
