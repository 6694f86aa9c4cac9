// src/scrape/mod.rs
//! Badge showcase scraper.
//!
//! - `appids` reads the saved game listing.
//! - `badges` knows how to read one showcase page.
//! - `scrape` drives the loop: fetch, parse, download, write `data.json`,
//!   advance the resumable counter.
pub mod appids;
pub mod badges;
mod scrape;

pub use appids::extract_appids;
pub use badges::{BadgeRecord, ParseError, Showcase, parse_showcase};
pub use scrape::{DONE_KEY, RunSummary, page_url, run};
