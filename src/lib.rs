// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod cli;
pub mod code;
pub mod config;
pub mod core;
pub mod progress;
pub mod scrape;
pub mod store;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
