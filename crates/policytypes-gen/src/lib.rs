//! policytypes-gen — regenerate the content policy type list from mozilla-central.

pub mod config;
pub mod fetch;
pub mod pipeline;

pub use config::{GenerateConfig, Source};
pub use fetch::HttpFetcher;
pub use pipeline::{check, generate, CheckOutcome, Summary};
