//! Web adapters: page retrieval and text cleanup.

pub mod cleaner;
pub mod fetcher;

pub use cleaner::clean_text;
pub use fetcher::HttpPageFetcher;
