mod fetcher;
mod models;
mod parser;
mod sources;

pub use fetcher::{select_recent, FeedFetcher};
pub use models::{Article, Category, FeedEntry, FeedSource, UNTITLED};
pub use parser::parse_entries;
pub use sources::{default_sources, group_by_category};
