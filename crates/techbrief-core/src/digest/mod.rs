mod models;
mod renderer;

pub use models::{Digest, DigestSection};
pub use renderer::{
    digest_title, escape_title, format_timestamp, DigestRenderer, EMPTY_DIGEST, SUMMARY_CHARS, UNKNOWN_TIME,
};
