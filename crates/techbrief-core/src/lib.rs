pub mod config;
pub mod digest;
pub mod error;
pub mod feed;
pub mod pipeline;
pub mod push;
pub mod text;
pub mod translate;

#[cfg(test)]
mod test_support;

pub use config::{AppConfig, PushCredentials};
pub use error::{Error, Result};
pub use pipeline::{run_digest, RunMode, RunReport};
