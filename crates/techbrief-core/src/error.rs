use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Translation error: {0}")]
    Translate(String),

    #[error("Push delivery error: {0}")]
    Push(String),

    #[error("Invalid RSSHub URL: {0}")]
    InvalidRsshubUrl(String),
}

pub type Result<T> = std::result::Result<T, Error>;
