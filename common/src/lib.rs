use thiserror::Error;
use url::ParseError;

pub mod config;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] rquest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Unrecognized metadata pointer scheme: {0}")]
    InvalidPointer(String),

    #[error("Metadata fetch timed out: {0}")]
    FetchTimeout(String),

    #[error("Metadata fetch returned HTTP status {0}")]
    FetchHttp(u16),

    #[error("Metadata document is not valid JSON: {0}")]
    FetchParse(String),

    #[error("Metadata for token {0} has no image")]
    MissingImage(u64),

    #[error("Metadata for token {0} has no name")]
    MissingName(u64),

    #[error("Chain read failed: {0}")]
    ChainUnavailable(String),

    #[error("Token {0} is not listed on the marketplace")]
    TokenNotListed(u64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::InvalidInput(format!("URL parse error: {}", err))
    }
}
