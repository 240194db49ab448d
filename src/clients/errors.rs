use rspotify::ClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to parse Spotify response, error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Spotify error: {0}")]
    SpotifyError(#[from] ClientError),

    #[error("Missing key `{0}` in Spotify response")]
    MissingKey(String),

    #[error("Spotify API unexpected response: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Authorization error: {0}")]
    AuthError(String),
}

impl From<rspotify::http::HttpError> for Error {
    fn from(err: rspotify::http::HttpError) -> Self {
        Error::SpotifyError(ClientError::from(err))
    }
}

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Error::ConfigurationError(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::ConfigurationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
