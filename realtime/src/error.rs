use thiserror::Error;

#[derive(Debug, Error)]
pub enum RealtimeError {
    #[error("invalid frame: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("websocket error: {0}")]
    Transport(#[from] Box<tokio_tungstenite::tungstenite::Error>),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("missing configuration: {0}")]
    Config(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for RealtimeError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        RealtimeError::Transport(Box::new(e))
    }
}
