use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("element {0} not found")]
    ElementNotFound(String),

    #[error("element gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("element gateway returned HTTP {status}: {body}")]
    Unexpected { status: u16, body: String },
}
