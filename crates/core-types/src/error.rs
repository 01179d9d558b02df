use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Malformed chart payload: {0}")]
    Payload(#[from] serde_json::Error),
}
