use thiserror::Error;

/// Local input rejected before any network call happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("not an image file: {0}")]
    NotAnImage(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("upload failed with status {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid upload response: {0}")]
    Decode(String),
    #[error("upload response carried no file id")]
    MissingId,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error("missing file id for polling")]
    MissingId,
    #[error("timed out waiting for analysis result")]
    TimedOut,
}
