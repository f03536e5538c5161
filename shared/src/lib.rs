pub mod error;
pub mod model;
pub mod poll;
pub mod session;

pub use error::{PollError, SelectError, UploadError};
pub use model::{
    Label, NormalizedResult, RawAnalysis, RawLabel, UploadResponse, is_image_mime, normalize,
    size_kb, validate_selection,
};
pub use poll::{Correlator, DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_DELAY_MS, Probe, Step};
pub use session::{Phase, Session};
