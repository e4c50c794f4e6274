use thiserror::Error;

/// Errors produced by the media engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Upstream decode failure: the audio decoder or the video source could
    /// not deliver usable samples/pixels. Not recoverable by the engine.
    #[error("decode failed: {0}")]
    Decode(String),

    /// Contract violation: nonsensical bounds, indices or parameters.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// WAV, PNG or archive byte production failed. Propagated, not retried.
    #[error("encode failed: {0}")]
    EncodeFailure(String),
}

impl From<symphonia::core::errors::Error> for EngineError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        EngineError::Decode(err.to_string())
    }
}

impl From<image::ImageError> for EngineError {
    fn from(err: image::ImageError) -> Self {
        EngineError::EncodeFailure(err.to_string())
    }
}

impl From<zip::result::ZipError> for EngineError {
    fn from(err: zip::result::ZipError) -> Self {
        EngineError::EncodeFailure(err.to_string())
    }
}
