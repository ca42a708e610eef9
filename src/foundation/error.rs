/// Convenience result type used across wyrmcast.
pub type WyrmResult<T> = Result<T, WyrmError>;

/// Top-level error taxonomy for the streaming pipeline.
#[derive(thiserror::Error, Debug)]
pub enum WyrmError {
    /// A source frame could not be normalized (zero-sized or malformed).
    ///
    /// Only the offending frame is lost; the stream continues with the next one.
    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    /// An internal addressing invariant was violated while encoding.
    #[error("encode overflow: {0}")]
    EncodeOverflow(String),

    /// The datagram could not be handed to the network stack.
    #[error("transport failure: {0}")]
    TransportFailure(String),

    /// The frame source has no more frames.
    #[error("frame source exhausted")]
    SourceExhausted,

    /// Invalid configuration or topology.
    #[error("validation error: {0}")]
    Validation(String),

    /// The frame source could not be opened, probed or read.
    #[error("source error: {0}")]
    Source(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WyrmError {
    /// Build a [`WyrmError::InvalidFrame`] value.
    pub fn invalid_frame(msg: impl Into<String>) -> Self {
        Self::InvalidFrame(msg.into())
    }

    /// Build a [`WyrmError::EncodeOverflow`] value.
    pub fn encode_overflow(msg: impl Into<String>) -> Self {
        Self::EncodeOverflow(msg.into())
    }

    /// Build a [`WyrmError::TransportFailure`] value.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::TransportFailure(msg.into())
    }

    /// Build a [`WyrmError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`WyrmError::Source`] value.
    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    /// Whether the stream may carry on after this error.
    ///
    /// A bad frame or a failed send only costs that frame (or datagram); everything
    /// else ends the stream.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidFrame(_) | Self::TransportFailure(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
