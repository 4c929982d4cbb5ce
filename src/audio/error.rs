use thiserror::Error;

/// Errors produced by the audio pipeline.
#[derive(Debug, Error)]
pub enum AudioError {
    /// The requested input device index does not exist.
    #[error("input device {index} is out of range ({available} devices available)")]
    DeviceOutOfRange { index: usize, available: usize },

    /// The input device could not be enumerated, opened or started.
    #[error("failed to open input device: {0}")]
    Device(String),

    /// The capture stream reported a fault while recording.
    #[error("capture stream fault: {0}")]
    Capture(String),

    /// File create/seek/read/write failure in a container codec.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The input is not a well-formed AIFF file.
    #[error("invalid AIFF input: {0}")]
    InvalidFormat(String),

    /// Encoding into the WAV output failed.
    #[error("failed to encode WAV output: {0}")]
    Write(#[from] hound::Error),
}
