pub mod aiff_reader;
pub mod aiff_sink;
pub mod capture;
pub mod error;
pub mod extended;
pub mod format;
pub mod sink;
pub mod transcode;

pub use aiff_reader::AiffReader;
pub use aiff_sink::AiffSink;
pub use capture::CaptureStream;
pub use error::AudioError;
pub use format::AudioFormat;
pub use sink::AudioSink;
pub use transcode::transcode;
