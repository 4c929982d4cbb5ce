use super::error::AudioError;

/// Trait for streaming audio encoding
///
/// Implementations append PCM blocks to an output container as they arrive,
/// deferring any size bookkeeping until `finalize`.
pub trait AudioSink {
    /// Append a block of samples (streaming, called repeatedly during recording)
    fn write_block(&mut self, samples: &[i32]) -> Result<(), AudioError>;

    /// Patch deferred size fields and close the sink.
    ///
    /// Idempotent: the first call performs the patch, later calls are no-ops.
    fn finalize(&mut self) -> Result<(), AudioError>;

    /// Samples written so far.
    fn sample_count(&self) -> u32;
}
