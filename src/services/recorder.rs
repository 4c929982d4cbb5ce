use crate::audio::{AudioError, AudioSink, CaptureStream};
use crate::stop::StopSignal;

/// Coordinates audio capture and encoding
///
/// Pulls fixed-size blocks from the capture stream, appends them to the
/// sink, and polls the stop signal after each block. On stop the sink is
/// finalized and the final sample count returned.
///
/// Note: this holds the cpal stream, which is !Send, so the future returned
/// by `run` must be driven on a LocalSet.
pub struct Recorder {
    stream: CaptureStream,
    sink: Box<dyn AudioSink + Send>,
    stop: StopSignal,
}

impl Recorder {
    pub fn new(stream: CaptureStream, sink: Box<dyn AudioSink + Send>, stop: StopSignal) -> Self {
        Self { stream, sink, stop }
    }

    pub async fn run(mut self) -> Result<u32, AudioError> {
        loop {
            let block = match self.stream.read_block().await {
                Ok(block) => block,
                Err(e) => {
                    // Keep whatever was captured before the fault.
                    if let Err(patch) = self.sink.finalize() {
                        tracing::error!("Failed to finalize after capture fault: {}", patch);
                    }
                    return Err(e);
                }
            };

            self.sink.write_block(&block)?;

            if self.stop.is_raised() {
                break;
            }
        }

        let samples = self.sink.sample_count();
        self.sink.finalize()?;
        tracing::info!("Recording stopped ({} samples)", samples);
        Ok(samples)
    }
}
