use super::error::AudioError;
use super::extended;
use super::format::AudioFormat;
use super::sink::AudioSink;
use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

// Absolute offsets of the three placeholder fields patched on finalize.
const FORM_SIZE_OFFSET: u64 = 4;
const FRAME_COUNT_OFFSET: u64 = 22;
const SSND_SIZE_OFFSET: u64 = 42;

const BYTES_PER_SAMPLE: u32 = 4;

/// Streaming AIFF encoder
///
/// Writes the FORM header, common chunk and an open-ended sound-data chunk up
/// front with zeroed size fields, appends sample blocks as they arrive, and
/// patches the three size fields once the final sample count is known.
///
/// `finalize` performs the patch exactly once. Dropping an unfinalized sink
/// (error paths) runs the same patch so the file on disk stays parseable;
/// failures there can only be logged.
pub struct AiffSink {
    file: File,
    sample_count: u32,
    finalized: bool,
}

impl AiffSink {
    pub fn create<P: AsRef<Path>>(path: P, format: AudioFormat) -> Result<Self, AudioError> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        // FORM group header, total byte count deferred.
        file.write_all(b"FORM")?;
        file.write_all(&0i32.to_be_bytes())?;
        file.write_all(b"AIFF")?;

        // Common chunk, frame count deferred.
        file.write_all(b"COMM")?;
        file.write_all(&18i32.to_be_bytes())?;
        file.write_all(&(format.channels as i16).to_be_bytes())?;
        file.write_all(&0i32.to_be_bytes())?;
        file.write_all(&(AudioFormat::BITS_PER_SAMPLE as i16).to_be_bytes())?;
        file.write_all(&extended::encode_sample_rate(format.sample_rate))?;

        // Sound-data chunk, size deferred; offset and block size stay zero.
        file.write_all(b"SSND")?;
        file.write_all(&0i32.to_be_bytes())?;
        file.write_all(&0i32.to_be_bytes())?;
        file.write_all(&0i32.to_be_bytes())?;

        Ok(Self {
            file,
            sample_count: 0,
            finalized: false,
        })
    }

    fn patch_sizes(&mut self) -> Result<(), AudioError> {
        let samples = self.sample_count;
        let total_bytes = 4 + 8 + 18 + 8 + BYTES_PER_SAMPLE * samples;

        self.file.seek(SeekFrom::Start(FORM_SIZE_OFFSET))?;
        self.file.write_all(&(total_bytes as i32).to_be_bytes())?;

        self.file.seek(SeekFrom::Start(FRAME_COUNT_OFFSET))?;
        self.file.write_all(&(samples as i32).to_be_bytes())?;

        self.file.seek(SeekFrom::Start(SSND_SIZE_OFFSET))?;
        self.file
            .write_all(&((BYTES_PER_SAMPLE * samples + 8) as i32).to_be_bytes())?;

        Ok(())
    }
}

impl AudioSink for AiffSink {
    fn write_block(&mut self, samples: &[i32]) -> Result<(), AudioError> {
        let mut bytes = Vec::with_capacity(samples.len() * BYTES_PER_SAMPLE as usize);
        for sample in samples {
            bytes.extend_from_slice(&sample.to_be_bytes());
        }
        self.file.write_all(&bytes)?;
        self.sample_count += samples.len() as u32;
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), AudioError> {
        if self.finalized {
            return Ok(());
        }
        self.finalized = true;
        self.patch_sizes()
    }

    fn sample_count(&self) -> u32 {
        self.sample_count
    }
}

impl Drop for AiffSink {
    fn drop(&mut self) {
        if !self.finalized {
            self.finalized = true;
            if let Err(e) = self.patch_sizes() {
                tracing::error!("Failed to patch AIFF size fields on drop: {}", e);
            }
        }
    }
}
