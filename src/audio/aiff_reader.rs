use super::error::AudioError;
use super::extended;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Validating AIFF decoder with a forward-only sample cursor.
///
/// `open` walks the chunk list until the sound-data chunk is located,
/// validating the group header and common chunk on the way. Extraction is
/// strictly sequential; the number of available samples derives from the
/// SSND chunk size rather than the common chunk's frame count.
pub struct AiffReader {
    reader: BufReader<File>,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub channels: u16,
    remaining_samples: u64,
}

impl AiffReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AudioError> {
        let mut reader = BufReader::new(File::open(path)?);

        let mut magic = [0u8; 4];
        read_or_invalid(&mut reader, &mut magic, "missing FORM group header")?;
        if &magic != b"FORM" {
            return Err(AudioError::InvalidFormat(
                "missing FORM group header".into(),
            ));
        }

        let mut form_size = [0u8; 4];
        read_or_invalid(&mut reader, &mut form_size, "truncated group header")?;

        read_or_invalid(&mut reader, &mut magic, "truncated group header")?;
        if &magic != b"AIFF" {
            return Err(AudioError::InvalidFormat("form type is not AIFF".into()));
        }

        let mut common: Option<(u16, u16, u32)> = None;

        loop {
            let mut header = [0u8; 8];
            if reader.read_exact(&mut header).is_err() {
                return Err(AudioError::InvalidFormat(
                    "no sound-data chunk found".into(),
                ));
            }
            let id = [header[0], header[1], header[2], header[3]];
            let size = i32::from_be_bytes([header[4], header[5], header[6], header[7]]);
            if size < 0 {
                return Err(AudioError::InvalidFormat("negative chunk size".into()));
            }
            let size = size as u32;

            match &id {
                b"COMM" => {
                    if size < 18 {
                        return Err(AudioError::InvalidFormat(
                            "common chunk is too short".into(),
                        ));
                    }
                    let mut payload = [0u8; 18];
                    read_or_invalid(&mut reader, &mut payload, "truncated common chunk")?;

                    let channels = i16::from_be_bytes([payload[0], payload[1]]);
                    let bits = i16::from_be_bytes([payload[6], payload[7]]);
                    let mut rate_bytes = [0u8; 10];
                    rate_bytes.copy_from_slice(&payload[8..18]);

                    if channels < 1 {
                        return Err(AudioError::InvalidFormat(
                            "channel count must be positive".into(),
                        ));
                    }
                    if !matches!(bits, 8 | 16 | 24 | 32) {
                        return Err(AudioError::InvalidFormat(format!(
                            "unsupported bit depth {bits}"
                        )));
                    }
                    let sample_rate = extended::decode_sample_rate(&rate_bytes)
                        .filter(|rate| *rate > 0)
                        .ok_or_else(|| {
                            AudioError::InvalidFormat("unreadable sample rate".into())
                        })?;

                    common = Some((channels as u16, bits as u16, sample_rate));
                    skip(&mut reader, padded(size) as i64 - 18)?;
                }
                b"SSND" => {
                    let (channels, bits, sample_rate) = common.ok_or_else(|| {
                        AudioError::InvalidFormat(
                            "sound-data chunk precedes common chunk".into(),
                        )
                    })?;
                    if size < 8 {
                        return Err(AudioError::InvalidFormat(
                            "sound-data chunk is too short".into(),
                        ));
                    }

                    let mut prelude = [0u8; 8];
                    read_or_invalid(&mut reader, &mut prelude, "truncated sound-data chunk")?;
                    let offset = u32::from_be_bytes([
                        prelude[0], prelude[1], prelude[2], prelude[3],
                    ]);
                    skip(&mut reader, offset as i64)?;

                    let data_bytes = (size - 8).saturating_sub(offset) as u64;
                    let bytes_per_sample = (bits / 8) as u64;

                    return Ok(Self {
                        reader,
                        sample_rate,
                        bits_per_sample: bits,
                        channels,
                        remaining_samples: data_bytes / bytes_per_sample,
                    });
                }
                _ => skip(&mut reader, padded(size) as i64)?,
            }
        }
    }

    /// Fill `buf` with the next decoded samples, returning how many were read.
    ///
    /// Returns 0 once the sound-data chunk is exhausted.
    pub fn read_samples(&mut self, buf: &mut [i32]) -> Result<usize, AudioError> {
        let want = (buf.len() as u64).min(self.remaining_samples) as usize;
        if want == 0 {
            return Ok(0);
        }

        let bytes_per_sample = (self.bits_per_sample / 8) as usize;
        let mut raw = vec![0u8; want * bytes_per_sample];
        self.reader.read_exact(&mut raw)?;

        for (i, chunk) in raw.chunks_exact(bytes_per_sample).enumerate() {
            buf[i] = match self.bits_per_sample {
                8 => chunk[0] as i8 as i32,
                16 => i16::from_be_bytes([chunk[0], chunk[1]]) as i32,
                24 => {
                    ((chunk[0] as i32) << 24 | (chunk[1] as i32) << 16 | (chunk[2] as i32) << 8)
                        >> 8
                }
                _ => i32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]),
            };
        }

        self.remaining_samples -= want as u64;
        Ok(want)
    }
}

// Chunk payloads are padded to even lengths.
fn padded(size: u32) -> u32 {
    size + (size & 1)
}

fn skip(reader: &mut BufReader<File>, bytes: i64) -> Result<(), AudioError> {
    if bytes > 0 {
        reader.seek(SeekFrom::Current(bytes))?;
    }
    Ok(())
}

fn read_or_invalid(
    reader: &mut BufReader<File>,
    buf: &mut [u8],
    what: &str,
) -> Result<(), AudioError> {
    reader
        .read_exact(buf)
        .map_err(|_| AudioError::InvalidFormat(what.into()))
}
