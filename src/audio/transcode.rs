use super::aiff_reader::AiffReader;
use super::error::AudioError;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::{Path, PathBuf};

/// Samples pulled from the AIFF stream per encode pass.
const BUFFER_SAMPLES: usize = 1_000_000;

/// Transcode a finished AIFF file into a WAV file with identical PCM content.
///
/// The input is validated before the output file is created, so a malformed
/// source never leaves a partial WAV behind. Any failure after that aborts
/// the transcode; a possibly-incomplete output stays on disk.
pub fn transcode(input: &Path, output: &Path) -> Result<PathBuf, AudioError> {
    transcode_with_capacity(input, output, BUFFER_SAMPLES)
}

fn transcode_with_capacity(
    input: &Path,
    output: &Path,
    capacity: usize,
) -> Result<PathBuf, AudioError> {
    let mut reader = AiffReader::open(input)?;

    let spec = WavSpec {
        channels: reader.channels,
        sample_rate: reader.sample_rate,
        bits_per_sample: reader.bits_per_sample,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(output, spec)?;

    let mut buf = vec![0i32; capacity];
    loop {
        let n = reader.read_samples(&mut buf)?;
        if n == 0 {
            break;
        }
        // A short read means the stream is on its last buffer; only the
        // filled prefix is encoded.
        for &sample in &buf[..n] {
            writer.write_sample(sample)?;
        }
    }

    writer.finalize()?;
    tracing::info!("Converted {} to {}", input.display(), output.display());
    Ok(output.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::aiff_sink::AiffSink;
    use crate::audio::format::AudioFormat;
    use crate::audio::sink::AudioSink;
    use std::fs;

    fn write_ramp(path: &Path, len: i32) {
        let mut sink = AiffSink::create(path, AudioFormat::default()).unwrap();
        let samples: Vec<i32> = (0..len).collect();
        for block in samples.chunks(AudioFormat::BLOCK_SAMPLES) {
            sink.write_block(block).unwrap();
        }
        sink.finalize().unwrap();
    }

    fn read_wav(path: &Path) -> (hound::WavSpec, Vec<i32>) {
        let mut reader = hound::WavReader::open(path).unwrap();
        let spec = reader.spec();
        let samples = reader.samples::<i32>().map(|s| s.unwrap()).collect();
        (spec, samples)
    }

    #[test]
    fn transcodes_the_128_sample_ramp() {
        let dir = tempfile::tempdir().unwrap();
        let aiff = dir.path().join("in.aiff");
        let wav = dir.path().join("out.wav");
        write_ramp(&aiff, 128);

        let produced = transcode(&aiff, &wav).unwrap();
        assert_eq!(produced, wav);

        let (spec, samples) = read_wav(&wav);
        assert_eq!(spec.sample_rate, 44_100);
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.bits_per_sample, 32);
        assert_eq!(spec.sample_format, hound::SampleFormat::Int);

        assert_eq!(samples.len(), 128);
        assert_eq!(samples[0], 0);
        assert_eq!(samples[127], 127);
        assert_eq!(samples, (0..128).collect::<Vec<i32>>());
    }

    #[test]
    fn transcodes_an_empty_recording() {
        let dir = tempfile::tempdir().unwrap();
        let aiff = dir.path().join("in.aiff");
        let wav = dir.path().join("out.wav");
        write_ramp(&aiff, 0);

        transcode(&aiff, &wav).unwrap();

        let (spec, samples) = read_wav(&wav);
        assert_eq!(spec.sample_rate, 44_100);
        assert!(samples.is_empty());
    }

    #[test]
    fn handles_streams_around_the_buffer_capacity() {
        let dir = tempfile::tempdir().unwrap();
        let capacity = 8;

        for len in [capacity - 1, capacity, capacity + 1] {
            let aiff = dir.path().join(format!("in-{len}.aiff"));
            let wav = dir.path().join(format!("out-{len}.wav"));
            write_ramp(&aiff, len as i32);

            transcode_with_capacity(&aiff, &wav, capacity).unwrap();

            let (_, samples) = read_wav(&wav);
            assert_eq!(samples.len(), len, "stream of {len} samples");
            assert_eq!(samples, (0..len as i32).collect::<Vec<i32>>());
        }
    }

    #[test]
    fn negative_samples_survive_bit_identically() {
        let dir = tempfile::tempdir().unwrap();
        let aiff = dir.path().join("in.aiff");
        let wav = dir.path().join("out.wav");

        let samples = vec![i32::MIN, -44_100, -1, 0, 1, 44_100, i32::MAX];
        let mut sink = AiffSink::create(&aiff, AudioFormat::default()).unwrap();
        sink.write_block(&samples).unwrap();
        sink.finalize().unwrap();

        transcode(&aiff, &wav).unwrap();

        let (_, decoded) = read_wav(&wav);
        assert_eq!(decoded, samples);
    }

    #[test]
    fn invalid_input_leaves_no_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let aiff = dir.path().join("in.aiff");
        let wav = dir.path().join("out.wav");
        write_ramp(&aiff, 16);

        let mut bytes = fs::read(&aiff).unwrap();
        bytes[0..4].copy_from_slice(b"RIFF");
        fs::write(&aiff, &bytes).unwrap();

        let err = transcode(&aiff, &wav).unwrap_err();
        assert!(matches!(err, AudioError::InvalidFormat(_)));
        assert!(!wav.exists());
    }
}
