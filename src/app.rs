use crate::audio::{self, AiffSink, AudioFormat, AudioSink, CaptureStream};
use crate::config::Config;
use crate::services::Recorder;
use crate::stop::{self, StopSignal};
use crate::text_injection;
use crate::transcription::{self, TranscriptionConfig};

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

/// One-shot dictation pipeline: record → transcode → transcribe → type.
///
/// Phases run strictly in sequence; each failure is terminal and earlier
/// phases' output files stay on disk.
pub struct App {
    config: Config,
    output_dir: PathBuf,
}

impl App {
    pub fn new(config: Config, output_dir: PathBuf) -> Self {
        Self { config, output_dir }
    }

    pub async fn run(self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("Failed to create output directory {:?}", self.output_dir))?;

        let aiff_path = self.output_dir.join("parlance.aiff");
        let wav_path = self.output_dir.join("parlance.wav");

        let device_index = match self.config.device {
            Some(index) => index,
            None => Self::prompt_device_selection()?,
        };

        let format = AudioFormat::default(); // 44.1kHz mono
        let stream = CaptureStream::open(device_index, format, AudioFormat::BLOCK_SAMPLES)?;
        let sink: Box<dyn AudioSink + Send> = Box::new(AiffSink::create(&aiff_path, format)?);

        // The stop listener owns stdin from here on, so the device prompt
        // above must have finished first.
        let stop = StopSignal::new();
        tokio::spawn(stop::listen_for_stop(stop.clone()));

        tracing::info!("Recording... press Enter or Ctrl+C to stop");
        let samples = Recorder::new(stream, sink, stop)
            .run()
            .await
            .with_context(|| format!("Recording to {:?} failed", aiff_path))?;
        tracing::info!("Recording saved to {:?} ({} samples)", aiff_path, samples);

        let wav = audio::transcode(&aiff_path, &wav_path)
            .with_context(|| format!("Transcoding {:?} failed", aiff_path))?;

        let client = transcription::create_client(&self.config.api_url, &self.config.api_key);
        let transcription_config = TranscriptionConfig {
            model: self.config.model.clone(),
            language: self.config.language.clone().unwrap_or_default(),
        };
        let text = transcription::transcribe(&wav, &client, &transcription_config).await?;
        tracing::info!("Transcription: {}", text);

        text_injection::type_text(
            text,
            Duration::from_secs(self.config.typing_start_delay_secs),
            self.config.typing_key_delay_ms,
        )
        .await?;

        tracing::info!("Complete!");
        Ok(())
    }

    fn prompt_device_selection() -> Result<usize> {
        let devices = audio::capture::list_input_devices()?;
        if devices.is_empty() {
            anyhow::bail!("No input devices available");
        }

        println!("Available devices:");
        for (index, name) in devices.iter().enumerate() {
            println!("{}: {}", index, name);
        }
        print!("Select device index: ");
        std::io::Write::flush(&mut std::io::stdout())?;

        let mut line = String::new();
        std::io::stdin()
            .read_line(&mut line)
            .context("Failed to read device selection")?;
        let index: usize = line
            .trim()
            .parse()
            .context("Device index must be a number")?;

        if index >= devices.len() {
            anyhow::bail!(
                "Invalid device index {} ({} devices available)",
                index,
                devices.len()
            );
        }

        Ok(index)
    }
}
