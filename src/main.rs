mod app;
mod audio;
mod config;
mod services;
mod stop;
mod text_injection;
mod transcription;

use app::App;
use config::Config;

use anyhow::Result;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    tracing::info!("Starting parlance voice dictation");

    let mut args = std::env::args().skip(1);
    let output_dir = match (args.next(), args.next()) {
        (None, _) => PathBuf::from("recordings"),
        (Some(dir), None) => PathBuf::from(dir),
        (Some(_), Some(_)) => {
            anyhow::bail!("Too many arguments. Usage: parlance [output directory]")
        }
    };

    let config = Config::load()?;
    config.validate()?;

    // LocalSet because the cpal capture stream is !Send
    let local = tokio::task::LocalSet::new();
    local
        .run_until(App::new(config, output_dir).run())
        .await
}
