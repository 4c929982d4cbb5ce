use anyhow::{Context, Result};
use std::process::Command;
use std::time::Duration;
use tokio::task;

/// Type the transcribed text into the focused application via ydotool
///
/// Waits `start_delay` first so the user can focus the target window, then
/// types the text with a fixed per-key delay.
pub async fn type_text(text: String, start_delay: Duration, key_delay_ms: u32) -> Result<()> {
    if text.is_empty() {
        tracing::warn!("Nothing to type, transcription was empty");
        return Ok(());
    }

    tracing::info!(
        "Typing {} chars in {}s...",
        text.len(),
        start_delay.as_secs()
    );
    tokio::time::sleep(start_delay).await;

    // Use spawn_blocking for the external command
    task::spawn_blocking(move || {
        let output = Command::new("ydotool")
            .args(["type", "--key-delay", &key_delay_ms.to_string(), "--", &text])
            .output()
            .context("Failed to execute ydotool")?;

        if !output.status.success() {
            anyhow::bail!(
                "ydotool exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        tracing::info!("Typing completed");
        Ok::<(), anyhow::Error>(())
    })
    .await
    .context("spawn_blocking failed")??;

    Ok(())
}
