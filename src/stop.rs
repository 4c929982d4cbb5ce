use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::AsyncBufReadExt;

/// Single-shot cancellation flag shared between the stop listener and the
/// capture loop. Once raised it stays raised; it carries no payload.
#[derive(Clone, Default)]
pub struct StopSignal {
    raised: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal. Idempotent: redundant raises are harmless.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    /// Non-blocking check, safe to poll from the capture loop.
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }
}

/// Raise `stop` on the first stdin line or Ctrl+C, whichever comes first.
pub async fn listen_for_stop(stop: StopSignal) {
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

    tokio::select! {
        _ = lines.next_line() => tracing::debug!("Stop requested via stdin"),
        _ = tokio::signal::ctrl_c() => tracing::debug!("Stop requested via Ctrl+C"),
    }

    stop.raise();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unraised_and_latches_once_raised() {
        let stop = StopSignal::new();
        assert!(!stop.is_raised());

        stop.raise();
        assert!(stop.is_raised());
        assert!(stop.is_raised());
    }

    #[test]
    fn redundant_raises_are_harmless() {
        let stop = StopSignal::new();
        stop.raise();
        stop.raise();
        stop.raise();
        assert!(stop.is_raised());
    }

    #[test]
    fn clones_observe_the_same_flag() {
        let stop = StopSignal::new();
        let observer = stop.clone();
        assert!(!observer.is_raised());

        stop.raise();
        assert!(observer.is_raised());
    }
}
