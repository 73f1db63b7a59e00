use std::io::Write;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Interval between progress dots
pub const TICK_INTERVAL: Duration = Duration::from_millis(200);

/// Prints a dot at a fixed interval until stopped.
pub struct ProgressTicker {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<u64>,
}

impl ProgressTicker {
    /// Start ticking into `out`. Must be called inside a tokio runtime.
    pub fn start<W>(mut out: W, period: Duration) -> Self
    where
        W: Write + Send + 'static,
    {
        let (stop, mut stopped) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately
            interval.tick().await;

            let mut ticks = 0u64;
            loop {
                tokio::select! {
                    _ = &mut stopped => break,
                    _ = interval.tick() => {
                        ticks += 1;
                        // Progress output is best effort
                        let _ = out.write_all(b".");
                        let _ = out.flush();
                    }
                }
            }
            ticks
        });
        Self { stop, handle }
    }

    /// Start ticking to stdout every [`TICK_INTERVAL`].
    pub fn stdout() -> Self {
        Self::start(std::io::stdout(), TICK_INTERVAL)
    }

    /// Stop ticking and return the number of dots printed.
    pub async fn stop(self) -> u64 {
        let _ = self.stop.send(());
        self.handle.await.unwrap_or_else(|e| {
            tracing::debug!(%e, "Progress ticker task ended abnormally");
            0
        })
    }
}
