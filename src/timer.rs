use std::time::Duration;

use async_trait::async_trait;

/// # Delay primitive
///
/// The mission runs as one cooperative task and only ever suspends through this trait: to pace maneuver steps,
/// to wait between control cycles and to idle on the ground. A wait is never cancelled by a change of intent.
#[async_trait]
pub trait Timer {
    /// Suspend the calling task for `duration`
    async fn sleep(&self, duration: Duration);
}

/// [Timer] backed by the tokio runtime
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

#[async_trait]
impl Timer for TokioTimer {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
