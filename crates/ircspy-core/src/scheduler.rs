//! Fixed-period render ticks.

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::render::Renderer;
use crate::sink::DisplaySink;

pub const DEFAULT_TICK: Duration = Duration::from_millis(200);

/// Owns the background task that ticks a [`Renderer`].
///
/// The task runs until [`Scheduler::stop`] or until its cancellation token
/// fires, and hands the renderer back so the caller can shut the display
/// down.
pub struct Scheduler<S> {
    token: CancellationToken,
    handle: JoinHandle<Renderer<S>>,
}

impl<S: DisplaySink + Send + 'static> Scheduler<S> {
    pub fn start(period: Duration, renderer: Renderer<S>) -> Self {
        Self::start_with_token(period, renderer, CancellationToken::new())
    }

    /// Starts ticking; cancelling `token` (or any parent of it) stops the
    /// task.
    pub fn start_with_token(
        period: Duration,
        mut renderer: Renderer<S>,
        token: CancellationToken,
    ) -> Self {
        let period = period.max(Duration::from_millis(1));
        let cancelled = token.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            tracing::debug!(period_ms = period.as_millis() as u64, "render scheduler started");
            loop {
                tokio::select! {
                    () = cancelled.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(err) = renderer.tick() {
                            tracing::warn!("display tick failed: {err:#}");
                        }
                    }
                }
            }
            tracing::debug!("render scheduler stopped");
            renderer
        });
        Self { token, handle }
    }

    /// Cancels the ticker and waits for the in-flight tick to finish.
    pub async fn stop(self) -> Result<Renderer<S>> {
        self.token.cancel();
        self.handle.await.context("render scheduler task failed")
    }
}
