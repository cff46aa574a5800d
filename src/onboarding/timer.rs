//! Practice countdown — a tokio task ticking a shared session once per period.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use super::session::{Session, TickOutcome};

/// Handle to a running countdown. Aborts the task when cancelled or dropped.
#[derive(Debug)]
pub struct PracticeTimer {
    handle: JoinHandle<()>,
}

impl PracticeTimer {
    /// Spawn the countdown. The first tick fires one `period` after start.
    ///
    /// The task stops on its own once the session reports expiry or that the
    /// countdown is no longer running.
    pub fn start(session_id: Uuid, session: Arc<Mutex<Session>>, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);
            loop {
                interval.tick().await;
                let outcome = session.lock().await.tick();
                match outcome {
                    TickOutcome::Running(remaining) => {
                        debug!(session_id = %session_id, remaining, "Practice tick");
                    }
                    TickOutcome::Expired => {
                        info!(session_id = %session_id, "Practice countdown expired, moving to paywall");
                        break;
                    }
                    TickOutcome::Idle => {
                        debug!(session_id = %session_id, "Countdown no longer active, stopping timer");
                        break;
                    }
                }
            }
        });
        Self { handle }
    }

    /// Stop the countdown. No tick runs after this returns, except one that
    /// already holds the session lock; that tick sees an inactive timer.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for PracticeTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
