//! Countdown ticker for a voting window.
//!
//! Publishes the time left on a [`VoteWindow`] once per tick through a watch
//! channel. The last value published is zero, after which the task ends.

use glasslog_core::{Clock, VoteWindow};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// A running countdown. Dropping the handle stops the ticker.
pub struct CountdownHandle {
    rx: watch::Receiver<Duration>,
    task: JoinHandle<()>,
}

impl CountdownHandle {
    /// Latest time left.
    pub fn remaining(&self) -> Duration {
        *self.rx.borrow()
    }

    /// A receiver that observes every published value.
    pub fn subscribe(&self) -> watch::Receiver<Duration> {
        self.rx.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait until the countdown has reached zero.
    pub async fn wait(mut self) {
        let mut rx = self.rx.clone();
        // An error means the ticker is gone, so there is nothing left to await.
        let _ = rx.wait_for(|left| left.is_zero()).await;
        let _ = (&mut self.task).await;
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Start ticking `window` every `tick` using `clock` for the current time.
pub fn spawn_countdown(window: VoteWindow, clock: Arc<dyn Clock>, tick: Duration) -> CountdownHandle {
    let (tx, rx) = watch::channel(window.remaining(clock.now()));

    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick);
        loop {
            interval.tick().await;
            let left = window.remaining(clock.now());
            if tx.send(left).is_err() {
                break;
            }
            if left.is_zero() {
                tracing::info!("voting window closed");
                break;
            }
        }
    });

    CountdownHandle { rx, task }
}
