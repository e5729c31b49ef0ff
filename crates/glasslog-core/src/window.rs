//! Voting window countdown.
//!
//! A session's voting window ends at a fixed instant set once when the
//! session starts. The time left is a pure function of "now" and that end,
//! clamped at zero, so any clock can drive it.

use crate::error::{Error, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can hold one handle and advance
/// it while another is owned by the code under test.
#[derive(Debug, Clone)]
pub struct ManualClock {
    millis: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start: SystemTime) -> Self {
        let millis = start
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self {
            millis: Arc::new(AtomicU64::new(millis)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.millis.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn set(&self, to: SystemTime) {
        let millis = to.duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64;
        self.millis.store(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

/// Time left until `ends_at`, or zero once it has passed.
pub fn remaining(now: SystemTime, ends_at: SystemTime) -> Duration {
    ends_at.duration_since(now).unwrap_or(Duration::ZERO)
}

/// Render a duration as `H:MM:SS`, dropping fractional seconds.
pub fn format_remaining(left: Duration) -> String {
    let secs = left.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

/// A voting session's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteWindow {
    ends_at: SystemTime,
}

impl VoteWindow {
    /// Default session length.
    pub const DEFAULT_LENGTH: Duration = Duration::from_secs(3600);

    /// A window of `length` from `start`.
    ///
    /// Fails when the end falls outside what the platform clock can represent.
    pub fn starting_at(start: SystemTime, length: Duration) -> Result<Self> {
        let ends_at = start.checked_add(length).ok_or_else(|| {
            Error::Validation(format!("vote window of {}s is too long", length.as_secs()))
        })?;
        Ok(Self { ends_at })
    }

    /// Open a window of `length` from the clock's current time.
    pub fn start(clock: &dyn Clock, length: Duration) -> Result<Self> {
        Self::starting_at(clock.now(), length)
    }

    pub fn ends_at(&self) -> SystemTime {
        self.ends_at
    }

    pub fn remaining(&self, now: SystemTime) -> Duration {
        remaining(now, self.ends_at)
    }

    pub fn is_closed(&self, now: SystemTime) -> bool {
        self.remaining(now).is_zero()
    }
}
