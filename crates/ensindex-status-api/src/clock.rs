//! Wall-clock source for snapshot and projection times.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use ensindex_status_core::UnixTimestamp;

pub trait Clock: Send + Sync {
    /// Current unix time in seconds.
    fn now(&self) -> UnixTimestamp;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> UnixTimestamp {
        // pre-1970 clocks read as 0
        u64::try_from(Utc::now().timestamp()).unwrap_or_default()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct FixedClock {
    now: AtomicU64,
}

impl FixedClock {
    pub fn new(now: UnixTimestamp) -> Self {
        Self {
            now: AtomicU64::new(now),
        }
    }

    pub fn set(&self, now: UnixTimestamp) {
        self.now.store(now, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> UnixTimestamp {
        self.now.load(Ordering::SeqCst)
    }
}
