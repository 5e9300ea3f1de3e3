//! Injected time source.
//!
//! All wait-time arithmetic in the engine runs on whole seconds since the
//! epoch, read through this capability so that tests can drive the clock by
//! hand instead of sleeping.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::Utc;

/// Source of "seconds since epoch" for the engine.
pub trait Clock: Send + Sync {
    fn now_sec(&self) -> i64;
}

pub type ClockRef = Arc<dyn Clock>;

/// Wall clock; the default for production use.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_sec(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// A clock advanced by hand. Used by tests and simulations.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_sec: i64) -> Self {
        Self {
            now: AtomicI64::new(start_sec),
        }
    }

    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }

    pub fn set(&self, now_sec: i64) {
        self.now.store(now_sec, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_sec(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
