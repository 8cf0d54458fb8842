//! Deterministic time and randomness

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use core_kernel::{Clock, RandomSource};

/// A clock that only moves when told to
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Creates a clock pinned at `now`
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    /// Moves the clock to `now`
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    /// Moves the clock forward
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// A random source replaying a script, then counting upward
#[derive(Debug)]
pub struct ScriptedRandom {
    script: Mutex<VecDeque<u32>>,
    next: Mutex<u32>,
}

impl ScriptedRandom {
    /// Returns `start`, `start + 1`, ... once the script is exhausted
    pub fn counting_from(start: u32) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            next: Mutex::new(start),
        }
    }

    /// Replays `values` in order, then counts from 0
    pub fn scripted(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            script: Mutex::new(values.into_iter().collect()),
            next: Mutex::new(0),
        }
    }

    /// Queues more values to replay
    pub fn push(&self, values: impl IntoIterator<Item = u32>) {
        self.script.lock().unwrap().extend(values);
    }
}

impl RandomSource for ScriptedRandom {
    fn next_below(&self, upper: u32) -> u32 {
        if let Some(value) = self.script.lock().unwrap().pop_front() {
            return value % upper;
        }
        let mut next = self.next.lock().unwrap();
        let value = *next % upper;
        *next = next.wrapping_add(1);
        value
    }
}
