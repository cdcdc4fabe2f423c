// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Trailing-edge debouncing for a polled UI loop.
//!
//! The UI thread pushes values as they arrive and polls once per frame; a
//! value is released only after `delay` has elapsed with no newer push.
//! Callers pass `Instant`s explicitly so the timer is deterministic.

use std::time::{Duration, Instant};

struct Pending<T> {
    value: T,
    deadline: Instant,
}

/// Coalesces a burst of values into the last one.
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replace any pending value and restart the quiet period.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            value,
            deadline: now + self.delay,
        });
    }

    /// Release the pending value if its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self.pending.as_ref().is_some_and(|p| now >= p.deadline);
        if due {
            self.pending.take().map(|p| p.value)
        } else {
            None
        }
    }

    /// Release the pending value immediately, regardless of the deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    /// Drop the pending value without releasing it. Returns `true` if a
    /// value was discarded.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|p| &p.value)
    }

    /// Time left until the pending value is due, if one is pending.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|p| p.deadline.saturating_duration_since(now))
    }
}
