// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Monotonic fixed-point timer.
//!
//! Engine time is measured in 16.16 fixed-point seconds, so one "time unit"
//! is [`F1_0`] ticks. All timeouts in the input layer (double-click window,
//! cursor auto-hide) compare against values produced by [`Timer::query`].

use std::time::Instant;

/// A 48.16 fixed-point timestamp.
pub(crate) type Fix64 = i64;

/// One second (one time unit) in fixed-point.
pub(crate) const F1_0: Fix64 = 0x10000;

/// Converts whole seconds to fixed-point.
pub(crate) const fn i2f(seconds: i64) -> Fix64 {
    seconds << 16
}

/// Monotonic clock anchored at construction.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Timer {
    start: Instant,
}

impl Timer {
    pub(crate) fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Returns the fixed-point time elapsed since the timer was created.
    pub(crate) fn query(&self) -> Fix64 {
        let elapsed = self.start.elapsed();
        let whole = i2f(elapsed.as_secs() as i64);
        let frac = (i64::from(elapsed.subsec_micros()) * F1_0) / 1_000_000;
        whole + frac
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
