// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Monotonic stopwatch and delay helpers. These are diagnostic utilities: the scheduler uses the
//! stopwatch to time passes, and demo tasks use [sleep_ms] to make interleaving visible. Neither
//! affects scheduling correctness or control flow.

//======================================================================================================================
// Imports
//======================================================================================================================

use ::std::{
    thread,
    time::{
        Duration,
        Instant,
    },
};

//======================================================================================================================
// Structures
//======================================================================================================================

/// Monotonic stopwatch. Readings are valid both while the stopwatch runs (elapsed time so far)
/// and after it is stopped (time between start and stop).
#[derive(Default)]
pub struct Stopwatch {
    /// Timestamp of the last call to [Stopwatch::start].
    start: Option<Instant>,
    /// Timestamp of the last call to [Stopwatch::stop], cleared on restart.
    end: Option<Instant>,
}

//======================================================================================================================
// Associate Functions
//======================================================================================================================

impl Stopwatch {
    /// Starts the stopwatch, discarding any previous reading.
    pub fn start(&mut self) {
        self.start = Some(Instant::now());
        self.end = None;
    }

    /// Stops the stopwatch, freezing the elapsed reading.
    pub fn stop(&mut self) {
        self.end = Some(Instant::now());
    }

    /// Clears all readings.
    pub fn reset(&mut self) {
        self.start = None;
        self.end = None;
    }

    pub fn is_running(&self) -> bool {
        self.start.is_some() && self.end.is_none()
    }

    /// Returns the elapsed time. Works whether or not the stopwatch is still running; a stopwatch
    /// that was never started reads zero.
    pub fn elapsed(&self) -> Duration {
        match (self.start, self.end) {
            (Some(start), Some(end)) => end.saturating_duration_since(start),
            (Some(start), None) => Instant::now().saturating_duration_since(start),
            (None, _) => Duration::ZERO,
        }
    }

    pub fn elapsed_ns(&self) -> u128 {
        self.elapsed().as_nanos()
    }

    pub fn elapsed_us(&self) -> u128 {
        self.elapsed().as_micros()
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1e3
    }

    pub fn elapsed_s(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    /// Formats the elapsed time, choosing the unit by magnitude.
    pub fn format_elapsed(&self) -> String {
        let ns: u128 = self.elapsed_ns();

        if ns < 1_000 {
            return format!("{}ns", ns);
        }
        if ns < 1_000_000 {
            return format!("{:.3}us", ns as f64 / 1e3);
        }
        if ns < 1_000_000_000 {
            return format!("{:.3}ms", ns as f64 / 1e6);
        }
        format!("{:.6}s", ns as f64 / 1e9)
    }
}

//======================================================================================================================
// Standalone Functions
//======================================================================================================================

/// Sleeps for the given number of milliseconds. Unlike the underlying system call, this helper
/// does not return early when interrupted by a signal.
pub fn sleep_ms(ms: u64) {
    thread::sleep(Duration::from_millis(ms));
}

//======================================================================================================================
// Unit Tests
//======================================================================================================================
