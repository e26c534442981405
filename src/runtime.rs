//! Process clock and runtime snapshots.
//!
//! The clock is captured once at startup and handed to the router state.
//! Uptime is measured against a monotonic [`Instant`], so it never moves
//! backwards even if the wall clock is adjusted.

use std::time::{Duration, Instant};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Start-of-process reference, immutable after construction.
#[derive(Debug, Clone, Copy)]
pub struct ProcessClock {
    started: Instant,
    started_at: DateTime<Utc>,
}

impl ProcessClock {
    /// Capture the current instant as the process start.
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            started_at: Utc::now(),
        }
    }

    /// Wall-clock time at which the process started.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Time elapsed since start.
    pub fn uptime(&self) -> Duration {
        Instant::now().saturating_duration_since(self.started)
    }

    /// Whole seconds elapsed since start.
    pub fn uptime_seconds(&self) -> u64 {
        self.uptime().as_secs()
    }
}

impl Default for ProcessClock {
    fn default() -> Self {
        Self::start()
    }
}

/// Current wall-clock time as an RFC 3339 UTC string.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Render whole seconds as `"{h} hours, {m} minutes"`.
pub fn format_uptime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;

    format!(
        "{} {}, {} {}",
        hours,
        if hours == 1 { "hour" } else { "hours" },
        minutes,
        if minutes == 1 { "minute" } else { "minutes" },
    )
}

/// Runtime facts for the info endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct RuntimeSnapshot {
    /// Seconds since process start.
    pub uptime_seconds: u64,
    /// Human-readable uptime.
    pub uptime_human: String,
    /// Current time, RFC 3339.
    pub current_time: String,
    /// Timezone of `current_time`.
    pub timezone: &'static str,
}

impl RuntimeSnapshot {
    /// Capture runtime facts relative to `clock`.
    pub fn capture(clock: &ProcessClock) -> Self {
        let uptime_seconds = clock.uptime_seconds();
        Self {
            uptime_seconds,
            uptime_human: format_uptime(uptime_seconds),
            current_time: now_rfc3339(),
            timezone: "UTC",
        }
    }
}
