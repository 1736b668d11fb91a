//! Common types shared across the application.

use serde::{Deserialize, Serialize};

/// Duration in whole seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Duration(pub u64);

impl Duration {
    pub const ZERO: Self = Self(0);

    pub const fn from_seconds(seconds: u64) -> Self {
        Self(seconds)
    }

    /// Build from a fractional second count, truncating the fraction.
    ///
    /// Negative and non-finite input saturates to zero.
    pub fn from_secs_f64(seconds: f64) -> Self {
        if seconds.is_finite() && seconds > 0.0 {
            Self(seconds.floor() as u64)
        } else {
            Self::ZERO
        }
    }

    pub const fn as_seconds(&self) -> u64 {
        self.0
    }

    /// Format as `HH:MM:SS`.
    pub fn format_clock(&self) -> String {
        format_duration(self.0)
    }
}

impl From<u64> for Duration {
    fn from(seconds: u64) -> Self {
        Self(seconds)
    }
}

impl From<Duration> for u64 {
    fn from(d: Duration) -> Self {
        d.0
    }
}

impl std::fmt::Display for Duration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_clock())
    }
}

/// Render a second count as zero-padded `HH:MM:SS`.
///
/// Hours are never wrapped: 100 hours renders as `100:00:00`.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
