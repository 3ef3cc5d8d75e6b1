//! Countdown derived from a question's answer window.

use chrono::{DateTime, Utc};

/// How close the answer window is to closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Urgency {
    Normal,
    Warning,
    Critical,
}

impl Urgency {
    fn for_fraction(fraction: f64) -> Self {
        if fraction > 0.75 {
            Self::Critical
        } else if fraction > 0.5 {
            Self::Warning
        } else {
            Self::Normal
        }
    }

    /// Numeric tier, 0 for normal up to 2 for critical.
    pub fn tier(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Warning => 1,
            Self::Critical => 2,
        }
    }
}

/// One frame of the countdown bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    pub remaining_secs: u64,
    pub width_percent: f64,
    pub urgency: Urgency,
}

impl Countdown {
    /// Countdown at `now`, or `None` outside the open interval `(start, end)`.
    pub fn at(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        let alpha = fraction(now, start, end);
        if !(alpha > 0.0 && alpha < 1.0) {
            return None;
        }

        let remaining_ms = (end - now).num_milliseconds().max(0) as u64;
        Some(Self {
            remaining_secs: remaining_ms.div_ceil(1000),
            width_percent: 100.0 * (1.0 - alpha),
            urgency: Urgency::for_fraction(alpha),
        })
    }
}

/// Elapsed share of the window: 0 at `start`, 1 at `end`, outside `[0, 1]`
/// before or after it.
pub fn fraction(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let total = (end - start).num_milliseconds();
    if total <= 0 {
        return f64::NAN;
    }
    (now - start).num_milliseconds() as f64 / total as f64
}
