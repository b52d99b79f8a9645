//! Time sources
//!
//! The core needs two notions of time: a monotonic [`Timestamp`] for debouncing
//! and refresh scheduling, and the [`WallTime`] that gets drawn on the panel.
//! Both come from a [`Clock`] collaborator.

use core::ops::Add;
use core::time::Duration;

/// Monotonic instant in milliseconds since an arbitrary origin
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Timestamp at the origin
    pub const ZERO: Self = Self(0);

    /// Create a timestamp from milliseconds
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    /// Create a timestamp from whole seconds
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(1000))
    }

    /// Milliseconds since the origin
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Time elapsed since `earlier`, or zero if `earlier` is in the future
    pub fn saturating_duration_since(self, earlier: Self) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for Timestamp {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self {
        let ms = u64::try_from(rhs.as_millis()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(ms))
    }
}

/// Local time of day with minute precision
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WallTime {
    hour: u8,
    minute: u8,
}

impl WallTime {
    /// Create a wall time, rejecting out-of-range fields
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    /// Wall time from seconds elapsed since local midnight (wraps at 24h)
    pub fn from_seconds_of_day(secs: u64) -> Self {
        let secs = secs % 86_400;
        Self {
            hour: (secs / 3600) as u8,
            minute: ((secs % 3600) / 60) as u8,
        }
    }

    /// Hour, 0-23
    pub fn hour(self) -> u8 {
        self.hour
    }

    /// Minute, 0-59
    pub fn minute(self) -> u8 {
        self.minute
    }
}

/// Source of monotonic and wall-clock time
pub trait Clock {
    /// Current monotonic time
    fn now(&self) -> Timestamp;

    /// Current local time of day
    fn local_time(&self) -> WallTime;
}

/// [`Clock`] backed by `std::time`
///
/// Local time is UTC shifted by a fixed offset; there is no time zone database.
#[cfg(feature = "std")]
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    start: std::time::Instant,
    utc_offset_minutes: i32,
}

#[cfg(feature = "std")]
impl SystemClock {
    /// Clock whose local time is UTC
    pub fn utc() -> Self {
        Self::with_offset(0)
    }

    /// Clock whose local time is UTC plus `utc_offset_minutes`
    pub fn with_offset(utc_offset_minutes: i32) -> Self {
        Self {
            start: std::time::Instant::now(),
            utc_offset_minutes,
        }
    }
}

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let ms = u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX);
        Timestamp::from_millis(ms)
    }

    fn local_time(&self) -> WallTime {
        let utc = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_secs() as i64);
        let local = utc + i64::from(self.utc_offset_minutes) * 60;
        WallTime::from_seconds_of_day(local.rem_euclid(86_400) as u64)
    }
}
