//! Monotonic clock and wrapping 32-bit millisecond timestamps.
//!
//! The alarm timeline is a `u32` count of milliseconds since a clock's
//! origin, wrapping silently at `2^32` (~49.7 days). Points on a wrapping
//! timeline only order relative to each other through a signed difference,
//! so [`Timestamp`] does not implement `Ord`; separations up to `i32::MAX`
//! milliseconds (~24.8 days) in either direction compare correctly across
//! the wrap boundary.

use core::fmt;

use minstant::Instant;

/// A point on the wrapping millisecond timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Timestamp(u32);

impl Timestamp {
    /// Creates a timestamp from a raw millisecond count.
    #[inline]
    #[must_use]
    pub const fn from_millis(millis: u32) -> Self {
        Self(millis)
    }

    /// Returns the raw millisecond count.
    #[inline]
    #[must_use]
    pub const fn as_millis(self) -> u32 {
        self.0
    }

    /// Adds a delay, wrapping at the end of the timeline.
    #[inline]
    #[must_use]
    pub const fn add_millis(self, delay_ms: u32) -> Self {
        Self(self.0.wrapping_add(delay_ms))
    }

    /// Signed milliseconds from `other` to `self`.
    ///
    /// Positive when `self` lies ahead of `other`, negative when behind.
    /// Valid for separations up to half the timeline in either direction.
    #[inline]
    #[must_use]
    pub const fn millis_since(self, other: Self) -> i32 {
        self.0.wrapping_sub(other.0) as i32
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Monotonic clock producing [`Timestamp`]s relative to its own origin.
///
/// Each clock owns its epoch: the origin is captured once at construction
/// and never reset. Readings are non-decreasing within a single 2^32-ms
/// wraparound period.
#[derive(Debug, Clone)]
pub struct MonoClock {
    origin: Instant,
}

impl MonoClock {
    /// Captures the origin for a fresh epoch.
    #[must_use]
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Elapsed milliseconds since the origin, truncated to the wrapping
    /// 32-bit timeline.
    #[must_use]
    pub fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.origin.elapsed().as_millis() as u32)
    }
}
