//! Pure waiter transition rule.
//!
//! The waiter loop never trusts a wakeup reason: on every wake (signal,
//! timeout expiry, or spurious) it re-reads the shared state and asks this
//! function what to do next. Keeping the rule pure makes the scheduling
//! decisions testable with fake instants and no threads.

use std::time::Duration;

use crate::time::Timestamp;

/// What the waiter should do after a wake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Not armed: block until signaled.
    Park,
    /// Armed with time left: block for at most the remaining time.
    Sleep(Duration),
    /// Armed and the deadline has elapsed: fire.
    Fire,
}

/// Transition rule evaluated on every wake.
///
/// `remaining` is a wraparound-safe signed difference, so a deadline on the
/// far side of the 2^32-ms boundary still counts as ahead of `now`.
pub(crate) fn next_step(armed: bool, deadline: Timestamp, now: Timestamp) -> Step {
    if !armed {
        return Step::Park;
    }
    let remaining = deadline.millis_since(now);
    if remaining > 0 {
        Step::Sleep(Duration::from_millis(remaining as u64))
    } else {
        Step::Fire
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(millis: u32) -> Timestamp {
        Timestamp::from_millis(millis)
    }

    #[test]
    fn unarmed_parks_regardless_of_deadline() {
        assert_eq!(next_step(false, ts(0), ts(100)), Step::Park);
        assert_eq!(next_step(false, ts(500), ts(100)), Step::Park);
    }

    #[test]
    fn armed_with_time_left_sleeps_for_remaining() {
        assert_eq!(
            next_step(true, ts(150), ts(100)),
            Step::Sleep(Duration::from_millis(50))
        );
    }

    #[test]
    fn armed_at_deadline_fires() {
        assert_eq!(next_step(true, ts(100), ts(100)), Step::Fire);
    }

    #[test]
    fn armed_past_deadline_fires() {
        assert_eq!(next_step(true, ts(100), ts(250)), Step::Fire);
    }

    #[test]
    fn deadline_beyond_wrap_boundary_sleeps() {
        let now = ts(u32::MAX - 9);
        let deadline = now.add_millis(30);
        assert_eq!(
            next_step(true, deadline, now),
            Step::Sleep(Duration::from_millis(30))
        );
    }

    #[test]
    fn deadline_just_behind_wrap_boundary_fires() {
        let deadline = ts(u32::MAX - 9);
        let now = deadline.add_millis(30);
        assert_eq!(next_step(true, deadline, now), Step::Fire);
    }

    #[test]
    fn far_future_deadline_sleeps_full_span() {
        let now = ts(0xF000_0000);
        let deadline = now.add_millis(i32::MAX as u32);
        assert_eq!(
            next_step(true, deadline, now),
            Step::Sleep(Duration::from_millis(i32::MAX as u64))
        );
    }
}
