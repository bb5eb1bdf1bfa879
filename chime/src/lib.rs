//! Deadline notifier and flash storage boundary over a monotonic 32-bit
//! millisecond timeline.
//!
//! # Overview
//!
//! - [`alarm`] — single-shot, reprogrammable deadline notifier. A dedicated
//!   worker thread sleeps until the programmed point in monotonic time
//!   elapses, then invokes the consumer's handler exactly once. The alarm can
//!   be reprogrammed or canceled from any thread at any moment, including
//!   from within the handler itself.
//! - [`time`] — the wrapping 32-bit millisecond timeline ([`time::Timestamp`])
//!   and the monotonic clock producing it ([`time::MonoClock`]).
//! - [`flash`] — the block storage collaborator contract ([`flash::Flash`]),
//!   plus a RAM-backed reference implementation for hosted builds.
//!
//! # Example
//!
//! ```
//! use std::sync::mpsc;
//!
//! use chime::alarm::{Alarm, AlarmControl};
//!
//! let (tx, rx) = mpsc::channel();
//! let alarm = Alarm::spawn(move |_: &AlarmControl| {
//!     let _ = tx.send(());
//! });
//!
//! alarm.arm(alarm.now(), 10);
//! rx.recv().expect("deadline should fire");
//! alarm.shutdown();
//! ```
//!
//! # Tracing
//!
//! Build with `--features tracing` and call [`init_tracing`] to see
//! structured events for arm/disarm/fire and service lifecycle. The log
//! level is controlled via `RUST_LOG` (default `chime=trace`).

pub mod alarm;
pub mod flash;
pub mod time;

mod trace;

pub use trace::init_tracing;
