//! Single-shot, reprogrammable deadline notifier.
//!
//! # Architecture
//!
//! One worker thread owns the wait/fire loop; callers reprogram it through a
//! cloneable [`AlarmControl`] handle. Shared state is a mutex-guarded record
//! `{armed, deadline, shutdown}` paired with a condvar that interrupts both
//! the idle (indefinite) wait and the armed (bounded) wait.
//!
//! ```text
//! caller(s)                                worker ("chime-alarm")
//!    │                                          │
//!    │  arm: lock, publish deadline, notify ───>│  wake (or spurious wake)
//!    │  disarm: lock, clear armed               │  re-read state under lock
//!    │                                          │  Park | Sleep(remaining) | Fire
//!    │                                          │  on Fire: clear armed, unlock,
//!    │<───────────── on_fired(&control) ────────│  invoke handler
//! ```
//!
//! The handler runs on the worker thread with the lock released, so it may
//! re-enter the control API; re-arming from [`AlarmHandler::on_fired`] is
//! expected usage. A `disarm` racing a fire decision that has already
//! cleared `armed` can lose: the alarm still fires exactly once in that
//! window. This is the platform contract the module implements, not a
//! defect.
//!
//! Exactly one deadline is tracked at a time. Arming while armed replaces
//! the previous deadline (last-writer-wins, no queue), and the worker only
//! guarantees to observe the latest state at each wake.

mod step;

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use crate::time::{MonoClock, Timestamp};
use crate::trace::{debug, info, warn};

use step::Step;

/// Fire notification contract.
///
/// Invoked synchronously on the worker thread, with the alarm lock released,
/// exactly once per elapsed deadline.
///
/// Implemented for any `FnMut(&AlarmControl) + Send + 'static` closure.
pub trait AlarmHandler: Send + 'static {
    /// Called when an armed deadline elapses.
    ///
    /// `alarm` is the control handle of the owning service; calling
    /// [`AlarmControl::arm`] from here starts a fresh period without
    /// deadlock.
    fn on_fired(&mut self, alarm: &AlarmControl);
}

impl<F> AlarmHandler for F
where
    F: FnMut(&AlarmControl) + Send + 'static,
{
    fn on_fired(&mut self, alarm: &AlarmControl) {
        self(alarm);
    }
}

/// Mutable record shared between callers and the worker.
///
/// `deadline` is meaningful only while `armed` is set. `shutdown` is set
/// once and never cleared.
#[derive(Debug)]
struct AlarmState {
    armed: bool,
    deadline: Timestamp,
    shutdown: bool,
}

struct Shared {
    clock: MonoClock,
    state: Mutex<AlarmState>,
    cond: Condvar,
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, AlarmState> {
        // No user code runs under this lock, so poisoning is unreachable.
        self.state.lock().expect("alarm state lock poisoned")
    }
}

/// Cloneable control surface for a running [`Alarm`].
///
/// All operations are safe from any thread, including from within the
/// handler callback. Handles outliving the service degrade to no-ops.
#[derive(Clone)]
pub struct AlarmControl {
    shared: Arc<Shared>,
}

impl AlarmControl {
    /// Elapsed milliseconds since the service was spawned, wrapping at 2^32.
    #[must_use]
    pub fn now(&self) -> Timestamp {
        self.shared.clock.now()
    }

    /// Programs the alarm to fire `delay_ms` after `reference`.
    ///
    /// The deadline is `reference + delay_ms` with wrapping addition. Arming
    /// while already armed replaces the previous deadline. Fire-and-forget:
    /// returns without waiting for the worker to observe the change.
    pub fn arm(&self, reference: Timestamp, delay_ms: u32) {
        let deadline = reference.add_millis(delay_ms);
        {
            let mut state = self.shared.lock_state();
            if state.shutdown {
                warn!(deadline = %deadline, "arm after shutdown ignored");
                return;
            }
            state.deadline = deadline;
            state.armed = true;
        }
        // Signal after unlock so the worker never wakes into a held lock.
        self.shared.cond.notify_one();
        debug!(reference = %reference, delay_ms, deadline = %deadline, "armed");
    }

    /// Cancels the outstanding deadline, if any.
    ///
    /// Best-effort: a disarm that races a fire decision already taken by the
    /// worker does not suppress that period's notification. No-op while not
    /// armed. No wake signal is needed; the worker re-checks `armed` before
    /// any fire decision.
    pub fn disarm(&self) {
        self.shared.lock_state().armed = false;
        debug!("disarmed");
    }

    /// Whether a deadline is currently being tracked.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.shared.lock_state().armed
    }
}

/// Deadline notifier service: owns the worker thread.
///
/// Construction captures the clock origin and spawns the worker. Dropping
/// the service signals shutdown without waiting; use [`Alarm::shutdown`] for
/// a graceful join.
pub struct Alarm {
    control: AlarmControl,
    worker: Option<JoinHandle<()>>,
}

impl Alarm {
    /// Captures the clock origin and spawns the worker thread.
    ///
    /// # Panics
    ///
    /// Panics if thread spawning fails.
    #[must_use]
    pub fn spawn<H: AlarmHandler>(handler: H) -> Self {
        let shared = Arc::new(Shared {
            clock: MonoClock::start(),
            state: Mutex::new(AlarmState {
                armed: false,
                deadline: Timestamp::from_millis(0),
                shutdown: false,
            }),
            cond: Condvar::new(),
        });
        let control = AlarmControl { shared };

        let worker_control = control.clone();
        let worker = thread::Builder::new()
            .name("chime-alarm".into())
            .spawn(move || {
                debug!("alarm worker started");
                run_waiter(&worker_control, handler);
                debug!("alarm worker exiting");
            })
            .expect("failed to spawn alarm worker");

        info!("alarm service started");
        Self {
            control,
            worker: Some(worker),
        }
    }

    /// Returns a cloneable control handle.
    #[must_use]
    pub fn control(&self) -> AlarmControl {
        self.control.clone()
    }

    /// See [`AlarmControl::now`].
    #[must_use]
    pub fn now(&self) -> Timestamp {
        self.control.now()
    }

    /// See [`AlarmControl::arm`].
    pub fn arm(&self, reference: Timestamp, delay_ms: u32) {
        self.control.arm(reference, delay_ms);
    }

    /// See [`AlarmControl::disarm`].
    pub fn disarm(&self) {
        self.control.disarm();
    }

    /// See [`AlarmControl::is_armed`].
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.control.is_armed()
    }

    /// Signals shutdown and waits for the worker to exit.
    ///
    /// An in-flight handler invocation is allowed to finish; no further
    /// fires happen afterwards.
    pub fn shutdown(mut self) {
        info!("alarm shutdown initiated");
        self.signal_shutdown();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        info!("alarm shutdown complete");
    }

    fn signal_shutdown(&self) {
        self.control.shared.lock_state().shutdown = true;
        self.control.shared.cond.notify_one();
    }
}

impl Drop for Alarm {
    fn drop(&mut self) {
        // Signal without joining; shutdown() is the graceful path.
        self.signal_shutdown();
    }
}

/// Worker loop: wait, re-evaluate, fire.
///
/// Holds the lock across every state read and wait; releases it only while
/// the handler runs.
fn run_waiter<H: AlarmHandler>(control: &AlarmControl, mut handler: H) {
    let shared = &control.shared;
    let mut state = shared.lock_state();
    loop {
        if state.shutdown {
            return;
        }
        match step::next_step(state.armed, state.deadline, shared.clock.now()) {
            Step::Park => {
                state = shared
                    .cond
                    .wait(state)
                    .expect("alarm state lock poisoned");
            }
            Step::Sleep(timeout) => {
                state = shared
                    .cond
                    .wait_timeout(state, timeout)
                    .expect("alarm state lock poisoned")
                    .0;
            }
            Step::Fire => {
                // The fire decision is final: a disarm arriving from here on
                // no longer suppresses this period's notification.
                state.armed = false;
                drop(state);
                debug!("deadline elapsed, firing");
                handler.on_fired(control);
                state = shared.lock_state();
            }
        }
    }
}
