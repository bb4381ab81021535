//! Run control for the tick loop.
//!
//! The loop itself lives in [`EcsContext::run`](crate::context::EcsContext::run). It observes a shared
//! [RunState] between ticks and sleeps on a condition variable while paused or waiting for the next tick,
//! so a [RunHandle] held by a listener or another thread can pause, resume or stop it at any time.

use std::time::{Duration, Instant};
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RunState {
	#[default]
	Stopped,
	Running,
	Paused,
}

struct Shared {
	state: Mutex<RunState>,
	changed: Condvar,
}

/// A cloneable, thread-safe handle to the run state of an [EcsContext](crate::context::EcsContext).
#[derive(Clone)]
pub struct RunHandle {
	shared: Arc<Shared>,
}

impl RunHandle {
	pub(crate) fn new() -> Self {
		Self {
			shared: Arc::new(Shared {
				state: Mutex::new(RunState::Stopped),
				changed: Condvar::new(),
			}),
		}
	}

	pub fn state(&self) -> RunState {
		*self.shared.state.lock()
	}

	pub fn is_running(&self) -> bool {
		self.state() == RunState::Running
	}

	/// Moves to [`RunState::Running`] from any other state. Returns whether the state changed.
	pub fn run(&self) -> bool {
		self.transition(|_| true, RunState::Running)
	}

	/// Same as [`run`](Self::run); resuming a paused loop is just running it again.
	pub fn resume(&self) -> bool {
		self.run()
	}

	/// Moves from [`RunState::Running`] to [`RunState::Paused`]. Returns whether the state changed.
	pub fn pause(&self) -> bool {
		self.transition(|state| state == RunState::Running, RunState::Paused)
	}

	/// Moves to [`RunState::Stopped`] from a running or paused state. Returns whether the state changed.
	pub fn stop(&self) -> bool {
		self.transition(|state| state != RunState::Stopped, RunState::Stopped)
	}

	/// Blocks until the state differs from `current`, or until `timeout` elapses.
	pub(crate) fn wait_for_change(&self, current: RunState, timeout: Option<Duration>) -> RunState {
		let mut state = self.shared.state.lock();
		match timeout {
			None => {
				while *state == current {
					self.shared.changed.wait(&mut state);
				}
			},
			Some(timeout) => {
				let deadline = Instant::now() + timeout;
				while *state == current {
					if self.shared.changed.wait_until(&mut state, deadline).timed_out() {
						break;
					}
				}
			},
		}
		*state
	}

	fn transition(&self, allowed: impl FnOnce(RunState) -> bool, to: RunState) -> bool {
		let mut state = self.shared.state.lock();
		if *state == to || !allowed(*state) {
			return false;
		}

		*state = to;
		self.shared.changed.notify_all();
		true
	}
}

impl std::fmt::Debug for RunHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RunHandle").field("state", &self.state()).finish()
	}
}
