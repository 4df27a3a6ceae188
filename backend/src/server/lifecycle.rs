//! Server lifecycle tracking.
//!
//! `Idle -> Listening -> Draining -> Stopped`. Transitions only move forward;
//! a server that fails while listening jumps straight to `Stopped`.

use std::sync::atomic::{AtomicU8, Ordering};

use tracing::info;

/// Observable server phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LifecycleState {
    /// Constructed, listener not yet serving.
    Idle,
    /// Accepting connections and serving calls.
    Listening,
    /// No new connections; in-flight calls are finishing.
    Draining,
    /// Server future has completed or been dropped.
    Stopped,
}

impl LifecycleState {
    const fn as_u8(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Listening => 1,
            Self::Draining => 2,
            Self::Stopped => 3,
        }
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::Listening,
            2 => Self::Draining,
            _ => Self::Stopped,
        }
    }
}

/// Shared lifecycle state for a single server instance.
#[derive(Debug)]
pub struct Lifecycle {
    state: AtomicU8,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            state: AtomicU8::new(LifecycleState::Idle.as_u8()),
        }
    }
}

impl Lifecycle {
    /// Create a lifecycle in the `Idle` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn state(&self) -> LifecycleState {
        LifecycleState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn mark_listening(&self) -> bool {
        self.advance(LifecycleState::Listening)
    }

    pub(crate) fn mark_draining(&self) -> bool {
        self.advance(LifecycleState::Draining)
    }

    pub(crate) fn mark_stopped(&self) -> bool {
        self.advance(LifecycleState::Stopped)
    }

    /// Move to `next` if it is later than the current phase.
    fn advance(&self, next: LifecycleState) -> bool {
        let result = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (LifecycleState::from_u8(current) < next).then_some(next.as_u8())
            });
        match result {
            Ok(previous) => {
                info!(
                    from = ?LifecycleState::from_u8(previous),
                    to = ?next,
                    "server lifecycle transition"
                );
                true
            }
            Err(_) => false,
        }
    }
}
