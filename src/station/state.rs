//! Connection state and the blocking wait primitive.
//!
//! The state machine publishes a single [`ConnectionState`] value. Callers
//! synchronize on it through [`StateCell::wait`], which suspends on a condvar
//! until the state matches a [`StateMask`]. The wait is level-triggered: a
//! state that already matches when the caller arrives satisfies the wait
//! immediately, so a late waiter still observes a past transition.

use std::fmt;
use std::ops::BitOr;
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// The station's connection state. Exactly one value is active at a time;
/// transitions happen only in response to provider events or explicit caller
/// commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Initialized, never commanded to connect.
    Idle,
    /// Start/reconnect commanded, link or address still pending.
    Connecting,
    /// Link up and address acquired.
    Connected,
    /// Intentional teardown in progress.
    Disconnecting,
    /// Terminal for one cycle: gave up retrying or teardown completed.
    Disconnected,
}

impl ConnectionState {
    fn mask_bit(self) -> u8 {
        match self {
            // Idle is the pre-cycle state; it is not waitable.
            Self::Idle => 0,
            Self::Connecting => 1 << 0,
            Self::Connected => 1 << 1,
            Self::Disconnecting => 1 << 2,
            Self::Disconnected => 1 << 3,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnecting => "disconnecting",
            Self::Disconnected => "disconnected",
        };
        write!(f, "{}", name)
    }
}

/// A set of waitable connection states. Combine with `|`:
///
/// ```
/// use stationlink::station::StateMask;
///
/// let outcome = StateMask::CONNECTED | StateMask::DISCONNECTED;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateMask(u8);

impl StateMask {
    /// Matches `Connecting`.
    pub const CONNECTING: StateMask = StateMask(1 << 0);
    /// Matches `Connected`.
    pub const CONNECTED: StateMask = StateMask(1 << 1);
    /// Matches `Disconnecting`.
    pub const DISCONNECTING: StateMask = StateMask(1 << 2);
    /// Matches `Disconnected`.
    pub const DISCONNECTED: StateMask = StateMask(1 << 3);

    /// Returns true if `state` is in this set.
    pub fn matches(&self, state: ConnectionState) -> bool {
        self.0 & state.mask_bit() != 0
    }
}

impl BitOr for StateMask {
    type Output = StateMask;

    fn bitor(self, rhs: StateMask) -> StateMask {
        StateMask(self.0 | rhs.0)
    }
}

/// Shared cell holding the current state, with condvar-based waiting.
///
/// Writers call [`StateCell::set`] from the event-handling context; waiters
/// never hold any other lock while suspended here.
#[derive(Debug)]
pub(crate) struct StateCell {
    state: Mutex<ConnectionState>,
    signal: Condvar,
}

impl StateCell {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(ConnectionState::Idle),
            signal: Condvar::new(),
        }
    }

    pub(crate) fn set(&self, next: ConnectionState) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        *state = next;
        self.signal.notify_all();
    }

    pub(crate) fn get(&self) -> ConnectionState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Block until the state matches `mask` or `timeout` elapses.
    ///
    /// Returns the matching state, or `None` on timeout. Does not spin: the
    /// calling thread suspends on the condvar between observations. A timeout
    /// too large to land on the clock (`Duration::MAX` and friends) means no
    /// deadline at all, so the wait blocks until the state matches.
    pub(crate) fn wait(&self, mask: StateMask, timeout: Duration) -> Option<ConnectionState> {
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        loop {
            if mask.matches(*state) {
                return Some(*state);
            }
            let Some(deadline) = deadline else {
                state = self.signal.wait(state).unwrap_or_else(|e| e.into_inner());
                continue;
            };
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            let (guard, result) = self
                .signal
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(|e| e.into_inner());
            state = guard;
            if result.timed_out() && !mask.matches(*state) {
                return None;
            }
        }
    }
}
