//! Session state machine for NFC read/write coordination.
//!
//! This module provides the state machine governing the lifetime of NFC
//! sessions: idle, scanning for tags to read, or armed to write a pending
//! URL to the next tag. Scanning and write-pending are mutually
//! exclusive; the service layer tears one down before arming the other.
//!
//! # States
//!
//! - `Idle`: no session; waiting for a command
//! - `Scanning`: a read session is live; stays live across taps
//! - `WritePending`: a write session is armed and carries the URL to
//!   write; consumed by exactly one tag encounter
//!
//! # Valid Transitions
//!
//! - Idle → Scanning (`begin_scan`) → Idle (`reset`)
//! - Idle → WritePending (`arm_write`) → Idle (`reset` /
//!   `take_write_intent`)
//!
//! The pending URL lives inside the `WritePending` variant, so the
//! invariant "a URL is pending if and only if the machine is in
//! `WritePending`" holds by construction and cannot be violated by a
//! partial update.
//!
//! # Examples
//!
//! ```
//! use taplink_session::{SessionMachine, SessionMode};
//!
//! let mut machine = SessionMachine::new();
//! assert_eq!(machine.mode(), SessionMode::Idle);
//!
//! machine.arm_write("https://example.com".to_string()).unwrap();
//! assert_eq!(machine.mode(), SessionMode::WritePending);
//!
//! // The write intent is consumed exactly once.
//! assert_eq!(
//!     machine.take_write_intent(),
//!     Some("https://example.com".to_string())
//! );
//! assert_eq!(machine.take_write_intent(), None);
//! assert_eq!(machine.mode(), SessionMode::Idle);
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use taplink_core::{Error, Result};

/// Maximum number of state transitions to keep in history.
///
/// A full command cycle is at most two transitions, so 32 entries cover
/// roughly sixteen recent sessions, enough to reconstruct how the
/// machine got wedged without unbounded growth.
const MAX_HISTORY_SIZE: usize = 32;

/// Discriminant-only view of the session state.
///
/// Used for queries, events, and transition records; the owning
/// [`SessionMachine`] keeps the pending URL inside the full state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// No session active.
    Idle,

    /// A read session is live.
    Scanning,

    /// A write session is armed with a pending URL.
    WritePending,
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionMode::Idle => "Idle",
            SessionMode::Scanning => "Scanning",
            SessionMode::WritePending => "WritePending",
        };
        f.write_str(s)
    }
}

impl SessionMode {
    /// Check if transition to target mode is valid from this mode.
    ///
    /// Scanning and WritePending never transition into each other
    /// directly; the session layer must pass through Idle (tearing the
    /// prior session down) in between.
    ///
    /// # Examples
    ///
    /// ```
    /// use taplink_session::SessionMode;
    ///
    /// assert!(SessionMode::Idle.can_transition_to(SessionMode::Scanning));
    /// assert!(!SessionMode::Scanning.can_transition_to(SessionMode::WritePending));
    /// ```
    pub fn can_transition_to(&self, target: SessionMode) -> bool {
        matches!(
            (self, target),
            (SessionMode::Idle, SessionMode::Scanning)
                | (SessionMode::Idle, SessionMode::WritePending)
                | (SessionMode::Scanning, SessionMode::Idle)
                | (SessionMode::WritePending, SessionMode::Idle)
        )
    }
}

/// Full session state; the pending URL is carried by the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionState {
    Idle,
    Scanning,
    WritePending { url: String },
}

impl SessionState {
    fn mode(&self) -> SessionMode {
        match self {
            SessionState::Idle => SessionMode::Idle,
            SessionState::Scanning => SessionMode::Scanning,
            SessionState::WritePending { .. } => SessionMode::WritePending,
        }
    }
}

/// A single recorded mode transition.
#[derive(Debug, Clone)]
pub struct StateTransition {
    /// The mode transitioned from.
    pub from: SessionMode,

    /// The mode transitioned to.
    pub to: SessionMode,

    /// When the transition occurred.
    pub timestamp: Instant,
}

impl StateTransition {
    fn new(from: SessionMode, to: SessionMode) -> Self {
        Self {
            from,
            to,
            timestamp: Instant::now(),
        }
    }

    /// Duration since this transition occurred.
    pub fn elapsed(&self) -> Duration {
        self.timestamp.elapsed()
    }
}

/// State machine governing NFC session lifetimes.
///
/// Not thread-safe by design; the session service owns one and mutates
/// it from a single task.
#[derive(Debug)]
pub struct SessionMachine {
    state: SessionState,
    entered_at: Instant,
    history: VecDeque<StateTransition>,
}

impl SessionMachine {
    /// Create a new machine in the Idle state.
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            entered_at: Instant::now(),
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    /// Current mode.
    pub fn mode(&self) -> SessionMode {
        self.state.mode()
    }

    /// The pending write URL, present exactly when
    /// [`mode`](Self::mode) is [`SessionMode::WritePending`].
    pub fn pending_url(&self) -> Option<&str> {
        match &self.state {
            SessionState::WritePending { url } => Some(url),
            _ => None,
        }
    }

    /// Time elapsed in the current state.
    pub fn time_in_current_state(&self) -> Duration {
        self.entered_at.elapsed()
    }

    /// Recorded transitions, oldest first.
    pub fn history(&self) -> &VecDeque<StateTransition> {
        &self.history
    }

    /// Enter Scanning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStateTransition`] unless the machine is
    /// Idle; callers tear down any prior session (via
    /// [`reset`](Self::reset)) first.
    pub fn begin_scan(&mut self) -> Result<()> {
        self.transition(SessionState::Scanning)
    }

    /// Enter WritePending carrying the URL to write.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStateTransition`] unless the machine is
    /// Idle.
    pub fn arm_write(&mut self, url: String) -> Result<()> {
        self.transition(SessionState::WritePending { url })
    }

    /// Return to Idle from any state, discarding an armed write intent.
    ///
    /// Idempotent: resetting an Idle machine records nothing and
    /// returns `None`. Otherwise returns the discarded pending URL, if
    /// one was armed.
    pub fn reset(&mut self) -> Option<String> {
        if self.state == SessionState::Idle {
            return None;
        }

        let from = self.state.mode();
        let discarded = match std::mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::WritePending { url } => Some(url),
            _ => None,
        };
        self.record(from, SessionMode::Idle);
        discarded
    }

    /// Consume the write intent: WritePending → Idle, yielding the URL.
    ///
    /// Returns `None` in any other state. This is the only way the URL
    /// leaves the machine for a write attempt, so intent is consumed at
    /// most once regardless of outcome.
    pub fn take_write_intent(&mut self) -> Option<String> {
        if matches!(self.state, SessionState::WritePending { .. }) {
            self.reset()
        } else {
            None
        }
    }

    fn transition(&mut self, target: SessionState) -> Result<()> {
        let from = self.state.mode();
        let to = target.mode();

        if !from.can_transition_to(to) {
            return Err(Error::InvalidStateTransition {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        self.state = target;
        self.record(from, to);
        Ok(())
    }

    fn record(&mut self, from: SessionMode, to: SessionMode) {
        if self.history.len() == MAX_HISTORY_SIZE {
            self.history.pop_front();
        }
        self.history.push_back(StateTransition::new(from, to));
        self.entered_at = Instant::now();
    }
}

impl Default for SessionMachine {
    fn default() -> Self {
        Self::new()
    }
}
