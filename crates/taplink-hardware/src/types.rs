//! Common types shared across platform reader implementations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether the platform can run NFC sessions right now.
///
/// Some platforms can only assert hardware capability and never report
/// `Disabled`; they answer `Available` or `HardwareMissing` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// Hardware present and the radio enabled.
    Available,

    /// Hardware present but the radio is disabled in settings.
    Disabled,

    /// No NFC hardware on this device.
    HardwareMissing,

    /// The OS version predates NFC reader support.
    UnsupportedOsVersion,

    /// The platform has no usable NFC stack at all.
    UnsupportedPlatform,
}

impl Availability {
    /// Whether a session could be established right now.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

/// How a platform's discovery primitive behaves across deliveries.
///
/// The session layer normalizes both shapes to the same contract: on
/// `OneShot` platforms it re-arms discovery after every read terminal
/// event; on `Persistent` platforms it explicitly ends the session when
/// the contract calls for one-shot behavior (writes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryProfile {
    /// A session survives any number of tag deliveries until invalidated
    /// (delegate-callback platforms).
    Persistent,

    /// Each arming yields at most one delivery, then discovery must be
    /// re-armed (dispatch-intent platforms).
    OneShot,
}

/// What a discovery session is being armed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionIntent {
    /// Discover tags to read them.
    Read,

    /// Discover a tag to write the pending URL to it.
    Write,
}

impl fmt::Display for SessionIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("read"),
            Self::Write => f.write_str("write"),
        }
    }
}

/// Why a platform session ended on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invalidation {
    /// The user dismissed the platform NFC prompt. Expected termination;
    /// must not surface as an error event.
    pub user_initiated: bool,

    /// Platform-supplied description of the termination.
    pub reason: String,
}

impl Invalidation {
    /// An invalidation caused by the user dismissing the system prompt.
    pub fn user_cancelled() -> Self {
        Self {
            user_initiated: true,
            reason: "Session cancelled by user".to_string(),
        }
    }

    /// A faulted invalidation with a platform-supplied reason.
    pub fn faulted(reason: impl Into<String>) -> Self {
        Self {
            user_initiated: false,
            reason: reason.into(),
        }
    }
}

/// What a live discovery session delivered.
#[derive(Debug)]
pub enum SessionSignal<T> {
    /// A tag entered the field.
    Encounter(T),

    /// The platform tore the session down.
    Invalidated(Invalidation),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability() {
        assert!(Availability::Available.is_available());
        assert!(!Availability::Disabled.is_available());
        assert!(!Availability::HardwareMissing.is_available());
        assert!(!Availability::UnsupportedOsVersion.is_available());
        assert!(!Availability::UnsupportedPlatform.is_available());
    }

    #[test]
    fn test_invalidation_constructors() {
        let user = Invalidation::user_cancelled();
        assert!(user.user_initiated);

        let faulted = Invalidation::faulted("radio turned off");
        assert!(!faulted.user_initiated);
        assert_eq!(faulted.reason, "radio turned off");
    }

    #[test]
    fn test_session_intent_display() {
        assert_eq!(SessionIntent::Read.to_string(), "read");
        assert_eq!(SessionIntent::Write.to_string(), "write");
    }
}
