//! Platform reader abstraction for the taplink NFC session layer.
//!
//! This crate defines the seam between the session coordination layer and
//! a platform's NFC stack: the [`NfcReader`] discovery trait, the
//! [`NdefTag`] per-encounter tag trait, and the plain types they exchange
//! ([`Availability`], [`DiscoveryProfile`], [`SessionSignal`]).
//!
//! Two implementations ship with the crate:
//!
//! - [`mock::MockReader`]: a channel-driven test double whose handle
//!   presents scripted tags and injects platform behavior (availability
//!   changes, setup failures, session invalidations). This is how the
//!   session layer is developed and tested without hardware.
//! - [`stub::StubReader`]: the always-unavailable fallback for
//!   platforms without an NFC stack.
//!
//! Real platform adapters (foreground-dispatch or delegate-session based)
//! implement the same two traits; the session layer never sees the
//! difference beyond the reader's [`DiscoveryProfile`].
//!
//! # Thread Safety
//!
//! Readers require `Send` so the session service can own them inside a
//! spawned task. Trait methods are native `async fn` (Edition 2024
//! RPITIT); use generic type parameters rather than trait objects.

pub mod error;
pub mod mock;
pub mod stub;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{ReaderError, Result};
pub use stub::StubReader;
pub use traits::{NdefTag, NfcReader};
pub use types::{Availability, DiscoveryProfile, Invalidation, SessionIntent, SessionSignal};
