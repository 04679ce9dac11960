//! Shared contract types for the taplink NFC session layer.
//!
//! This crate is the single source of truth every platform adapter must
//! produce against: the three-event contract with its stable error codes,
//! the tag identifier rendering rule, and the minimal NDEF message model
//! the adapters exchange with the platform NFC stack.

pub mod error;
pub mod events;
pub mod ndef;
pub mod tag;

pub use error::{Error, Result};
pub use events::{ErrorCode, NfcEvent};
pub use ndef::{NdefMessage, NdefRecord, TypeNameFormat};
pub use tag::{TagCapability, tag_id_hex};

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
