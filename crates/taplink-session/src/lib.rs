//! Session coordination for NFC tag reading and writing.
//!
//! This crate turns a platform reader (any [`NfcReader`] implementation)
//! into the unified command-and-event API applications consume:
//!
//! - [`SessionMachine`]: the idle / scanning / write-pending state
//!   machine, with the pending URL held inside the write-pending state.
//! - [`NfcService`]: the single-task actor that owns the reader and
//!   the machine, applies commands, processes tag encounters, and emits
//!   the three contract events.
//! - [`NfcHandle`] / [`EventStream`]: the caller-facing halves,
//!   asynchronous commands that never fail operationally and the event
//!   stream where all outcomes (including failures) arrive.
//!
//! # Examples
//!
//! ```
//! use taplink_hardware::mock::{MockReader, MockTag};
//! use taplink_session::NfcService;
//!
//! #[tokio::main]
//! async fn main() -> taplink_core::Result<()> {
//!     let (reader, platform) = MockReader::new();
//!     let (service, nfc, mut events) = NfcService::new(reader);
//!     tokio::spawn(service.run());
//!
//!     nfc.start_nfc_scan().await?;
//!     platform
//!         .present_tag(MockTag::readable([0x04, 0xA1], "hello"))
//!         .await
//!         .ok();
//!
//!     let event = events.recv().await.unwrap();
//!     assert_eq!(event.name(), "onNfcTagDiscovered");
//!     Ok(())
//! }
//! ```

mod encounter;
pub mod service;
pub mod state_machine;

pub use service::{EventStream, NfcHandle, NfcService};
pub use state_machine::{SessionMachine, SessionMode, StateTransition};
