//! Platform reader trait definitions.
//!
//! These traits are the seam between the session layer and a platform's
//! NFC stack. A platform adapter implements [`NfcReader`] over whatever
//! primitive the OS offers (foreground dispatch redelivery, a delegate
//! reader session, or a channel-fed mock) and [`NdefTag`] over the OS tag
//! handle; the session layer is written against the traits only.
//!
//! All traits use native `async fn` methods (Edition 2024 RPITIT); no
//! `async_trait` macro is needed.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use crate::types::{Availability, DiscoveryProfile, SessionIntent, SessionSignal};
use taplink_core::{NdefMessage, TagCapability};

/// One discovered tag, valid for the duration of a single encounter.
///
/// Capability is resolved once, before dispatch; the session layer never
/// probes technologies itself. Implementations must make [`close`]
/// releasable on every path: it is called after success and after any
/// failed operation alike.
///
/// [`close`]: NdefTag::close
pub trait NdefTag: Send {
    /// Raw identifier bytes of the tag.
    fn uid(&self) -> &[u8];

    /// Tag technologies as the platform names them.
    fn tech_types(&self) -> &[String];

    /// What this tag supports, resolved once per encounter.
    fn capability(&self) -> TagCapability;

    /// Open a connection to the tag.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag left the field or the platform
    /// refuses the connection.
    async fn connect(&mut self) -> Result<()>;

    /// Read the tag's current NDEF message, if it has one.
    ///
    /// Requires a prior successful [`connect`](NdefTag::connect).
    ///
    /// # Errors
    ///
    /// Returns an error on transceive failure or if the tag is not
    /// connected.
    async fn read(&mut self) -> Result<Option<NdefMessage>>;

    /// Overwrite the tag's NDEF message.
    ///
    /// Requires a prior successful [`connect`](NdefTag::connect) and
    /// [`TagCapability::Readable`].
    ///
    /// # Errors
    ///
    /// Returns an error if the tag is read-only, too small, not
    /// connected, or left the field.
    async fn write(&mut self, message: &NdefMessage) -> Result<()>;

    /// Format an unformatted tag with an initial NDEF message.
    ///
    /// Requires a prior successful [`connect`](NdefTag::connect) and
    /// [`TagCapability::Formatable`].
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the format operation.
    async fn format(&mut self, message: &NdefMessage) -> Result<()>;

    /// Release the connection. Safe to call whether or not a connection
    /// was established; never fails.
    async fn close(&mut self);
}

/// A platform NFC discovery mechanism.
///
/// # Session discipline
///
/// At most one discovery session exists per reader at any time.
/// [`begin`](NfcReader::begin) must invalidate any prior session before
/// arming the new one, and [`end`](NfcReader::end) must be idempotent and
/// discard encounters that were delivered but not yet consumed.
///
/// # Cancellation
///
/// The future returned by [`watch`](NfcReader::watch) must be
/// cancellation-safe: the session layer drops it whenever a command
/// arrives and polls a fresh one afterwards. No delivery may be lost to
/// a dropped `watch` future.
///
/// # Object Safety and Dynamic Dispatch
///
/// Like the rest of this crate's traits, `NfcReader` uses `async fn`
/// methods and is therefore not object-safe. Use generic type
/// parameters:
///
/// ```no_run
/// use taplink_hardware::{Availability, NfcReader};
///
/// async fn radio_on<R: NfcReader>(reader: &R) -> bool {
///     reader.availability().await == Availability::Available
/// }
/// ```
pub trait NfcReader: Send {
    /// The tag handle type this reader delivers.
    type Tag: NdefTag;

    /// Whether NFC sessions can be established right now. Pure query,
    /// no state change.
    async fn availability(&self) -> Availability;

    /// How this platform's discovery primitive behaves across
    /// deliveries. Constant per reader.
    fn profile(&self) -> DiscoveryProfile;

    /// Arm discovery for the given intent, invalidating any prior
    /// session first.
    ///
    /// # Errors
    ///
    /// Returns [`ReaderError::NoForeground`](crate::ReaderError) when no
    /// foreground context can host the session, or a setup error when
    /// the platform rejects the arming.
    async fn begin(&mut self, intent: SessionIntent) -> Result<()>;

    /// Await the next delivery from the armed session: a tag encounter
    /// or a platform-side invalidation. The wait is unbounded; only
    /// cancellation or [`end`](NfcReader::end) stops it.
    async fn watch(&mut self) -> SessionSignal<Self::Tag>;

    /// Tear down the session. Idempotent; a no-op when nothing is
    /// armed. Pending undelivered encounters are discarded.
    async fn end(&mut self);
}
