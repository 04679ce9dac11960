//! Mock NFC reader and tags for testing and development.
//!
//! [`MockReader`] simulates a platform NFC stack without hardware: the
//! paired [`MockReaderHandle`] presents scripted tags, injects session
//! invalidations, and controls availability, while the reader side is
//! driven by the session layer exactly like a real platform adapter.
//!
//! # Examples
//!
//! ```
//! use taplink_hardware::mock::{MockReader, MockTag};
//! use taplink_hardware::{NdefTag, NfcReader, SessionIntent, SessionSignal};
//!
//! #[tokio::main]
//! async fn main() -> taplink_hardware::Result<()> {
//!     let (mut reader, handle) = MockReader::new();
//!
//!     reader.begin(SessionIntent::Read).await?;
//!     handle.present_tag(MockTag::readable([0x04, 0xA1], "hello")).await?;
//!
//!     match reader.watch().await {
//!         SessionSignal::Encounter(tag) => assert_eq!(tag.uid(), &[0x04, 0xA1]),
//!         SessionSignal::Invalidated(_) => unreachable!(),
//!     }
//!
//!     Ok(())
//! }
//! ```

use crate::error::{ReaderError, Result};
use crate::traits::{NdefTag, NfcReader};
use crate::types::{Availability, DiscoveryProfile, Invalidation, SessionIntent, SessionSignal};
use std::sync::{Arc, Mutex, MutexGuard};
use taplink_core::ndef::{NdefRecord, TypeNameFormat};
use taplink_core::{NdefMessage, TagCapability};
use tokio::sync::mpsc;

/// Lock a mutex, tolerating poisoning from a panicked test task.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// State shared between a [`MockReader`] and its handle.
#[derive(Debug)]
struct MockShared {
    availability: Availability,
    fail_next_begin: Option<ReaderError>,
    begins: Vec<SessionIntent>,
}

/// Mock NFC reader driven through a [`MockReaderHandle`].
#[derive(Debug)]
pub struct MockReader {
    signals: mpsc::Receiver<SessionSignal<MockTag>>,
    shared: Arc<Mutex<MockShared>>,
    profile: DiscoveryProfile,
    armed: bool,
}

impl MockReader {
    /// Create a persistent-profile mock reader and its control handle.
    pub fn new() -> (Self, MockReaderHandle) {
        Self::with_profile(DiscoveryProfile::Persistent)
    }

    /// Create a mock reader with the given discovery profile.
    ///
    /// A `OneShot` reader models dispatch-intent platforms: the session
    /// layer is expected to re-arm it after every read terminal event.
    pub fn with_profile(profile: DiscoveryProfile) -> (Self, MockReaderHandle) {
        let (signal_tx, signal_rx) = mpsc::channel(32);
        let shared = Arc::new(Mutex::new(MockShared {
            availability: Availability::Available,
            fail_next_begin: None,
            begins: Vec::new(),
        }));

        let reader = Self {
            signals: signal_rx,
            shared: Arc::clone(&shared),
            profile,
            armed: false,
        };

        let handle = MockReaderHandle { signal_tx, shared };

        (reader, handle)
    }

    fn drain(&mut self) {
        while self.signals.try_recv().is_ok() {}
    }
}

impl NfcReader for MockReader {
    type Tag = MockTag;

    async fn availability(&self) -> Availability {
        lock(&self.shared).availability
    }

    fn profile(&self) -> DiscoveryProfile {
        self.profile
    }

    async fn begin(&mut self, intent: SessionIntent) -> Result<()> {
        if let Some(error) = lock(&self.shared).fail_next_begin.take() {
            return Err(error);
        }

        // A new session replaces any prior one; stale deliveries die
        // with the session they belonged to.
        self.drain();
        self.armed = true;
        lock(&self.shared).begins.push(intent);
        Ok(())
    }

    async fn watch(&mut self) -> SessionSignal<MockTag> {
        if !self.armed {
            // No session; nothing will ever be delivered.
            return std::future::pending().await;
        }

        match self.signals.recv().await {
            Some(signal) => signal,
            None => SessionSignal::Invalidated(Invalidation::faulted("mock reader handle dropped")),
        }
    }

    async fn end(&mut self) {
        self.armed = false;
        self.drain();
    }
}

/// Handle for scripting a [`MockReader`].
///
/// Cloneable; all clones control the same reader.
#[derive(Debug, Clone)]
pub struct MockReaderHandle {
    signal_tx: mpsc::Sender<SessionSignal<MockTag>>,
    shared: Arc<Mutex<MockShared>>,
}

impl MockReaderHandle {
    /// Present a tag to the reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader has been dropped.
    pub async fn present_tag(&self, tag: MockTag) -> Result<()> {
        self.signal_tx
            .send(SessionSignal::Encounter(tag))
            .await
            .map_err(|_| ReaderError::setup("mock reader dropped"))
    }

    /// Simulate the user dismissing the platform NFC prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader has been dropped.
    pub async fn cancel_from_user(&self) -> Result<()> {
        self.signal_tx
            .send(SessionSignal::Invalidated(Invalidation::user_cancelled()))
            .await
            .map_err(|_| ReaderError::setup("mock reader dropped"))
    }

    /// Simulate a faulted session invalidation with the given reason.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader has been dropped.
    pub async fn invalidate(&self, reason: impl Into<String>) -> Result<()> {
        self.signal_tx
            .send(SessionSignal::Invalidated(Invalidation::faulted(reason)))
            .await
            .map_err(|_| ReaderError::setup("mock reader dropped"))
    }

    /// Change what the reader reports for availability.
    pub fn set_availability(&self, availability: Availability) {
        lock(&self.shared).availability = availability;
    }

    /// Make the next `begin` call fail with the given error.
    pub fn fail_next_begin(&self, error: ReaderError) {
        lock(&self.shared).fail_next_begin = Some(error);
    }

    /// Every intent the reader has been armed with, in order.
    pub fn begins(&self) -> Vec<SessionIntent> {
        lock(&self.shared).begins.clone()
    }
}

/// Observer for the message a [`MockTag`] received via write or format.
#[derive(Debug, Clone, Default)]
pub struct WrittenSlot(Arc<Mutex<Option<NdefMessage>>>);

impl WrittenSlot {
    /// The message written to the tag, if any.
    pub fn message(&self) -> Option<NdefMessage> {
        lock(&self.0).clone()
    }

    /// Whether anything has been written to the tag.
    pub fn is_written(&self) -> bool {
        lock(&self.0).is_some()
    }
}

/// A scripted tag for presenting to a [`MockReader`].
#[derive(Debug)]
pub struct MockTag {
    uid: Vec<u8>,
    tech_types: Vec<String>,
    capability: TagCapability,
    message: Option<NdefMessage>,
    written: WrittenSlot,
    connected: bool,
    fail_connect: Option<String>,
    fail_read: Option<String>,
    fail_write: Option<String>,
    fail_format: Option<String>,
}

impl MockTag {
    fn base(uid: impl Into<Vec<u8>>, capability: TagCapability, tech: &str) -> Self {
        Self {
            uid: uid.into(),
            tech_types: vec![tech.to_string()],
            capability,
            message: None,
            written: WrittenSlot::default(),
            connected: false,
            fail_connect: None,
            fail_read: None,
            fail_write: None,
            fail_format: None,
        }
    }

    /// An NDEF tag whose first record's payload is the given text.
    pub fn readable(uid: impl Into<Vec<u8>>, text: &str) -> Self {
        let record = NdefRecord {
            tnf: TypeNameFormat::MimeMedia,
            record_type: b"text/plain".to_vec(),
            id: Vec::new(),
            payload: text.as_bytes().to_vec(),
        };
        let mut tag = Self::base(uid, TagCapability::Readable, "Ndef");
        tag.message = Some(NdefMessage::single(record));
        tag
    }

    /// An NDEF tag carrying the given message.
    pub fn with_message(uid: impl Into<Vec<u8>>, message: NdefMessage) -> Self {
        let mut tag = Self::base(uid, TagCapability::Readable, "Ndef");
        tag.message = Some(message);
        tag
    }

    /// A formatted tag with no NDEF message on it.
    pub fn empty(uid: impl Into<Vec<u8>>) -> Self {
        Self::base(uid, TagCapability::Readable, "Ndef")
    }

    /// An unformatted but formatable tag.
    pub fn blank(uid: impl Into<Vec<u8>>) -> Self {
        Self::base(uid, TagCapability::Formatable, "NdefFormatable")
    }

    /// A tag supporting neither NDEF read nor format.
    pub fn unsupported(uid: impl Into<Vec<u8>>) -> Self {
        Self::base(uid, TagCapability::Unsupported, "Unknown")
    }

    /// Override the reported tag technologies.
    pub fn with_tech_types(mut self, tech_types: Vec<String>) -> Self {
        self.tech_types = tech_types;
        self
    }

    /// Make `connect` fail with the given message.
    pub fn with_connect_failure(mut self, message: impl Into<String>) -> Self {
        self.fail_connect = Some(message.into());
        self
    }

    /// Make `read` fail with the given message.
    pub fn with_read_failure(mut self, message: impl Into<String>) -> Self {
        self.fail_read = Some(message.into());
        self
    }

    /// Make `write` fail with the given message.
    pub fn with_write_failure(mut self, message: impl Into<String>) -> Self {
        self.fail_write = Some(message.into());
        self
    }

    /// Make `format` fail with the given message.
    pub fn with_format_failure(mut self, message: impl Into<String>) -> Self {
        self.fail_format = Some(message.into());
        self
    }

    /// Observer for whatever gets written to this tag.
    pub fn written(&self) -> WrittenSlot {
        self.written.clone()
    }
}

impl NdefTag for MockTag {
    fn uid(&self) -> &[u8] {
        &self.uid
    }

    fn tech_types(&self) -> &[String] {
        &self.tech_types
    }

    fn capability(&self) -> TagCapability {
        self.capability
    }

    async fn connect(&mut self) -> Result<()> {
        if let Some(message) = &self.fail_connect {
            return Err(ReaderError::connect(message.clone()));
        }
        self.connected = true;
        Ok(())
    }

    async fn read(&mut self) -> Result<Option<NdefMessage>> {
        if !self.connected {
            return Err(ReaderError::read("tag not connected"));
        }
        if let Some(message) = &self.fail_read {
            return Err(ReaderError::read(message.clone()));
        }
        Ok(self.message.clone())
    }

    async fn write(&mut self, message: &NdefMessage) -> Result<()> {
        if !self.connected {
            return Err(ReaderError::write("tag not connected"));
        }
        if self.capability != TagCapability::Readable {
            return Err(ReaderError::write("tag does not support NDEF write"));
        }
        if let Some(reason) = &self.fail_write {
            return Err(ReaderError::write(reason.clone()));
        }
        self.message = Some(message.clone());
        *lock(&self.written.0) = Some(message.clone());
        Ok(())
    }

    async fn format(&mut self, message: &NdefMessage) -> Result<()> {
        if !self.connected {
            return Err(ReaderError::format("tag not connected"));
        }
        if self.capability != TagCapability::Formatable {
            return Err(ReaderError::format("tag is already formatted"));
        }
        if let Some(reason) = &self.fail_format {
            return Err(ReaderError::format(reason.clone()));
        }
        self.capability = TagCapability::Readable;
        self.message = Some(message.clone());
        *lock(&self.written.0) = Some(message.clone());
        Ok(())
    }

    async fn close(&mut self) {
        self.connected = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_present_and_watch() {
        let (mut reader, handle) = MockReader::new();

        reader.begin(SessionIntent::Read).await.unwrap();
        handle
            .present_tag(MockTag::readable([0x04, 0xA1], "hello"))
            .await
            .unwrap();

        match reader.watch().await {
            SessionSignal::Encounter(mut tag) => {
                assert_eq!(tag.uid(), &[0x04, 0xA1]);
                assert_eq!(tag.capability(), TagCapability::Readable);

                tag.connect().await.unwrap();
                let message = tag.read().await.unwrap().unwrap();
                assert_eq!(message.first_record().unwrap().text(), "hello");
                tag.close().await;
            }
            SessionSignal::Invalidated(_) => panic!("expected encounter"),
        }
    }

    #[tokio::test]
    async fn test_begin_records_intents() {
        let (mut reader, handle) = MockReader::new();

        reader.begin(SessionIntent::Read).await.unwrap();
        reader.begin(SessionIntent::Write).await.unwrap();

        assert_eq!(
            handle.begins(),
            vec![SessionIntent::Read, SessionIntent::Write]
        );
    }

    #[tokio::test]
    async fn test_fail_next_begin() {
        let (mut reader, handle) = MockReader::new();

        handle.fail_next_begin(ReaderError::no_foreground("no activity"));
        let error = reader.begin(SessionIntent::Read).await.unwrap_err();
        assert!(matches!(error, ReaderError::NoForeground { .. }));

        // Only the next call fails.
        reader.begin(SessionIntent::Read).await.unwrap();
    }

    #[tokio::test]
    async fn test_end_discards_pending_encounters() {
        let (mut reader, handle) = MockReader::new();

        reader.begin(SessionIntent::Read).await.unwrap();
        handle
            .present_tag(MockTag::readable([0x01], "stale"))
            .await
            .unwrap();
        reader.end().await;

        reader.begin(SessionIntent::Read).await.unwrap();
        handle
            .present_tag(MockTag::readable([0x02], "fresh"))
            .await
            .unwrap();

        match reader.watch().await {
            SessionSignal::Encounter(tag) => assert_eq!(tag.uid(), &[0x02]),
            SessionSignal::Invalidated(_) => panic!("expected encounter"),
        }
    }

    #[tokio::test]
    async fn test_availability_control() {
        let (reader, handle) = MockReader::new();

        assert_eq!(reader.availability().await, Availability::Available);

        handle.set_availability(Availability::Disabled);
        assert_eq!(reader.availability().await, Availability::Disabled);
    }

    #[tokio::test]
    async fn test_user_cancellation_signal() {
        let (mut reader, handle) = MockReader::new();

        reader.begin(SessionIntent::Read).await.unwrap();
        handle.cancel_from_user().await.unwrap();

        match reader.watch().await {
            SessionSignal::Invalidated(invalidation) => assert!(invalidation.user_initiated),
            SessionSignal::Encounter(_) => panic!("expected invalidation"),
        }
    }

    #[tokio::test]
    async fn test_format_captures_message() {
        let mut tag = MockTag::blank([0x0A, 0x0B]);
        let written = tag.written();

        tag.connect().await.unwrap();
        tag.format(&NdefMessage::uri("https://example.com"))
            .await
            .unwrap();
        tag.close().await;

        let message = written.message().unwrap();
        assert_eq!(
            message.first_record().unwrap().uri_string().unwrap(),
            "https://example.com"
        );
    }

    #[tokio::test]
    async fn test_write_requires_connection() {
        let mut tag = MockTag::empty([0x0A]);
        let error = tag
            .write(&NdefMessage::uri("https://example.com"))
            .await
            .unwrap_err();
        assert!(matches!(error, ReaderError::Write { .. }));
    }

    #[tokio::test]
    async fn test_blank_tag_rejects_direct_write() {
        let mut tag = MockTag::blank([0x0A]);
        tag.connect().await.unwrap();
        let error = tag
            .write(&NdefMessage::uri("https://example.com"))
            .await
            .unwrap_err();
        assert!(matches!(error, ReaderError::Write { .. }));
    }
}
