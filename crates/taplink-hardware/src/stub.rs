//! Fallback reader for platforms without a usable NFC stack.
//!
//! The stub never delivers tags and reports itself unavailable, so every
//! command against it resolves through the normal availability gate
//! (`web_unsupported` or `ios_version` error events) without any
//! platform-specific branching in the session layer.

use crate::error::{ReaderError, Result};
use crate::traits::{NdefTag, NfcReader};
use crate::types::{Availability, DiscoveryProfile, SessionIntent, SessionSignal};
use taplink_core::{NdefMessage, TagCapability};

/// A reader for platforms where NFC is not supported.
#[derive(Debug, Clone)]
pub struct StubReader {
    availability: Availability,
}

impl StubReader {
    /// A stub reporting [`Availability::UnsupportedPlatform`].
    pub fn new() -> Self {
        Self {
            availability: Availability::UnsupportedPlatform,
        }
    }

    /// A stub reporting the given availability, for modeling devices
    /// that fail the capability gate in other ways (missing hardware,
    /// OS too old).
    pub fn with_availability(availability: Availability) -> Self {
        Self { availability }
    }
}

impl Default for StubReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Uninhabited tag type; the stub never delivers one.
#[derive(Debug)]
pub enum StubTag {}

impl NdefTag for StubTag {
    fn uid(&self) -> &[u8] {
        match *self {}
    }

    fn tech_types(&self) -> &[String] {
        match *self {}
    }

    fn capability(&self) -> TagCapability {
        match *self {}
    }

    async fn connect(&mut self) -> Result<()> {
        match *self {}
    }

    async fn read(&mut self) -> Result<Option<NdefMessage>> {
        match *self {}
    }

    async fn write(&mut self, _message: &NdefMessage) -> Result<()> {
        match *self {}
    }

    async fn format(&mut self, _message: &NdefMessage) -> Result<()> {
        match *self {}
    }

    async fn close(&mut self) {
        match *self {}
    }
}

impl NfcReader for StubReader {
    type Tag = StubTag;

    async fn availability(&self) -> Availability {
        self.availability
    }

    fn profile(&self) -> DiscoveryProfile {
        DiscoveryProfile::Persistent
    }

    async fn begin(&mut self, _intent: SessionIntent) -> Result<()> {
        Err(ReaderError::setup("NFC is not supported on this platform"))
    }

    async fn watch(&mut self) -> SessionSignal<StubTag> {
        std::future::pending().await
    }

    async fn end(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_reports_unsupported() {
        let reader = StubReader::new();
        assert_eq!(
            reader.availability().await,
            Availability::UnsupportedPlatform
        );
    }

    #[tokio::test]
    async fn test_stub_rejects_begin() {
        let mut reader = StubReader::new();
        assert!(reader.begin(SessionIntent::Read).await.is_err());
    }

    #[tokio::test]
    async fn test_stub_custom_availability() {
        let reader = StubReader::with_availability(Availability::UnsupportedOsVersion);
        assert_eq!(
            reader.availability().await,
            Availability::UnsupportedOsVersion
        );
    }
}
