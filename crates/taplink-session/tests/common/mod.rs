//! Common test utilities for session integration tests.
//!
//! [`TestRig`] wires a session service to a scripted mock reader and
//! exposes the three caller-facing pieces: the command handle, the event
//! stream, and the platform-side mock handle. The assertion helpers keep
//! event checks to one line per expectation.
//!
//! All tests run on the single-threaded test runtime, so command
//! acknowledgements are a reliable ordering fence: when a command future
//! resolves, the service has applied it and anything it tore down is
//! gone. For outcomes driven by platform signals (which the service
//! processes after queued commands), use [`TestRig::wait_for_mode`] to
//! let the service settle before asserting.

use taplink_core::{ErrorCode, NfcEvent};
use taplink_hardware::DiscoveryProfile;
use taplink_hardware::mock::{MockReader, MockReaderHandle};
use taplink_session::{EventStream, NfcHandle, NfcService, SessionMode};
use tokio::task::JoinHandle;

/// A session service running against a scripted mock reader.
pub struct TestRig {
    /// Command surface of the service under test.
    pub nfc: NfcHandle,

    /// Event stream of the service under test.
    pub events: EventStream,

    /// Platform-side control: presents tags, injects invalidations,
    /// changes availability, fails session setup.
    pub platform: MockReaderHandle,

    service: JoinHandle<()>,
}

impl TestRig {
    /// Spawn a service over a persistent-profile mock reader.
    pub fn new() -> Self {
        Self::with_profile(DiscoveryProfile::Persistent)
    }

    /// Spawn a service over a mock reader with the given profile.
    pub fn with_profile(profile: DiscoveryProfile) -> Self {
        let (reader, platform) = MockReader::with_profile(profile);
        let (service, nfc, events) = NfcService::new(reader);
        let service = tokio::spawn(service.run());

        Self {
            nfc,
            events,
            platform,
            service,
        }
    }

    /// Await the next event, panicking if the service has stopped.
    pub async fn next_event(&mut self) -> NfcEvent {
        self.events.recv().await.expect("event stream closed")
    }

    /// Assert that no event is buffered right now.
    ///
    /// Only meaningful once the service has settled; quiesce first with
    /// a command acknowledgement or [`wait_for_mode`](Self::wait_for_mode).
    pub fn assert_no_event(&mut self) {
        if let Some(event) = self.events.try_recv() {
            panic!("expected no event, got {event:?}");
        }
    }

    /// Poll the session mode until it reaches `mode`, yielding between
    /// queries so the service can drain queued platform signals.
    ///
    /// # Panics
    ///
    /// Panics if the service does not settle within a bounded number of
    /// scheduler turns.
    pub async fn wait_for_mode(&self, mode: SessionMode) {
        for _ in 0..64 {
            if self.nfc.session_mode().await.expect("service stopped") == mode {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("service never reached mode {mode:?}");
    }

    /// Poll the mock's begin log until it has `count` entries.
    ///
    /// Used to observe re-arming, which the service performs after
    /// emitting the read event.
    ///
    /// # Panics
    ///
    /// Panics if the log does not reach `count` entries within a bounded
    /// number of scheduler turns.
    pub async fn wait_for_begins(&self, count: usize) {
        for _ in 0..64 {
            if self.platform.begins().len() >= count {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!(
            "begin log never reached {count} entries: {:?}",
            self.platform.begins()
        );
    }

    /// Drop the command handle and wait for the service task to finish.
    pub async fn shutdown(self) {
        drop(self.nfc);
        self.service.await.expect("service task panicked");
    }
}

/// Assert a `TagDiscovered` event with the expected id and payload.
pub fn assert_discovered(event: &NfcEvent, expected_id: &str, expected_data: Option<&str>) {
    match event {
        NfcEvent::TagDiscovered { id, data, .. } => {
            assert_eq!(id, expected_id, "discovered: tag id mismatch");
            assert_eq!(
                data.as_deref(),
                expected_data,
                "discovered: payload mismatch"
            );
        }
        other => panic!("expected TagDiscovered, got {other:?}"),
    }
}

/// Assert a `TagWritten` event with the expected id and URL.
pub fn assert_written(event: &NfcEvent, expected_id: &str, expected_url: &str) {
    match event {
        NfcEvent::TagWritten { id, url } => {
            assert_eq!(id, expected_id, "written: tag id mismatch");
            assert_eq!(url, expected_url, "written: url mismatch");
        }
        other => panic!("expected TagWritten, got {other:?}"),
    }
}

/// Assert an `Error` event carrying the expected code.
pub fn assert_error(event: &NfcEvent, expected_code: ErrorCode) {
    match event {
        NfcEvent::Error { code, message } => {
            assert_eq!(*code, expected_code, "error: code mismatch ({message})");
        }
        other => panic!("expected Error({expected_code}), got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_discovered() {
        let event = NfcEvent::TagDiscovered {
            id: "04a1".to_string(),
            tech_types: vec!["Ndef".to_string()],
            data: Some("hello".to_string()),
        };
        assert_discovered(&event, "04a1", Some("hello"));
    }

    #[test]
    fn test_assert_error() {
        let event = NfcEvent::error(ErrorCode::ScanFailed, "boom");
        assert_error(&event, ErrorCode::ScanFailed);
    }

    #[test]
    #[should_panic(expected = "expected TagWritten")]
    fn test_assert_written_rejects_other_events() {
        let event = NfcEvent::error(ErrorCode::WriteError, "boom");
        assert_written(&event, "04a1", "https://example.com");
    }
}
