//! The event contract shared by every platform adapter.
//!
//! Three events cover every outcome a tag session can produce: a tag was
//! read, a tag was written, or something went wrong. Each physical tag
//! encounter yields exactly one of them; `Error` may additionally be
//! emitted for session-level failures with no associated tag.
//!
//! Payload field names and error code strings are the wire contract.
//! Adapters must not invent new codes or reshape payloads; consumers key
//! off these exact strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable error codes carried by [`NfcEvent::Error`].
///
/// Codes serialize to the snake_case strings consumers match on. The set
/// is closed: every failure an adapter can encounter maps onto one of
/// these.
///
/// # Examples
///
/// ```
/// use taplink_core::ErrorCode;
///
/// assert_eq!(ErrorCode::Unavailable.as_str(), "nfc_unavailable");
/// assert_eq!(ErrorCode::OsVersion.as_str(), "ios_version");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// NFC hardware is not present on this device.
    #[serde(rename = "nfc_unavailable")]
    Unavailable,

    /// NFC hardware exists but the radio is disabled in settings.
    #[serde(rename = "nfc_disabled")]
    Disabled,

    /// No foreground execution context is available to host a session.
    #[serde(rename = "no_activity")]
    NoActivity,

    /// Establishing the read session failed.
    #[serde(rename = "scan_failed")]
    ScanFailed,

    /// Establishing the write session failed.
    #[serde(rename = "write_setup_failed")]
    WriteSetupFailed,

    /// Connecting to or reading a specific tag failed.
    #[serde(rename = "read_error")]
    ReadError,

    /// Writing an NDEF message to a specific tag failed.
    #[serde(rename = "write_error")]
    WriteError,

    /// Formatting an unformatted tag failed.
    #[serde(rename = "format_error")]
    FormatError,

    /// The tag supports neither NDEF read nor NDEF format.
    #[serde(rename = "unsupported_tag")]
    UnsupportedTag,

    /// The platform tore down the session for a reason other than user
    /// cancellation.
    #[serde(rename = "session_invalidated")]
    SessionInvalidated,

    /// The URL handed to the write command did not parse.
    #[serde(rename = "invalid_url")]
    InvalidUrl,

    /// The OS version predates NFC reader support.
    #[serde(rename = "ios_version")]
    OsVersion,

    /// The platform has no usable NFC stack at all.
    #[serde(rename = "web_unsupported")]
    PlatformUnsupported,
}

impl ErrorCode {
    /// The stable wire string for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unavailable => "nfc_unavailable",
            Self::Disabled => "nfc_disabled",
            Self::NoActivity => "no_activity",
            Self::ScanFailed => "scan_failed",
            Self::WriteSetupFailed => "write_setup_failed",
            Self::ReadError => "read_error",
            Self::WriteError => "write_error",
            Self::FormatError => "format_error",
            Self::UnsupportedTag => "unsupported_tag",
            Self::SessionInvalidated => "session_invalidated",
            Self::InvalidUrl => "invalid_url",
            Self::OsVersion => "ios_version",
            Self::PlatformUnsupported => "web_unsupported",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A terminal event produced by a tag session.
///
/// Serializes as a single-key map from the wire event name to its
/// payload, with camelCase field names (`techTypes`, optional `data`) to
/// match the contract consumers were built against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum NfcEvent {
    /// A tag was discovered and read (or found blank-but-formatable).
    #[serde(rename = "onNfcTagDiscovered", rename_all = "camelCase")]
    TagDiscovered {
        /// Tag identifier, lowercase hex of the raw identifier bytes.
        id: String,

        /// Tag technologies reported by the platform.
        tech_types: Vec<String>,

        /// First NDEF record payload decoded as UTF-8 text. `Some("")`
        /// for a tag with no message; `None` when the platform reports
        /// no payload at all.
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<String>,
    },

    /// A URL was written to a tag.
    #[serde(rename = "onNfcTagWritten", rename_all = "camelCase")]
    TagWritten {
        /// Tag identifier, lowercase hex of the raw identifier bytes.
        id: String,

        /// The URL that was written.
        url: String,
    },

    /// A session- or tag-level failure.
    #[serde(rename = "onNfcError", rename_all = "camelCase")]
    Error {
        /// Stable error code.
        code: ErrorCode,

        /// Human-readable description of the failure.
        message: String,
    },
}

impl NfcEvent {
    /// Build an [`NfcEvent::Error`] from a code and message.
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Error {
            code,
            message: message.into(),
        }
    }

    /// The wire event name consumers subscribe to.
    ///
    /// # Examples
    ///
    /// ```
    /// use taplink_core::{ErrorCode, NfcEvent};
    ///
    /// let event = NfcEvent::error(ErrorCode::ScanFailed, "boom");
    /// assert_eq!(event.name(), "onNfcError");
    /// ```
    pub fn name(&self) -> &'static str {
        match self {
            Self::TagDiscovered { .. } => "onNfcTagDiscovered",
            Self::TagWritten { .. } => "onNfcTagWritten",
            Self::Error { .. } => "onNfcError",
        }
    }

    /// Whether this event is an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_strings() {
        assert_eq!(ErrorCode::Unavailable.as_str(), "nfc_unavailable");
        assert_eq!(ErrorCode::Disabled.as_str(), "nfc_disabled");
        assert_eq!(ErrorCode::NoActivity.as_str(), "no_activity");
        assert_eq!(ErrorCode::ScanFailed.as_str(), "scan_failed");
        assert_eq!(ErrorCode::WriteSetupFailed.as_str(), "write_setup_failed");
        assert_eq!(ErrorCode::ReadError.as_str(), "read_error");
        assert_eq!(ErrorCode::WriteError.as_str(), "write_error");
        assert_eq!(ErrorCode::FormatError.as_str(), "format_error");
        assert_eq!(ErrorCode::UnsupportedTag.as_str(), "unsupported_tag");
        assert_eq!(
            ErrorCode::SessionInvalidated.as_str(),
            "session_invalidated"
        );
        assert_eq!(ErrorCode::InvalidUrl.as_str(), "invalid_url");
        assert_eq!(ErrorCode::OsVersion.as_str(), "ios_version");
        assert_eq!(ErrorCode::PlatformUnsupported.as_str(), "web_unsupported");
    }

    #[test]
    fn test_error_code_serde_matches_as_str() {
        for code in [
            ErrorCode::Unavailable,
            ErrorCode::Disabled,
            ErrorCode::NoActivity,
            ErrorCode::ScanFailed,
            ErrorCode::WriteSetupFailed,
            ErrorCode::ReadError,
            ErrorCode::WriteError,
            ErrorCode::FormatError,
            ErrorCode::UnsupportedTag,
            ErrorCode::SessionInvalidated,
            ErrorCode::InvalidUrl,
            ErrorCode::OsVersion,
            ErrorCode::PlatformUnsupported,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));

            let back: ErrorCode = serde_json::from_str(&json).unwrap();
            assert_eq!(back, code);
        }
    }

    #[test]
    fn test_event_names() {
        let discovered = NfcEvent::TagDiscovered {
            id: "04a1".to_string(),
            tech_types: vec!["Ndef".to_string()],
            data: Some("hello".to_string()),
        };
        let written = NfcEvent::TagWritten {
            id: "04a1".to_string(),
            url: "https://example.com".to_string(),
        };
        let error = NfcEvent::error(ErrorCode::ReadError, "read failed");

        assert_eq!(discovered.name(), "onNfcTagDiscovered");
        assert_eq!(written.name(), "onNfcTagWritten");
        assert_eq!(error.name(), "onNfcError");

        assert!(!discovered.is_error());
        assert!(error.is_error());
    }

    #[test]
    fn test_discovered_payload_shape() {
        let event = NfcEvent::TagDiscovered {
            id: "04a1".to_string(),
            tech_types: vec!["Ndef".to_string(), "NfcA".to_string()],
            data: Some("hello".to_string()),
        };

        let json = serde_json::to_value(&event).unwrap();
        let payload = &json["onNfcTagDiscovered"];
        assert_eq!(payload["id"], "04a1");
        assert_eq!(payload["techTypes"][0], "Ndef");
        assert_eq!(payload["data"], "hello");
    }

    #[test]
    fn test_discovered_payload_omits_absent_data() {
        let event = NfcEvent::TagDiscovered {
            id: "04a1".to_string(),
            tech_types: vec![],
            data: None,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert!(json["onNfcTagDiscovered"].get("data").is_none());
    }

    #[test]
    fn test_error_payload_shape() {
        let event = NfcEvent::error(ErrorCode::UnsupportedTag, "Unsupported NFC tag type");

        let json = serde_json::to_value(&event).unwrap();
        let payload = &json["onNfcError"];
        assert_eq!(payload["code"], "unsupported_tag");
        assert_eq!(payload["message"], "Unsupported NFC tag type");
    }
}
