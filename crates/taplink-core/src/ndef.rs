//! Minimal NDEF message model.
//!
//! This is the in-memory shape adapters exchange with the platform NFC
//! stack, not a wire codec: binary (de)serialization of NDEF stays with
//! the OS. The model covers what the session layer needs, namely building
//! a single-record URI message for writes and viewing the first record of
//! a read message as text.

use crate::error::{Error, Result};

/// NDEF type name format values (NFC Forum NDEF 1.0, section 3.2.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeNameFormat {
    Empty = 0x00,
    WellKnown = 0x01,
    MimeMedia = 0x02,
    AbsoluteUri = 0x03,
    External = 0x04,
    Unknown = 0x05,
    Unchanged = 0x06,
}

/// Well-known record type for URI records (`"U"`).
pub const RTD_URI: &[u8] = b"U";

/// Well-known record type for text records (`"T"`).
pub const RTD_TEXT: &[u8] = b"T";

/// URI abbreviation prefixes indexed by the URI record's first payload
/// byte (NFC Forum URI RTD, section 3.2.2). Index 0 is the empty prefix:
/// the absolute, unabbreviated form.
const URI_PREFIXES: &[&str] = &[
    "",
    "http://www.",
    "https://www.",
    "http://",
    "https://",
    "tel:",
    "mailto:",
    "ftp://anonymous:anonymous@",
    "ftp://ftp.",
    "ftps://",
    "sftp://",
    "smb://",
    "nfs://",
    "ftp://",
    "dav://",
    "news:",
    "telnet://",
    "imap:",
    "rtsp://",
    "urn:",
    "pop:",
    "sip:",
    "sips:",
    "tftp:",
    "btspp://",
    "btl2cap://",
    "btgoep://",
    "tcpobex://",
    "irdaobex://",
    "file://",
    "urn:epc:id:",
    "urn:epc:tag:",
    "urn:epc:pat:",
    "urn:epc:raw:",
    "urn:epc:",
    "urn:nfc:",
];

/// A single NDEF record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefRecord {
    /// Type name format of the record.
    pub tnf: TypeNameFormat,

    /// Record type (e.g. `b"U"` for well-known URI records).
    pub record_type: Vec<u8>,

    /// Optional record identifier bytes.
    pub id: Vec<u8>,

    /// Record payload bytes.
    pub payload: Vec<u8>,
}

impl NdefRecord {
    /// Build a well-known URI record in absolute form: a zero prefix
    /// byte followed by the full URI, no abbreviation.
    ///
    /// # Examples
    ///
    /// ```
    /// use taplink_core::ndef::NdefRecord;
    ///
    /// let record = NdefRecord::uri("https://example.com");
    /// assert_eq!(record.payload[0], 0x00);
    /// assert_eq!(&record.payload[1..], b"https://example.com");
    /// ```
    pub fn uri(uri: &str) -> Self {
        let mut payload = Vec::with_capacity(uri.len() + 1);
        payload.push(0x00);
        payload.extend_from_slice(uri.as_bytes());

        Self {
            tnf: TypeNameFormat::WellKnown,
            record_type: RTD_URI.to_vec(),
            id: Vec::new(),
            payload,
        }
    }

    /// Whether this is a well-known URI record.
    pub fn is_uri(&self) -> bool {
        self.tnf == TypeNameFormat::WellKnown && self.record_type == RTD_URI
    }

    /// The record payload decoded as UTF-8 text, replacing invalid
    /// sequences. This is the raw payload view the read path emits; for
    /// URI records it includes the leading prefix byte.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }

    /// Resolve a URI record's payload to the full URI, expanding the
    /// abbreviation prefix byte.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRecord`] if the record is not a URI
    /// record, has an empty payload, or carries a prefix byte outside
    /// the defined table.
    pub fn uri_string(&self) -> Result<String> {
        if !self.is_uri() {
            return Err(Error::InvalidRecord("not a URI record".to_string()));
        }

        let (prefix_byte, rest) = self
            .payload
            .split_first()
            .ok_or_else(|| Error::InvalidRecord("empty URI payload".to_string()))?;

        let prefix = URI_PREFIXES
            .get(*prefix_byte as usize)
            .ok_or_else(|| Error::InvalidRecord(format!("unknown URI prefix {prefix_byte:#04x}")))?;

        let mut uri = String::with_capacity(prefix.len() + rest.len());
        uri.push_str(prefix);
        uri.push_str(&String::from_utf8_lossy(rest));
        Ok(uri)
    }
}

/// An NDEF message: one or more records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefMessage {
    records: Vec<NdefRecord>,
}

impl NdefMessage {
    /// Build a message from records.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyMessage`] for an empty record list; NDEF
    /// messages carry at least one record.
    pub fn new(records: Vec<NdefRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::EmptyMessage);
        }
        Ok(Self { records })
    }

    /// Build a message holding exactly one record.
    pub fn single(record: NdefRecord) -> Self {
        Self {
            records: vec![record],
        }
    }

    /// Build the single-record URI message the write path puts on tags.
    ///
    /// # Examples
    ///
    /// ```
    /// use taplink_core::ndef::NdefMessage;
    ///
    /// let message = NdefMessage::uri("https://example.com");
    /// assert_eq!(message.records().len(), 1);
    /// assert_eq!(
    ///     message.first_record().unwrap().uri_string().unwrap(),
    ///     "https://example.com"
    /// );
    /// ```
    pub fn uri(uri: &str) -> Self {
        Self {
            records: vec![NdefRecord::uri(uri)],
        }
    }

    /// All records in order.
    pub fn records(&self) -> &[NdefRecord] {
        &self.records
    }

    /// The first record, if any.
    pub fn first_record(&self) -> Option<&NdefRecord> {
        self.records.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_record_absolute_form() {
        let record = NdefRecord::uri("https://example.com/page?q=1");

        assert_eq!(record.tnf, TypeNameFormat::WellKnown);
        assert_eq!(record.record_type, RTD_URI);
        assert!(record.id.is_empty());
        assert_eq!(record.payload[0], 0x00);
        assert_eq!(&record.payload[1..], b"https://example.com/page?q=1");
    }

    #[test]
    fn test_uri_string_round_trip() {
        let record = NdefRecord::uri("https://example.com");
        assert_eq!(record.uri_string().unwrap(), "https://example.com");
    }

    #[test]
    fn test_uri_string_expands_prefix() {
        let record = NdefRecord {
            tnf: TypeNameFormat::WellKnown,
            record_type: RTD_URI.to_vec(),
            id: Vec::new(),
            payload: {
                let mut p = vec![0x04];
                p.extend_from_slice(b"example.com");
                p
            },
        };
        assert_eq!(record.uri_string().unwrap(), "https://example.com");
    }

    #[test]
    fn test_uri_string_rejects_non_uri() {
        let record = NdefRecord {
            tnf: TypeNameFormat::WellKnown,
            record_type: RTD_TEXT.to_vec(),
            id: Vec::new(),
            payload: b"\x02enhello".to_vec(),
        };
        assert!(record.uri_string().is_err());
    }

    #[test]
    fn test_uri_string_rejects_unknown_prefix() {
        let record = NdefRecord {
            tnf: TypeNameFormat::WellKnown,
            record_type: RTD_URI.to_vec(),
            id: Vec::new(),
            payload: vec![0xF0, b'x'],
        };
        assert!(record.uri_string().is_err());
    }

    #[test]
    fn test_text_lossy_decode() {
        let record = NdefRecord {
            tnf: TypeNameFormat::Unknown,
            record_type: Vec::new(),
            id: Vec::new(),
            payload: vec![b'h', b'i', 0xFF],
        };
        assert_eq!(record.text(), "hi\u{FFFD}");
    }

    #[test]
    fn test_message_rejects_empty() {
        assert!(NdefMessage::new(Vec::new()).is_err());
    }

    #[test]
    fn test_message_first_record() {
        let message = NdefMessage::uri("https://example.com");
        assert!(message.first_record().unwrap().is_uri());
    }
}
