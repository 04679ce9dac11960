//! Tag identity and capability types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a discovered tag can do, resolved once per encounter.
///
/// Platform adapters classify each tag into exactly one of these before
/// dispatching, replacing nested technology probing with a single match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagCapability {
    /// The tag carries (or can carry) an NDEF message and supports read
    /// and write through the NDEF technology.
    Readable,

    /// The tag is unformatted but can be formatted with an initial NDEF
    /// message.
    Formatable,

    /// The tag supports neither NDEF read nor NDEF format.
    Unsupported,
}

impl fmt::Display for TagCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Readable => "readable",
            Self::Formatable => "formatable",
            Self::Unsupported => "unsupported",
        };
        f.write_str(s)
    }
}

/// Render raw tag identifier bytes as the event contract's `id` string:
/// lowercase hex, zero-padded per byte.
///
/// # Examples
///
/// ```
/// use taplink_core::tag_id_hex;
///
/// assert_eq!(tag_id_hex(&[0x04, 0xA1]), "04a1");
/// assert_eq!(tag_id_hex(&[]), "");
/// ```
pub fn tag_id_hex(uid: &[u8]) -> String {
    let mut out = String::with_capacity(uid.len() * 2);
    for byte in uid {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}
