//! Per-encounter tag processing.
//!
//! Each physical tag presentation runs one classify-then-act cycle:
//! capability is resolved once, the tag is connected, the read or write
//! operation runs, and the connection is released on every exit path.
//! Exactly one terminal event comes back, success or failure; nothing
//! here touches session state.

use taplink_core::{ErrorCode, NdefMessage, NfcEvent, TagCapability, tag_id_hex};
use taplink_hardware::{NdefTag, ReaderError};
use tracing::debug;

/// Process a tag encountered while scanning for read.
pub(crate) async fn read_encounter<T: NdefTag>(tag: &mut T) -> NfcEvent {
    let id = tag_id_hex(tag.uid());
    let tech_types = tag.tech_types().to_vec();
    debug!(%id, capability = %tag.capability(), "processing read encounter");

    match tag.capability() {
        TagCapability::Readable => {
            let outcome = read_text(tag).await;
            tag.close().await;
            match outcome {
                Ok(data) => NfcEvent::TagDiscovered {
                    id,
                    tech_types,
                    data: Some(data),
                },
                Err(error) => NfcEvent::error(
                    ErrorCode::ReadError,
                    format!("Error reading NFC tag: {error}"),
                ),
            }
        }
        // An unformatted tag has nothing to read but is still a usable
        // discovery; reported with empty data.
        TagCapability::Formatable => NfcEvent::TagDiscovered {
            id,
            tech_types,
            data: Some(String::new()),
        },
        TagCapability::Unsupported => {
            NfcEvent::error(ErrorCode::UnsupportedTag, "Unsupported NFC tag type")
        }
    }
}

/// Process a tag encountered while a write is pending.
pub(crate) async fn write_encounter<T: NdefTag>(tag: &mut T, url: &str) -> NfcEvent {
    let id = tag_id_hex(tag.uid());
    let message = NdefMessage::uri(url);
    debug!(%id, capability = %tag.capability(), "processing write encounter");

    match tag.capability() {
        TagCapability::Readable => {
            let outcome = write_message(tag, &message).await;
            tag.close().await;
            match outcome {
                Ok(()) => NfcEvent::TagWritten {
                    id,
                    url: url.to_string(),
                },
                Err(error) => NfcEvent::error(
                    ErrorCode::WriteError,
                    format!("Error writing to NFC tag: {error}"),
                ),
            }
        }
        TagCapability::Formatable => {
            let outcome = format_message(tag, &message).await;
            tag.close().await;
            match outcome {
                Ok(()) => NfcEvent::TagWritten {
                    id,
                    url: url.to_string(),
                },
                Err(error) => NfcEvent::error(
                    ErrorCode::FormatError,
                    format!("Error formatting NFC tag: {error}"),
                ),
            }
        }
        TagCapability::Unsupported => NfcEvent::error(
            ErrorCode::UnsupportedTag,
            "Unsupported NFC tag type for writing",
        ),
    }
}

async fn read_text<T: NdefTag>(tag: &mut T) -> Result<String, ReaderError> {
    tag.connect().await?;
    let message = tag.read().await?;
    Ok(message
        .as_ref()
        .and_then(NdefMessage::first_record)
        .map(|record| record.text())
        .unwrap_or_default())
}

async fn write_message<T: NdefTag>(tag: &mut T, message: &NdefMessage) -> Result<(), ReaderError> {
    tag.connect().await?;
    tag.write(message).await
}

async fn format_message<T: NdefTag>(tag: &mut T, message: &NdefMessage) -> Result<(), ReaderError> {
    tag.connect().await?;
    tag.format(message).await
}
