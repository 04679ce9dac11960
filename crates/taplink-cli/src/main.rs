//! Scripted demonstration of the taplink session layer.
//!
//! Drives the full command surface against the mock reader, so the whole
//! flow runs without NFC hardware: scan two tags, stop, write a URL to a
//! blank tag, and tap an unsupported tag. Every emitted event is printed
//! as contract JSON.
//!
//! Run with: cargo run -p taplink-cli
//!
//! Set RUST_LOG to see the session service's internal transitions, e.g.
//! RUST_LOG=taplink_session=debug.

use anyhow::{Context, Result};
use taplink_hardware::mock::{MockReader, MockTag};
use taplink_session::{EventStream, NfcService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let (reader, platform) = MockReader::new();
    let (service, nfc, mut events) = NfcService::new(reader);
    let service_task = tokio::spawn(service.run());

    println!("=== taplink session demo (mock reader) ===\n");

    println!("NFC available: {}\n", nfc.is_nfc_available().await?);

    // Read flow: one session stays live across both taps.
    println!("--- Scanning ---");
    nfc.start_nfc_scan().await?;
    platform
        .present_tag(MockTag::readable([0x04, 0xA1], "hello"))
        .await?;
    platform
        .present_tag(MockTag::readable([0x04, 0xA2], "second tap"))
        .await?;
    print_event(&mut events).await?;
    print_event(&mut events).await?;
    nfc.stop_nfc_scan().await?;

    // Write flow: arm once, tap a blank tag, which gets formatted with a
    // single URI record.
    println!("\n--- Writing ---");
    nfc.write_url_to_tag("https://example.com").await?;
    platform
        .present_tag(MockTag::blank([0xDE, 0xAD, 0xBE, 0xEF]))
        .await?;
    print_event(&mut events).await?;

    // Error flow: a tag with no NDEF support while scanning.
    println!("\n--- Unsupported tag ---");
    nfc.start_nfc_scan().await?;
    platform
        .present_tag(MockTag::unsupported([0x01, 0x02]))
        .await?;
    print_event(&mut events).await?;
    nfc.stop_nfc_scan().await?;

    drop(nfc);
    service_task.await.context("session service panicked")?;

    println!("\nDone.");
    Ok(())
}

async fn print_event(events: &mut EventStream) -> Result<()> {
    let event = events
        .recv()
        .await
        .context("event stream closed unexpectedly")?;
    println!("{}", serde_json::to_string_pretty(&event)?);
    Ok(())
}
