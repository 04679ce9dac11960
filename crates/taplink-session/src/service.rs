//! The session service: command surface, event stream, and the actor
//! that coordinates both against a platform reader.
//!
//! # Architecture
//!
//! One task owns everything that mutates: the reader, the state machine,
//! and the event sender. Commands arrive on an mpsc channel and carry a
//! oneshot acknowledgement, so a command future resolves when the
//! command has been applied, not merely queued. Tag encounters arrive
//! through the reader's `watch` future, polled only while a session is
//! live.
//!
//! ```text
//! NfcHandle ──commands──► ┌─────────────────┐
//!                         │  service task    │──events──► EventStream
//! platform ───watch─────► │  (reader + FSM)  │
//! ```
//!
//! Commands are never rejected for operational reasons; every failure is
//! reported on the event stream with a stable code. The only command
//! error is [`Error::ServiceStopped`], raised when the service task is
//! gone.
//!
//! # Ordering
//!
//! The actor's select is biased toward commands: a `stop_nfc_scan` or
//! `cancel_write_to_tag` queued behind a tag delivery wins, and the
//! delivery dies with the session it belonged to. This is what makes
//! "no events after cancellation" deterministic.

use taplink_core::{Error, ErrorCode, NfcEvent, Result};
use taplink_hardware::{
    Availability, DiscoveryProfile, NfcReader, ReaderError, SessionIntent, SessionSignal,
};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};
use url::Url;

use crate::encounter;
use crate::state_machine::{SessionMachine, SessionMode};

const COMMAND_BUFFER: usize = 16;
const EVENT_BUFFER: usize = 32;

/// Commands the handle sends to the service task.
#[derive(Debug)]
enum Command {
    IsAvailable { reply: oneshot::Sender<bool> },
    StartScan { done: oneshot::Sender<()> },
    StopScan { done: oneshot::Sender<()> },
    WriteUrl { url: String, done: oneshot::Sender<()> },
    CancelWrite { done: oneshot::Sender<()> },
    Mode { reply: oneshot::Sender<SessionMode> },
}

/// What woke the service loop.
enum Input<T> {
    Command(Command),
    Signal(SessionSignal<T>),
}

/// Command surface for a running session service.
///
/// Cloneable and cheap; all clones drive the same service. Methods
/// resolve once the service has applied the command. Operational
/// failures never surface here; subscribe to the [`EventStream`] for
/// those.
///
/// # Examples
///
/// ```no_run
/// use taplink_hardware::mock::MockReader;
/// use taplink_session::NfcService;
///
/// # async fn example() -> taplink_core::Result<()> {
/// let (reader, _handle) = MockReader::new();
/// let (service, nfc, mut events) = NfcService::new(reader);
/// tokio::spawn(service.run());
///
/// if nfc.is_nfc_available().await? {
///     nfc.start_nfc_scan().await?;
/// }
///
/// while let Some(event) = events.recv().await {
///     println!("{}", event.name());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct NfcHandle {
    commands: mpsc::Sender<Command>,
}

impl NfcHandle {
    /// Whether NFC hardware is present and the radio enabled. Pure
    /// query; emits no events and changes no state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceStopped`] if the service task is gone.
    pub async fn is_nfc_available(&self) -> Result<bool> {
        let (reply, answer) = oneshot::channel();
        self.send(Command::IsAvailable { reply }).await?;
        answer.await.map_err(|_| Error::ServiceStopped)
    }

    /// Begin a tag discovery session for reading.
    ///
    /// Tears down any active session first. Precondition failures are
    /// reported as `onNfcError` events (`nfc_unavailable`,
    /// `nfc_disabled`, `no_activity`, `scan_failed`, ...), never as
    /// command errors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceStopped`] if the service task is gone.
    pub async fn start_nfc_scan(&self) -> Result<()> {
        self.acked(|done| Command::StartScan { done }).await
    }

    /// End the discovery session. Idempotent; ending a non-existent
    /// session is a no-op and emits nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceStopped`] if the service task is gone.
    pub async fn stop_nfc_scan(&self) -> Result<()> {
        self.acked(|done| Command::StopScan { done }).await
    }

    /// Arm a single-shot write session: the next tag encountered
    /// receives a one-record NDEF URI message carrying `url`.
    ///
    /// The URL is validated first (`invalid_url` event on failure).
    /// Setup failures roll the session back to idle and report
    /// `write_setup_failed`; retrying means calling this again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceStopped`] if the service task is gone.
    pub async fn write_url_to_tag(&self, url: impl Into<String>) -> Result<()> {
        let url = url.into();
        self.acked(|done| Command::WriteUrl { url, done }).await
    }

    /// Disarm the write session. Idempotent; emits nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceStopped`] if the service task is gone.
    pub async fn cancel_write_to_tag(&self) -> Result<()> {
        self.acked(|done| Command::CancelWrite { done }).await
    }

    /// Current session mode. Pure query.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceStopped`] if the service task is gone.
    pub async fn session_mode(&self) -> Result<SessionMode> {
        let (reply, answer) = oneshot::channel();
        self.send(Command::Mode { reply }).await?;
        answer.await.map_err(|_| Error::ServiceStopped)
    }

    async fn acked(&self, command: impl FnOnce(oneshot::Sender<()>) -> Command) -> Result<()> {
        let (done, applied) = oneshot::channel();
        self.send(command(done)).await?;
        applied.await.map_err(|_| Error::ServiceStopped)
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| Error::ServiceStopped)
    }
}

/// Receiving half of the event contract.
#[derive(Debug)]
pub struct EventStream {
    events: mpsc::Receiver<NfcEvent>,
}

impl EventStream {
    /// Await the next event. Returns `None` once the service has
    /// stopped and all buffered events are drained.
    pub async fn recv(&mut self) -> Option<NfcEvent> {
        self.events.recv().await
    }

    /// Take an already-buffered event without waiting, if any.
    pub fn try_recv(&mut self) -> Option<NfcEvent> {
        self.events.try_recv().ok()
    }
}

/// The session coordination actor.
///
/// Owns a platform reader and the session state machine; translates
/// commands into session transitions and tag encounters into terminal
/// events. Create with [`NfcService::new`], then spawn
/// [`run`](NfcService::run) on the runtime.
#[derive(Debug)]
pub struct NfcService<R: NfcReader> {
    reader: R,
    machine: SessionMachine,
    commands: mpsc::Receiver<Command>,
    events: mpsc::Sender<NfcEvent>,
}

impl<R: NfcReader> NfcService<R> {
    /// Wire up a service around a reader.
    ///
    /// Returns the service (to be spawned), the command handle, and the
    /// event stream.
    pub fn new(reader: R) -> (Self, NfcHandle, EventStream) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);

        let service = Self {
            reader,
            machine: SessionMachine::new(),
            commands: command_rx,
            events: event_tx,
        };

        (
            service,
            NfcHandle {
                commands: command_tx,
            },
            EventStream { events: event_rx },
        )
    }

    /// Drive the service until every handle is dropped.
    ///
    /// While a session is live the loop waits on commands and the
    /// reader simultaneously, commands first; while idle it waits on
    /// commands alone, so deliveries queued for a dead session are
    /// never observed.
    pub async fn run(mut self) {
        debug!("NFC session service started");

        loop {
            let input = if self.machine.mode() == SessionMode::Idle {
                match self.commands.recv().await {
                    Some(command) => Input::Command(command),
                    None => break,
                }
            } else {
                let Self {
                    commands, reader, ..
                } = &mut self;
                tokio::select! {
                    biased;
                    command = commands.recv() => match command {
                        Some(command) => Input::Command(command),
                        None => break,
                    },
                    signal = reader.watch() => Input::Signal(signal),
                }
            };

            match input {
                Input::Command(command) => self.handle_command(command).await,
                Input::Signal(signal) => self.handle_signal(signal).await,
            }
        }

        self.teardown().await;
        debug!("NFC session service stopped");
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::IsAvailable { reply } => {
                let availability = self.reader.availability().await;
                let _ = reply.send(availability.is_available());
            }
            Command::StartScan { done } => {
                self.start_scan().await;
                let _ = done.send(());
            }
            Command::StopScan { done } => {
                self.teardown().await;
                let _ = done.send(());
            }
            Command::WriteUrl { url, done } => {
                self.write_url(url).await;
                let _ = done.send(());
            }
            Command::CancelWrite { done } => {
                self.teardown().await;
                let _ = done.send(());
            }
            Command::Mode { reply } => {
                let _ = reply.send(self.machine.mode());
            }
        }
    }

    async fn start_scan(&mut self) {
        if let Some(event) = availability_event(self.reader.availability().await) {
            self.emit(event).await;
            return;
        }

        self.teardown().await;

        match self.reader.begin(SessionIntent::Read).await {
            Ok(()) => {
                if let Err(error) = self.machine.begin_scan() {
                    warn!(%error, "state machine rejected scan transition");
                    self.reader.end().await;
                    return;
                }
                debug!("read session armed");
            }
            Err(ReaderError::NoForeground { message }) => {
                self.emit(NfcEvent::error(ErrorCode::NoActivity, message))
                    .await;
            }
            Err(error) => {
                self.emit(NfcEvent::error(
                    ErrorCode::ScanFailed,
                    format!("Failed to start NFC scan: {error}"),
                ))
                .await;
            }
        }
    }

    async fn write_url(&mut self, url: String) {
        if Url::parse(&url).is_err() {
            self.emit(NfcEvent::error(ErrorCode::InvalidUrl, "Invalid URL format"))
                .await;
            return;
        }

        if let Some(event) = availability_event(self.reader.availability().await) {
            self.emit(event).await;
            return;
        }

        self.teardown().await;

        if let Err(error) = self.machine.arm_write(url) {
            warn!(%error, "state machine rejected write transition");
            return;
        }

        match self.reader.begin(SessionIntent::Write).await {
            Ok(()) => debug!("write session armed"),
            Err(error) => {
                // Roll back: a pending intent with no armed session
                // would turn the next unrelated tap into a write.
                self.machine.reset();
                self.reader.end().await;

                let event = match error {
                    ReaderError::NoForeground { message } => {
                        NfcEvent::error(ErrorCode::NoActivity, message)
                    }
                    error => NfcEvent::error(
                        ErrorCode::WriteSetupFailed,
                        format!("Failed to set up NFC write mode: {error}"),
                    ),
                };
                self.emit(event).await;
            }
        }
    }

    async fn handle_signal(&mut self, signal: SessionSignal<R::Tag>) {
        match signal {
            SessionSignal::Encounter(mut tag) => {
                if let Some(url) = self.machine.take_write_intent() {
                    let event = encounter::write_encounter(&mut tag, &url).await;
                    self.emit(event).await;
                    // Writes are single-shot regardless of outcome.
                    self.reader.end().await;
                } else {
                    let event = encounter::read_encounter(&mut tag).await;
                    self.emit(event).await;
                    self.rearm_if_one_shot().await;
                }
            }
            SessionSignal::Invalidated(invalidation) => {
                self.reader.end().await;
                self.machine.reset();

                if invalidation.user_initiated {
                    debug!("session cancelled by user");
                } else {
                    self.emit(NfcEvent::error(
                        ErrorCode::SessionInvalidated,
                        invalidation.reason,
                    ))
                    .await;
                }
            }
        }
    }

    /// Keep one-shot discovery primitives conformant with the
    /// persistent read contract: each delivery consumes the arming, so
    /// arm again for the next tap.
    async fn rearm_if_one_shot(&mut self) {
        if self.machine.mode() != SessionMode::Scanning
            || self.reader.profile() != DiscoveryProfile::OneShot
        {
            return;
        }

        if let Err(error) = self.reader.begin(SessionIntent::Read).await {
            self.machine.reset();
            self.emit(NfcEvent::error(
                ErrorCode::ScanFailed,
                format!("Failed to re-arm NFC scan: {error}"),
            ))
            .await;
        }
    }

    /// End any live session and return the machine to idle. Idempotent.
    async fn teardown(&mut self) {
        if self.machine.mode() == SessionMode::Idle {
            return;
        }

        self.reader.end().await;
        if self.machine.reset().is_some() {
            debug!("pending write intent discarded");
        }
    }

    async fn emit(&mut self, event: NfcEvent) {
        debug!(event = event.name(), "emitting NFC event");
        if self.events.send(event).await.is_err() {
            warn!("event receiver dropped; NFC event discarded");
        }
    }
}

/// Map a failed availability gate to its error event, or `None` when
/// sessions can be established.
fn availability_event(availability: Availability) -> Option<NfcEvent> {
    let (code, message) = match availability {
        Availability::Available => return None,
        Availability::HardwareMissing => (
            ErrorCode::Unavailable,
            "NFC is not available on this device",
        ),
        Availability::Disabled => (ErrorCode::Disabled, "NFC is disabled in device settings"),
        Availability::UnsupportedOsVersion => (
            ErrorCode::OsVersion,
            "NFC requires a newer operating system version",
        ),
        Availability::UnsupportedPlatform => (
            ErrorCode::PlatformUnsupported,
            "NFC is not supported on this platform",
        ),
    };
    Some(NfcEvent::error(code, message))
}
