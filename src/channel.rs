//! Live torrent channel client.
//!
//! Keeps a best-effort mirror of the backend's torrent collection. The
//! server pushes the full collection as a JSON array whenever it changes;
//! the client swaps its copy wholesale per accepted snapshot and reconnects
//! with bounded exponential backoff when the connection drops abnormally.

use std::time::Duration;

use tokio::{
    sync::{broadcast, mpsc, watch},
    time::sleep,
};
use tracing::{debug, trace, warn};
use url::Url;

use crate::{
    model::Torrent,
    transport::{Connection, Frame, Transport, ABNORMAL_CLOSURE, NORMAL_CLOSURE},
};

const BASE_RETRY_DELAY: Duration = Duration::from_millis(5_000);
const MAX_RETRY_DELAY: Duration = Duration::from_millis(30_000);

/// Lifecycle events fall behind for subscribers slower than this many
/// events; snapshots themselves never lag, the watch always holds the
/// latest one.
const EVENT_BUFFER: usize = 64;

/// Reconnect delay after `attempt` consecutive failed or dropped
/// connections: 5s doubling up to the 30s ceiling, no jitter.
#[must_use]
pub fn retry_delay(attempt: u32) -> Duration {
    let capped = attempt.min(3);
    let ms = 5_000u64.saturating_mul(2u64.saturating_pow(capped));
    Duration::from_millis(ms.min(30_000))
}

/// Connection lifecycle of the channel client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Disconnected,
    Connecting,
    Open,
    ReconnectPending,
}

/// Events published by the channel client.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// The connection is open; snapshots will follow.
    Opened,
    /// A full replacement of the torrent collection was accepted.
    Snapshot(Vec<Torrent>),
    /// The connection closed. `will_retry` is false for a normal closure.
    Closed { code: u16, will_retry: bool },
}

enum Command {
    Connect,
    Disconnect,
}

/// Handle to the live torrent channel.
///
/// [`TorrentChannel::spawn`] starts a driver task that owns the connection
/// and the reconnect timer; this handle only sends it commands and reads
/// its output. Dropping the handle stops the driver, closing any open
/// connection normally.
pub struct TorrentChannel {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<Vec<Torrent>>,
    events: broadcast::Sender<ChannelEvent>,
    state: watch::Receiver<ChannelState>,
}

impl TorrentChannel {
    /// Spawns the driver task on the current tokio runtime. The channel
    /// starts disconnected; call [`TorrentChannel::connect`] to open it.
    pub fn spawn<T: Transport>(url: Url, transport: T) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(Vec::new());
        let (event_tx, _) = broadcast::channel(EVENT_BUFFER);
        let (state_tx, state_rx) = watch::channel(ChannelState::Disconnected);

        let driver = Driver {
            url,
            transport,
            commands: command_rx,
            snapshots: snapshot_tx,
            events: event_tx.clone(),
            state: state_tx,
            attempt: 0,
        };
        tokio::spawn(driver.run());

        Self {
            commands: command_tx,
            snapshots: snapshot_rx,
            events: event_tx,
            state: state_rx,
        }
    }

    /// Opens the channel. No-op while a connection is already open or being
    /// opened; while a reconnect is pending, the timer is cancelled and the
    /// connection is dialed immediately.
    pub fn connect(&self) {
        let _ = self.commands.send(Command::Connect);
    }

    /// Closes the channel with a normal-closure code and cancels any
    /// pending reconnect. Safe to call repeatedly.
    pub fn disconnect(&self) {
        let _ = self.commands.send(Command::Disconnect);
    }

    /// Subscribes to the torrent collection. The receiver always holds the
    /// latest accepted snapshot and observes every subsequent one.
    pub fn snapshots(&self) -> watch::Receiver<Vec<Torrent>> {
        self.snapshots.clone()
    }

    /// Subscribes to lifecycle events from the time of the call onward.
    pub fn events(&self) -> broadcast::Receiver<ChannelEvent> {
        self.events.subscribe()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ChannelState {
        *self.state.borrow()
    }

    /// Subscribes to lifecycle state transitions.
    pub fn state_changes(&self) -> watch::Receiver<ChannelState> {
        self.state.clone()
    }
}

enum Phase {
    Disconnected,
    Connecting,
    Open(Box<dyn Connection>),
    ReconnectPending,
    Stopped,
}

struct Driver<T> {
    url: Url,
    transport: T,
    commands: mpsc::UnboundedReceiver<Command>,
    snapshots: watch::Sender<Vec<Torrent>>,
    events: broadcast::Sender<ChannelEvent>,
    state: watch::Sender<ChannelState>,
    /// Consecutive failed or abnormally closed connections since the last
    /// successful open.
    attempt: u32,
}

impl<T: Transport> Driver<T> {
    async fn run(mut self) {
        let mut phase = Phase::Disconnected;

        loop {
            self.publish_state(&phase);

            phase = match phase {
                Phase::Disconnected => match self.commands.recv().await {
                    Some(Command::Connect) => Phase::Connecting,
                    Some(Command::Disconnect) => Phase::Disconnected,
                    None => Phase::Stopped,
                },
                Phase::Connecting => self.dial().await,
                Phase::Open(conn) => self.pump(conn).await,
                Phase::ReconnectPending => self.wait_retry().await,
                Phase::Stopped => return,
            };
        }
    }

    /// Opens a new connection. Commands arriving during the dial are
    /// handled by the next phase: a `Connect` is a no-op there anyway and a
    /// `Disconnect` closes the fresh connection right away.
    async fn dial(&mut self) -> Phase {
        debug!(url = %self.url, "opening channel connection");

        match self.transport.connect(&self.url).await {
            Ok(conn) => {
                debug!("channel connected");
                self.attempt = 0;
                self.emit(ChannelEvent::Opened);
                Phase::Open(conn)
            }
            Err(err) => {
                warn!(%err, "channel connection failed");
                self.closed(ABNORMAL_CLOSURE)
            }
        }
    }

    async fn pump(&mut self, mut conn: Box<dyn Connection>) -> Phase {
        loop {
            tokio::select! {
                frame = conn.next() => match frame {
                    Some(Frame::Text(payload)) => self.accept_snapshot(&payload),
                    Some(Frame::Closed { code }) => {
                        warn!(code, "channel closed by server");
                        return self.closed(code);
                    }
                    None => {
                        warn!("channel stream ended without close handshake");
                        return self.closed(ABNORMAL_CLOSURE);
                    }
                },
                cmd = self.commands.recv() => match cmd {
                    // already open
                    Some(Command::Connect) => {}
                    Some(Command::Disconnect) => {
                        conn.close(NORMAL_CLOSURE).await;
                        self.emit(ChannelEvent::Closed {
                            code: NORMAL_CLOSURE,
                            will_retry: false,
                        });
                        return Phase::Disconnected;
                    }
                    None => {
                        conn.close(NORMAL_CLOSURE).await;
                        return Phase::Stopped;
                    }
                },
            }
        }
    }

    async fn wait_retry(&mut self) -> Phase {
        let delay = retry_delay(self.attempt);
        self.attempt = self.attempt.saturating_add(1);
        debug!(delay_ms = delay.as_millis() as u64, "reconnect scheduled");

        tokio::select! {
            _ = sleep(delay) => Phase::Connecting,
            cmd = self.commands.recv() => match cmd {
                // explicit connect skips the wait
                Some(Command::Connect) => Phase::Connecting,
                Some(Command::Disconnect) => Phase::Disconnected,
                None => Phase::Stopped,
            },
        }
    }

    /// Accepts a payload only if it decodes as a torrent array; anything
    /// else is dropped and the previous snapshot stays in effect.
    fn accept_snapshot(&self, payload: &str) {
        match serde_json::from_str::<Vec<Torrent>>(payload) {
            Ok(torrents) => {
                trace!(count = torrents.len(), "snapshot accepted");
                self.snapshots.send_replace(torrents.clone());
                self.emit(ChannelEvent::Snapshot(torrents));
            }
            Err(err) => warn!(%err, "discarding channel payload that is not a torrent array"),
        }
    }

    fn closed(&self, code: u16) -> Phase {
        if code == NORMAL_CLOSURE {
            self.emit(ChannelEvent::Closed {
                code,
                will_retry: false,
            });
            Phase::Disconnected
        } else {
            self.emit(ChannelEvent::Closed {
                code,
                will_retry: true,
            });
            Phase::ReconnectPending
        }
    }

    fn emit(&self, event: ChannelEvent) {
        let _ = self.events.send(event);
    }

    fn publish_state(&self, phase: &Phase) {
        let state = match phase {
            Phase::Disconnected | Phase::Stopped => ChannelState::Disconnected,
            Phase::Connecting => ChannelState::Connecting,
            Phase::Open(_) => ChannelState::Open,
            Phase::ReconnectPending => ChannelState::ReconnectPending,
        };

        self.state.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
    }
}
