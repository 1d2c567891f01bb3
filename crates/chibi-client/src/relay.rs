//! Loopback relay for a local tracker or text client.
//!
//! The relay is a WebSocket server speaking the session protocol: every
//! text message is one JSON array of commands. Exactly one local peer is
//! served at a time; a new connection replaces the previous one. Traffic
//! from the session reaches the peer through the hub's outbox, which a
//! drain task flushes on a fixed interval.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chibi_protocol::{Command, Connect, PrintJson, decode, encode};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::WebSocketConfig;
use tokio_tungstenite::{WebSocketStream, accept_async_with_config};
use tracing::{debug, info, warn};

use crate::error::RelayError;
use crate::session::{SessionHub, SessionLink};
use crate::shutdown::ShutdownSignal;
use crate::tables::GAME_NAME;

/// Largest message accepted from the local peer.
pub const MAX_PEER_MESSAGE_BYTES: usize = 1 << 20;

type PeerSocket = WebSocketStream<TcpStream>;

/// Why a local `Connect` was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    WrongGame,
    SeedMismatch,
    NameMismatch,
}

impl Rejection {
    /// Notice text sent to the peer before it is dropped.
    pub const fn message(self) -> &'static str {
        match self {
            Self::WrongGame => "Connection aborted - wrong game",
            Self::SeedMismatch => "Connection aborted - save file to seed mismatch",
            Self::NameMismatch => "Connection aborted - player name mismatch",
        }
    }
}

struct Peer {
    id: u64,
    frames: mpsc::UnboundedSender<String>,
    // Dropping this ends the peer's reader
    _kill: oneshot::Sender<()>,
}

/// Relay state shared by the accept loop, peer tasks and the drain task.
pub struct Relay {
    hub: Arc<SessionHub>,
    link: Arc<dyn SessionLink>,
    peer: Mutex<Option<Peer>>,
    next_id: AtomicU64,
}

impl Relay {
    pub fn new(hub: Arc<SessionHub>, link: Arc<dyn SessionLink>) -> Self {
        Self {
            hub,
            link,
            peer: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn has_peer(&self) -> bool {
        self.peer.lock().is_some()
    }

    /// Run the identity guards against a local `Connect`.
    ///
    /// Fields the peer leaves empty, and identities the hub does not know
    /// yet, are not compared.
    pub fn admit(&self, connect: &Connect) -> Result<(), Rejection> {
        if connect.game != GAME_NAME {
            return Err(Rejection::WrongGame);
        }

        if let (Some(seed), Some(expected)) = (non_empty(connect.seed_name.as_deref()), self.hub.seed_name()) {
            if seed != expected {
                return Err(Rejection::SeedMismatch);
            }
        }

        if let (Some(name), Some(expected)) = (non_empty(Some(connect.name.as_str())), self.hub.auth()) {
            if name != expected {
                return Err(Rejection::NameMismatch);
            }
        }

        Ok(())
    }

    /// Send everything queued in the hub to the current peer.
    ///
    /// Frames stay queued while no peer is attached.
    pub fn drain(&self) {
        let Some(sender) = self.peer.lock().as_ref().map(|p| p.frames.clone()) else {
            return;
        };

        let frames = self.hub.drain_outbox();
        if frames.is_empty() {
            return;
        }

        let count = frames.len();
        let mut frames = frames.into_iter();
        while let Some(frame) = frames.next() {
            if let Err(mpsc::error::SendError(frame)) = sender.send(frame) {
                let mut unsent = vec![frame];
                unsent.extend(frames);
                debug!(unsent = unsent.len(), "peer went away during drain");
                self.hub.requeue_front(unsent);
                return;
            }
        }
        debug!(count, "drained outbox to local peer");
    }

    async fn serve(self: Arc<Self>, socket: TcpStream, addr: SocketAddr) {
        let socket = match accept_async_with_config(socket, Some(peer_config())).await {
            Ok(socket) => socket,
            Err(e) => {
                warn!("websocket handshake with {addr} failed: {e}");
                return;
            }
        };
        let (sink, stream) = socket.split();
        let (frames, outgoing) = mpsc::unbounded_channel();
        let (kill, killed) = oneshot::channel();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let replaced = self
            .peer
            .lock()
            .replace(Peer {
                id,
                frames: frames.clone(),
                _kill: kill,
            })
            .is_some();
        if replaced {
            info!("local peer {addr} replaces the previous one");
        } else {
            info!("local peer connected from {addr}");
        }

        tokio::spawn(write_frames(sink, outgoing, addr));

        if let Some(room_info) = self.hub.on_peer_accepted() {
            send_frame(&frames, room_info);
        }

        if let Err(e) = self.read_frames(stream, &frames, killed).await {
            warn!("local peer {addr} failed: {e}");
        }
        self.detach(id);
        debug!("local peer {addr} detached");
    }

    fn detach(&self, id: u64) {
        let mut peer = self.peer.lock();
        if peer.as_ref().is_some_and(|p| p.id == id) {
            *peer = None;
        }
    }

    async fn read_frames(
        &self,
        mut stream: SplitStream<PeerSocket>,
        frames: &mpsc::UnboundedSender<String>,
        mut killed: oneshot::Receiver<()>,
    ) -> Result<(), RelayError> {
        loop {
            let message = tokio::select! {
                _ = &mut killed => return Ok(()),
                message = stream.next() => message,
            };
            let Some(message) = message else {
                return Ok(());
            };
            let text = match message? {
                Message::Text(text) => text,
                Message::Close(_) => return Ok(()),
                _ => continue,
            };
            if text.as_str().trim().is_empty() {
                continue;
            }

            let commands = match decode(text.as_str()) {
                Ok(commands) => commands,
                Err(e) if e.is_malformed_input() => {
                    warn!(error = %e, "ignoring malformed frame from local peer");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let mut forward = Vec::new();
            for command in commands {
                match command {
                    Command::Connect(connect) => {
                        if let Err(rejection) = self.admit(&connect) {
                            warn!(
                                game = %connect.game,
                                name = %connect.name,
                                "{}",
                                rejection.message()
                            );
                            let notice = encode(&[Command::PrintJson(PrintJson::notice(rejection.message()))])?;
                            send_frame(frames, notice);
                            return Ok(());
                        }
                        if let Some(connected) = self.hub.connected_frame() {
                            send_frame(frames, connected);
                            self.hub.queue_inventory_snapshot();
                        }
                    }
                    // Held by the session link until the session is authenticated
                    other => forward.push(other),
                }
            }

            if !forward.is_empty() {
                debug!(count = forward.len(), "forwarding local commands");
                self.link.send(forward);
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn peer_config() -> WebSocketConfig {
    let mut config = WebSocketConfig::default();
    config.max_message_size = Some(MAX_PEER_MESSAGE_BYTES);
    config.max_frame_size = Some(MAX_PEER_MESSAGE_BYTES);
    config
}

fn send_frame(frames: &mpsc::UnboundedSender<String>, frame: String) {
    if frames.send(frame).is_err() {
        debug!("local peer writer gone, dropping frame");
    }
}

async fn write_frames(
    mut sink: SplitSink<PeerSocket, Message>,
    mut outgoing: mpsc::UnboundedReceiver<String>,
    addr: SocketAddr,
) {
    while let Some(frame) = outgoing.recv().await {
        if let Err(e) = sink.send(Message::text(frame)).await {
            warn!("write to local peer {addr} failed: {e}");
            return;
        }
    }
    if let Err(e) = sink.close().await {
        debug!("closing local peer {addr} failed: {e}");
    }
}

/// Bind the relay and start its accept and drain tasks.
///
/// Returns the bound address; both tasks stop on shutdown.
///
/// # Errors
///
/// Returns `RelayError::BindFailed` if the listener cannot be bound.
pub async fn start_relay(
    bind_addr: SocketAddr,
    relay: Arc<Relay>,
    drain_interval: Duration,
    shutdown: ShutdownSignal,
) -> Result<SocketAddr, RelayError> {
    let listener = TcpListener::bind(bind_addr)
        .await
        .map_err(|source| RelayError::BindFailed {
            addr: bind_addr,
            source,
        })?;
    let local_addr = listener.local_addr()?;

    tracing::info!("relay listening on {local_addr}");

    let mut accept_shutdown = shutdown.clone();
    let accept_relay = Arc::clone(&relay);
    tokio::spawn(async move {
        loop {
            tokio::select! {
                () = accept_shutdown.wait() => break,
                accepted = listener.accept() => match accepted {
                    Ok((socket, addr)) => {
                        tokio::spawn(Arc::clone(&accept_relay).serve(socket, addr));
                    }
                    Err(e) => warn!("failed to accept local peer: {e}"),
                },
            }
        }
        debug!("relay accept loop stopped");
    });

    let mut drain_shutdown = shutdown;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(drain_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                () = drain_shutdown.wait() => break,
                _ = ticker.tick() => relay.drain(),
            }
        }
        debug!("relay drain loop stopped");
    });

    Ok(local_addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventSender;

    struct NoLink;

    impl SessionLink for NoLink {
        fn send(&self, _commands: Vec<Command>) {}
    }

    fn relay(seed: Option<&str>, auth: Option<&str>) -> Relay {
        let hub = SessionHub::new(seed.map(String::from), auth.map(String::from), EventSender::new());
        Relay::new(Arc::new(hub), Arc::new(NoLink))
    }

    fn connect(game: &str, name: &str, seed: Option<&str>) -> Connect {
        Connect {
            game: game.to_string(),
            name: name.to_string(),
            seed_name: seed.map(String::from),
            ..Connect::default()
        }
    }

    #[test]
    fn test_guards_in_order() {
        let relay = relay(Some("seed-a"), Some("Robo"));

        assert_eq!(relay.admit(&connect("Chibi Robo", "Robo", Some("seed-a"))), Ok(()));
        assert_eq!(
            relay.admit(&connect("Other", "Someone", Some("seed-b"))),
            Err(Rejection::WrongGame)
        );
        assert_eq!(
            relay.admit(&connect("Chibi Robo", "Someone", Some("seed-b"))),
            Err(Rejection::SeedMismatch)
        );
        assert_eq!(
            relay.admit(&connect("Chibi Robo", "Someone", Some("seed-a"))),
            Err(Rejection::NameMismatch)
        );
    }

    #[test]
    fn test_empty_fields_are_not_compared() {
        let relay = relay(Some("seed-a"), Some("Robo"));
        assert_eq!(relay.admit(&connect("Chibi Robo", "", Some(""))), Ok(()));
        assert_eq!(relay.admit(&connect("Chibi Robo", "Robo", None)), Ok(()));
    }

    #[test]
    fn test_unknown_identity_is_not_compared() {
        let relay = relay(None, None);
        assert_eq!(relay.admit(&connect("Chibi Robo", "Anyone", Some("any"))), Ok(()));
    }

    #[test]
    fn test_drain_without_peer_keeps_frames() {
        let relay = relay(None, None);
        relay.hub.queue(Command::Unknown(serde_json::json!({"cmd": "Bounced"})));
        relay.drain();
        assert!(!relay.has_peer());
        assert_eq!(relay.hub.drain_outbox().len(), 1);
    }
}
