//! Client side of the remote multiworld session.
//!
//! The session is a WebSocket; every text message is one JSON array of
//! commands. The task connects, authenticates when the server announces
//! its room, feeds everything it receives into the [`SessionHub`] and
//! writes commands queued through [`RemoteLink`]. On any failure the hub is told the session is gone and
//! the task reconnects after the backoff interval.

use std::sync::Arc;
use std::time::Duration;

use chibi_protocol::{Command, Connect, ITEMS_HANDLING_ALL, NetworkVersion, decode, encode};
use futures::{Sink, SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::SessionError;
use crate::session::{SessionHub, SessionLink};
use crate::shutdown::ShutdownSignal;
use crate::tables::GAME_NAME;

/// Protocol version announced in `Connect`.
pub const PROTOCOL_VERSION: (u32, u32, u32) = (0, 5, 1);

/// Connection parameters for the remote session.
#[derive(Debug, Clone)]
pub struct RemoteSettings {
    /// Session server, either `host:port` or a `ws://`/`wss://` URL
    pub server: String,
    /// Slot name to authenticate as
    pub name: String,
    pub password: Option<String>,
    /// Delay between reconnect attempts
    pub backoff: Duration,
}

/// Queues commands for the remote session task.
#[derive(Debug, Clone)]
pub struct RemoteLink(mpsc::UnboundedSender<Vec<Command>>);

impl SessionLink for RemoteLink {
    fn send(&self, commands: Vec<Command>) {
        if self.0.send(commands).is_err() {
            debug!("session task gone, dropping outbound commands");
        }
    }
}

/// The reconnecting session task.
pub struct RemoteSession {
    settings: RemoteSettings,
    uuid: String,
    hub: Arc<SessionHub>,
    outbound: mpsc::UnboundedReceiver<Vec<Command>>,
}

impl RemoteSession {
    pub fn new(settings: RemoteSettings, hub: Arc<SessionHub>) -> (Self, RemoteLink) {
        let (tx, outbound) = mpsc::unbounded_channel();
        let session = Self {
            settings,
            uuid: client_uuid(),
            hub,
            outbound,
        };
        (session, RemoteLink(tx))
    }

    /// The `Connect` sent once the server has announced its room.
    pub fn connect_command(&self) -> Command {
        let (major, minor, build) = PROTOCOL_VERSION;
        Command::Connect(Connect {
            game: GAME_NAME.to_string(),
            name: self.settings.name.clone(),
            password: self.settings.password.clone(),
            uuid: Some(self.uuid.clone()),
            version: Some(NetworkVersion::new(major, minor, build)),
            items_handling: Some(ITEMS_HANDLING_ALL),
            tags: Vec::new(),
            slot_data: Some(true),
            ..Connect::default()
        })
    }

    /// Keep a session open until shutdown.
    pub async fn run(mut self, mut shutdown: ShutdownSignal) {
        info!(server = %self.settings.server, name = %self.settings.name, "session task started");

        while !shutdown.is_triggered() {
            match self.connect_once(&mut shutdown).await {
                Ok(()) => debug!("session closed for shutdown"),
                Err(SessionError::Refused(errors)) => {
                    warn!(?errors, "session refused our credentials");
                }
                Err(e) => warn!(error = %e, "session connection failed"),
            }
            self.hub.on_disconnect();

            if shutdown.sleep(self.settings.backoff).await {
                break;
            }
        }

        info!("session task stopped");
    }

    async fn connect_once(&mut self, shutdown: &mut ShutdownSignal) -> Result<(), SessionError> {
        let connect = self.connect_command();
        let Self {
            settings,
            hub,
            outbound,
            ..
        } = self;

        let url = session_url(&settings.server);
        let (socket, _) = connect_async(url.as_str())
            .await
            .map_err(|source| SessionError::ConnectFailed {
                server: settings.server.clone(),
                source: Box::new(source),
            })?;
        info!(%url, "connected to session server");

        let (mut sink, mut stream) = socket.split();
        let mut authenticated = false;

        loop {
            tokio::select! {
                () = shutdown.wait() => {
                    if let Err(e) = sink.close().await {
                        debug!(error = %e, "closing session socket failed");
                    }
                    return Ok(());
                }
                message = stream.next() => {
                    let Some(message) = message else {
                        return Err(SessionError::Closed);
                    };
                    let text = match message? {
                        Message::Text(text) => text,
                        Message::Close(_) => return Err(SessionError::Closed),
                        _ => continue,
                    };
                    let handshake = Handshake {
                        hub: hub.as_ref(),
                        name: &settings.name,
                        connect: &connect,
                    };
                    authenticated |= handshake.handle_frame(text.as_str(), &mut sink).await?;
                }
                Some(batch) = outbound.recv(), if authenticated => {
                    write_frame(&mut sink, &batch).await?;
                }
            }
        }
    }
}

/// WebSocket URL for a configured server, defaulting to `ws://`.
fn session_url(server: &str) -> String {
    if server.contains("://") {
        server.to_string()
    } else {
        format!("ws://{server}")
    }
}

/// Per-line handling of server traffic.
struct Handshake<'a> {
    hub: &'a SessionHub,
    name: &'a str,
    connect: &'a Command,
}

impl Handshake<'_> {
    /// Returns `true` once the server has accepted us.
    async fn handle_frame<S>(&self, frame: &str, sink: &mut S) -> Result<bool, SessionError>
    where
        S: Sink<Message, Error = tungstenite::Error> + Unpin,
    {
        if frame.trim().is_empty() {
            return Ok(false);
        }
        let commands = match decode(frame) {
            Ok(commands) => commands,
            Err(e) if e.is_malformed_input() => {
                warn!(error = %e, "ignoring malformed frame from session");
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };

        let mut accepted = false;
        for command in commands {
            if let Command::ConnectionRefused(refused) = &command {
                return Err(SessionError::Refused(refused.errors.clone()));
            }
            let room_announced = matches!(command, Command::RoomInfo(_));
            accepted |= matches!(command, Command::Connected(_));
            self.hub.on_package(command);

            if room_announced {
                self.hub.set_auth(self.name);
                write_frame(sink, std::slice::from_ref(self.connect)).await?;
                debug!("sent Connect");
            }
        }
        Ok(accepted)
    }
}

async fn write_frame<S>(sink: &mut S, commands: &[Command]) -> Result<(), SessionError>
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    let frame = encode(commands)?;
    sink.send(Message::text(frame)).await?;
    Ok(())
}

/// Per-run client identifier.
fn client_uuid() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventSender;
    use chibi_protocol::{Connected, NetworkPlayer, RoomInfo};
    use pretty_assertions::assert_eq;
    use serde_json::Map;
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    fn settings(server: String) -> RemoteSettings {
        RemoteSettings {
            server,
            name: "Robo".to_string(),
            password: None,
            backoff: Duration::from_millis(20),
        }
    }

    #[test]
    fn test_connect_command_fields() {
        let hub = Arc::new(SessionHub::new(None, None, EventSender::new()));
        let (session, _link) = RemoteSession::new(settings("127.0.0.1:1".to_string()), hub);

        let Command::Connect(connect) = session.connect_command() else {
            panic!("expected Connect");
        };
        assert_eq!(connect.game, "Chibi Robo");
        assert_eq!(connect.name, "Robo");
        assert_eq!(connect.items_handling, Some(0b111));
        assert_eq!(connect.slot_data, Some(true));
        assert!(connect.tags.is_empty());

        let uuid = connect.uuid.unwrap();
        assert_eq!(uuid.len(), 32);
        assert!(uuid.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_client_uuid_differs_per_run() {
        assert_ne!(client_uuid(), client_uuid());
    }

    #[test]
    fn test_session_url() {
        assert_eq!(session_url("localhost:38281"), "ws://localhost:38281");
        assert_eq!(session_url("wss://example.net:38281"), "wss://example.net:38281");
    }

    #[tokio::test]
    async fn test_handshake_and_outbound_after_auth() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let hub = Arc::new(SessionHub::new(None, None, EventSender::new()));
        let (session, link) = RemoteSession::new(settings(addr.to_string()), Arc::clone(&hub));
        let shutdown = crate::shutdown::Shutdown::new();
        let task = tokio::spawn(session.run(shutdown.subscribe()));

        // Queued before authentication; must be held back
        link.send(vec![Command::Unknown(serde_json::json!({"cmd": "Sync"}))]);

        let (socket, _) = listener.accept().await.unwrap();
        let mut server = accept_async(socket).await.unwrap();

        let room = encode(&[Command::RoomInfo(RoomInfo {
            seed_name: "seed-a".to_string(),
            extra: Map::new(),
        })])
        .unwrap();
        server.send(Message::text(room)).await.unwrap();

        let connect = server.next().await.unwrap().unwrap().into_text().unwrap();
        assert_eq!(decode(connect.as_str()).unwrap()[0].name(), "Connect");
        assert_eq!(hub.seed_name().as_deref(), Some("seed-a"));

        let connected = encode(&[Command::Connected(Connected {
            team: 0,
            slot: 2,
            players: vec![NetworkPlayer {
                team: 0,
                slot: 2,
                alias: "Robo".to_string(),
                name: "Robo".to_string(),
                extra: Map::new(),
            }],
            slot_info: Map::new(),
            extra: Map::new(),
        })])
        .unwrap();
        server.send(Message::text(connected)).await.unwrap();

        let sync = server.next().await.unwrap().unwrap().into_text().unwrap();
        assert_eq!(decode(sync.as_str()).unwrap()[0].name(), "Sync");
        assert!(hub.is_connected());
        assert_eq!(hub.slot(), Some(2));

        shutdown.trigger();
        task.await.unwrap();
    }
}
