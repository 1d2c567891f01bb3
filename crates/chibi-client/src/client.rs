//! Client orchestration.
//!
//! Wires the poll loop, relay, remote session, event logger and console
//! around one [`SessionHub`] and one shutdown signal.

use std::sync::Arc;

use chibi_memory::{DolphinProcess, GameProcess};
use chibi_protocol::Command;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::artifact::OutputArtifact;
use crate::config::ClientConfig;
use crate::console::Console;
use crate::error::ClientError;
use crate::events::{ClientEvent, EventSender};
use crate::layout::MemoryLayout;
use crate::poll::PollLoop;
use crate::relay::{Relay, start_relay};
use crate::remote::{RemoteSession, RemoteSettings};
use crate::session::{SessionHub, SessionLink};
use crate::shutdown::Shutdown;
use crate::status::StatusCell;

/// Link used when no remote server is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineLink;

impl SessionLink for OfflineLink {
    fn send(&self, commands: Vec<Command>) {
        debug!(count = commands.len(), "no session configured, dropping commands");
    }
}

/// The assembled client.
pub struct Client {
    config: ClientConfig,
    artifact: Option<OutputArtifact>,
    layout: MemoryLayout,
    status: Arc<StatusCell>,
    hub: Arc<SessionHub>,
    shutdown: Shutdown,
}

impl Client {
    /// Create a client from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the artifact cannot be loaded.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let artifact = match &config.artifact {
            Some(path) => {
                info!("Loading artifact from {}", path.display());
                let artifact = OutputArtifact::load(path)?;
                info!(
                    seed = %artifact.seed,
                    slot = artifact.slot,
                    name = %artifact.name,
                    placements = artifact.locations.len(),
                    "artifact loaded"
                );
                Some(artifact)
            }
            None => None,
        };

        let seed_name = artifact.as_ref().map(|a| a.seed.clone());
        let auth = config
            .name
            .clone()
            .or_else(|| artifact.as_ref().map(|a| a.name.clone()));
        let hub = SessionHub::new(seed_name, auth, EventSender::new());

        Ok(Self {
            config,
            artifact,
            layout: MemoryLayout::GGTP01,
            status: Arc::new(StatusCell::new()),
            hub: Arc::new(hub),
            shutdown: Shutdown::new(),
        })
    }

    pub fn hub(&self) -> &Arc<SessionHub> {
        &self.hub
    }

    pub fn status(&self) -> &Arc<StatusCell> {
        &self.status
    }

    /// Handle that stops the client when triggered.
    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Run against the local Dolphin instance until shutdown.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the configuration is invalid or the relay
    /// cannot bind.
    pub async fn run(self) -> Result<(), ClientError> {
        self.run_with(DolphinProcess::new()).await
    }

    /// Run against any process backend until shutdown.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the configuration is invalid or the relay
    /// cannot bind.
    pub async fn run_with<P>(self, process: P) -> Result<(), ClientError>
    where
        P: GameProcess + 'static,
    {
        let relay_addr = self.config.relay_addr()?;
        let mut tasks: Vec<JoinHandle<()>> = Vec::new();

        tasks.push(tokio::spawn(log_events(
            self.hub.events().subscribe(),
            self.shutdown.subscribe(),
        )));

        let link: Arc<dyn SessionLink> = match &self.config.server {
            Some(server) => {
                let name = self
                    .config
                    .name
                    .clone()
                    .or_else(|| self.artifact.as_ref().map(|a| a.name.clone()))
                    .unwrap_or_default();
                let settings = RemoteSettings {
                    server: server.clone(),
                    name,
                    password: self.config.password.clone(),
                    backoff: self.config.backoff(),
                };
                let (session, link) = RemoteSession::new(settings, Arc::clone(&self.hub));
                tasks.push(tokio::spawn(session.run(self.shutdown.subscribe())));
                Arc::new(link)
            }
            None => {
                warn!("no --server given; running relay and emulator sync offline");
                Arc::new(OfflineLink)
            }
        };

        let relay = Arc::new(Relay::new(Arc::clone(&self.hub), Arc::clone(&link)));
        start_relay(
            relay_addr,
            relay,
            self.config.drain_interval(),
            self.shutdown.subscribe(),
        )
        .await?;

        let poll = PollLoop::new(
            process,
            self.layout,
            self.config.poll_settings(),
            Arc::clone(&self.status),
            Arc::clone(&self.hub),
            link,
        );
        tasks.push(tokio::spawn(poll.run(self.shutdown.subscribe())));

        let console = Console::new(
            Arc::clone(&self.status),
            Arc::clone(&self.hub),
            self.shutdown.clone(),
        );
        // Not joined: stdin reads cannot be cancelled
        tokio::spawn(console.run(self.shutdown.subscribe()));

        let mut signal = self.shutdown.subscribe();
        tokio::select! {
            () = signal.wait() => {}
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    warn!(error = %e, "failed to listen for Ctrl-C");
                }
                info!("interrupt received, shutting down");
                self.shutdown.trigger();
            }
        }

        for task in tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "task ended abnormally");
            }
        }
        info!("client stopped");
        Ok(())
    }
}

/// Log client events until shutdown.
async fn log_events(
    mut events: broadcast::Receiver<ClientEvent>,
    mut shutdown: crate::shutdown::ShutdownSignal,
) {
    loop {
        let event = tokio::select! {
            () = shutdown.wait() => break,
            event = events.recv() => event,
        };
        match event {
            Ok(ClientEvent::StatusChanged { from, to }) => {
                debug!(?from, ?to, "emulator status changed");
            }
            Ok(ClientEvent::AreaChanged { from, to }) => info!("moved from {from} to {to}"),
            Ok(ClientEvent::ItemApplied { name, index }) => info!(index, "received {name}"),
            Ok(ClientEvent::LocationsChecked { names }) => {
                info!("checked {}", names.join(", "));
            }
            Ok(ClientEvent::GoalCompleted) => info!("goal complete"),
            Ok(ClientEvent::Chat(line)) => info!(target: "chat", "{line}"),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "event logger fell behind");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
