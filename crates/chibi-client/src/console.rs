//! Interactive commands read from stdin.

use std::fmt::Write as _;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::session::SessionHub;
use crate::shutdown::{Shutdown, ShutdownSignal};
use crate::status::StatusCell;

/// What a console line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleReply {
    /// Text to show the user
    Print(String),
    /// Stop the client
    Exit,
}

pub struct Console {
    status: Arc<StatusCell>,
    hub: Arc<SessionHub>,
    shutdown: Shutdown,
}

impl Console {
    pub fn new(status: Arc<StatusCell>, hub: Arc<SessionHub>, shutdown: Shutdown) -> Self {
        Self {
            status,
            hub,
            shutdown,
        }
    }

    /// Interpret one input line. Blank lines produce nothing.
    pub fn execute(&self, line: &str) -> Option<ConsoleReply> {
        let command = line.split_whitespace().next()?;
        let reply = match command {
            "/dolphin" => ConsoleReply::Print(self.status.get().message().to_string()),
            "/status" => ConsoleReply::Print(self.session_status()),
            "/exit" => ConsoleReply::Exit,
            other => ConsoleReply::Print(format!(
                "Unknown command {other}. Available: /dolphin, /status, /exit"
            )),
        };
        Some(reply)
    }

    fn session_status(&self) -> String {
        let summary = self.hub.summary();
        let mut out = String::new();
        if summary.connected {
            let _ = write!(
                out,
                "Connected as {} (slot {})",
                summary.auth.as_deref().unwrap_or("?"),
                summary.slot.unwrap_or_default()
            );
        } else {
            out.push_str("Not connected to a session");
        }
        if let Some(seed) = &summary.seed_name {
            let _ = write!(out, ", seed {seed}");
        }
        let _ = write!(
            out,
            ", {} items received, {} messages waiting for the relay",
            summary.items_received, summary.outbox_len
        );
        out
    }

    /// Read stdin until `/exit`, end of input or shutdown.
    pub async fn run(self, mut shutdown: ShutdownSignal) {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = tokio::select! {
                () = shutdown.wait() => break,
                line = lines.next_line() => line,
            };
            match line {
                Ok(Some(line)) => match self.execute(&line) {
                    Some(ConsoleReply::Print(text)) => println!("{text}"),
                    Some(ConsoleReply::Exit) => {
                        info!("exit requested from console");
                        self.shutdown.trigger();
                        break;
                    }
                    None => {}
                },
                Ok(None) => {
                    debug!("stdin closed, console stopped");
                    break;
                }
                Err(e) => {
                    debug!(error = %e, "stdin unreadable, console stopped");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventSender;
    use crate::status::ConnectionStatus;
    use pretty_assertions::assert_eq;

    fn console() -> (Console, Arc<StatusCell>, Shutdown) {
        let status = Arc::new(StatusCell::new());
        let hub = Arc::new(SessionHub::new(Some("seed-a".to_string()), None, EventSender::new()));
        let shutdown = Shutdown::new();
        (
            Console::new(Arc::clone(&status), hub, shutdown.clone()),
            status,
            shutdown,
        )
    }

    #[test]
    fn test_dolphin_reports_status() {
        let (console, status, _) = console();
        status.set(ConnectionStatus::Lost);
        assert_eq!(
            console.execute("/dolphin"),
            Some(ConsoleReply::Print(ConnectionStatus::Lost.message().to_string()))
        );
    }

    #[test]
    fn test_status_summary() {
        let (console, _, _) = console();
        let Some(ConsoleReply::Print(text)) = console.execute("/status") else {
            panic!("expected text");
        };
        assert!(text.starts_with("Not connected"));
        assert!(text.contains("seed seed-a"));
    }

    #[test]
    fn test_exit_and_blank() {
        let (console, _, shutdown) = console();
        assert_eq!(console.execute("  "), None);
        assert_eq!(console.execute("/exit"), Some(ConsoleReply::Exit));
        // Triggering is left to the run loop
        assert!(!shutdown.is_triggered());
    }
}
