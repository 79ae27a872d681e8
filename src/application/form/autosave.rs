//! Debounced draft autosave.
//!
//! Every change hands a fresh snapshot to a background task. The task keeps
//! only the newest one and writes it once no further snapshot has arrived
//! for the debounce delay.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use super::session::FormSession;

pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(1000);

enum Command {
    Snapshot(String),
    Flush(oneshot::Sender<()>),
    Clear(oneshot::Sender<()>),
}

/// Handle to the autosave task. Dropping it writes any pending snapshot and
/// stops the task.
pub struct Autosaver {
    tx: mpsc::UnboundedSender<Command>,
}

impl Autosaver {
    /// Spawn the autosave task. Must be called from within a tokio runtime.
    pub fn spawn(session: FormSession, delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(session, delay, rx));
        Self { tx }
    }

    /// Queue `snapshot`, replacing any snapshot not yet written.
    pub fn schedule(&self, snapshot: String) {
        if self.tx.send(Command::Snapshot(snapshot)).is_err() {
            tracing::warn!("Autosave task is gone, snapshot dropped");
        }
    }

    /// Write the pending snapshot now.
    pub async fn flush(&self) {
        self.request(Command::Flush).await;
    }

    /// Drop the pending snapshot and remove all local form state.
    pub async fn clear(&self) {
        self.request(Command::Clear).await;
    }

    async fn request(&self, command: fn(oneshot::Sender<()>) -> Command) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(command(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
    }
}

fn write(session: &FormSession, snapshot: Option<String>) {
    if let Some(snapshot) = snapshot {
        if let Err(e) = session.save_draft(&snapshot) {
            tracing::warn!(error = %e, "Failed to autosave draft");
        }
    }
}

async fn run(session: FormSession, delay: Duration, mut rx: mpsc::UnboundedReceiver<Command>) {
    let mut pending: Option<String> = None;

    loop {
        let command = if pending.is_some() {
            match tokio::time::timeout(delay, rx.recv()).await {
                Ok(command) => command,
                Err(_) => {
                    write(&session, pending.take());
                    continue;
                }
            }
        } else {
            rx.recv().await
        };

        match command {
            Some(Command::Snapshot(snapshot)) => pending = Some(snapshot),
            Some(Command::Flush(ack)) => {
                write(&session, pending.take());
                let _ = ack.send(());
            }
            Some(Command::Clear(ack)) => {
                pending = None;
                if let Err(e) = session.clear() {
                    tracing::warn!(error = %e, "Failed to clear local form state");
                }
                let _ = ack.send(());
            }
            None => {
                write(&session, pending.take());
                break;
            }
        }
    }

    tracing::debug!("Autosave task stopped");
}
