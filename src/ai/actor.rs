//! Generation actor for async processing of email-generation requests.
//!
//! The network call runs off the caller's context; completion is marshaled
//! back through the event channel. The busy flag and last-error value are
//! observable through `watch` channels: busy is set for the duration of each
//! call and cleared on every exit path, and the last error is cleared at the
//! start of each call. The flag is advisory only; commands sent while a
//! request is in flight queue up and run one at a time.

use tokio::sync::{mpsc, watch};

use super::client::GeminiClient;
use crate::models::{EmailFormData, SavedEmail, WritingStyle};

/// Commands that can be sent to the generation actor
#[derive(Debug)]
pub enum GenerationCommand {
    /// Generate one email from the form and the current example collections
    Generate {
        form: EmailFormData,
        saved_emails: Vec<SavedEmail>,
        writing_styles: Vec<WritingStyle>,
    },
    /// Shutdown the actor
    Shutdown,
}

/// Events emitted by the generation actor
#[derive(Debug, Clone)]
pub enum GenerationEvent {
    /// Generation completed with the produced email text
    Generated(String),
    /// Generation failed; the message is ready to show the user
    Failed(String),
}

/// Handle for communicating with the generation actor
pub struct GenerationHandle {
    pub cmd_tx: mpsc::Sender<GenerationCommand>,
    pub event_rx: mpsc::Receiver<GenerationEvent>,
    busy_rx: watch::Receiver<bool>,
    error_rx: watch::Receiver<Option<String>>,
}

impl GenerationHandle {
    /// Whether a generation request is currently in flight. Advisory only.
    #[allow(dead_code)]
    pub fn is_busy(&self) -> bool {
        *self.busy_rx.borrow()
    }

    /// The error from the most recent request, cleared when a new one starts.
    #[allow(dead_code)]
    pub fn last_error(&self) -> Option<String> {
        self.error_rx.borrow().clone()
    }
}

/// Spawn the generation actor task
pub fn spawn_generation_actor(client: GeminiClient) -> GenerationHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (event_tx, event_rx) = mpsc::channel(32);
    let (busy_tx, busy_rx) = watch::channel(false);
    let (error_tx, error_rx) = watch::channel(None);

    tokio::spawn(generation_actor_loop(
        client, cmd_rx, event_tx, busy_tx, error_tx,
    ));

    GenerationHandle {
        cmd_tx,
        event_rx,
        busy_rx,
        error_rx,
    }
}

async fn generation_actor_loop(
    client: GeminiClient,
    mut cmd_rx: mpsc::Receiver<GenerationCommand>,
    event_tx: mpsc::Sender<GenerationEvent>,
    busy_tx: watch::Sender<bool>,
    error_tx: watch::Sender<Option<String>>,
) {
    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            GenerationCommand::Generate {
                form,
                saved_emails,
                writing_styles,
            } => {
                busy_tx.send_replace(true);
                error_tx.send_replace(None);

                let result = client.generate(&form, &saved_emails, &writing_styles).await;

                // Busy drops before the event is observable, success or not
                busy_tx.send_replace(false);

                let event = match result {
                    Ok(text) => GenerationEvent::Generated(text),
                    Err(e) => {
                        let message = e.to_string();
                        error_tx.send_replace(Some(message.clone()));
                        GenerationEvent::Failed(message)
                    }
                };

                if event_tx.send(event).await.is_err() {
                    tracing::warn!("Generation actor: event receiver dropped");
                    break;
                }
            }

            GenerationCommand::Shutdown => {
                break;
            }
        }
    }
}
