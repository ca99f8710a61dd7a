//! WebSocket session with the panel host.
//!
//! # Responsibilities
//! - Connect to the host on loopback, with backoff
//! - Register the plugin
//! - Decode inbound frames and hand them to the action registry
//! - Drain the outbox, resolving image keys to encoded images
//!
//! # Design Decisions
//! - One task owns both halves of the socket; commands are written in
//!   queue order
//! - The session ends when the host closes the socket or on shutdown

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::actions::ActionRegistry;
use crate::assets::ImageCache;
use crate::config::HostConfig;
use crate::host::outbox::Command;
use crate::host::protocol::{
    HostEvent, ImagePayload, OutboundMessage, Registration, TARGET_HARDWARE_AND_SOFTWARE,
};
use crate::resilience::backoff::connect_delay;

pub type HostStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Errors on the panel host connection.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("panel host unreachable at {url} after {attempts} attempts")]
    Unreachable { url: String, attempts: u32 },

    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// How the host launched us.
#[derive(Debug, Clone)]
pub struct HostIdentity {
    /// Loopback port of the host's WebSocket server.
    pub port: u16,
    pub plugin_uuid: String,
    pub register_event: String,
}

impl HostIdentity {
    pub fn url(&self) -> String {
        format!("ws://127.0.0.1:{}", self.port)
    }
}

/// Open the WebSocket, retrying with backoff.
pub async fn connect(identity: &HostIdentity, config: &HostConfig) -> Result<HostStream, HostError> {
    let url = identity.url();
    for attempt in 1..=config.connect_attempts {
        let delay = connect_delay(attempt, config);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match connect_async(url.as_str()).await {
            Ok((stream, _)) => {
                tracing::info!(url = %url, attempt, "Connected to panel host");
                return Ok(stream);
            }
            Err(e) => {
                tracing::warn!(url = %url, attempt, error = %e, "Panel host connection failed");
            }
        }
    }

    Err(HostError::Unreachable {
        url,
        attempts: config.connect_attempts,
    })
}

/// A registered session: reads host events, writes queued commands.
pub struct HostSession {
    identity: HostIdentity,
    registry: Arc<ActionRegistry>,
    images: ImageCache,
}

impl HostSession {
    pub fn new(identity: HostIdentity, registry: Arc<ActionRegistry>, images: ImageCache) -> Self {
        Self {
            identity,
            registry,
            images,
        }
    }

    /// Register and run until the host disconnects or shutdown fires.
    pub async fn run(
        self,
        stream: HostStream,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), HostError> {
        let (mut ws_tx, mut ws_rx) = stream.split();

        let registration = Registration {
            event: self.identity.register_event.clone(),
            uuid: self.identity.plugin_uuid.clone(),
        };
        ws_tx.send(Message::text(serde_json::to_string(&registration)?)).await?;
        tracing::info!(uuid = %registration.uuid, "Plugin registered");

        loop {
            tokio::select! {
                frame = ws_rx.next() => match frame {
                    Some(Ok(Message::Text(text))) => self.on_text(text.as_str()),
                    Some(Ok(Message::Close(frame))) => {
                        tracing::info!(?frame, "Panel host closed the connection");
                        return Ok(());
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => {
                        tracing::info!("Panel host connection ended");
                        return Ok(());
                    }
                },
                command = commands.recv() => {
                    let Some(command) = command else {
                        return Ok(());
                    };
                    if let Some(message) = encode_command(command, &self.images, &self.identity.plugin_uuid).await {
                        ws_tx.send(Message::text(serde_json::to_string(&message)?)).await?;
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Host session received shutdown signal");
                    let _ = ws_tx.close().await;
                    return Ok(());
                }
            }
        }
    }

    fn on_text(&self, text: &str) {
        match HostEvent::parse(text) {
            Ok(event) => self.registry.dispatch(event),
            Err(e) => tracing::warn!(error = %e, "Ignoring malformed host message"),
        }
    }
}

/// Turn a queued command into a wire message.
///
/// Returns `None` when an image cannot be loaded; the button keeps its
/// current image.
pub async fn encode_command(
    command: Command,
    images: &ImageCache,
    plugin_uuid: &str,
) -> Option<OutboundMessage> {
    let message = match command {
        Command::SetImage { control, image } => match images.data_url(image).await {
            Ok(url) => OutboundMessage::SetImage {
                context: control,
                payload: ImagePayload {
                    image: url.to_string(),
                    target: TARGET_HARDWARE_AND_SOFTWARE,
                },
            },
            Err(e) => {
                tracing::warn!(image = image.file_name(), error = %e, "Failed to load button image");
                return None;
            }
        },
        Command::ShowAlert { control } => OutboundMessage::ShowAlert { context: control },
        Command::RequestSettings { control } => OutboundMessage::GetSettings { context: control },
        Command::RequestGlobalSettings => OutboundMessage::GetGlobalSettings {
            context: plugin_uuid.to_string(),
        },
        Command::PersistSettings { control, payload } => OutboundMessage::SetSettings {
            context: control,
            payload,
        },
        Command::PersistGlobalSettings { payload } => OutboundMessage::SetGlobalSettings {
            context: plugin_uuid.to_string(),
            payload,
        },
    };
    Some(message)
}
