//! Queue of commands for the panel host.
//!
//! Producers (reconciler, action handlers) push synchronously, so a command
//! can be queued while panel state is locked. One writer task drains the
//! queue in order, which keeps updates for a control in the order they were
//! produced.

use serde_json::Value;
use tokio::sync::mpsc;

use crate::assets::ImageKey;
use crate::host::protocol::ControlId;

/// A command waiting to be sent to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetImage { control: ControlId, image: ImageKey },
    ShowAlert { control: ControlId },
    RequestSettings { control: ControlId },
    RequestGlobalSettings,
    PersistSettings { control: ControlId, payload: Value },
    PersistGlobalSettings { payload: Value },
}

/// Sending half of the command queue.
#[derive(Debug, Clone)]
pub struct Outbox {
    tx: mpsc::UnboundedSender<Command>,
}

impl Outbox {
    /// Create an outbox and the receiver the writer task drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Command>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn set_image(&self, control: &ControlId, image: ImageKey) {
        self.send(Command::SetImage {
            control: control.clone(),
            image,
        });
    }

    pub fn show_alert(&self, control: &ControlId) {
        self.send(Command::ShowAlert {
            control: control.clone(),
        });
    }

    pub fn request_settings(&self, control: &ControlId) {
        self.send(Command::RequestSettings {
            control: control.clone(),
        });
    }

    pub fn request_global_settings(&self) {
        self.send(Command::RequestGlobalSettings);
    }

    pub fn persist_settings(&self, control: &ControlId, payload: Value) {
        self.send(Command::PersistSettings {
            control: control.clone(),
            payload,
        });
    }

    pub fn persist_global_settings(&self, payload: Value) {
        self.send(Command::PersistGlobalSettings { payload });
    }

    fn send(&self, command: Command) {
        if self.tx.send(command).is_err() {
            tracing::debug!("Host writer stopped, dropping command");
        }
    }
}
