// ─── Installer Events ───
// Messages sent from the background worker to the display layer.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::core::version::ControlAction;

/// Payload for the progress bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub percent: u8,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallerEvent {
    Progress(Progress),
    /// Status line under the progress bar.
    Info { message: String },
    Notification { title: String, message: String },
    /// `context` reads like "Error during extraction"; `detail` carries the debug chain.
    Error {
        context: String,
        message: String,
        detail: String,
    },
    Title { text: String },
    Action { action: ControlAction },
    /// The worker is done and the control action may be used again.
    Idle,
}

/// Sending half handed to background work. Sends never fail loudly: a closed
/// display just means nobody is watching anymore.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: UnboundedSender<InstallerEvent>,
}

pub fn channel() -> (EventSender, UnboundedReceiver<InstallerEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, rx)
}

impl EventSender {
    pub fn emit(&self, event: InstallerEvent) {
        let _ = self.tx.send(event);
    }

    pub fn progress(&self, percent: u8, message: impl Into<String>) {
        self.emit(InstallerEvent::Progress(Progress {
            percent,
            message: message.into(),
        }));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.emit(InstallerEvent::Info {
            message: message.into(),
        });
    }

    pub fn notify(&self, title: impl Into<String>, message: impl Into<String>) {
        self.emit(InstallerEvent::Notification {
            title: title.into(),
            message: message.into(),
        });
    }

    pub fn error(&self, context: impl Into<String>, error: &dyn std::error::Error) {
        self.emit(InstallerEvent::Error {
            context: context.into(),
            message: error.to_string(),
            detail: format!("{error:?}"),
        });
    }

    pub fn title(&self, text: impl Into<String>) {
        self.emit(InstallerEvent::Title { text: text.into() });
    }

    pub fn action(&self, action: ControlAction) {
        self.emit(InstallerEvent::Action { action });
    }

    pub fn idle(&self) {
        self.emit(InstallerEvent::Idle);
    }
}
