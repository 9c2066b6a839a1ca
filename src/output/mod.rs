//! User-facing notifications and their terminal rendering

use serde::Serialize;
use serde_json::{Value, json};
use std::io::Write;
use std::sync::Mutex;

/// Which event a notification reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Identifier was empty
    MissingIdentifier,
    /// Amount was not a positive number
    InvalidAmount,
    /// A new barcode was generated
    Generated,
    /// Inputs validated but no barcode could be produced
    GenerateFailed,
    /// Platform share completed
    Shared,
    /// Fell back to copying the link to the clipboard
    LinkCopied,
    /// Share sequence failed
    ShareFailed,
    /// Export to file failed
    ExportFailed,
}

/// Visual emphasis of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Informational
    Default,
    /// Error
    Destructive,
}

/// Short title + description pair shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Event category
    pub kind: NotificationKind,
    /// Short heading
    pub title: &'static str,
    /// One-line explanation
    pub description: &'static str,
    /// Emphasis
    pub variant: Variant,
}

impl Notification {
    /// Build the canonical notification for `kind`.
    pub fn new(kind: NotificationKind) -> Self {
        let (title, description, variant) = match kind {
            NotificationKind::MissingIdentifier => (
                "UPI ID Required",
                "Please enter a valid UPI ID",
                Variant::Destructive,
            ),
            NotificationKind::InvalidAmount => (
                "Invalid Amount",
                "Please enter a valid amount greater than 0",
                Variant::Destructive,
            ),
            NotificationKind::Generated => (
                "QR Code Generated",
                "Your UPI QR code is ready for use",
                Variant::Default,
            ),
            NotificationKind::GenerateFailed => (
                "Generation Failed",
                "Unable to generate QR code for these details",
                Variant::Destructive,
            ),
            NotificationKind::Shared => (
                "Shared Successfully",
                "QR code shared successfully",
                Variant::Default,
            ),
            NotificationKind::LinkCopied => (
                "Link Copied",
                "UPI payment link copied to clipboard for sharing",
                Variant::Default,
            ),
            NotificationKind::ShareFailed => (
                "Share Failed",
                "Unable to share QR code",
                Variant::Destructive,
            ),
            NotificationKind::ExportFailed => (
                "Download Failed",
                "Unable to save QR code image",
                Variant::Destructive,
            ),
        };

        Self {
            kind,
            title,
            description,
            variant,
        }
    }

    /// Whether this notification reports a failure.
    pub fn is_error(&self) -> bool {
        self.variant == Variant::Destructive
    }

    /// Structured representation for downstream consumers.
    pub fn to_json(&self) -> Value {
        json!({
            "kind": self.kind,
            "title": self.title,
            "description": self.description,
            "variant": self.variant,
        })
    }

    /// Single human-readable line.
    pub fn human_line(&self) -> String {
        let marker = match self.variant {
            Variant::Default => "✓",
            Variant::Destructive => "✗",
        };
        format!("{marker} {}: {}", self.title, self.description)
    }
}

/// Sink for user notifications
pub trait Notifier: Send + Sync {
    /// Surface a notification to the user.
    fn notify(&self, notification: &Notification);
}

/// Writes notifications to stdout as text or JSON lines
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier {
    json: bool,
}

impl ConsoleNotifier {
    /// Create a console notifier, emitting JSON lines when `json` is set.
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Whether notifications are emitted as JSON.
    pub fn json(&self) -> bool {
        self.json
    }

    fn write_to(&self, out: &mut impl Write, notification: &Notification) -> std::io::Result<()> {
        if self.json {
            writeln!(out, "{}", notification.to_json())
        } else {
            writeln!(out, "{}", notification.human_line())
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: &Notification) {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        if let Err(err) = self.write_to(&mut lock, notification) {
            tracing::debug!("Failed to write notification: {err}");
        }
    }
}

/// Collects notifications in memory
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(notification.clone());
        }
    }
}
