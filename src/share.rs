//! Sharing the displayed barcode, with clipboard fallback

use crate::error::{Error, Result};
use crate::export::export_filename;
use crate::output::{Notification, NotificationKind};
use crate::qr::RasterImage;
use crate::session::Session;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Title attached to every share request.
pub const SHARE_TITLE: &str = "UPI Payment QR Code";

/// File attached to a share request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareFile {
    /// File name presented to the receiving app
    pub name: String,
    /// MIME type of `image`
    pub mime_type: &'static str,
    /// Raster bytes
    pub image: RasterImage,
}

/// Payload handed to the platform share sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    /// Share sheet title
    pub title: String,
    /// Accompanying message
    pub text: String,
    /// Attached files
    pub files: Vec<ShareFile>,
}

impl ShareRequest {
    /// Request sharing one barcode image for the given payee and amount.
    pub fn for_payment(identifier: &str, amount: &str, image: RasterImage) -> Self {
        Self {
            title: SHARE_TITLE.to_string(),
            text: format!("Pay ₹{amount} to {identifier} using this QR code"),
            files: vec![ShareFile {
                name: export_filename(identifier, amount),
                mime_type: RasterImage::MIME_TYPE,
                image,
            }],
        }
    }
}

/// Which path a successful share took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Platform share sheet accepted the image
    Shared,
    /// Platform cannot share files; link text was copied instead
    LinkCopied,
}

impl ShareOutcome {
    /// Notification reporting this outcome.
    pub fn notification(self) -> Notification {
        match self {
            ShareOutcome::Shared => Notification::new(NotificationKind::Shared),
            ShareOutcome::LinkCopied => Notification::new(NotificationKind::LinkCopied),
        }
    }
}

/// Native share and clipboard capabilities
#[async_trait]
pub trait SharePlatform: Send + Sync {
    /// Whether the platform can share `request` including its files.
    fn can_share_files(&self, request: &ShareRequest) -> bool;

    /// Share through the native mechanism.
    async fn share(&self, request: ShareRequest) -> Result<()>;

    /// Place `text` on the clipboard.
    async fn write_clipboard(&self, text: &str) -> Result<()>;
}

/// Share the displayed barcode, falling back to copying the link.
///
/// Returns `None` when nothing has been generated. Failures are logged and
/// reported as a share-failure notification.
pub async fn share(session: &Session, platform: &dyn SharePlatform) -> Option<Notification> {
    session.generated()?;

    let notification = match try_share(session, platform).await {
        Ok(Some(outcome)) => outcome.notification(),
        Ok(None) => return None,
        Err(err) => {
            tracing::warn!("Failed to share QR code: {err}");
            Notification::new(NotificationKind::ShareFailed)
        }
    };
    Some(notification)
}

/// Share through the system commands described by `options`.
///
/// Unusable commands are reported the same way as any other share failure.
pub async fn share_with_options(
    session: &Session,
    options: &crate::config::ShareOptions,
) -> Option<Notification> {
    session.generated()?;

    match SystemPlatform::from_options(options) {
        Ok(platform) => share(session, &platform).await,
        Err(err) => {
            tracing::warn!("Failed to set up share commands: {err}");
            Some(Notification::new(NotificationKind::ShareFailed))
        }
    }
}

/// Share the displayed barcode, returning which path was taken.
pub async fn try_share(
    session: &Session,
    platform: &dyn SharePlatform,
) -> Result<Option<ShareOutcome>> {
    let Some(code) = session.generated() else {
        return Ok(None);
    };

    let image = code.barcode.rasterize()?;
    let request = ShareRequest::for_payment(session.identifier(), session.amount(), image);

    if platform.can_share_files(&request) {
        platform.share(request).await?;
        tracing::info!("Shared QR code through platform");
        Ok(Some(ShareOutcome::Shared))
    } else {
        platform.write_clipboard(code.link.as_str()).await?;
        tracing::info!("Platform cannot share files; copied payment link to clipboard");
        Ok(Some(ShareOutcome::LinkCopied))
    }
}

const CLIPBOARD_TOOLS: &[&[&str]] = &[
    &["wl-copy"],
    &["xclip", "-selection", "clipboard"],
    &["xsel", "--clipboard", "--input"],
    &["pbcopy"],
];

/// Share and clipboard through external commands
#[derive(Debug, Clone, Default)]
pub struct SystemPlatform {
    clipboard: Option<Vec<String>>,
    share: Option<Vec<String>>,
}

impl SystemPlatform {
    /// Use explicit commands. `share` receives the image path as its last argument.
    pub fn new(clipboard: Option<Vec<String>>, share: Option<Vec<String>>) -> Self {
        Self {
            clipboard: clipboard.filter(|cmd| !cmd.is_empty()),
            share: share.filter(|cmd| !cmd.is_empty()),
        }
    }

    /// Build from configured command strings, detecting a clipboard tool when none is given.
    pub fn from_options(options: &crate::config::ShareOptions) -> Result<Self> {
        let clipboard = match options.clipboard_command.as_deref() {
            Some(command) => Some(split_command(command)?),
            None => detect_clipboard_tool(),
        };
        let share = options
            .share_command
            .as_deref()
            .map(split_command)
            .transpose()?;

        tracing::debug!(?clipboard, ?share, "Resolved platform share commands");
        Ok(Self::new(clipboard, share))
    }

    /// Clipboard command in use, if any.
    pub fn clipboard_command(&self) -> Option<&[String]> {
        self.clipboard.as_deref()
    }

    /// Share command in use, if any.
    pub fn share_command(&self) -> Option<&[String]> {
        self.share.as_deref()
    }
}

#[async_trait]
impl SharePlatform for SystemPlatform {
    fn can_share_files(&self, request: &ShareRequest) -> bool {
        self.share.is_some() && !request.files.is_empty()
    }

    async fn share(&self, request: ShareRequest) -> Result<()> {
        let Some((program, args)) = self.share.as_ref().and_then(|cmd| cmd.split_first()) else {
            return Err(Error::Share("No share command configured".to_string()));
        };

        // Removed when dropped, on every return path
        let staging = tempfile::tempdir()?;
        let mut paths = Vec::with_capacity(request.files.len());
        for file in &request.files {
            let path = crate::export::DirectorySaver::new(staging.path()).target_path(&file.name);
            tokio::fs::write(&path, file.image.as_bytes()).await?;
            paths.push(path);
        }

        let status = Command::new(program)
            .args(args)
            .args(&paths)
            .env("UPIQR_SHARE_TITLE", &request.title)
            .env("UPIQR_SHARE_TEXT", &request.text)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|e| Error::Share(format!("Failed to launch '{program}': {e}")))?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::Share(format!("'{program}' exited with {status}")))
        }
    }

    async fn write_clipboard(&self, text: &str) -> Result<()> {
        let Some((program, args)) = self.clipboard.as_ref().and_then(|cmd| cmd.split_first())
        else {
            return Err(Error::Clipboard(
                "No clipboard tool found (install wl-copy, xclip, xsel or pbcopy)".to_string(),
            ));
        };

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|e| Error::Clipboard(format!("Failed to launch '{program}': {e}")))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
            stdin.shutdown().await?;
        }

        let status = child.wait().await?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::Clipboard(format!("'{program}' exited with {status}")))
        }
    }
}

fn split_command(command: &str) -> Result<Vec<String>> {
    let parts = shell_words::split(command)
        .map_err(|e| Error::Config(format!("Invalid command '{command}': {e}")))?;
    if parts.is_empty() {
        return Err(Error::Config("Command must not be empty".to_string()));
    }
    Ok(parts)
}

fn detect_clipboard_tool() -> Option<Vec<String>> {
    CLIPBOARD_TOOLS
        .iter()
        .find(|tool| which::which(tool[0]).is_ok())
        .map(|tool| tool.iter().map(|s| s.to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShareOptions;

    fn image() -> RasterImage {
        crate::qr::RenderedBarcode::new(vec![true], 1, 9)
            .rasterize()
            .unwrap()
    }

    #[test]
    fn test_share_request_texts() {
        let request = ShareRequest::for_payment("alice@bank", "250", image());
        assert_eq!(request.title, "UPI Payment QR Code");
        assert_eq!(request.text, "Pay ₹250 to alice@bank using this QR code");
        assert_eq!(request.files[0].name, "UPI-QR-alice@bank-250.png");
        assert_eq!(request.files[0].mime_type, "image/png");
    }

    #[test]
    fn test_outcome_notifications() {
        assert_eq!(
            ShareOutcome::Shared.notification().kind,
            NotificationKind::Shared
        );
        assert_eq!(
            ShareOutcome::LinkCopied.notification().kind,
            NotificationKind::LinkCopied
        );
    }

    #[test]
    fn test_from_options_splits_commands() {
        let options = ShareOptions {
            clipboard_command: Some("xclip -selection 'clipboard'".to_string()),
            share_command: Some("kdeconnect-cli --share".to_string()),
        };
        let platform = SystemPlatform::from_options(&options).unwrap();
        assert_eq!(
            platform.clipboard_command().unwrap(),
            ["xclip", "-selection", "clipboard"]
        );
        assert_eq!(
            platform.share_command().unwrap(),
            ["kdeconnect-cli", "--share"]
        );
    }

    #[test]
    fn test_from_options_rejects_unbalanced_quotes() {
        let options = ShareOptions {
            clipboard_command: Some("xclip 'oops".to_string()),
            share_command: None,
        };
        assert!(matches!(
            SystemPlatform::from_options(&options),
            Err(Error::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_share_command_reports_failure() {
        let mut session = Session::new();
        session.set_identifier("alice@bank");
        session.set_amount("250");
        session.generate();

        let options = ShareOptions {
            clipboard_command: None,
            share_command: Some("kdeconnect-cli 'oops".to_string()),
        };
        let notification = share_with_options(&session, &options).await.unwrap();
        assert_eq!(notification.kind, NotificationKind::ShareFailed);

        let options = ShareOptions {
            clipboard_command: Some("xclip \"unterminated".to_string()),
            share_command: None,
        };
        let notification = share_with_options(&session, &options).await.unwrap();
        assert_eq!(notification.kind, NotificationKind::ShareFailed);
    }

    #[tokio::test]
    async fn test_share_with_options_before_generate() {
        let options = ShareOptions {
            clipboard_command: None,
            share_command: Some("kdeconnect-cli 'oops".to_string()),
        };
        assert!(share_with_options(&Session::new(), &options).await.is_none());
    }

    #[test]
    fn test_file_share_needs_command() {
        let request = ShareRequest::for_payment("a@b", "1", image());
        assert!(!SystemPlatform::new(None, None).can_share_files(&request));
        assert!(
            SystemPlatform::new(None, Some(vec!["true".to_string()])).can_share_files(&request)
        );
    }

    #[tokio::test]
    async fn test_missing_clipboard_tool_errors() {
        let platform = SystemPlatform::new(None, None);
        assert!(matches!(
            platform.write_clipboard("upi://pay").await,
            Err(Error::Clipboard(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_share_command() {
        let platform = SystemPlatform::new(None, Some(vec!["false".to_string()]));
        let request = ShareRequest::for_payment("a@b", "1", image());
        assert!(matches!(platform.share(request).await, Err(Error::Share(_))));
    }
}
