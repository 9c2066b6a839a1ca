//! UPIQR - UPI payment QR codes from the terminal
//!
//! This library turns a UPI ID and an amount into a `upi://pay` deep-link,
//! renders it as a QR code, and exports or shares the code as a PNG image.
//!
//! # Features
//!
//! - **Link encoding**: validated, percent-encoded `upi://pay` links
//! - **QR rendering**: fixed-parameter QR codes as SVG, terminal art or PNG
//! - **Export / share**: pluggable file-save and share/clipboard platforms
//!
//! # Example
//!
//! ```no_run
//! use upiqr::{DirectorySaver, Session, export};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut session = Session::new();
//!     session.set_identifier("alice@bank");
//!     session.set_amount("250");
//!
//!     let notification = session.generate();
//!     println!("{}", notification.human_line());
//!
//!     let saved = export::export(&session, &DirectorySaver::new(".")).await?;
//!     println!("Saved: {:?}", saved.map(|image| image.path));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]

pub mod config;
pub mod error;
pub mod export;
pub mod link;
pub mod logging;
pub mod output;
pub mod qr;
pub mod session;
pub mod share;

// Re-exports for convenience
pub use error::{Error, Result};

pub use config::{ExportOptions, LogRotation, LoggingOptions, ShareOptions, UpiqrConfig};
pub use export::{DirectorySaver, ExportedImage, FileSaver, export_filename};
pub use link::{PaymentLink, ValidationError};
pub use output::{ConsoleNotifier, Notification, NotificationKind, Notifier, Variant};
pub use qr::{BarcodeRenderer, RasterImage, RenderedBarcode};
pub use session::{GeneratedCode, Session};
pub use share::{SharePlatform, ShareOutcome, ShareRequest, SystemPlatform};
