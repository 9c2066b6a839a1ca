//! Saving the displayed barcode as a PNG file

use crate::error::Result;
use crate::qr::RasterImage;
use crate::session::Session;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// File name for an exported barcode.
pub fn export_filename(identifier: &str, amount: &str) -> String {
    format!("UPI-QR-{identifier}-{amount}.png")
}

/// Client-local file save
#[async_trait]
pub trait FileSaver: Send + Sync {
    /// Persist `bytes` under `file_name`, returning where they ended up.
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Outcome of a successful export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    /// Name requested from the saver
    pub file_name: String,
    /// Location reported by the saver
    pub path: PathBuf,
    /// The raster that was written
    pub image: RasterImage,
}

/// Rasterize the displayed barcode and hand it to `saver`.
///
/// Returns `Ok(None)` when nothing has been generated yet. The file name uses
/// the session's current fields.
pub async fn export(session: &Session, saver: &dyn FileSaver) -> Result<Option<ExportedImage>> {
    let Some(barcode) = session.barcode() else {
        tracing::debug!("Export requested with no QR code displayed");
        return Ok(None);
    };

    let image = barcode.rasterize()?;
    let file_name = export_filename(session.identifier(), session.amount());
    let path = saver.save(&file_name, image.as_bytes()).await?;

    tracing::info!(path = %path.display(), bytes = image.png.len(), "Saved QR code image");

    Ok(Some(ExportedImage {
        file_name,
        path,
        image,
    }))
}

/// Saves files into a directory on the local filesystem
#[derive(Debug, Clone)]
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    /// Save into `dir`, creating it on first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a file name resolves to, with separators replaced so it stays inside `dir`.
    pub fn target_path(&self, file_name: &str) -> PathBuf {
        let safe: String = file_name
            .chars()
            .map(|c| match c {
                '/' | '\\' | '\0' => '_',
                other => other,
            })
            .collect();
        self.dir.join(safe)
    }
}

#[async_trait]
impl FileSaver for DirectorySaver {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        if !self.dir.as_os_str().is_empty() {
            tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
                crate::Error::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create directory {}: {e}", self.dir.display()),
                ))
            })?;
        }

        let path = self.target_path(file_name);
        tokio::fs::write(&path, bytes).await.map_err(|e| {
            crate::Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write {}: {e}", path.display()),
            ))
        })?;

        Ok(path)
    }
}
