//! Payment link to QR module matrix

use crate::error::Result;
use crate::link::PaymentLink;
use crate::qr::RenderedBarcode;
use qrcode::{Color, EcLevel, QrCode};

/// Edge length, in pixels, of the displayed and exported barcode.
pub const DISPLAY_SIZE: u32 = 200;

/// Light modules surrounding the symbol on every side.
pub const QUIET_ZONE: usize = 4;

/// QR code renderer with fixed rendering parameters
#[derive(Debug, Clone, Copy)]
pub struct BarcodeRenderer {
    ecc_level: EcLevel,
    size: u32,
}

impl BarcodeRenderer {
    /// Medium error correction, 200 px, quiet zone included
    pub fn new() -> Self {
        Self {
            ecc_level: EcLevel::M,
            size: DISPLAY_SIZE,
        }
    }

    /// Error correction level used for every barcode.
    pub fn ecc_level(&self) -> EcLevel {
        self.ecc_level
    }

    /// Render a payment link into its barcode.
    pub fn render(&self, link: &PaymentLink) -> Result<RenderedBarcode> {
        let code = QrCode::with_error_correction_level(link.as_bytes(), self.ecc_level)?;
        let width = code.width();
        let modules = code
            .to_colors()
            .into_iter()
            .map(|color| color == Color::Dark)
            .collect();

        tracing::debug!(
            version = ?code.version(),
            width,
            size = self.size,
            "Rendered payment QR code"
        );

        Ok(RenderedBarcode::new(modules, width, self.size))
    }
}

impl Default for BarcodeRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link;

    #[test]
    fn test_render_payment_link() {
        let link = link::encode("alice@bank", "250").unwrap();
        let code = BarcodeRenderer::new().render(&link).unwrap();
        assert_eq!(code.size(), DISPLAY_SIZE);
        // Finder pattern corner is always dark
        assert!(code.is_dark(0, 0));
        assert!(code.width() >= 21);
    }

    #[test]
    fn test_render_is_idempotent() {
        let renderer = BarcodeRenderer::new();
        let link = link::encode("merchant@ybl", "1200.75").unwrap();
        assert_eq!(renderer.render(&link).unwrap(), renderer.render(&link).unwrap());
    }

    #[test]
    fn test_fixed_ecc_level() {
        assert_eq!(BarcodeRenderer::default().ecc_level(), EcLevel::M);
    }
}
