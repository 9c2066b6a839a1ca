//! Vector-to-raster conversion of rendered barcodes

use crate::error::Result;
use crate::qr::RenderedBarcode;
use bytes::Bytes;
use image::{GrayImage, ImageFormat, Luma};
use std::io::Cursor;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// PNG-encoded raster of a barcode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    /// Encoded PNG bytes
    pub png: Bytes,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl RasterImage {
    /// MIME type of the encoded bytes.
    pub const MIME_TYPE: &'static str = "image/png";

    /// Raw PNG bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.png
    }
}

impl RenderedBarcode {
    /// Rasterize into a `size` × `size` grayscale PNG.
    ///
    /// The drawing surface lives only for the duration of this call.
    pub fn rasterize(&self) -> Result<RasterImage> {
        let size = self.size();
        let surface = self.draw(size);

        let mut png = Vec::new();
        surface.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

        tracing::debug!(size, bytes = png.len(), "Rasterized QR code");

        Ok(RasterImage {
            png: Bytes::from(png),
            width: size,
            height: size,
        })
    }

    fn draw(&self, size: u32) -> GrayImage {
        let cells = self.cells();
        let edge = size as usize;
        let cell_of = |pixel: u32| (pixel as usize * cells) / edge.max(1);

        let mut surface = GrayImage::from_pixel(size, size, LIGHT);
        for y in 0..size {
            let cy = cell_of(y);
            for x in 0..size {
                if self.is_dark_cell(cell_of(x), cy) {
                    surface.put_pixel(x, y, DARK);
                }
            }
        }
        surface
    }
}
