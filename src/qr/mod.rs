//! QR code rendering and rasterization
//!
//! A [`RenderedBarcode`] is the vector form of a payment link: the module
//! matrix plus the pixel size it is displayed at. It can be projected to SVG,
//! terminal art, or rasterized into PNG bytes on demand.

mod encoder;
mod raster;

pub use encoder::{BarcodeRenderer, DISPLAY_SIZE, QUIET_ZONE};
pub use raster::RasterImage;

use std::fmt::Write as _;

/// A QR code ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBarcode {
    /// Dark/light state of each module, row-major
    modules: Vec<bool>,
    /// Modules per side, excluding the quiet zone
    width: usize,
    /// Displayed edge length in pixels, including the quiet zone
    size: u32,
}

impl RenderedBarcode {
    pub(crate) fn new(modules: Vec<bool>, width: usize, size: u32) -> Self {
        debug_assert_eq!(modules.len(), width * width);
        Self {
            modules,
            width,
            size,
        }
    }

    /// Modules per side, excluding the quiet zone.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Displayed edge length in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Modules per side including the quiet zone on both edges.
    pub fn cells(&self) -> usize {
        self.width + 2 * QUIET_ZONE
    }

    /// Whether the module at (`x`, `y`) is dark. Coordinates exclude the quiet zone.
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.modules[y * self.width + x]
    }

    /// Whether the cell at (`x`, `y`) is dark, where cells include the quiet zone.
    pub(crate) fn is_dark_cell(&self, x: usize, y: usize) -> bool {
        match (x.checked_sub(QUIET_ZONE), y.checked_sub(QUIET_ZONE)) {
            (Some(mx), Some(my)) => self.is_dark(mx, my),
            _ => false,
        }
    }

    /// Serialize as a standalone SVG document, `size` pixels square.
    pub fn to_svg(&self) -> String {
        let cells = self.cells();
        let mut path = String::new();

        for y in 0..self.width {
            let mut x = 0;
            while x < self.width {
                if !self.is_dark(x, y) {
                    x += 1;
                    continue;
                }
                let start = x;
                while x < self.width && self.is_dark(x, y) {
                    x += 1;
                }
                let _ = write!(
                    path,
                    "M{} {}h{}v1H{}z",
                    start + QUIET_ZONE,
                    y + QUIET_ZONE,
                    x - start,
                    start + QUIET_ZONE
                );
            }
        }

        format!(
            concat!(
                "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{size}\" height=\"{size}\" ",
                "viewBox=\"0 0 {cells} {cells}\" shape-rendering=\"crispEdges\">",
                "<path fill=\"#FFFFFF\" d=\"M0,0 h{cells}v{cells}H0z\"/>",
                "<path fill=\"#000000\" d=\"{path}\"/>",
                "</svg>"
            ),
            size = self.size,
            cells = cells,
            path = path,
        )
    }

    /// Render as Unicode half-block art for terminals.
    ///
    /// Light modules are drawn as blocks so the code reads correctly on dark
    /// backgrounds.
    pub fn to_terminal(&self) -> String {
        let cells = self.cells();
        let mut out = String::with_capacity(cells * (cells / 2 + 1) * 3);

        for y in (0..cells).step_by(2) {
            for x in 0..cells {
                let top_light = !self.is_dark_cell(x, y);
                let bottom_light = y + 1 >= cells || !self.is_dark_cell(x, y + 1);
                out.push(match (top_light, bottom_light) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                });
            }
            out.push('\n');
        }

        out
    }
}
