use image::RgbImage;

use crate::foundation::{
    core::CanvasSize,
    error::{WyrmError, WyrmResult},
};

/// A normalized, square RGB8 canvas ready for segmenting and encoding.
///
/// The pixel buffer is always exactly `size.side()` pixels on each axis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    size: CanvasSize,
    pixels: RgbImage,
}

impl Frame {
    /// Wrap an RGB8 image whose dimensions already match `size`.
    pub fn new(size: CanvasSize, pixels: RgbImage) -> WyrmResult<Self> {
        let side = size.side();
        if pixels.width() != side || pixels.height() != side {
            return Err(WyrmError::invalid_frame(format!(
                "frame is {}x{}, expected {side}x{side}",
                pixels.width(),
                pixels.height()
            )));
        }
        Ok(Self { size, pixels })
    }

    /// An all-black canvas.
    pub fn black(size: CanvasSize) -> Self {
        Self {
            size,
            pixels: RgbImage::new(size.side(), size.side()),
        }
    }

    /// Canvas size of this frame.
    pub fn size(&self) -> CanvasSize {
        self.size
    }

    /// Side length in pixels.
    pub fn side(&self) -> u32 {
        self.size.side()
    }

    /// RGB triple at canvas coordinate (`x`, `y`).
    ///
    /// Panics if the coordinate is outside the canvas.
    pub fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels.get_pixel(x, y).0
    }

    /// Borrow the underlying image.
    pub fn as_image(&self) -> &RgbImage {
        &self.pixels
    }

    /// Unwrap into the underlying image.
    pub fn into_image(self) -> RgbImage {
        self.pixels
    }
}
