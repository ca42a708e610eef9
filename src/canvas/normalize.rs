use image::{DynamicImage, RgbImage, imageops};

use crate::{
    canvas::frame::Frame,
    foundation::{
        core::CanvasSize,
        error::{WyrmError, WyrmResult},
    },
};

/// Resampling filter used when scaling a source frame onto the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    /// Nearest neighbour.
    Nearest,
    /// Linear (bilinear).
    Triangle,
    /// Cubic.
    CatmullRom,
    /// Gaussian.
    Gaussian,
    /// Lanczos with window 3.
    #[default]
    Lanczos3,
}

impl ResizeFilter {
    fn to_image(self) -> imageops::FilterType {
        match self {
            Self::Nearest => imageops::FilterType::Nearest,
            Self::Triangle => imageops::FilterType::Triangle,
            Self::CatmullRom => imageops::FilterType::CatmullRom,
            Self::Gaussian => imageops::FilterType::Gaussian,
            Self::Lanczos3 => imageops::FilterType::Lanczos3,
        }
    }
}

/// Scaled size and padding that letterbox a source frame onto a square canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Letterbox {
    /// Width of the resized source.
    pub scaled_width: u32,
    /// Height of the resized source.
    pub scaled_height: u32,
    /// Black rows above the image.
    pub top: u32,
    /// Black rows below the image.
    pub bottom: u32,
    /// Black columns left of the image.
    pub left: u32,
    /// Black columns right of the image.
    pub right: u32,
}

impl Letterbox {
    /// Fit a `width`x`height` source into a `side`x`side` square.
    ///
    /// The longer source axis becomes exactly `side`; the shorter one is floored and
    /// padded, with any odd pixel of padding going to the bottom/right edge.
    pub fn compute(width: u32, height: u32, side: u32) -> WyrmResult<Self> {
        if width == 0 || height == 0 {
            return Err(WyrmError::invalid_frame(format!(
                "source frame has zero extent ({width}x{height})"
            )));
        }

        let longest = u64::from(width.max(height));
        let scale = |v: u32| -> u32 {
            let scaled = u64::from(v) * u64::from(side) / longest;
            // Keep at least one pixel on each axis.
            (scaled as u32).clamp(1, side)
        };
        let scaled_width = scale(width);
        let scaled_height = scale(height);

        let delta_w = side - scaled_width;
        let delta_h = side - scaled_height;
        let top = delta_h / 2;
        let left = delta_w / 2;

        Ok(Self {
            scaled_width,
            scaled_height,
            top,
            bottom: delta_h - top,
            left,
            right: delta_w - left,
        })
    }
}

/// Letterboxes arbitrary source frames onto a fixed square canvas.
///
/// The geometry for the most recent source dimensions is cached, since video
/// sources keep one size for their whole duration.
#[derive(Debug)]
pub struct CanvasNormalizer {
    size: CanvasSize,
    filter: ResizeFilter,
    cached: Option<((u32, u32), Letterbox)>,
}

impl CanvasNormalizer {
    /// Create a normalizer for the given canvas size and filter.
    pub fn new(size: CanvasSize, filter: ResizeFilter) -> Self {
        Self {
            size,
            filter,
            cached: None,
        }
    }

    /// Target canvas size.
    pub fn size(&self) -> CanvasSize {
        self.size
    }

    /// Letterbox geometry for a source of the given dimensions.
    pub fn letterbox(&mut self, width: u32, height: u32) -> WyrmResult<Letterbox> {
        if let Some((dims, lb)) = self.cached
            && dims == (width, height)
        {
            return Ok(lb);
        }
        let lb = Letterbox::compute(width, height, self.size.side())?;
        self.cached = Some(((width, height), lb));
        Ok(lb)
    }

    /// Resize and pad `source` into a square [`Frame`].
    pub fn normalize(&mut self, source: &DynamicImage) -> WyrmResult<Frame> {
        let (width, height) = (source.width(), source.height());
        let lb = self.letterbox(width, height)?;
        let rgb = source.to_rgb8();

        let side = self.size.side();
        if width == side && height == side {
            return Frame::new(self.size, rgb);
        }

        let scaled = if (lb.scaled_width, lb.scaled_height) == (width, height) {
            rgb
        } else {
            imageops::resize(
                &rgb,
                lb.scaled_width,
                lb.scaled_height,
                self.filter.to_image(),
            )
        };

        let mut canvas = RgbImage::new(side, side);
        imageops::replace(&mut canvas, &scaled, i64::from(lb.left), i64::from(lb.top));
        Frame::new(self.size, canvas)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/normalize.rs"]
mod tests;
