use std::{fs::File, io::BufReader, path::Path, time::Duration};

use image::{AnimationDecoder, DynamicImage, ImageFormat, ImageReader, codecs::gif::GifDecoder};

use crate::{
    foundation::error::{WyrmError, WyrmResult},
    source::{FrameSource, SourceFrame},
};

/// A single picture, repeated for as long as the stream runs.
#[derive(Clone, Debug)]
pub struct StillImageSource {
    image: DynamicImage,
}

impl StillImageSource {
    /// Decode the image at `path`.
    pub fn open(path: &Path) -> WyrmResult<Self> {
        let image = image::open(path).map_err(|e| {
            WyrmError::source(format!("failed to decode image '{}': {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), width = image.width(), height = image.height(), "opened still image");
        Ok(Self { image })
    }

    /// Wrap an already decoded image.
    pub fn from_image(image: DynamicImage) -> Self {
        Self { image }
    }
}

impl FrameSource for StillImageSource {
    fn next_frame(&mut self) -> WyrmResult<SourceFrame> {
        Ok(SourceFrame::new(self.image.clone()))
    }

    fn is_still(&self) -> bool {
        true
    }
}

/// An animation that loops forever over its decoded frames.
///
/// GIF files are decoded frame by frame; any other format loads as a one-frame
/// animation.
#[derive(Clone, Debug)]
pub struct AnimatedImageSource {
    frames: Vec<SourceFrame>,
    cursor: usize,
}

impl AnimatedImageSource {
    /// Decode every frame of the animation at `path`.
    pub fn open(path: &Path) -> WyrmResult<Self> {
        let format = ImageReader::open(path)
            .and_then(|r| r.with_guessed_format())
            .map_err(|e| WyrmError::source(format!("failed to open '{}': {e}", path.display())))?
            .format();

        let frames = if format == Some(ImageFormat::Gif) {
            decode_gif(path)?
        } else {
            vec![SourceFrame::new(StillImageSource::open(path)?.image)]
        };

        tracing::debug!(path = %path.display(), frames = frames.len(), "opened animation");
        Self::from_frames(frames)
    }

    /// Loop over already decoded frames.
    pub fn from_frames(frames: Vec<SourceFrame>) -> WyrmResult<Self> {
        if frames.is_empty() {
            return Err(WyrmError::source("animation has no frames"));
        }
        Ok(Self { frames, cursor: 0 })
    }

    /// Number of frames in one loop.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; construction rejects empty animations.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for AnimatedImageSource {
    fn next_frame(&mut self) -> WyrmResult<SourceFrame> {
        let frame = self.frames[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.frames.len();
        Ok(frame)
    }
}

fn decode_gif(path: &Path) -> WyrmResult<Vec<SourceFrame>> {
    let file = File::open(path)
        .map_err(|e| WyrmError::source(format!("failed to open '{}': {e}", path.display())))?;
    let decoder = GifDecoder::new(BufReader::new(file)).map_err(|e| {
        WyrmError::source(format!("failed to read gif '{}': {e}", path.display()))
    })?;
    let frames = decoder.into_frames().collect_frames().map_err(|e| {
        WyrmError::source(format!("failed to decode gif '{}': {e}", path.display()))
    })?;

    Ok(frames
        .into_iter()
        .map(|f| {
            let (num, den) = f.delay().numer_denom_ms();
            let delay = (num > 0 && den > 0)
                .then(|| Duration::from_nanos(u64::from(num) * 1_000_000 / u64::from(den)));
            SourceFrame {
                image: DynamicImage::ImageRgba8(f.into_buffer()),
                delay,
            }
        })
        .collect())
}

#[cfg(test)]
#[path = "../../tests/unit/source/image_file.rs"]
mod tests;
