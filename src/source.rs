use std::time::Duration;

use image::DynamicImage;

use crate::foundation::error::WyrmResult;

pub(crate) mod image_file;
pub(crate) mod video;

/// One decoded, not yet normalized frame.
#[derive(Clone, Debug)]
pub struct SourceFrame {
    /// Decoded pixels at the source's own resolution.
    pub image: DynamicImage,
    /// How long this particular frame wants to stay on screen, if the container
    /// says so (animation frame delays).
    pub delay: Option<Duration>,
}

impl SourceFrame {
    /// A frame with no delay of its own.
    pub fn new(image: DynamicImage) -> Self {
        Self { image, delay: None }
    }
}

/// Lazy producer of frames for the stream.
///
/// `next_frame` returns [`WyrmError::SourceExhausted`](crate::WyrmError::SourceExhausted)
/// once a finite source runs out, and
/// [`WyrmError::InvalidFrame`](crate::WyrmError::InvalidFrame) for a single frame that
/// could not be produced.
pub trait FrameSource {
    /// Produce the next frame.
    fn next_frame(&mut self) -> WyrmResult<SourceFrame>;

    /// Frame interval the source itself prescribes (e.g. a video's frame rate).
    fn native_interval(&self) -> Option<Duration> {
        None
    }

    /// The source repeats one unchanging picture, so its first normalized frame can
    /// be sent again instead of decoding and resizing every tick.
    fn is_still(&self) -> bool {
        false
    }
}

impl<T: FrameSource + ?Sized> FrameSource for Box<T> {
    fn next_frame(&mut self) -> WyrmResult<SourceFrame> {
        (**self).next_frame()
    }

    fn native_interval(&self) -> Option<Duration> {
        (**self).native_interval()
    }

    fn is_still(&self) -> bool {
        (**self).is_still()
    }
}
