use std::time::Duration;

use crate::foundation::error::{WyrmError, WyrmResult};

/// Side length of one physical panel segment, in pixels.
pub const SEGMENT_SIDE: u32 = 64;

/// Square canvas sizes the receiver topologies support.
///
/// Serialized as the plain side length (`64` or `128`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum CanvasSize {
    /// One 64x64 panel.
    Square64,
    /// Four 64x64 panels arranged 2x2.
    Square128,
}

impl CanvasSize {
    /// Canvas side length in pixels.
    pub fn side(self) -> u32 {
        match self {
            Self::Square64 => 64,
            Self::Square128 => 128,
        }
    }

    /// Number of 64x64 segments the canvas splits into.
    pub fn segment_count(self) -> usize {
        let per_axis = (self.side() / SEGMENT_SIDE) as usize;
        per_axis * per_axis
    }

    /// Look up a canvas size by side length.
    pub fn from_side(side: u32) -> WyrmResult<Self> {
        match side {
            64 => Ok(Self::Square64),
            128 => Ok(Self::Square128),
            other => Err(WyrmError::validation(format!(
                "canvas size must be 64 or 128, got {other}"
            ))),
        }
    }
}

impl TryFrom<u32> for CanvasSize {
    type Error = WyrmError;

    fn try_from(side: u32) -> Result<Self, Self::Error> {
        Self::from_side(side)
    }
}

impl From<CanvasSize> for u32 {
    fn from(size: CanvasSize) -> Self {
        size.side()
    }
}

/// Rational frame rate as reported by a video container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds); must be > 0.
    pub den: u32,
}

impl Fps {
    /// Build a frame rate; both parts must be non-zero.
    pub fn new(num: u32, den: u32) -> WyrmResult<Self> {
        if den == 0 {
            return Err(WyrmError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(WyrmError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Wall-clock budget for one frame.
    pub fn frame_interval(self) -> Duration {
        Duration::from_secs_f64(f64::from(self.den) / f64::from(self.num))
    }
}

/// Convert a user-facing frame time in seconds into a [`Duration`].
pub fn frame_time_from_secs(secs: f64) -> WyrmResult<Duration> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(WyrmError::validation(format!(
            "frame time must be a finite, non-negative number of seconds, got {secs}"
        )));
    }
    Ok(Duration::from_secs_f64(secs))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
