use std::{
    io::Read,
    path::{Path, PathBuf},
    process::{Child, ChildStdout, Command, Stdio},
    time::Duration,
};

use image::{DynamicImage, RgbImage};

use crate::{
    foundation::{
        core::Fps,
        error::{WyrmError, WyrmResult},
    },
    source::{FrameSource, SourceFrame},
};

/// Stream properties reported by `ffprobe`.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoSourceInfo {
    /// Path that was probed.
    pub source_path: PathBuf,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Nominal frame rate.
    pub fps: Fps,
    /// Container duration, 0 if unknown.
    pub duration_sec: f64,
}

/// Whether `ffmpeg` and `ffprobe` can be spawned.
pub fn is_ffmpeg_on_path() -> bool {
    ["ffmpeg", "ffprobe"].iter().all(|tool| {
        Command::new(tool)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    })
}

/// Read dimensions and frame rate of the first video stream in `source_path`.
#[cfg(feature = "media-ffmpeg")]
pub fn probe_video(source_path: &Path) -> WyrmResult<VideoSourceInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        r_frame_rate: Option<String>,
        avg_frame_rate: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| WyrmError::source(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(WyrmError::source(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| WyrmError::source(format!("ffprobe json parse failed: {e}")))?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| WyrmError::source("no video stream found"))?;
    let width = video_stream
        .width
        .ok_or_else(|| WyrmError::source("missing video width from ffprobe"))?;
    let height = video_stream
        .height
        .ok_or_else(|| WyrmError::source("missing video height from ffprobe"))?;

    let fps = [&video_stream.r_frame_rate, &video_stream.avg_frame_rate]
        .into_iter()
        .filter_map(|r| r.as_deref().and_then(parse_ff_ratio))
        .next()
        .ok_or_else(|| WyrmError::source("video stream reports no usable frame rate"))?;
    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);

    Ok(VideoSourceInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        fps,
        duration_sec,
    })
}

/// Read dimensions and frame rate of the first video stream in `source_path`.
#[cfg(not(feature = "media-ffmpeg"))]
pub fn probe_video(_source_path: &Path) -> WyrmResult<VideoSourceInfo> {
    Err(WyrmError::source(
        "video sources require the 'media-ffmpeg' feature",
    ))
}

/// Decodes a video file to RGB frames through a long-lived `ffmpeg` child.
///
/// Frames are read from the child's stdout one at a time; the stream ends with
/// [`WyrmError::SourceExhausted`] at end of file.
#[derive(Debug)]
pub struct VideoSource {
    info: VideoSourceInfo,
    child: Child,
    stdout: Option<ChildStdout>,
    frame_len: usize,
    frames_read: u64,
}

impl VideoSource {
    /// Probe `path` and start decoding it.
    pub fn open(path: &Path) -> WyrmResult<Self> {
        let info = probe_video(path)?;
        Self::spawn(info)
    }

    fn spawn(info: VideoSourceInfo) -> WyrmResult<Self> {
        let frame_len = info.width as usize * info.height as usize * 3;
        if frame_len == 0 {
            return Err(WyrmError::source(
                "video frame size is zero (invalid source dimensions)",
            ));
        }

        let mut child = Command::new("ffmpeg")
            .args(["-v", "error", "-i"])
            .arg(&info.source_path)
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24", "pipe:1"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                WyrmError::source(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| WyrmError::source("failed to open ffmpeg stdout (unexpected)"))?;

        tracing::info!(
            path = %info.source_path.display(),
            width = info.width,
            height = info.height,
            fps = info.fps.as_f64(),
            "decoding video"
        );

        Ok(Self {
            info,
            child,
            stdout: Some(stdout),
            frame_len,
            frames_read: 0,
        })
    }

    /// Probed stream properties.
    pub fn info(&self) -> &VideoSourceInfo {
        &self.info
    }

    /// Frames handed out so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    fn finish(&mut self) {
        if self.stdout.take().is_none() {
            return;
        }
        match self.child.wait() {
            Ok(status) if !status.success() => {
                tracing::warn!(%status, path = %self.info.source_path.display(), "ffmpeg exited with failure");
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "failed to reap ffmpeg"),
        }
    }
}

impl FrameSource for VideoSource {
    fn next_frame(&mut self) -> WyrmResult<SourceFrame> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Err(WyrmError::SourceExhausted);
        };

        let mut buf = vec![0u8; self.frame_len];
        let filled = read_full(stdout, &mut buf)
            .map_err(|e| WyrmError::source(format!("failed to read from ffmpeg: {e}")))?;

        if filled < self.frame_len {
            if filled > 0 {
                tracing::warn!(
                    filled,
                    expected = self.frame_len,
                    "discarding truncated trailing video frame"
                );
            }
            tracing::debug!(frames = self.frames_read, "video stream ended");
            self.finish();
            return Err(WyrmError::SourceExhausted);
        }

        let image = RgbImage::from_raw(self.info.width, self.info.height, buf)
            .ok_or_else(|| WyrmError::invalid_frame("decoded frame does not match probed size"))?;
        self.frames_read += 1;
        Ok(SourceFrame::new(DynamicImage::ImageRgb8(image)))
    }

    fn native_interval(&self) -> Option<Duration> {
        Some(self.info.fps.frame_interval())
    }
}

impl Drop for VideoSource {
    fn drop(&mut self) {
        if self.stdout.is_some() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// Fill `buf` as far as the reader allows; returns the number of bytes read.
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

fn parse_ff_ratio(s: &str) -> Option<Fps> {
    let mut parts = s.split('/');
    let num = parts.next()?.trim().parse::<u32>().ok()?;
    let den = match parts.next() {
        Some(d) => d.trim().parse::<u32>().ok()?,
        None => 1,
    };
    Fps::new(num, den).ok()
}

#[cfg(test)]
#[path = "../../tests/unit/source/video.rs"]
mod tests;
