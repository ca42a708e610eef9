use std::time::Duration;

use crate::{
    canvas::{frame::Frame, normalize::CanvasNormalizer},
    foundation::error::{WyrmError, WyrmResult},
    pacing::controller::{FramePacing, Pacer, Sleeper, ThreadSleeper},
    source::{FrameSource, SourceFrame},
    stream::{
        config::{DEFAULT_FRAME_TIME, StreamConfig},
        encoder::FrameEncoder,
    },
    transport::udp::{Transport, UdpTransport},
};

/// Running totals for a stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Frames encoded and handed to the transport.
    pub frames_sent: u64,
    /// Frames dropped because they could not be normalized or decoded.
    pub frames_skipped: u64,
    /// Frames that overran their interval.
    pub late_frames: u64,
    /// Datagrams the transport accepted.
    pub datagrams_sent: u64,
    /// Datagrams the transport rejected.
    pub send_failures: u64,
}

/// Outcome of sending a single frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameReport {
    /// Datagrams the transport accepted.
    pub datagrams_sent: usize,
    /// Datagrams the transport rejected.
    pub send_failures: usize,
    /// Timing of the frame.
    pub pacing: FramePacing,
}

/// Optional bounds on how long [`StreamDriver::run`] keeps going.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamLimits {
    /// Stop after this many frames (sent or skipped).
    pub max_frames: Option<u64>,
}

/// Owns the transport and drives source frames through the encoder at a paced rate.
///
/// Everything runs on the calling thread: a frame is fully encoded and sent before
/// the next one is pulled from the source.
#[derive(Debug)]
pub struct StreamDriver<T, S = ThreadSleeper> {
    normalizer: CanvasNormalizer,
    encoder: FrameEncoder,
    transport: T,
    pacer: Pacer<S>,
    fixed_interval: Option<Duration>,
    stats: StreamStats,
}

impl StreamDriver<UdpTransport, ThreadSleeper> {
    /// Bind a UDP socket for `config.target_addr()` and build a driver around it.
    pub fn connect(config: &StreamConfig) -> WyrmResult<Self> {
        config.validate()?;
        let transport = UdpTransport::bind(config.target_addr())?;
        Self::new(config, transport, ThreadSleeper)
    }
}

impl<T: Transport, S: Sleeper> StreamDriver<T, S> {
    /// Build a driver over an existing transport and sleeper.
    pub fn new(config: &StreamConfig, transport: T, sleeper: S) -> WyrmResult<Self> {
        let topology = config.topology()?;
        let fixed_interval = config.frame_time()?;
        Ok(Self {
            normalizer: CanvasNormalizer::new(config.canvas, config.filter),
            encoder: FrameEncoder::new(&topology),
            transport,
            pacer: Pacer::new(
                fixed_interval.unwrap_or(DEFAULT_FRAME_TIME),
                config.datagram_delay(),
                sleeper,
            ),
            fixed_interval,
            stats: StreamStats::default(),
        })
    }

    /// Totals so far.
    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    /// The frame encoder.
    pub fn encoder(&self) -> &FrameEncoder {
        &self.encoder
    }

    /// The pacing controller.
    pub fn pacer(&self) -> &Pacer<S> {
        &self.pacer
    }

    /// Borrow the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Release the driver, returning the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Encode and send an already normalized frame, then hold the frame interval.
    pub fn send_frame(&mut self, frame: &Frame) -> WyrmResult<FrameReport> {
        let started = self.pacer.begin_frame();
        let sent = self.transmit(frame);
        let pacing = self.pacer.finish_frame(started);
        let (datagrams_sent, send_failures) = sent?;
        Ok(self.record(datagrams_sent, send_failures, pacing))
    }

    /// Normalize a source frame, encode it and send it, all inside one frame interval.
    ///
    /// The interval comes from the configured frame time, else the frame's own delay,
    /// else `native`, else [`DEFAULT_FRAME_TIME`].
    pub fn send_source_frame(
        &mut self,
        source_frame: &SourceFrame,
        native: Option<Duration>,
    ) -> WyrmResult<FrameReport> {
        self.send_and_keep(source_frame, native)
            .map(|(report, _)| report)
    }

    /// Pull frames from `source` until it is exhausted or `limits` are reached.
    ///
    /// Invalid frames are skipped; send failures are counted and otherwise ignored.
    /// Any other error ends the stream.
    #[tracing::instrument(level = "debug", skip_all, fields(max_frames = ?limits.max_frames))]
    pub fn run<F>(&mut self, source: &mut F, limits: StreamLimits) -> WyrmResult<StreamStats>
    where
        F: FrameSource + ?Sized,
    {
        let still = source.is_still();
        let mut held: Option<Frame> = None;
        let mut processed = 0u64;
        loop {
            if limits.max_frames.is_some_and(|max| processed >= max) {
                tracing::debug!(processed, "frame limit reached");
                break;
            }

            if let Some(frame) = &held {
                processed += 1;
                let interval = self.interval_for(None, source.native_interval());
                self.pacer.set_frame_interval(interval);
                let report = self.send_frame(frame)?;
                tracing::trace!(
                    datagrams = report.datagrams_sent,
                    elapsed = ?report.pacing.elapsed,
                    "still frame resent"
                );
                continue;
            }

            let source_frame = match source.next_frame() {
                Ok(f) => f,
                Err(WyrmError::SourceExhausted) => {
                    tracing::info!(processed, "source exhausted");
                    break;
                }
                Err(WyrmError::InvalidFrame(msg)) => {
                    tracing::warn!(%msg, "skipping undecodable frame");
                    // The slot is still held so playback keeps its tempo.
                    let started = self.pacer.begin_frame();
                    self.pacer.finish_frame(started);
                    self.stats.frames_skipped += 1;
                    processed += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };
            processed += 1;

            match self.send_and_keep(&source_frame, source.native_interval()) {
                Ok((report, frame)) => {
                    if still {
                        held = Some(frame);
                    }
                    tracing::trace!(
                        datagrams = report.datagrams_sent,
                        elapsed = ?report.pacing.elapsed,
                        slept = ?report.pacing.slept,
                        "frame sent"
                    );
                }
                Err(WyrmError::InvalidFrame(msg)) => {
                    tracing::warn!(%msg, "skipping invalid frame");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(self.stats)
    }

    fn interval_for(&self, delay: Option<Duration>, native: Option<Duration>) -> Duration {
        self.fixed_interval
            .or(delay)
            .or(native)
            .unwrap_or(DEFAULT_FRAME_TIME)
    }

    fn send_and_keep(
        &mut self,
        source_frame: &SourceFrame,
        native: Option<Duration>,
    ) -> WyrmResult<(FrameReport, Frame)> {
        let interval = self.interval_for(source_frame.delay, native);
        self.pacer.set_frame_interval(interval);

        let started = self.pacer.begin_frame();
        let sent = self
            .normalizer
            .normalize(&source_frame.image)
            .and_then(|frame| self.transmit(&frame).map(|counts| (counts, frame)));
        let pacing = self.pacer.finish_frame(started);

        match sent {
            Ok(((datagrams_sent, send_failures), frame)) => Ok((
                self.record(datagrams_sent, send_failures, pacing),
                frame,
            )),
            Err(e) => {
                if matches!(e, WyrmError::InvalidFrame(_)) {
                    self.stats.frames_skipped += 1;
                }
                Err(e)
            }
        }
    }

    fn transmit(&mut self, frame: &Frame) -> WyrmResult<(usize, usize)> {
        let Self {
            encoder,
            transport,
            pacer,
            ..
        } = self;

        let mut failures = 0usize;
        let mut first_failure: Option<WyrmError> = None;
        let produced = encoder.encode_frame(frame, |datagram| {
            match transport.send(datagram) {
                Ok(()) => {}
                Err(e) if e.is_recoverable() => {
                    tracing::debug!(error = %e, "datagram dropped");
                    failures += 1;
                    first_failure.get_or_insert(e);
                }
                Err(e) => return Err(e),
            }
            pacer.after_datagram();
            Ok(())
        })?;

        if let Some(e) = first_failure {
            tracing::warn!(error = %e, failures, datagrams = produced, "frame sent with dropped datagrams");
        }
        Ok((produced - failures, failures))
    }

    fn record(&mut self, datagrams_sent: usize, send_failures: usize, pacing: FramePacing) -> FrameReport {
        self.stats.frames_sent += 1;
        self.stats.datagrams_sent += datagrams_sent as u64;
        self.stats.send_failures += send_failures as u64;
        if pacing.late {
            self.stats.late_frames += 1;
        }
        FrameReport {
            datagrams_sent,
            send_failures,
            pacing,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stream/driver.rs"]
mod tests;
