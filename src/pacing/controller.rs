use std::time::{Duration, Instant};

/// Where the time between datagrams and frames goes.
pub trait Sleeper {
    /// Block the stream for `duration`.
    fn sleep(&mut self, duration: Duration);
}

/// Sleeps the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// What the pacer is currently doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacingState {
    /// A frame is being encoded and sent.
    Encoding,
    /// Between frames, holding to the frame interval.
    Waiting,
}

/// Timing outcome of one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FramePacing {
    /// Time spent encoding and sending, including datagram delays.
    pub elapsed: Duration,
    /// Time slept afterwards to hold the frame interval.
    pub slept: Duration,
    /// The frame overran its interval; the next one starts immediately.
    pub late: bool,
}

/// Time left in a frame budget, if any.
pub fn remaining(interval: Duration, elapsed: Duration) -> Option<Duration> {
    interval.checked_sub(elapsed).filter(|d| !d.is_zero())
}

/// Open-loop frame pacing plus optional per-datagram throttling.
///
/// Frames are never dropped: a frame that overruns its interval is followed by the
/// next one without any sleep.
#[derive(Debug)]
pub struct Pacer<S = ThreadSleeper> {
    frame_interval: Duration,
    datagram_delay: Option<Duration>,
    sleeper: S,
    state: PacingState,
}

impl<S: Sleeper> Pacer<S> {
    /// Pace frames to `frame_interval`, optionally pausing `datagram_delay` after
    /// every datagram.
    pub fn new(frame_interval: Duration, datagram_delay: Option<Duration>, sleeper: S) -> Self {
        Self {
            frame_interval,
            datagram_delay: datagram_delay.filter(|d| !d.is_zero()),
            sleeper,
            state: PacingState::Waiting,
        }
    }

    /// Current frame budget.
    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Change the frame budget, e.g. for per-frame animation delays.
    pub fn set_frame_interval(&mut self, interval: Duration) {
        self.frame_interval = interval;
    }

    /// Pause inserted after each datagram.
    pub fn datagram_delay(&self) -> Option<Duration> {
        self.datagram_delay
    }

    /// Current state.
    pub fn state(&self) -> PacingState {
        self.state
    }

    /// Borrow the sleeper.
    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Mark the start of a frame.
    pub fn begin_frame(&mut self) -> Instant {
        self.state = PacingState::Encoding;
        Instant::now()
    }

    /// Throttle after a datagram so the receiver can keep up.
    pub fn after_datagram(&mut self) {
        if let Some(delay) = self.datagram_delay {
            self.sleeper.sleep(delay);
        }
    }

    /// Close the frame started at `started`, sleeping out the rest of its budget.
    pub fn finish_frame(&mut self, started: Instant) -> FramePacing {
        let elapsed = started.elapsed();
        self.state = PacingState::Waiting;
        match remaining(self.frame_interval, elapsed) {
            Some(rest) => {
                self.sleeper.sleep(rest);
                FramePacing {
                    elapsed,
                    slept: rest,
                    late: false,
                }
            }
            None => {
                tracing::trace!(?elapsed, interval = ?self.frame_interval, "frame overran its interval");
                FramePacing {
                    elapsed,
                    slept: Duration::ZERO,
                    late: elapsed > self.frame_interval,
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pacing/controller.rs"]
mod tests;
