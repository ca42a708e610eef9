//! wyrmcast streams images, animations and video to an LED matrix video wall.
//!
//! The wall is driven by an FPGA receiver that takes raw pixel writes over UDP. This
//! crate is the sending side: it turns decoded frames into the receiver's datagram
//! format and sends them at the source's frame rate.
//!
//! # Pipeline overview
//!
//! 1. **Source**: a [`FrameSource`] yields decoded frames (still image, looping GIF,
//!    or an `ffmpeg`-decoded video).
//! 2. **Normalize**: [`CanvasNormalizer`] letterboxes each frame onto a 64x64 or
//!    128x128 black canvas.
//! 3. **Segment**: [`SegmentMapper`] splits the canvas into 64x64 panel segments.
//! 4. **Encode**: every pixel becomes one 32-bit word (see [`encode_pixel`]).
//! 5. **Batch**: [`PacketBatcher`] packs four panel rows behind a panel-select header
//!    into a 1026-byte datagram.
//! 6. **Send**: a [`Transport`] fires the datagram at the receiver; [`Pacer`] holds the
//!    frame interval and optionally throttles between datagrams.
//!
//! [`StreamDriver`] wires all of it together on a single thread.
//!
//! # Wire format
//!
//! ```text
//! byte 0      panel select bitmask (bit i = select line i)
//! byte 1      reserved, always 0x00
//! bytes 2..   256 big-endian u32 words: 4 rows x 64 columns
//! ```
//!
//! Delivery is best effort: no acknowledgements, retransmission or sequence numbers.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod canvas;
mod foundation;
mod layout;
mod pacing;
mod source;
mod stream;
mod transport;
mod wire;

pub use canvas::frame::Frame;
pub use canvas::normalize::{CanvasNormalizer, Letterbox, ResizeFilter};
pub use foundation::core::{CanvasSize, Fps, SEGMENT_SIDE, frame_time_from_secs};
pub use foundation::error::{WyrmError, WyrmResult};
pub use layout::segments::{Segment, SegmentMapper, SegmentView};
pub use layout::topology::{BOARD_SELECT_LINES, PanelTopology, select_line_for_connector};
pub use pacing::controller::{
    FramePacing, Pacer, PacingState, Sleeper, ThreadSleeper, remaining,
};
pub use source::image_file::{AnimatedImageSource, StillImageSource};
pub use source::video::{VideoSource, VideoSourceInfo, is_ffmpeg_on_path, probe_video};
pub use source::{FrameSource, SourceFrame};
pub use stream::config::{
    DEFAULT_FRAME_TIME, DEFAULT_TARGET, RECEIVER_DATAGRAM_DELAY, StreamConfig,
};
pub use stream::driver::{FrameReport, StreamDriver, StreamLimits, StreamStats};
pub use stream::encoder::FrameEncoder;
pub use transport::udp::{DEFAULT_PORT, MemoryTransport, Transport, UdpTransport};
pub use wire::batch::{
    DATAGRAM_LEN, DATAGRAMS_PER_SEGMENT, DecodedDatagram, HEADER_LEN, PacketBatcher,
    ROWS_PER_DATAGRAM, WORDS_PER_DATAGRAM, decode_datagram,
};
pub use wire::pixel::{
    CHANNEL_MASK, DecodedPixel, decode_address, decode_pixel, encode_address, encode_pixel,
};
