use crate::{
    canvas::frame::Frame,
    foundation::{
        core::SEGMENT_SIDE,
        error::{WyrmError, WyrmResult},
    },
    layout::{segments::SegmentMapper, topology::PanelTopology},
    wire::{batch::PacketBatcher, pixel::encode_pixel},
};

/// Turns a normalized frame into the ordered datagram sequence for the receiver.
///
/// Segments go out in mapper order and rows in increasing order within a segment.
#[derive(Clone, Debug)]
pub struct FrameEncoder {
    mapper: SegmentMapper,
    batcher: PacketBatcher,
}

impl FrameEncoder {
    /// Build an encoder for `topology`.
    pub fn new(topology: &PanelTopology) -> Self {
        Self {
            mapper: SegmentMapper::new(topology),
            batcher: PacketBatcher::new(),
        }
    }

    /// Segment table in use.
    pub fn mapper(&self) -> &SegmentMapper {
        &self.mapper
    }

    /// Encode `frame`, passing each finished datagram to `emit`.
    ///
    /// Returns the number of datagrams produced. Errors from `emit` abort the frame.
    pub fn encode_frame<F>(&mut self, frame: &Frame, mut emit: F) -> WyrmResult<usize>
    where
        F: FnMut(&[u8]) -> WyrmResult<()>,
    {
        if frame.size() != self.mapper.canvas() {
            let want = self.mapper.canvas().side();
            return Err(WyrmError::invalid_frame(format!(
                "frame is {0}x{0} but the panel layout expects {want}x{want}",
                frame.side()
            )));
        }

        let mut emitted = 0usize;
        for index in 0..self.mapper.segments().len() {
            let view = self.mapper.view(frame, index)?;
            self.batcher.begin_segment(view.segment().select);

            for row in 0..SEGMENT_SIDE {
                let words = view
                    .row(row)
                    .zip(0u32..)
                    .map(|(rgb, col)| encode_pixel(row, col, rgb));
                if let Some(datagram) = self.batcher.push_row(row, words)? {
                    emit(datagram)?;
                    emitted += 1;
                }
            }
        }
        Ok(emitted)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stream/encoder.rs"]
mod tests;
