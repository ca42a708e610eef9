use crate::{
    canvas::frame::Frame,
    foundation::{
        core::{CanvasSize, SEGMENT_SIDE},
        error::{WyrmError, WyrmResult},
    },
    layout::topology::PanelTopology,
};

/// One 64x64 region of the canvas, mapped to one physical panel output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    /// Position in send order.
    pub index: usize,
    /// Canvas column of the segment's left edge.
    pub x_offset: u32,
    /// Canvas row of the segment's top edge.
    pub y_offset: u32,
    /// Panel-select header byte for datagrams carrying this segment.
    pub select: u8,
}

/// Fixed coordinate table splitting a canvas into panel segments.
///
/// Segments are laid out in reading order: top-left, top-right, bottom-left,
/// bottom-right.
#[derive(Clone, Debug)]
pub struct SegmentMapper {
    canvas: CanvasSize,
    segments: Vec<Segment>,
}

impl SegmentMapper {
    /// Build the table for `topology`'s canvas.
    pub fn new(topology: &PanelTopology) -> Self {
        let canvas = topology.canvas();
        let per_axis = (canvas.side() / SEGMENT_SIDE) as usize;
        let segments = topology
            .masks()
            .iter()
            .enumerate()
            .map(|(index, &select)| Segment {
                index,
                x_offset: (index % per_axis) as u32 * SEGMENT_SIDE,
                y_offset: (index / per_axis) as u32 * SEGMENT_SIDE,
                select,
            })
            .collect();
        Self { canvas, segments }
    }

    /// Canvas size the table was built for.
    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// All segments in send order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Read-only window onto `frame` for segment `index`.
    pub fn view<'a>(&self, frame: &'a Frame, index: usize) -> WyrmResult<SegmentView<'a>> {
        let segment = *self.segments.get(index).ok_or_else(|| {
            WyrmError::encode_overflow(format!(
                "segment {index} out of range ({} segments)",
                self.segments.len()
            ))
        })?;

        let side = frame.side();
        if segment.x_offset + SEGMENT_SIDE > side || segment.y_offset + SEGMENT_SIDE > side {
            return Err(WyrmError::encode_overflow(format!(
                "segment {index} at ({}, {}) exceeds {side}x{side} frame",
                segment.x_offset, segment.y_offset
            )));
        }

        Ok(SegmentView { frame, segment })
    }

    /// Translate a canvas coordinate to `(segment index, row, col)`.
    pub fn canvas_to_segment(&self, x: u32, y: u32) -> Option<(usize, u32, u32)> {
        self.segments.iter().find_map(|s| {
            let inside = (s.x_offset..s.x_offset + SEGMENT_SIDE).contains(&x)
                && (s.y_offset..s.y_offset + SEGMENT_SIDE).contains(&y);
            inside.then(|| (s.index, y - s.y_offset, x - s.x_offset))
        })
    }

    /// Translate a segment-local `(row, col)` back to canvas `(x, y)`.
    pub fn segment_to_canvas(&self, index: usize, row: u32, col: u32) -> Option<(u32, u32)> {
        if row >= SEGMENT_SIDE || col >= SEGMENT_SIDE {
            return None;
        }
        let s = self.segments.get(index)?;
        Some((s.x_offset + col, s.y_offset + row))
    }
}

/// Borrowed view of one segment inside a frame. No pixels are copied.
#[derive(Clone, Copy, Debug)]
pub struct SegmentView<'a> {
    frame: &'a Frame,
    segment: Segment,
}

impl<'a> SegmentView<'a> {
    /// The segment this view covers.
    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    /// RGB at segment-local (`row`, `col`).
    ///
    /// Both coordinates must be below 64; debug builds assert it.
    pub fn rgb(&self, row: u32, col: u32) -> [u8; 3] {
        debug_assert!(
            row < SEGMENT_SIDE && col < SEGMENT_SIDE,
            "segment-local coordinate ({row}, {col}) outside 64x64 segment"
        );
        self.frame
            .rgb(self.segment.x_offset + col, self.segment.y_offset + row)
    }

    /// The 64 pixels of segment-local `row`, left to right.
    pub fn row(&self, row: u32) -> impl Iterator<Item = [u8; 3]> + 'a {
        debug_assert!(
            row < SEGMENT_SIDE,
            "segment-local row {row} outside 64x64 segment"
        );
        let frame = self.frame;
        let y = self.segment.y_offset + row;
        let x0 = self.segment.x_offset;
        (x0..x0 + SEGMENT_SIDE).map(move |x| frame.rgb(x, y))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/segments.rs"]
mod tests;
