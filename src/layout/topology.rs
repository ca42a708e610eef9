use crate::foundation::{
    core::CanvasSize,
    error::{WyrmError, WyrmResult},
};

/// Connector to select-line wiring of the 8-output receiver board.
///
/// Connectors J5..J8 are all driven from select line 4, so they can only ever show
/// the same data.
pub const BOARD_SELECT_LINES: [(u8, u8); 8] = [
    (1, 3),
    (2, 2),
    (3, 1),
    (4, 0),
    (5, 4),
    (6, 4),
    (7, 4),
    (8, 4),
];

/// Select line that drives board connector `J<connector>`.
pub fn select_line_for_connector(connector: u8) -> WyrmResult<u8> {
    BOARD_SELECT_LINES
        .iter()
        .find(|(c, _)| *c == connector)
        .map(|(_, line)| *line)
        .ok_or_else(|| {
            WyrmError::validation(format!(
                "unknown board connector J{connector} (expected J1..J8)"
            ))
        })
}

/// Panel-select mask for each segment of a canvas, in segment order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelTopology {
    canvas: CanvasSize,
    masks: Vec<u8>,
}

impl PanelTopology {
    /// The stock layout: a 64 canvas uses `single_select`, a 128 canvas uses
    /// `0x01, 0x02, 0x04, 0x08` for TL, TR, BL, BR.
    pub fn standard(canvas: CanvasSize, single_select: u8) -> WyrmResult<Self> {
        match canvas {
            CanvasSize::Square64 => Self::from_masks(canvas, vec![single_select]),
            CanvasSize::Square128 => {
                Self::from_masks(canvas, (0..4).map(|i| 1u8 << i).collect())
            }
        }
    }

    /// Build from explicit masks, one per segment.
    ///
    /// Masks of different segments must not share a bit, or the receiver would
    /// write both segments to the same panel.
    pub fn from_masks(canvas: CanvasSize, masks: Vec<u8>) -> WyrmResult<Self> {
        if masks.len() != canvas.segment_count() {
            return Err(WyrmError::validation(format!(
                "{}x{} canvas needs {} panel select masks, got {}",
                canvas.side(),
                canvas.side(),
                canvas.segment_count(),
                masks.len()
            )));
        }

        let mut seen = 0u8;
        for (i, &mask) in masks.iter().enumerate() {
            if mask == 0 {
                return Err(WyrmError::validation(format!(
                    "segment {i} has an empty panel select mask"
                )));
            }
            if seen & mask != 0 {
                return Err(WyrmError::validation(format!(
                    "segment {i} select mask {mask:#04x} overlaps an earlier segment \
                     ({seen:#04x}); those panels cannot be addressed independently"
                )));
            }
            seen |= mask;
        }

        Ok(Self { canvas, masks })
    }

    /// Build from board connector numbers, one per segment.
    pub fn from_connectors(canvas: CanvasSize, connectors: &[u8]) -> WyrmResult<Self> {
        let mut masks = Vec::with_capacity(connectors.len());
        for (i, &connector) in connectors.iter().enumerate() {
            let line = select_line_for_connector(connector)?;
            if let Some(prev) = connectors[..i]
                .iter()
                .find(|&&c| select_line_for_connector(c).ok() == Some(line))
            {
                return Err(WyrmError::validation(format!(
                    "connectors J{prev} and J{connector} share select line {line} \
                     and cannot be driven independently"
                )));
            }
            masks.push(1u8 << line);
        }
        Self::from_masks(canvas, masks)
    }

    /// Canvas this topology was built for.
    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Select mask per segment.
    pub fn masks(&self) -> &[u8] {
        &self.masks
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/topology.rs"]
mod tests;
