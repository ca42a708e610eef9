use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::Path,
    time::Duration,
};

use anyhow::Context as _;

use crate::{
    canvas::normalize::ResizeFilter,
    foundation::{
        core::{CanvasSize, frame_time_from_secs},
        error::{WyrmError, WyrmResult},
    },
    layout::topology::PanelTopology,
    transport::udp::DEFAULT_PORT,
};

/// Address the receiver board ships with.
pub const DEFAULT_TARGET: Ipv4Addr = Ipv4Addr::new(192, 168, 10, 30);

/// Frame time used when neither the configuration nor the source sets one.
pub const DEFAULT_FRAME_TIME: Duration = Duration::from_millis(100);

/// Per-datagram pause that keeps the current receiver gateware from overrunning.
pub const RECEIVER_DATAGRAM_DELAY: Duration = Duration::from_micros(500);

/// Everything needed to stream to one receiver.
///
/// Every field has a default, so a JSON file only needs the keys it changes:
///
/// ```json
/// { "target": "192.168.1.90", "canvas": 128, "datagram_delay_us": 500 }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StreamConfig {
    /// Receiver IP address.
    pub target: IpAddr,
    /// Receiver UDP port.
    pub port: u16,
    /// Canvas size (64 or 128).
    pub canvas: CanvasSize,
    /// Panel-select mask for a 64 canvas; ignored for 128.
    pub panel_select: u8,
    /// Board connector (1..=8) per segment, replacing the stock select masks.
    pub connectors: Option<Vec<u8>>,
    /// Fixed frame time in seconds; overrides source timing when set.
    pub frame_time_sec: Option<f64>,
    /// Pause after each datagram, in microseconds.
    pub datagram_delay_us: Option<u64>,
    /// Resampling filter for letterboxing.
    pub filter: ResizeFilter,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            target: IpAddr::V4(DEFAULT_TARGET),
            port: DEFAULT_PORT,
            canvas: CanvasSize::Square64,
            panel_select: 0x01,
            connectors: None,
            frame_time_sec: None,
            datagram_delay_us: None,
            filter: ResizeFilter::default(),
        }
    }
}

impl StreamConfig {
    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> WyrmResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read stream config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)
            .with_context(|| format!("parse stream config '{}'", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the configuration for values the encoder cannot honour.
    pub fn validate(&self) -> WyrmResult<()> {
        if self.port == 0 {
            return Err(WyrmError::validation("target port must be non-zero"));
        }
        if let Some(secs) = self.frame_time_sec {
            frame_time_from_secs(secs)?;
        }
        self.topology()?;
        Ok(())
    }

    /// Where datagrams go.
    pub fn target_addr(&self) -> SocketAddr {
        SocketAddr::new(self.target, self.port)
    }

    /// Panel-select masks for every segment.
    pub fn topology(&self) -> WyrmResult<PanelTopology> {
        match &self.connectors {
            Some(connectors) => PanelTopology::from_connectors(self.canvas, connectors),
            None => PanelTopology::standard(self.canvas, self.panel_select),
        }
    }

    /// Configured fixed frame time, if any.
    pub fn frame_time(&self) -> WyrmResult<Option<Duration>> {
        self.frame_time_sec.map(frame_time_from_secs).transpose()
    }

    /// Configured per-datagram pause, if any.
    pub fn datagram_delay(&self) -> Option<Duration> {
        self.datagram_delay_us
            .filter(|&us| us > 0)
            .map(Duration::from_micros)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stream/config.rs"]
mod tests;
