use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};

use crate::foundation::error::{WyrmError, WyrmResult};

/// UDP port the panel receiver listens on.
pub const DEFAULT_PORT: u16 = 1234;

/// Fire-and-forget datagram sink.
///
/// Implementations must not retry: a failed send is reported and the caller moves on.
pub trait Transport {
    /// Hand one datagram to the network.
    fn send(&mut self, datagram: &[u8]) -> WyrmResult<()>;
}

/// A connectionless UDP socket bound once and reused for every datagram.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    target: SocketAddr,
}

impl UdpTransport {
    /// Bind an ephemeral local port matching the target's address family.
    pub fn bind(target: SocketAddr) -> WyrmResult<Self> {
        let local: SocketAddr = match target {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let socket = UdpSocket::bind(local).map_err(|e| {
            WyrmError::transport(format!("failed to bind UDP socket on {local}: {e}"))
        })?;
        tracing::debug!(%target, local = ?socket.local_addr().ok(), "udp transport ready");
        Ok(Self { socket, target })
    }

    /// Destination every datagram is sent to.
    pub fn target(&self) -> SocketAddr {
        self.target
    }
}

impl Transport for UdpTransport {
    fn send(&mut self, datagram: &[u8]) -> WyrmResult<()> {
        let sent = self
            .socket
            .send_to(datagram, self.target)
            .map_err(|e| WyrmError::transport(format!("send to {} failed: {e}", self.target)))?;
        if sent != datagram.len() {
            return Err(WyrmError::transport(format!(
                "short send to {}: {sent} of {} bytes",
                self.target,
                datagram.len()
            )));
        }
        Ok(())
    }
}

/// Keeps every datagram in memory instead of sending it.
#[derive(Clone, Debug, Default)]
pub struct MemoryTransport {
    /// Datagrams in send order.
    pub datagrams: Vec<Vec<u8>>,
}

impl Transport for MemoryTransport {
    fn send(&mut self, datagram: &[u8]) -> WyrmResult<()> {
        self.datagrams.push(datagram.to_vec());
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, datagram: &[u8]) -> WyrmResult<()> {
        (**self).send(datagram)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transport/udp.rs"]
mod tests;
