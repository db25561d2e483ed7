// src/net.rs
//! One UDP request/response exchange.
//!
//! Every exchange binds its own socket and connects it to the peer, so
//! concurrent exchanges never see each other's datagrams and stray traffic
//! from other hosts is filtered by the kernel.

use log::trace;
use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;

#[derive(Debug)]
pub enum ExchangeError {
    Bind(io::Error),
    Connect(io::Error),
    Send(io::Error),
    Receive(io::Error),
    Timeout,
}

impl fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind(e) => write!(f, "could not bind udp socket: {}", e),
            Self::Connect(e) => write!(f, "could not connect udp socket: {}", e),
            Self::Send(e) => write!(f, "send failed: {}", e),
            Self::Receive(e) => write!(f, "receive failed: {}", e),
            Self::Timeout => write!(f, "timed out waiting for reply"),
        }
    }
}

impl std::error::Error for ExchangeError {}

/// Sends `request` to `addr` and waits up to `timeout` for a single datagram of
/// at most `max_reply` bytes.
pub async fn udp_exchange(
    addr: SocketAddr,
    request: &[u8],
    max_reply: usize,
    timeout: Duration,
) -> Result<Vec<u8>, ExchangeError> {
    let local: SocketAddr = if addr.is_ipv4() {
        SocketAddr::from(([0u8; 4], 0))
    } else {
        SocketAddr::from(([0u16; 8], 0))
    };

    let socket = UdpSocket::bind(local).await.map_err(ExchangeError::Bind)?;
    socket.connect(addr).await.map_err(ExchangeError::Connect)?;

    let sent = socket.send(request).await.map_err(ExchangeError::Send)?;
    if sent != request.len() {
        return Err(ExchangeError::Send(io::ErrorKind::WriteZero.into()));
    }
    trace!("Sent {} bytes to {}", sent, addr);

    let mut buffer = vec![0u8; max_reply];
    match tokio::time::timeout(timeout, socket.recv(&mut buffer)).await {
        Ok(Ok(len)) => {
            buffer.truncate(len);
            trace!("Received {} bytes from {}", len, addr);
            Ok(buffer)
        }
        Ok(Err(e)) => Err(ExchangeError::Receive(e)),
        Err(_) => Err(ExchangeError::Timeout),
    }
}
