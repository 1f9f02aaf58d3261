//! Datagram transports.
//!
//! [`UdpTransport`] talks to a real agent; [`MockTransport`] replays queued
//! responses so request handling can be exercised without a network.

mod mock;
mod udp;

pub use mock::{MockResponse, MockTransport};
pub use udp::UdpTransport;

use crate::error::Result;
use bytes::Bytes;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

/// Request/response exchange with one agent.
pub trait Transport: Send + Sync + Clone {
    /// Send one encoded message.
    fn send(&self, data: &[u8]) -> impl Future<Output = Result<()>> + Send;

    /// Wait up to `timeout` for the next datagram.
    ///
    /// `request_id` is only used for logging and by the mock.
    fn recv(
        &self,
        request_id: i32,
        timeout: Duration,
    ) -> impl Future<Output = Result<(Bytes, SocketAddr)>> + Send;

    fn peer_addr(&self) -> SocketAddr;
}
