use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::net::UdpSocket;
use tokio::time::timeout;

use super::Transport;
use crate::error::{Error, Result};
use crate::format::hex;
use crate::util::bind_ephemeral_udp_socket;

/// Connected UDP socket to a single agent.
#[derive(Clone)]
pub struct UdpTransport {
    inner: Arc<Inner>,
}

struct Inner {
    socket: UdpSocket,
    target: SocketAddr,
    recv_buffer: usize,
}

impl UdpTransport {
    /// Bind an ephemeral socket and connect it to `target`.
    ///
    /// `recv_buffer` bounds the size of one response.
    pub async fn connect(target: SocketAddr, recv_buffer: usize) -> Result<Self> {
        let network = |source| Error::Network { target, source }.boxed();

        let socket = bind_ephemeral_udp_socket(target, recv_buffer).map_err(network)?;
        socket.connect(target).await.map_err(network)?;
        tracing::debug!(
            target: "snmpmap::transport",
            { snmp.target = %target, snmp.local_addr = ?socket.local_addr().ok() },
            "UDP transport connected"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                socket,
                target,
                recv_buffer,
            }),
        })
    }
}

impl Transport for UdpTransport {
    async fn send(&self, data: &[u8]) -> Result<()> {
        let target = self.inner.target;
        tracing::trace!(
            target: "snmpmap::transport",
            { snmp.target = %target, snmp.bytes = data.len(), snmp.data = %hex::Bytes(data) },
            "UDP send"
        );
        self.inner
            .socket
            .send(data)
            .await
            .map_err(|source| Error::Network { target, source }.boxed())?;
        Ok(())
    }

    async fn recv(&self, request_id: i32, recv_timeout: Duration) -> Result<(Bytes, SocketAddr)> {
        let target = self.inner.target;
        let mut buf = vec![0u8; self.inner.recv_buffer];

        match timeout(recv_timeout, self.inner.socket.recv(&mut buf)).await {
            Ok(Ok(len)) => {
                buf.truncate(len);
                tracing::trace!(
                    target: "snmpmap::transport",
                    { snmp.target = %target, snmp.bytes = len, snmp.data = %hex::Bytes(&buf) },
                    "UDP recv"
                );
                Ok((Bytes::from(buf), target))
            }
            Ok(Err(source)) => Err(Error::Network { target, source }.boxed()),
            Err(_) => {
                tracing::trace!(target: "snmpmap::transport", { snmp.target = %target, snmp.request_id = request_id }, "UDP recv timeout");
                Err(Error::Timeout {
                    target,
                    elapsed: recv_timeout,
                    retries: 0,
                }
                .boxed())
            }
        }
    }

    fn peer_addr(&self) -> SocketAddr {
        self.inner.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_loopback_exchange() {
        let agent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = agent.local_addr().unwrap();
        let transport = UdpTransport::connect(addr, 1500).await.unwrap();

        transport.send(b"ping").await.unwrap();
        let mut buf = [0u8; 16];
        let (n, from) = agent.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"ping");
        agent.send_to(b"pong", from).await.unwrap();

        let (data, source) = transport.recv(1, Duration::from_secs(2)).await.unwrap();
        assert_eq!(&data[..], b"pong");
        assert_eq!(source, addr);
    }

    #[tokio::test]
    async fn test_recv_timeout() {
        let agent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let transport = UdpTransport::connect(agent.local_addr().unwrap(), 1500)
            .await
            .unwrap();
        let err = transport
            .recv(1, Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(matches!(*err, Error::Timeout { .. }));
    }
}
