//! Socket helpers.

use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;

/// Bind an ephemeral UDP socket in the address family of `target`.
///
/// `recv_buffer` sizes the kernel receive buffer. IPv6 sockets are
/// restricted to IPv6 traffic.
pub(crate) fn bind_ephemeral_udp_socket(
    target: SocketAddr,
    recv_buffer: usize,
) -> io::Result<UdpSocket> {
    let (domain, any) = if target.is_ipv6() {
        (Domain::IPV6, IpAddr::V6(Ipv6Addr::UNSPECIFIED))
    } else {
        (Domain::IPV4, IpAddr::V4(Ipv4Addr::UNSPECIFIED))
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if target.is_ipv6() {
        socket.set_only_v6(true)?;
    }
    socket.set_recv_buffer_size(recv_buffer)?;
    socket.set_nonblocking(true)?;
    socket.bind(&SocketAddr::new(any, 0).into())?;

    UdpSocket::from_std(socket.into())
}
