//! In-memory transport for tests.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use bytes::Bytes;

use super::Transport;
use crate::error::{Error, Result};
use crate::message::CommunityMessage;
use crate::pdu::Pdu;

/// What the mock answers to the next request.
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Response PDU; version, community and request id are copied from the request.
    Pdu(Pdu),
    /// Response PDU that arrives after the delay, or a timeout if the
    /// receive window is shorter.
    Delayed(Duration, Pdu),
    /// Bytes returned exactly as given.
    Raw(Bytes),
    Timeout,
    IoError(String),
}

struct Inner {
    target: SocketAddr,
    responses: VecDeque<MockResponse>,
    requests: Vec<CommunityMessage>,
}

/// Transport that records requests and replays queued responses.
///
/// ```
/// use snmpmap::transport::MockTransport;
/// use snmpmap::pdu::Pdu;
///
/// let mock = MockTransport::new("192.0.2.1:161".parse().unwrap());
/// mock.queue_response(Pdu::response(0, vec![]));
/// mock.queue_timeout();
/// assert_eq!(mock.queued(), 2);
/// ```
#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<Inner>>,
}

impl MockTransport {
    pub fn new(target: SocketAddr) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                target,
                responses: VecDeque::new(),
                requests: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn queue_response(&self, pdu: Pdu) {
        self.lock().responses.push_back(MockResponse::Pdu(pdu));
    }

    pub fn queue_delayed_response(&self, delay: Duration, pdu: Pdu) {
        self.lock().responses.push_back(MockResponse::Delayed(delay, pdu));
    }

    pub fn queue_raw(&self, data: impl Into<Bytes>) {
        self.lock().responses.push_back(MockResponse::Raw(data.into()));
    }

    pub fn queue_timeout(&self) {
        self.lock().responses.push_back(MockResponse::Timeout);
    }

    pub fn queue_io_error(&self, msg: impl Into<String>) {
        self.lock()
            .responses
            .push_back(MockResponse::IoError(msg.into()));
    }

    /// Every decoded request sent so far.
    pub fn requests(&self) -> Vec<CommunityMessage> {
        self.lock().requests.clone()
    }

    /// Responses not yet consumed.
    pub fn queued(&self) -> usize {
        self.lock().responses.len()
    }
}

impl Transport for MockTransport {
    async fn send(&self, data: &[u8]) -> Result<()> {
        let message = CommunityMessage::decode(Bytes::copy_from_slice(data))?;
        self.lock().requests.push(message);
        Ok(())
    }

    async fn recv(&self, request_id: i32, timeout: Duration) -> Result<(Bytes, SocketAddr)> {
        let (target, last, response) = {
            let mut inner = self.lock();
            // an empty queue behaves like a silent agent
            let response = inner.responses.pop_front().unwrap_or(MockResponse::Timeout);
            (inner.target, inner.requests.last().cloned(), response)
        };
        let timed_out = Error::Timeout {
            target,
            elapsed: timeout,
            retries: 0,
        };
        let reply = |mut pdu: Pdu| {
            let Some(request) = last else {
                return Err(Error::MalformedResponse { target }.boxed());
            };
            if pdu.request_id == 0 {
                pdu.request_id = request_id;
            }
            let reply = CommunityMessage::new(request.version, request.community, pdu);
            Ok((reply.encode(), target))
        };
        match response {
            MockResponse::Pdu(pdu) => reply(pdu),
            MockResponse::Delayed(delay, _) if delay > timeout => {
                tokio::time::sleep(timeout).await;
                Err(timed_out.boxed())
            }
            MockResponse::Delayed(delay, pdu) => {
                tokio::time::sleep(delay).await;
                reply(pdu)
            }
            MockResponse::Raw(data) => Ok((data, target)),
            MockResponse::Timeout => Err(timed_out.boxed()),
            MockResponse::IoError(msg) => Err(Error::Network {
                target,
                source: std::io::Error::other(msg),
            }
            .boxed()),
        }
    }

    fn peer_addr(&self) -> SocketAddr {
        self.lock().target
    }
}
