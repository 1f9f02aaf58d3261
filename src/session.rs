//! Request/response exchange with one agent.

use std::time::Duration;

use bytes::Bytes;
use tokio::time::Instant;

use crate::error::{Error, Result};
use crate::message::{CommunityMessage, Version};
use crate::pdu::{Pdu, PduType};
use crate::transport::Transport;

/// Connection parameters shared by all requests of a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub version: Version,
    pub community: Bytes,
    pub timeout: Duration,
    /// Resends after the first attempt times out.
    pub retries: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            version: Version::V2c,
            community: Bytes::from_static(b"public"),
            timeout: Duration::from_secs(3),
            retries: 3,
        }
    }
}

/// One agent behind a transport.
pub struct Session<T: Transport> {
    transport: T,
    config: SessionConfig,
    next_request_id: i32,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T, config: SessionConfig) -> Self {
        Self {
            transport,
            config,
            next_request_id: 1,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn alloc_request_id(&mut self) -> i32 {
        let id = self.next_request_id;
        self.next_request_id = self.next_request_id.checked_add(1).unwrap_or(1);
        id
    }

    /// Send `pdu` and wait for its response.
    ///
    /// A fresh request id is assigned. Timeouts are retried up to
    /// `retries` times; responses with another request id are dropped
    /// without extending the attempt's timeout. An error status in the response is returned as part of the PDU, not as
    /// an `Err`.
    pub async fn send_request(&mut self, mut pdu: Pdu) -> Result<Pdu> {
        let request_id = self.alloc_request_id();
        pdu.request_id = request_id;
        let pdu_type = pdu.pdu_type;
        let data = CommunityMessage::new(self.config.version, self.config.community.clone(), pdu)
            .encode();

        let target = self.transport.peer_addr();
        let start = Instant::now();
        tracing::debug!(
            target: "snmpmap::session",
            { snmp.target = %target, snmp.request_id = request_id, snmp.pdu_type = %pdu_type },
            "sending request"
        );

        for attempt in 0..=self.config.retries {
            if attempt > 0 {
                tracing::debug!(target: "snmpmap::session", { snmp.request_id = request_id, attempt }, "retrying request");
            }
            self.transport.send(&data).await?;
            let deadline = Instant::now() + self.config.timeout;

            loop {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    break;
                }
                let (reply, source) = match self.transport.recv(request_id, remaining).await {
                    Ok(received) => received,
                    Err(e) if matches!(*e, Error::Timeout { .. }) => break,
                    Err(e) => return Err(e),
                };
                let message = match CommunityMessage::decode(reply) {
                    Ok(message) => message,
                    Err(_) => return Err(Error::MalformedResponse { target: source }.boxed()),
                };
                if message.pdu.request_id != request_id {
                    tracing::debug!(
                        target: "snmpmap::session",
                        { expected = request_id, actual = message.pdu.request_id },
                        "dropping response with mismatched request id"
                    );
                    continue;
                }
                if message.pdu.pdu_type != PduType::Response {
                    return Err(Error::MalformedResponse { target: source }.boxed());
                }
                return Ok(message.into_pdu());
            }
        }

        let elapsed = start.elapsed();
        tracing::debug!(target: "snmpmap::session", { snmp.target = %target, ?elapsed }, "request timed out");
        Err(Error::Timeout {
            target,
            elapsed,
            retries: self.config.retries,
        }
        .boxed())
    }
}
