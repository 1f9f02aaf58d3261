//! In-process SNMP agent for testing.
//!
//! Answers GET, GETNEXT and SET from an ordered map on an ephemeral
//! localhost port. The serving task is aborted on drop.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::ops::Bound;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use snmpmap::message::CommunityMessage;
use snmpmap::{ErrorStatus, Oid, Pdu, PduType, Value, VarBind};
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

type Data = Arc<Mutex<BTreeMap<Oid, Value>>>;

pub struct TestAgent {
    addr: SocketAddr,
    data: Data,
    task: JoinHandle<()>,
}

impl TestAgent {
    pub async fn with_data(initial: BTreeMap<Oid, Value>) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").await.expect("bind test agent");
        let addr = socket.local_addr().expect("test agent address");
        let data = Arc::new(Mutex::new(initial));
        let task = tokio::spawn(serve(socket, data.clone()));
        Self { addr, data, task }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Current value of `oid`.
    pub fn get(&self, oid: &Oid) -> Option<Value> {
        self.data.lock().unwrap().get(oid).cloned()
    }
}

impl Drop for TestAgent {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(socket: UdpSocket, data: Data) {
    let mut buf = vec![0u8; 65535];
    loop {
        let Ok((len, peer)) = socket.recv_from(&mut buf).await else {
            return;
        };
        let Ok(request) = CommunityMessage::decode(Bytes::copy_from_slice(&buf[..len])) else {
            continue;
        };
        let pdu = respond(&data, request.pdu);
        let reply = CommunityMessage::new(request.version, request.community, pdu).encode();
        let _ = socket.send_to(&reply, peer).await;
    }
}

fn respond(data: &Data, request: Pdu) -> Pdu {
    let mut data = data.lock().unwrap();
    let mut varbinds = Vec::with_capacity(request.varbinds.len());
    for (i, binding) in request.varbinds.iter().enumerate() {
        match request.pdu_type {
            PduType::GetRequest => {
                let value = data.get(&binding.oid).cloned().unwrap_or(Value::NoSuchInstance);
                varbinds.push(VarBind::new(binding.oid.clone(), value));
            }
            PduType::GetNextRequest => {
                let next = data
                    .range((Bound::Excluded(binding.oid.clone()), Bound::Unbounded))
                    .next()
                    .map(|(oid, value)| VarBind::new(oid.clone(), value.clone()));
                varbinds.push(next.unwrap_or_else(|| VarBind::new(binding.oid.clone(), Value::EndOfMibView)));
            }
            PduType::SetRequest => {
                if !data.contains_key(&binding.oid) {
                    return Pdu::response(request.request_id, request.varbinds.clone())
                        .with_error(ErrorStatus::NotWritable, i as i32 + 1);
                }
                data.insert(binding.oid.clone(), binding.value.clone());
                varbinds.push(binding.clone());
            }
            _ => {
                return Pdu::response(request.request_id, request.varbinds.clone())
                    .with_error(ErrorStatus::GenErr, 0);
            }
        }
    }
    Pdu::response(request.request_id, varbinds)
}
