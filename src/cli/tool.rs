//! Request drivers behind the `snmpmap-get`, `snmpmap-set` and
//! `snmpmap-walk` binaries.
//!
//! Response lines go to `out`; agent error reports and retry notices go to
//! `diag`.

use std::io::Write;
use std::process::ExitCode;

use bytes::Bytes;

use crate::error::{Error, ErrorStatus, Result};
use crate::mapping::Mapping;
use crate::message::Version;
use crate::oid::Oid;
use crate::pdu::{Pdu, PduType};
use crate::render::Renderer;
use crate::resolve::{QueryObject, Resolver, ToolConfig};
use crate::session::{Session, SessionConfig};
use crate::syntax::SyntaxKind;
use crate::transport::{Transport, UdpTransport};
use crate::value::Value;
use crate::varbind::{MAX_BINDINGS, VarBind};

use super::args::CommonArgs;

/// Subtree walked when no root is given (`mib-2`).
pub const DEFAULT_WALK_ROOT: [u32; 6] = [1, 3, 6, 1, 2, 1];

/// How a tool run ended when no local error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Complete,
    /// The agent answered with an error status that was not retried away.
    AgentError(ErrorStatus),
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Complete => ExitCode::SUCCESS,
            Outcome::AgentError(_) => ExitCode::FAILURE,
        }
    }
}

/// Resolve every command line item; between 1 and [`MAX_BINDINGS`] are
/// accepted.
pub fn resolve_all<'m>(resolver: &Resolver<'m>, inputs: &[String]) -> Result<Vec<QueryObject<'m>>> {
    if inputs.is_empty() {
        return Err(Error::usage("at least one OID expected"));
    }
    if inputs.len() > MAX_BINDINGS {
        return Err(Error::TooManyBindings {
            count: inputs.len(),
            max: MAX_BINDINGS,
        }
        .boxed());
    }
    inputs.iter().map(|input| resolver.resolve(input)).collect()
}

/// Open a UDP session to the agent named in `common`.
pub async fn connect(common: &CommonArgs, default_community: &str) -> Result<Session<UdpTransport>> {
    let target = common.server.socket_addr()?;
    let transport = UdpTransport::connect(target, usize::from(common.buffer_size)).await?;
    Ok(Session::new(
        transport,
        SessionConfig {
            version: common.snmp_version.into(),
            community: Bytes::copy_from_slice(common.community_or(default_community).as_bytes()),
            timeout: common.timeout_duration(),
            retries: common.retries,
        },
    ))
}

fn output(e: std::io::Error) -> Box<Error> {
    Error::Output(e).boxed()
}

/// One tool invocation against one agent.
pub struct Tool<'m, T: Transport> {
    session: Session<T>,
    mapping: &'m Mapping,
    config: &'m ToolConfig,
    agent: String,
}

impl<'m, T: Transport> Tool<'m, T> {
    /// `agent` is the `host:port` text used in error reports.
    pub fn new(session: Session<T>, mapping: &'m Mapping, config: &'m ToolConfig, agent: impl Into<String>) -> Self {
        Self {
            session,
            mapping,
            config,
            agent: agent.into(),
        }
    }

    pub fn resolver(&self) -> Resolver<'m> {
        Resolver::new(self.mapping, self.config)
    }

    fn renderer(&self) -> Renderer<'m> {
        Renderer::new(self.mapping, self.config)
    }

    fn version(&self) -> Version {
        self.session.config().version
    }

    /// Reject objects a v1 agent cannot carry.
    fn check_version(&self, objects: &[QueryObject<'_>]) -> Result<()> {
        if self.version() != Version::V1 {
            return Ok(());
        }
        match objects.iter().find(|o| o.syntax() == SyntaxKind::Counter64) {
            Some(object) => Err(Error::usage(format!(
                "Counter64 object {} not supported by SNMPv1",
                self.renderer().object_name(object)
            ))),
            None => Ok(()),
        }
    }

    /// GET, GETNEXT or GETBULK, as configured.
    ///
    /// With retry enabled, an error response marks the offending object and
    /// the request is resent without it; GETBULK errors are never retried.
    pub async fn get(
        &mut self,
        mut objects: Vec<QueryObject<'m>>,
        non_repeaters: u32,
        max_repetitions: u32,
        out: &mut impl Write,
        diag: &mut impl Write,
    ) -> Result<Outcome> {
        self.check_version(&objects)?;
        match self.config.pdu_type {
            PduType::GetBulkRequest if self.version() == Version::V1 => {
                return Err(Error::usage("GETBULK requires SNMPv2c"));
            }
            PduType::GetRequest if !self.config.numeric => {
                if let Some(node) = objects.iter().find(|o| o.descriptor.is_some_and(|d| !d.is_leaf())) {
                    return Err(Error::usage(format!(
                        "{} is not a leaf object - try -p getnext",
                        self.renderer().object_name(node)
                    )));
                }
            }
            _ => {}
        }
        let (non_repeaters, max_repetitions) = bulk_counts(objects.len(), non_repeaters, max_repetitions);
        self.exchange(&mut objects, non_repeaters, max_repetitions, out, diag)
            .await
    }

    /// SET every object to its resolved value.
    ///
    /// Unless numeric or ignoring errors, each object must be writable.
    pub async fn set(
        &mut self,
        mut objects: Vec<QueryObject<'m>>,
        out: &mut impl Write,
        diag: &mut impl Write,
    ) -> Result<Outcome> {
        self.check_version(&objects)?;
        if !self.config.numeric && !self.config.ignore_errors {
            for object in &objects {
                if !object.descriptor.is_some_and(|d| d.access.can_set()) {
                    return Err(Error::usage(format!(
                        "Object {} not accessible for set - try -a",
                        self.renderer().object_name(object)
                    )));
                }
            }
        }
        self.exchange(&mut objects, 0, 0, out, diag).await
    }

    fn build_request(&self, pending: &[&QueryObject<'_>], non_repeaters: i32, max_repetitions: i32) -> Result<Pdu> {
        let oids = || pending.iter().map(|o| o.oid().clone()).collect::<Vec<Oid>>();
        Ok(match self.config.pdu_type {
            PduType::GetRequest => Pdu::get(&oids()),
            PduType::GetNextRequest => Pdu::get_next(&oids()),
            PduType::GetBulkRequest => Pdu::get_bulk(&oids(), non_repeaters, max_repetitions),
            PduType::SetRequest => Pdu::set(pending.iter().map(|o| o.binding.clone()).collect()),
            other => return Err(Error::usage(format!("cannot send {other} requests"))),
        })
    }

    async fn exchange(
        &mut self,
        objects: &mut [QueryObject<'m>],
        non_repeaters: i32,
        max_repetitions: i32,
        out: &mut impl Write,
        diag: &mut impl Write,
    ) -> Result<Outcome> {
        let mut resends = 0;
        loop {
            let pending: Vec<&QueryObject<'_>> = objects.iter().filter(|o| o.error.is_none()).collect();
            let request = self.build_request(&pending, non_repeaters, max_repetitions)?;
            let response = self.session.send_request(request).await?;

            if !response.is_error() {
                self.print_bindings(response.varbinds, out)?;
                return Ok(Outcome::Complete);
            }

            let status = response.error_status();
            let offending = self.offending(objects, &response);
            writeln!(diag, "{}", self.renderer().error_response(&self.agent, &response, offending.as_ref()))
                .map_err(output)?;

            if self.config.pdu_type == PduType::GetBulkRequest
                || !self.config.retry
                || resends >= self.session.config().retries
            {
                return Ok(Outcome::AgentError(status));
            }
            let Some(offending) = offending else {
                return Ok(Outcome::AgentError(status));
            };
            let Some(marked) = objects
                .iter_mut()
                .find(|o| o.error.is_none() && o.oid() == offending.oid())
            else {
                return Ok(Outcome::AgentError(status));
            };
            marked.error = Some(status);
            if objects.iter().all(|o| o.error.is_some()) {
                return Ok(Outcome::AgentError(status));
            }

            tracing::debug!(
                target: "snmpmap::session",
                { snmp.target = %self.agent, oid = %offending.oid(), status = %status },
                "dropping binding and resending"
            );
            writeln!(diag, "Retrying...").map_err(output)?;
            resends += 1;
        }
    }

    /// The object an error response points at: the request object with the
    /// same OID when there is one, otherwise the resolved response binding.
    fn offending(&self, objects: &[QueryObject<'m>], response: &Pdu) -> Option<QueryObject<'m>> {
        let position = usize::try_from(response.error_index).ok()?.checked_sub(1)?;
        let binding = response.varbinds.get(position)?;
        let query = objects
            .iter()
            .find(|o| o.oid() == &binding.oid)
            .cloned()
            .unwrap_or_else(|| self.resolver().resolve_response_binding(binding.clone()));
        Some(query)
    }

    fn print_bindings(&self, bindings: Vec<VarBind>, out: &mut impl Write) -> Result<()> {
        let resolver = self.resolver();
        let renderer = self.renderer();
        for binding in bindings {
            let query = resolver.resolve_response_binding(binding);
            writeln!(out, "{}", renderer.line(&query)).map_err(output)?;
        }
        Ok(())
    }

    /// Walk the subtree below `root`, or below `mib-2` when `None`.
    ///
    /// The walk ends when a response leaves the subtree, reports the end of
    /// the MIB view, or fails to advance. When nothing was printed the root
    /// itself is fetched with GET.
    pub async fn walk(
        &mut self,
        root: Option<QueryObject<'m>>,
        out: &mut impl Write,
        diag: &mut impl Write,
    ) -> Result<Outcome> {
        let root = match root {
            Some(root) => root,
            None => {
                let oid = Oid::from_slice(&DEFAULT_WALK_ROOT);
                let descriptor = self.mapping.objects().lookup_nonleaf(&oid);
                QueryObject::new(descriptor, VarBind::null(oid))
            }
        };
        let root_oid = root.oid().clone();

        let resolver = self.resolver();
        let renderer = self.renderer();
        let mut outcome = Outcome::Complete;
        let mut last = root_oid.clone();
        let mut printed = 0usize;

        loop {
            let response = self.session.send_request(Pdu::get_next(&[last.clone()])).await?;
            if response.is_error() {
                let offending = self.offending(std::slice::from_ref(&root), &response);
                writeln!(diag, "{}", renderer.error_response(&self.agent, &response, offending.as_ref()))
                    .map_err(output)?;
                outcome = Outcome::AgentError(response.error_status());
                break;
            }
            let Some(binding) = response.varbinds.into_iter().next() else {
                break;
            };
            if binding.value == Value::EndOfMibView || !root_oid.is_prefix_of(&binding.oid) {
                break;
            }
            if binding.oid <= last {
                tracing::warn!(target: "snmpmap::session", { oid = %binding.oid, previous = %last }, "agent returned non-increasing OID");
                break;
            }
            last = binding.oid.clone();
            writeln!(out, "{}", renderer.line(&resolver.resolve_response_binding(binding))).map_err(output)?;
            printed += 1;
        }

        tracing::debug!(target: "snmpmap::session", { root = %root_oid, printed }, "walk finished");
        if printed > 0 {
            return Ok(outcome);
        }

        let response = self.session.send_request(Pdu::get(&[root_oid])).await?;
        if response.is_error() {
            let offending = self.offending(std::slice::from_ref(&root), &response);
            writeln!(diag, "{}", renderer.error_response(&self.agent, &response, offending.as_ref()))
                .map_err(output)?;
            return Ok(Outcome::AgentError(response.error_status()));
        }
        self.print_bindings(response.varbinds, out)?;
        Ok(outcome)
    }
}

/// GETBULK counts: non-repeaters capped at the binding count, at least one
/// repetition.
fn bulk_counts(bindings: usize, non_repeaters: u32, max_repetitions: u32) -> (i32, i32) {
    let cap = |v: u32| i32::try_from(v).unwrap_or(i32::MAX);
    let non_repeaters = cap(non_repeaters).min(i32::try_from(bindings).unwrap_or(i32::MAX));
    (non_repeaters, cap(max_repetitions.max(1)))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::catalog::{BucketKind, ObjectDescriptor};
    use crate::oid;
    use crate::syntax::Access;
    use crate::transport::MockTransport;

    fn mapping() -> Mapping {
        let mut mapping = Mapping::new();
        let sys = oid!(1, 3, 6, 1, 2, 1, 1);
        mapping
            .insert_object(BucketKind::Node, ObjectDescriptor::node("system", sys.clone()))
            .unwrap();
        mapping
            .insert_object(
                BucketKind::OctetString,
                ObjectDescriptor::new("sysDescr", sys.child(1).unwrap(), SyntaxKind::OctetString)
                    .with_access(Access::Get),
            )
            .unwrap();
        mapping
            .insert_object(
                BucketKind::TimeTicks,
                ObjectDescriptor::new("sysUpTime", sys.child(3).unwrap(), SyntaxKind::TimeTicks)
                    .with_access(Access::Get),
            )
            .unwrap();
        mapping
            .insert_object(
                BucketKind::OctetString,
                ObjectDescriptor::new("sysContact", sys.child(4).unwrap(), SyntaxKind::OctetString)
                    .with_access(Access::GetSet),
            )
            .unwrap();
        mapping
            .insert_object(
                BucketKind::Counter64,
                ObjectDescriptor::new("ifHCInOctets", oid!(1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 6), SyntaxKind::Counter64),
            )
            .unwrap();
        mapping
    }

    fn tool<'m>(
        mock: &MockTransport,
        mapping: &'m Mapping,
        config: &'m ToolConfig,
        version: Version,
    ) -> Tool<'m, MockTransport> {
        let session = Session::new(
            mock.clone(),
            SessionConfig {
                version,
                timeout: Duration::from_millis(10),
                retries: 2,
                ..SessionConfig::default()
            },
        );
        Tool::new(session, mapping, config, "192.0.2.1:161")
    }

    fn mock() -> MockTransport {
        MockTransport::new("192.0.2.1:161".parse().unwrap())
    }

    fn config(pdu_type: PduType) -> ToolConfig {
        ToolConfig {
            pdu_type,
            ..ToolConfig::default()
        }
    }

    fn inputs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn text(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_binding_count_limits() {
        let mapping = mapping();
        let config = ToolConfig::default();
        let resolver = Resolver::new(&mapping, &config);
        assert!(matches!(*resolve_all(&resolver, &[]).unwrap_err(), Error::Usage(_)));

        let many = vec!["sysUpTime".to_string(); MAX_BINDINGS + 1];
        let err = resolve_all(&resolver, &many).unwrap_err();
        assert!(matches!(*err, Error::TooManyBindings { count: 129, max: 128 }));
        assert_eq!(resolve_all(&resolver, &many[..MAX_BINDINGS]).unwrap().len(), MAX_BINDINGS);
    }

    #[test]
    fn test_bulk_counts() {
        assert_eq!(bulk_counts(2, 5, 0), (2, 1));
        assert_eq!(bulk_counts(3, 1, 10), (1, 10));
    }

    #[tokio::test]
    async fn test_get_prints_bindings() {
        let mapping = mapping();
        let config = ToolConfig::default();
        let mock = mock();
        mock.queue_response(Pdu::response(
            0,
            vec![
                VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), Value::TimeTicks(4200)),
                VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::OctetString(Bytes::from_static(b"router"))),
            ],
        ));
        let mut tool = tool(&mock, &mapping, &config, Version::V2c);
        let objects = resolve_all(&tool.resolver(), &inputs(&["sysUpTime", "sysDescr"])).unwrap();

        let (mut out, mut diag) = (Vec::new(), Vec::new());
        let outcome = tool.get(objects, 0, 10, &mut out, &mut diag).await.unwrap();
        assert_eq!(outcome, Outcome::Complete);
        assert_eq!(text(out), "sysUpTime.0 = 4200\nsysDescr.0 = router\n");

        let sent = mock.requests();
        assert_eq!(sent[0].pdu.pdu_type, PduType::GetRequest);
        assert_eq!(sent[0].pdu.varbinds[0].oid, oid!(1, 3, 6, 1, 2, 1, 1, 3, 0));
    }

    #[tokio::test]
    async fn test_get_rejects_node() {
        let mapping = mapping();
        let config = ToolConfig::default();
        let mut tool = tool(&mock(), &mapping, &config, Version::V2c);
        let objects = resolve_all(&tool.resolver(), &inputs(&["system"])).unwrap();
        let err = tool
            .get(objects, 0, 10, &mut Vec::new(), &mut Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(*err, Error::Usage(_)));
    }

    #[tokio::test]
    async fn test_v1_restrictions() {
        let mapping = mapping();
        let config = config(PduType::GetNextRequest);
        let mut tool = tool(&mock(), &mapping, &config, Version::V1);
        let objects = resolve_all(&tool.resolver(), &inputs(&["ifHCInOctets"])).unwrap();
        let err = tool
            .get(objects, 0, 10, &mut Vec::new(), &mut Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(*err, Error::Usage(_)));

        let config = self::config(PduType::GetBulkRequest);
        let mut tool = self::tool(&mock(), &mapping, &config, Version::V1);
        let objects = resolve_all(&tool.resolver(), &inputs(&["sysDescr"])).unwrap();
        let err = tool
            .get(objects, 0, 10, &mut Vec::new(), &mut Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(*err, Error::Usage(_)));
    }

    #[tokio::test]
    async fn test_getbulk_counts_sent() {
        let mapping = mapping();
        let config = config(PduType::GetBulkRequest);
        let mock = mock();
        mock.queue_response(Pdu::response(0, vec![]));
        let mut tool = tool(&mock, &mapping, &config, Version::V2c);
        let objects = resolve_all(&tool.resolver(), &inputs(&["sysDescr"])).unwrap();
        tool.get(objects, 4, 0, &mut Vec::new(), &mut Vec::new()).await.unwrap();

        let pdu = &mock.requests()[0].pdu;
        assert_eq!(pdu.pdu_type, PduType::GetBulkRequest);
        assert_eq!(pdu.error_status, 1);
        assert_eq!(pdu.error_index, 1);
    }

    #[tokio::test]
    async fn test_error_without_retry() {
        let mapping = mapping();
        let config = ToolConfig::default();
        let mock = mock();
        let request = vec![
            VarBind::null(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0)),
            VarBind::null(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)),
        ];
        mock.queue_response(Pdu::response(0, request).with_error(ErrorStatus::NoSuchName, 2));
        let mut tool = tool(&mock, &mapping, &config, Version::V2c);
        let objects = resolve_all(&tool.resolver(), &inputs(&["sysUpTime", "sysDescr"])).unwrap();

        let (mut out, mut diag) = (Vec::new(), Vec::new());
        let outcome = tool.get(objects, 0, 10, &mut out, &mut diag).await.unwrap();
        assert_eq!(outcome, Outcome::AgentError(ErrorStatus::NoSuchName));
        assert!(out.is_empty());
        let diag = text(diag);
        assert!(diag.starts_with("Agent 192.0.2.1:161 returned error\nsysDescr.0 caused error - "));
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_error_retry_drops_binding() {
        let mapping = mapping();
        let config = ToolConfig {
            retry: true,
            ..ToolConfig::default()
        };
        let mock = mock();
        mock.queue_response(
            Pdu::response(
                0,
                vec![
                    VarBind::null(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0)),
                    VarBind::null(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)),
                ],
            )
            .with_error(ErrorStatus::NoSuchName, 1),
        );
        mock.queue_response(Pdu::response(
            0,
            vec![VarBind::new(
                oid!(1, 3, 6, 1, 2, 1, 1, 1, 0),
                Value::OctetString(Bytes::from_static(b"router")),
            )],
        ));
        let mut tool = tool(&mock, &mapping, &config, Version::V2c);
        let objects = resolve_all(&tool.resolver(), &inputs(&["sysUpTime", "sysDescr"])).unwrap();

        let (mut out, mut diag) = (Vec::new(), Vec::new());
        let outcome = tool.get(objects, 0, 10, &mut out, &mut diag).await.unwrap();
        assert_eq!(outcome, Outcome::Complete);
        assert_eq!(text(out), "sysDescr.0 = router\n");
        assert!(text(diag).ends_with("Retrying...\n"));

        let sent = mock.requests();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].pdu.varbinds.len(), 1);
        assert_eq!(sent[1].pdu.varbinds[0].oid, oid!(1, 3, 6, 1, 2, 1, 1, 1, 0));
    }

    #[tokio::test]
    async fn test_invalid_error_index() {
        let mapping = mapping();
        let config = ToolConfig::default();
        let mock = mock();
        mock.queue_response(Pdu::response(0, vec![]).with_error(ErrorStatus::GenErr, 7));
        let mut tool = tool(&mock, &mapping, &config, Version::V2c);
        let objects = resolve_all(&tool.resolver(), &inputs(&["sysUpTime"])).unwrap();

        let mut diag = Vec::new();
        let outcome = tool.get(objects, 0, 10, &mut Vec::new(), &mut diag).await.unwrap();
        assert_eq!(outcome, Outcome::AgentError(ErrorStatus::GenErr));
        assert_eq!(text(diag), "Invalid error index in PDU\n");
    }

    #[tokio::test]
    async fn test_set_requires_write_access() {
        let mapping = mapping();
        let config = config(PduType::SetRequest);
        let mut tool = tool(&mock(), &mapping, &config, Version::V2c);
        let objects = resolve_all(&tool.resolver(), &inputs(&["sysDescr=router"])).unwrap();
        let err = tool.set(objects, &mut Vec::new(), &mut Vec::new()).await.unwrap_err();
        assert!(err.to_string().contains("not accessible for set - try -a"));
    }

    #[tokio::test]
    async fn test_set_sends_values() {
        let mapping = mapping();
        let config = config(PduType::SetRequest);
        let mock = mock();
        let contact = VarBind::new(
            oid!(1, 3, 6, 1, 2, 1, 1, 4, 0),
            Value::OctetString(Bytes::from_static(b"noc")),
        );
        mock.queue_response(Pdu::response(0, vec![contact.clone()]));
        let mut tool = tool(&mock, &mapping, &config, Version::V2c);
        let objects = resolve_all(&tool.resolver(), &inputs(&["sysContact=noc"])).unwrap();

        let mut out = Vec::new();
        let outcome = tool.set(objects, &mut out, &mut Vec::new()).await.unwrap();
        assert_eq!(outcome, Outcome::Complete);
        assert_eq!(text(out), "sysContact.0 = noc\n");
        let sent = mock.requests();
        assert_eq!(sent[0].pdu.pdu_type, PduType::SetRequest);
        assert_eq!(sent[0].pdu.varbinds, vec![contact]);
    }

    #[tokio::test]
    async fn test_walk_stops_outside_subtree() {
        let mapping = mapping();
        let config = config(PduType::GetNextRequest);
        let mock = mock();
        mock.queue_response(Pdu::response(
            0,
            vec![VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::OctetString(Bytes::from_static(b"router")))],
        ));
        mock.queue_response(Pdu::response(
            0,
            vec![VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), Value::TimeTicks(7))],
        ));
        mock.queue_response(Pdu::response(
            0,
            vec![VarBind::new(oid!(1, 3, 6, 1, 2, 1, 2, 1, 0), Value::Integer(2))],
        ));
        let mut tool = tool(&mock, &mapping, &config, Version::V2c);
        let root = tool.resolver().resolve("system").unwrap();

        let mut out = Vec::new();
        let outcome = tool.walk(Some(root), &mut out, &mut Vec::new()).await.unwrap();
        assert_eq!(outcome, Outcome::Complete);
        assert_eq!(text(out), "sysDescr.0 = router\nsysUpTime.0 = 7\n");

        let sent = mock.requests();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0].pdu.varbinds[0].oid, oid!(1, 3, 6, 1, 2, 1, 1));
        assert_eq!(sent[2].pdu.varbinds[0].oid, oid!(1, 3, 6, 1, 2, 1, 1, 3, 0));
    }

    #[tokio::test]
    async fn test_walk_falls_back_to_get() {
        let mapping = mapping();
        let config = config(PduType::GetNextRequest);
        let mock = mock();
        mock.queue_response(Pdu::response(
            0,
            vec![VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 4, 0), Value::OctetString(Bytes::from_static(b"noc")))],
        ));
        mock.queue_response(Pdu::response(
            0,
            vec![VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), Value::TimeTicks(9))],
        ));
        let mut tool = tool(&mock, &mapping, &config, Version::V2c);
        let root = tool.resolver().resolve("sysUpTime.0").unwrap();

        let mut out = Vec::new();
        tool.walk(Some(root), &mut out, &mut Vec::new()).await.unwrap();
        assert_eq!(text(out), "sysUpTime.0 = 9\n");
        assert_eq!(mock.requests()[1].pdu.pdu_type, PduType::GetRequest);
    }

    #[tokio::test]
    async fn test_walk_end_of_mib_view() {
        let mapping = mapping();
        let config = config(PduType::GetNextRequest);
        let mock = mock();
        mock.queue_response(Pdu::response(
            0,
            vec![VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), Value::TimeTicks(1))],
        ));
        mock.queue_response(Pdu::response(
            0,
            vec![VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), Value::EndOfMibView)],
        ));
        let mut tool = tool(&mock, &mapping, &config, Version::V2c);

        let mut out = Vec::new();
        tool.walk(None, &mut out, &mut Vec::new()).await.unwrap();
        assert_eq!(text(out), "sysUpTime.0 = 1\n");
        assert_eq!(mock.requests()[0].pdu.varbinds[0].oid, Oid::from_slice(&DEFAULT_WALK_ROOT));
    }
}
