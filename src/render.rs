//! Display text for response bindings.
//!
//! A resolved binding prints as `name.instance = value` for scalars and
//! `name[field, field] = value` for table columns, the fields decoded from
//! the instance suffix. Unresolved bindings print their numeric OID.

use std::fmt::Write as _;

use crate::catalog::ObjectDescriptor;
use crate::catalog::table::{IndexColumn, IndexValue, TableDescriptor};
use crate::enums::EnumTable;
use crate::mapping::Mapping;
use crate::oid::Oid;
use crate::pdu::Pdu;
use crate::resolve::{OutputMode, QueryObject, ToolConfig};
use crate::syntax::SyntaxKind;
use crate::tc::TextualConvention;
use crate::value::Value;

/// Formats bindings against one mapping under one configuration.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'m> {
    mapping: &'m Mapping,
    config: &'m ToolConfig,
}

impl<'m> Renderer<'m> {
    pub fn new(mapping: &'m Mapping, config: &'m ToolConfig) -> Self {
        Self { mapping, config }
    }

    fn verbose(&self) -> bool {
        self.config.output == OutputMode::Verbose
    }

    /// One output line, without the newline.
    ///
    /// ```
    /// use snmpmap::catalog::{BucketKind, ObjectDescriptor};
    /// use snmpmap::mapping::Mapping;
    /// use snmpmap::render::Renderer;
    /// use snmpmap::resolve::{Resolver, ToolConfig};
    /// use snmpmap::syntax::SyntaxKind;
    /// use snmpmap::{Value, VarBind, oid};
    ///
    /// let mut mapping = Mapping::new();
    /// mapping
    ///     .insert_object(
    ///         BucketKind::TimeTicks,
    ///         ObjectDescriptor::new("sysUpTime", oid!(1, 3, 6, 1, 2, 1, 1, 3), SyntaxKind::TimeTicks),
    ///     )
    ///     .unwrap();
    /// let config = ToolConfig::default();
    /// let query = Resolver::new(&mapping, &config).resolve_response_binding(VarBind::new(
    ///     oid!(1, 3, 6, 1, 2, 1, 1, 3, 0),
    ///     Value::TimeTicks(4200),
    /// ));
    /// assert_eq!(Renderer::new(&mapping, &config).line(&query), "sysUpTime.0 = 4200");
    /// ```
    pub fn line(&self, query: &QueryObject<'_>) -> String {
        let value = self.value(query);
        if self.config.output == OutputMode::Quiet {
            return value;
        }
        format!("{} = {}", self.object_name(query), value)
    }

    /// Object part of a line: catalog name with instance or index, or the
    /// numeric OID.
    pub fn object_name(&self, query: &QueryObject<'_>) -> String {
        match query.descriptor {
            Some(descriptor) if !self.config.numeric => self.named(descriptor, query.oid()),
            _ => query.oid().to_string(),
        }
    }

    fn named(&self, descriptor: &ObjectDescriptor, oid: &Oid) -> String {
        let mut out = String::from(&*descriptor.name);
        let Some(table) = self.mapping.table_of(descriptor) else {
            if let Some(instance) = oid.last() {
                let _ = write!(out, ".{instance}");
            }
            return out;
        };
        out.push('[');
        out.push_str(&self.index_fields(table, descriptor, oid).join(", "));
        out.push(']');
        out
    }

    /// Decoded index fields of a column instance, up to the first field that
    /// fails to decode.
    fn index_fields(&self, table: &TableDescriptor, column: &ObjectDescriptor, oid: &Oid) -> Vec<String> {
        let mut suffix = oid.arcs().get(column.oid.len()..).unwrap_or_default();
        let mut fields = Vec::with_capacity(table.index.len());
        for index in &table.index {
            match index.decode(&mut suffix) {
                Ok(value) => fields.push(self.index_value(index, &value)),
                Err(e) => {
                    tracing::debug!(
                        target: "snmpmap::render",
                        { table = %table.name, oid = %oid, error = %e },
                        "index decode stopped"
                    );
                    break;
                }
            }
        }
        fields
    }

    fn index_value(&self, column: &IndexColumn, value: &IndexValue) -> String {
        match value {
            IndexValue::Integer(v) => {
                let enums = column.enums.as_ref().and_then(|e| e.resolve(self.mapping.types()));
                self.integer(*v, enums)
            }
            IndexValue::OctetString(bytes) => self.prefixed(SyntaxKind::OctetString, column.tc.index_token(bytes)),
            IndexValue::Oid(oid) => self.oid_value(oid),
            IndexValue::IpAddress(addr) => self.ip_address(*addr),
            IndexValue::Counter32(v) => self.prefixed(SyntaxKind::Counter32, v),
            IndexValue::Gauge32(v) => self.prefixed(SyntaxKind::Gauge32, v),
            IndexValue::TimeTicks(v) => self.prefixed(SyntaxKind::TimeTicks, v),
            IndexValue::Counter64(v) => self.prefixed(SyntaxKind::Counter64, v),
        }
    }

    /// Value part of a line.
    pub fn value(&self, query: &QueryObject<'_>) -> String {
        let descriptor = query.descriptor.filter(|_| !self.config.numeric);
        match &query.binding.value {
            Value::Integer(v) => {
                let enums = descriptor.and_then(|d| d.enum_table(self.mapping.types()));
                self.integer(*v, enums)
            }
            Value::OctetString(bytes) => {
                let tc = descriptor.map_or(TextualConvention::Plain, |d| d.tc);
                self.octets(tc, bytes)
            }
            Value::ObjectIdentifier(oid) => self.oid_value(oid),
            Value::IpAddress(addr) => self.ip_address(*addr),
            Value::Counter32(v) => self.prefixed(SyntaxKind::Counter32, v),
            Value::Gauge32(v) => self.prefixed(SyntaxKind::Gauge32, v),
            Value::TimeTicks(v) => self.prefixed(SyntaxKind::TimeTicks, v),
            Value::Counter64(v) => self.prefixed(SyntaxKind::Counter64, v),
            Value::NoSuchObject => "No Such Object".into(),
            Value::NoSuchInstance => "No Such Instance".into(),
            Value::EndOfMibView => "End of Mib View".into(),
            Value::Null => "agent returned NULL Syntax".into(),
            _ => "agent returned unknown syntax".into(),
        }
    }

    fn prefixed(&self, syntax: SyntaxKind, value: impl std::fmt::Display) -> String {
        if self.verbose() {
            format!("{syntax} : {value}")
        } else {
            value.to_string()
        }
    }

    fn integer(&self, value: i32, enums: Option<&EnumTable>) -> String {
        match enums.and_then(|table| table.label(value)) {
            Some(label) => self.prefixed(SyntaxKind::Integer, label),
            None => self.prefixed(SyntaxKind::Integer, value),
        }
    }

    fn octets(&self, tc: TextualConvention, bytes: &[u8]) -> String {
        if bytes.is_empty() {
            return String::new();
        }
        self.prefixed(SyntaxKind::OctetString, tc.decode(bytes))
    }

    fn ip_address(&self, addr: [u8; 4]) -> String {
        self.prefixed(SyntaxKind::IpAddress, std::net::Ipv4Addr::from(addr))
    }

    /// An OID value by name (alias, OID object or node), else numeric.
    pub fn oid_value(&self, oid: &Oid) -> String {
        let name = if self.config.numeric {
            None
        } else {
            self.mapping.oid_value_name(oid)
        };
        match name {
            Some(name) => self.prefixed(SyntaxKind::ObjectIdentifier, name),
            None => self.prefixed(SyntaxKind::ObjectIdentifier, oid),
        }
    }

    /// Report for an error response from `target` (`host:port`).
    ///
    /// `offending` is the binding the error index points at; `None` when the
    /// index is outside the binding list.
    pub fn error_response(&self, target: &str, pdu: &Pdu, offending: Option<&QueryObject<'_>>) -> String {
        let Some(query) = offending else {
            return "Invalid error index in PDU".into();
        };
        format!(
            "Agent {target} returned error\n{} caused error - {}",
            self.object_name(query),
            pdu.error_status().description()
        )
    }
}
