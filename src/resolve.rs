//! From user input to request bindings, and from response bindings back to
//! catalog objects.
//!
//! Symbolic input has the shape `name[.suboid][[index]]`, with `=value`
//! appended for SET. In numeric mode the input is plain dotted decimal and the
//! catalog is never consulted.

use std::net::Ipv4Addr;
use std::str::FromStr;

use bytes::Bytes;

use crate::catalog::table::{IndexColumn, IndexValue, TableDescriptor};
use crate::catalog::{BucketKind, ObjectDescriptor};
use crate::enums::EnumTable;
use crate::error::{Error, ErrorStatus, OidErrorKind, Result};
use crate::mapping::Mapping;
use crate::oid::Oid;
use crate::pdu::PduType;
use crate::syntax::SyntaxKind;
use crate::tc::TextualConvention;
use crate::value::Value;
use crate::varbind::VarBind;

/// How response bindings are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Short,
    /// Every value carries a `Syntax : ` prefix; index and set literals must
    /// carry a `Syntax:` prefix.
    Verbose,
    Tabular,
    /// Values only.
    Quiet,
}

/// Per-invocation tool settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    pub output: OutputMode,
    /// Dotted-decimal input and output only.
    pub numeric: bool,
    /// Drop the offending binding and resend after an error response.
    pub retry: bool,
    /// Skip syntax and access checks.
    pub ignore_errors: bool,
    /// Request type the resolved objects are destined for.
    pub pdu_type: PduType,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            output: OutputMode::Short,
            numeric: false,
            retry: false,
            ignore_errors: false,
            pdu_type: PduType::GetRequest,
        }
    }
}

/// One request item or one response binding, with the catalog object it
/// resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryObject<'m> {
    pub descriptor: Option<&'m ObjectDescriptor>,
    pub binding: VarBind,
    /// Status the agent reported for this binding; such objects are left
    /// out of retried requests.
    pub error: Option<ErrorStatus>,
}

impl<'m> QueryObject<'m> {
    pub fn new(descriptor: Option<&'m ObjectDescriptor>, binding: VarBind) -> Self {
        Self {
            descriptor,
            binding,
            error: None,
        }
    }

    pub fn oid(&self) -> &Oid {
        &self.binding.oid
    }

    /// Syntax of the catalog object, or of the carried value when unresolved.
    pub fn syntax(&self) -> SyntaxKind {
        match self.descriptor {
            Some(d) => d.syntax,
            None => self.binding.value.syntax(),
        }
    }
}

/// Resolves names against one mapping under one configuration.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'m> {
    mapping: &'m Mapping,
    config: &'m ToolConfig,
}

impl<'m> Resolver<'m> {
    pub fn new(mapping: &'m Mapping, config: &'m ToolConfig) -> Self {
        Self { mapping, config }
    }

    pub fn mapping(&self) -> &'m Mapping {
        self.mapping
    }

    pub fn config(&self) -> &'m ToolConfig {
        self.config
    }

    /// Resolve one command line item for the configured request type.
    ///
    /// For GET, a scalar leaf named without suboid or index gets the
    /// instance `.0` appended. SET items always do, and must carry a value.
    ///
    /// ```
    /// use snmpmap::catalog::{BucketKind, ObjectDescriptor};
    /// use snmpmap::mapping::Mapping;
    /// use snmpmap::oid;
    /// use snmpmap::resolve::{Resolver, ToolConfig};
    /// use snmpmap::syntax::SyntaxKind;
    ///
    /// let mut mapping = Mapping::new();
    /// mapping
    ///     .insert_object(
    ///         BucketKind::TimeTicks,
    ///         ObjectDescriptor::new("sysUpTime", oid!(1, 3, 6, 1, 2, 1, 1, 3), SyntaxKind::TimeTicks),
    ///     )
    ///     .unwrap();
    /// let config = ToolConfig::default();
    /// let query = Resolver::new(&mapping, &config).resolve("sysUpTime").unwrap();
    /// assert_eq!(query.oid(), &oid!(1, 3, 6, 1, 2, 1, 1, 3, 0));
    /// ```
    pub fn resolve(&self, input: &str) -> Result<QueryObject<'m>> {
        let set = self.config.pdu_type == PduType::SetRequest;
        match (self.config.numeric, set) {
            (true, false) => Ok(QueryObject::new(None, VarBind::null(parse_numeric(input)?))),
            (true, true) => self.resolve_numeric_set(input),
            (false, _) => self.resolve_symbolic(input, set),
        }
    }

    fn resolve_numeric_set(&self, input: &str) -> Result<QueryObject<'m>> {
        let (oid, value) = input
            .split_once('=')
            .ok_or_else(|| Error::usage(format!("value to set expected after OID - {input}")))?;
        let oid = parse_numeric(oid)?;
        let (syntax, text) = self.split_syntax(value, None)?;
        let value = self.parse_value(syntax, text, None)?;
        Ok(QueryObject::new(None, VarBind::new(oid, value)))
    }

    fn resolve_symbolic(&self, input: &str, set: bool) -> Result<QueryObject<'m>> {
        let (name, rest) = split_name(input);
        if name.is_empty() {
            return Err(Error::UnknownObject(input.into()).boxed());
        }
        let (suboid, mut rest) = split_suboid(input, rest)?;

        let descriptor = self
            .mapping
            .lookup_name(name)
            .ok_or_else(|| Error::UnknownObject(name.into()).boxed())?;
        let mut oid = descriptor.oid.clone();

        if !suboid.is_empty() {
            oid.extend_from_slice(suboid.arcs())?;
        } else if let Some(literal) = rest.strip_prefix('[') {
            let table = self.mapping.table_of(descriptor).ok_or_else(|| {
                Error::InvalidIndex {
                    input: input.into(),
                    reason: format!("{name} is not a table column").into(),
                }
                .boxed()
            })?;
            rest = self.parse_index_literal(table, literal, &mut oid)?;
        } else if set || (descriptor.is_leaf() && self.config.pdu_type == PduType::GetRequest) {
            oid.push(0)?;
        }

        let value = if set {
            let text = rest
                .strip_prefix('=')
                .ok_or_else(|| Error::usage(format!("value to set expected after OID - {input}")))?;
            let (syntax, text) = self.split_syntax(text, Some(descriptor.syntax))?;
            self.parse_value(syntax, text, Some(descriptor))?
        } else {
            if let Some(ch) = rest.chars().next() {
                tracing::debug!(target: "snmpmap::resolve", { input, ch = %ch }, "trailing characters after OID");
                return Err(Error::malformed_oid(input, OidErrorKind::InvalidArc));
            }
            Value::Null
        };

        Ok(QueryObject::new(Some(descriptor), VarBind::new(oid, value)))
    }

    /// Encode a bracketed index literal into `oid`.
    ///
    /// `literal` starts after the opening `[`. One token per index column is
    /// read, separated by `,` and closed by `]`; surrounding whitespace is
    /// ignored and double quotes protect separators inside octet strings.
    /// Returns the input following the closing bracket. `oid` is only
    /// extended when the whole literal encodes.
    pub fn parse_index_literal<'a>(
        &self,
        table: &TableDescriptor,
        literal: &'a str,
        oid: &mut Oid,
    ) -> Result<&'a str> {
        let mismatching = |reason: &str| {
            Error::InvalidIndex {
                input: literal.into(),
                reason: reason.into(),
            }
            .boxed()
        };
        if table.index.is_empty() {
            return Err(mismatching("table has no index columns"));
        }

        let mut rest = literal;
        let mut closed = false;
        let mut suffix = Oid::empty();
        for (pos, column) in table.index.iter().enumerate() {
            if closed {
                return Err(mismatching(&format!(
                    "{} index fields expected, {pos} given",
                    table.index.len()
                )));
            }
            let (token, delim, after) =
                split_token(rest).ok_or_else(|| mismatching("mismatching index"))?;
            column.reject_implied()?;
            self.parse_index_token(column, token.trim())?.encode(&mut suffix)?;
            closed = delim == ']';
            rest = after;
        }

        if !closed {
            return Err(mismatching("mismatching index"));
        }
        oid.extend_from_slice(suffix.arcs())?;
        Ok(rest)
    }

    fn parse_index_token(&self, column: &IndexColumn, token: &str) -> Result<IndexValue> {
        if self.config.output != OutputMode::Verbose {
            return self.parse_index_value(column, column.syntax, token);
        }
        let (tag, text) = token.split_once(':').ok_or_else(|| {
            Error::InvalidIndex {
                input: token.into(),
                reason: "syntax prefix expected".into(),
            }
            .boxed()
        })?;
        let given = SyntaxKind::from_str(tag.trim())?;
        if given != column.syntax && !self.config.ignore_errors {
            return Err(Error::IndexSyntaxMismatch {
                expected: column.syntax,
                found: given,
            }
            .boxed());
        }
        self.parse_index_value(column, given, text.trim())
    }

    fn parse_index_value(
        &self,
        column: &IndexColumn,
        syntax: SyntaxKind,
        text: &str,
    ) -> Result<IndexValue> {
        let enums = column.enums.as_ref().and_then(|e| e.resolve(self.mapping.types()));
        Ok(match syntax {
            SyntaxKind::Integer => IndexValue::Integer(parse_integer(text, enums)?),
            SyntaxKind::OctetString => IndexValue::OctetString(column.tc.encode(text)?),
            SyntaxKind::ObjectIdentifier => IndexValue::Oid(self.parse_oid_value(text)?),
            SyntaxKind::IpAddress => IndexValue::IpAddress(parse_ip(text)?),
            SyntaxKind::Counter32 => IndexValue::Counter32(parse_number(syntax, text)?),
            SyntaxKind::Gauge32 => IndexValue::Gauge32(parse_number(syntax, text)?),
            SyntaxKind::TimeTicks => IndexValue::TimeTicks(parse_number(syntax, text)?),
            SyntaxKind::Counter64 => IndexValue::Counter64(parse_number(syntax, text)?),
            other => return Err(Error::UnknownIndexSyntax(other).boxed()),
        })
    }

    /// Split an optional `Syntax:` prefix off a SET value.
    ///
    /// The prefix is mandatory in verbose mode and when the object's syntax
    /// is unknown. A prefix naming another syntax than `expected` is an
    /// error unless errors are ignored, in which case it wins.
    fn split_syntax<'a>(
        &self,
        text: &'a str,
        expected: Option<SyntaxKind>,
    ) -> Result<(SyntaxKind, &'a str)> {
        let prefixed = text
            .split_once(':')
            .and_then(|(tag, rest)| SyntaxKind::from_str(tag).ok().map(|s| (s, rest)));

        match (prefixed, expected) {
            (Some((given, rest)), Some(expected))
                if given != expected && !self.config.ignore_errors =>
            {
                Err(Error::invalid_value(
                    expected,
                    text,
                    format!("{given} given for a {expected} object"),
                ))
            }
            (Some((given, rest)), _) => Ok((given, rest)),
            (None, Some(expected)) if self.config.output != OutputMode::Verbose => {
                Ok((expected, text))
            }
            (None, _) => Err(Error::usage(format!("syntax missing in value - {text}"))),
        }
    }

    /// Parse a SET value of `syntax`.
    ///
    /// Integers accept enumeration labels of `descriptor`; octet strings use
    /// its textual convention; OID values accept catalog names unless in
    /// numeric mode.
    pub fn parse_value(
        &self,
        syntax: SyntaxKind,
        text: &str,
        descriptor: Option<&ObjectDescriptor>,
    ) -> Result<Value> {
        Ok(match syntax {
            SyntaxKind::Integer => {
                let enums = descriptor.and_then(|d| d.enum_table(self.mapping.types()));
                Value::Integer(parse_integer(text, enums)?)
            }
            SyntaxKind::OctetString => {
                let tc = descriptor.map_or(TextualConvention::Plain, |d| d.tc);
                Value::OctetString(Bytes::from(tc.encode(text)?))
            }
            SyntaxKind::ObjectIdentifier => Value::ObjectIdentifier(self.parse_oid_value(text)?),
            SyntaxKind::IpAddress => Value::IpAddress(parse_ip(text)?),
            SyntaxKind::Counter32 => Value::Counter32(parse_number(syntax, text)?),
            SyntaxKind::Gauge32 => Value::Gauge32(parse_number(syntax, text)?),
            SyntaxKind::TimeTicks => Value::TimeTicks(parse_number(syntax, text)?),
            SyntaxKind::Counter64 => Value::Counter64(parse_number(syntax, text)?),
            other => return Err(Error::invalid_value(other, text, "not a settable syntax")),
        })
    }

    /// OID given as dotted decimal, an OID alias name, or any object name.
    fn parse_oid_value(&self, text: &str) -> Result<Oid> {
        if self.config.numeric || text.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
            return Oid::parse(text);
        }
        self.mapping
            .objects()
            .lookup_name_in(BucketKind::Enum, text)
            .or_else(|| self.mapping.lookup_name(text))
            .map(|d| d.oid.clone())
            .ok_or_else(|| Error::UnknownObject(text.into()).boxed())
    }

    /// Attach a response binding to its catalog object.
    ///
    /// The last sub-identifier is taken as the instance; the rest is looked
    /// up by suboid match in the bucket of the binding's syntax (or the node
    /// and enum buckets for non-leaf syntaxes). In numeric mode the catalog
    /// is skipped.
    pub fn resolve_response_binding(&self, binding: VarBind) -> QueryObject<'m> {
        let descriptor = if self.config.numeric {
            None
        } else {
            self.lookup_instance(&binding.oid, binding.value.syntax())
        };
        if descriptor.is_none() {
            tracing::trace!(target: "snmpmap::resolve", { oid = %binding.oid }, "no catalog entry for binding");
        }
        QueryObject::new(descriptor, binding)
    }

    fn lookup_instance(&self, oid: &Oid, syntax: SyntaxKind) -> Option<&'m ObjectDescriptor> {
        let prefix = oid.parent()?;
        self.mapping.objects().lookup_by_syntax(syntax, &prefix)
    }
}

/// Strict dotted decimal.
fn parse_numeric(input: &str) -> Result<Oid> {
    if input.is_empty() {
        return Err(Error::malformed_oid(input, OidErrorKind::EmptyArc));
    }
    Oid::parse(input)
}

/// Leading name: a letter or `_`, then letters, digits and `_`.
fn split_name(input: &str) -> (&str, &str) {
    let end = input
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_alphabetic() || c == '_' || (i > 0 && c.is_ascii_digit())))
        .map_or(input.len(), |(i, _)| i);
    input.split_at(end)
}

/// Optional `.N.N...` after the name.
fn split_suboid<'a>(input: &str, rest: &'a str) -> Result<(Oid, &'a str)> {
    let Some(body) = rest.strip_prefix('.') else {
        return Ok((Oid::empty(), rest));
    };
    let end = body
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(body.len());
    if end == 0 {
        return Err(Error::malformed_oid(input, OidErrorKind::EmptyArc));
    }
    let suboid = Oid::parse(&body[..end]).map_err(|_| Error::malformed_oid(input, OidErrorKind::InvalidArc))?;
    Ok((suboid, &body[end..]))
}

/// Next index token and the delimiter that ended it.
fn split_token(input: &str) -> Option<(&str, char, &str)> {
    let mut quoted = false;
    for (pos, ch) in input.char_indices() {
        match ch {
            '"' => quoted = !quoted,
            ',' | ']' if !quoted => return Some((&input[..pos], ch, &input[pos + 1..])),
            _ => {}
        }
    }
    None
}

fn parse_integer(text: &str, enums: Option<&EnumTable>) -> Result<i32> {
    if let Ok(value) = text.parse::<i32>() {
        return Ok(value);
    }
    enums
        .and_then(|table| table.value(text))
        .ok_or_else(|| Error::invalid_value(SyntaxKind::Integer, text, "not an integer or known label"))
}

fn parse_number<T: FromStr>(syntax: SyntaxKind, text: &str) -> Result<T> {
    text.parse()
        .map_err(|_| Error::invalid_value(syntax, text, "not an unsigned number in range"))
}

fn parse_ip(text: &str) -> Result<[u8; 4]> {
    text.parse::<Ipv4Addr>()
        .map(|addr| addr.octets())
        .map_err(|_| Error::invalid_value(SyntaxKind::IpAddress, text, "expected a.b.c.d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::EnumRef;
    use crate::oid;
    use crate::syntax::Access;

    fn mapping() -> Mapping {
        let mut mapping = Mapping::new();
        let sys = oid!(1, 3, 6, 1, 2, 1, 1);
        mapping
            .insert_object(BucketKind::Node, ObjectDescriptor::node("system", sys.clone()))
            .unwrap();
        mapping
            .insert_object(
                BucketKind::OctetString,
                ObjectDescriptor::new("sysContact", sys.child(4).unwrap(), SyntaxKind::OctetString)
                    .with_tc(TextualConvention::DisplayString)
                    .with_access(Access::GetSet),
            )
            .unwrap();
        mapping
            .insert_object(
                BucketKind::Oid,
                ObjectDescriptor::new("sysObjectID", sys.child(2).unwrap(), SyntaxKind::ObjectIdentifier)
                    .with_access(Access::Get),
            )
            .unwrap();
        mapping
            .insert_object(
                BucketKind::Enum,
                ObjectDescriptor::new(
                    "coldStart",
                    oid!(1, 3, 6, 1, 6, 3, 1, 1, 5, 1),
                    SyntaxKind::ObjectIdentifier,
                ),
            )
            .unwrap();

        let row = oid!(1, 3, 6, 1, 2, 1, 2, 2, 1);
        mapping
            .insert_table(TableDescriptor::new(
                "ifEntry",
                row.clone(),
                vec![IndexColumn::new(SyntaxKind::Integer)],
            ))
            .unwrap();
        mapping
            .insert_object(
                BucketKind::Integer,
                ObjectDescriptor::new("ifAdminStatus", row.child(7).unwrap(), SyntaxKind::Integer)
                    .with_table(row.clone())
                    .with_access(Access::GetSet)
                    .with_enums(EnumRef::Owned(
                        [(1, "up"), (2, "down"), (3, "testing")].into_iter().collect(),
                    )),
            )
            .unwrap();

        let conn = oid!(1, 3, 6, 1, 2, 1, 6, 13, 1);
        mapping
            .insert_table(TableDescriptor::new(
                "tcpConnEntry",
                conn.clone(),
                vec![
                    IndexColumn::new(SyntaxKind::IpAddress),
                    IndexColumn::new(SyntaxKind::Integer),
                    IndexColumn::new(SyntaxKind::OctetString),
                ],
            ))
            .unwrap();
        mapping
            .insert_object(
                BucketKind::Integer,
                ObjectDescriptor::new("tcpConnState", conn.child(1).unwrap(), SyntaxKind::Integer)
                    .with_table(conn),
            )
            .unwrap();
        mapping
    }

    fn config(pdu_type: PduType) -> ToolConfig {
        ToolConfig {
            pdu_type,
            ..ToolConfig::default()
        }
    }

    #[test]
    fn test_scalar_gets_instance_zero() {
        let mapping = mapping();
        let config = ToolConfig::default();
        let query = Resolver::new(&mapping, &config).resolve("sysContact").unwrap();
        assert_eq!(query.oid(), &oid!(1, 3, 6, 1, 2, 1, 1, 4, 0));
        assert_eq!(query.syntax(), SyntaxKind::OctetString);
    }

    #[test]
    fn test_getnext_keeps_oid() {
        let mapping = mapping();
        let config = config(PduType::GetNextRequest);
        let query = Resolver::new(&mapping, &config).resolve("sysContact").unwrap();
        assert_eq!(query.oid(), &oid!(1, 3, 6, 1, 2, 1, 1, 4));
    }

    #[test]
    fn test_node_not_suffixed() {
        let mapping = mapping();
        let config = ToolConfig::default();
        let query = Resolver::new(&mapping, &config).resolve("system").unwrap();
        assert_eq!(query.oid(), &oid!(1, 3, 6, 1, 2, 1, 1));
        assert_eq!(query.syntax(), SyntaxKind::Null);
    }

    #[test]
    fn test_explicit_suboid() {
        let mapping = mapping();
        let config = ToolConfig::default();
        let query = Resolver::new(&mapping, &config)
            .resolve("ifAdminStatus.3")
            .unwrap();
        assert_eq!(query.oid(), &oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 7, 3));
    }

    #[test]
    fn test_multi_index_literal() {
        let mapping = mapping();
        let config = ToolConfig::default();
        let query = Resolver::new(&mapping, &config)
            .resolve("tcpConnState[10.0.0.1, 80, ab]")
            .unwrap();
        assert_eq!(
            query.oid().arcs(),
            &[1, 3, 6, 1, 2, 1, 6, 13, 1, 1, 10, 0, 0, 1, 80, 2, 97, 98]
        );
    }

    #[test]
    fn test_index_literal_field_count() {
        let mapping = mapping();
        let config = ToolConfig::default();
        let resolver = Resolver::new(&mapping, &config);
        let err = resolver.resolve("tcpConnState[10.0.0.1,80]").unwrap_err();
        assert!(matches!(*err, Error::InvalidIndex { .. }));
        let err = resolver.resolve("ifAdminStatus[1,2]").unwrap_err();
        assert!(matches!(*err, Error::InvalidIndex { .. }));
        let err = resolver.resolve("ifAdminStatus[1").unwrap_err();
        assert!(matches!(*err, Error::InvalidIndex { .. }));
    }

    #[test]
    fn test_implied_index_literal_rejected() {
        let mut mapping = Mapping::new();
        let row = oid!(1, 3, 6, 1, 4, 1, 9999, 1, 1);
        mapping
            .insert_table(TableDescriptor::new(
                "tEntry",
                row.clone(),
                vec![
                    IndexColumn::new(SyntaxKind::Integer),
                    IndexColumn::new(SyntaxKind::OctetString).implied(),
                ],
            ))
            .unwrap();
        mapping
            .insert_object(
                BucketKind::Integer,
                ObjectDescriptor::new("tValue", row.child(2).unwrap(), SyntaxKind::Integer).with_table(row),
            )
            .unwrap();
        let config = ToolConfig::default();

        let err = Resolver::new(&mapping, &config).resolve("tValue[1, ab]").unwrap_err();
        assert!(matches!(
            *err,
            Error::UnsupportedImpliedIndex(SyntaxKind::OctetString)
        ));
    }

    #[test]
    fn test_failed_index_literal_leaves_oid() {
        let mapping = mapping();
        let config = ToolConfig::default();
        let resolver = Resolver::new(&mapping, &config);
        let table = mapping.tables().lookup_name("tcpConnEntry").unwrap();

        let mut oid = oid!(1, 3, 6, 1, 2, 1, 6, 13, 1, 1);
        assert!(resolver.parse_index_literal(table, "10.0.0.1, 80, 0xzz, 9]", &mut oid).is_err());
        assert!(resolver.parse_index_literal(table, "10.0.0.1, eighty, ab]", &mut oid).is_err());
        assert_eq!(oid, oid!(1, 3, 6, 1, 2, 1, 6, 13, 1, 1));

        let rest = resolver.parse_index_literal(table, "10.0.0.1, 80, \"a,b\"]", &mut oid).unwrap();
        assert!(rest.is_empty());
        assert_eq!(&oid.arcs()[10..], &[10, 0, 0, 1, 80, 3, 97, 44, 98]);
    }

    #[test]
    fn test_index_on_scalar_rejected() {
        let mapping = mapping();
        let config = ToolConfig::default();
        let err = Resolver::new(&mapping, &config)
            .resolve("sysContact[1]")
            .unwrap_err();
        assert!(matches!(*err, Error::InvalidIndex { .. }));
    }

    #[test]
    fn test_verbose_index_needs_matching_syntax() {
        let mapping = mapping();
        let mut config = ToolConfig {
            output: OutputMode::Verbose,
            ..ToolConfig::default()
        };
        let resolver = Resolver::new(&mapping, &config);
        let query = resolver.resolve("ifAdminStatus[Integer:4]").unwrap();
        assert_eq!(query.oid().last(), Some(4));

        let err = resolver.resolve("ifAdminStatus[Gauge:4]").unwrap_err();
        assert!(matches!(
            *err,
            Error::IndexSyntaxMismatch {
                expected: SyntaxKind::Integer,
                found: SyntaxKind::Gauge32
            }
        ));
        let err = resolver.resolve("ifAdminStatus[4]").unwrap_err();
        assert!(matches!(*err, Error::InvalidIndex { .. }));

        config.ignore_errors = true;
        let resolver = Resolver::new(&mapping, &config);
        assert!(resolver.resolve("ifAdminStatus[Gauge:4]").is_ok());
    }

    #[test]
    fn test_unknown_name() {
        let mapping = mapping();
        let config = ToolConfig::default();
        let err = Resolver::new(&mapping, &config).resolve("sysNothing").unwrap_err();
        assert!(matches!(*err, Error::UnknownObject(ref name) if &**name == "sysNothing"));
    }

    #[test]
    fn test_trailing_garbage() {
        let mapping = mapping();
        let config = ToolConfig::default();
        let err = Resolver::new(&mapping, &config).resolve("sysContact!").unwrap_err();
        assert!(matches!(*err, Error::MalformedOid { .. }));
    }

    #[test]
    fn test_numeric_mode() {
        let mapping = mapping();
        let config = ToolConfig {
            numeric: true,
            ..ToolConfig::default()
        };
        let resolver = Resolver::new(&mapping, &config);
        let query = resolver.resolve("1.3.6.1.2.1.1.4").unwrap();
        assert_eq!(query.oid(), &oid!(1, 3, 6, 1, 2, 1, 1, 4));
        assert!(query.descriptor.is_none());
        assert!(resolver.resolve("sysContact").is_err());
        assert!(resolver.resolve("").is_err());
    }

    #[test]
    fn test_set_enum_label() {
        let mapping = mapping();
        let config = config(PduType::SetRequest);
        let query = Resolver::new(&mapping, &config)
            .resolve("ifAdminStatus[2]=down")
            .unwrap();
        assert_eq!(query.oid().arcs().last(), Some(&2));
        assert_eq!(query.binding.value, Value::Integer(2));
    }

    #[test]
    fn test_set_scalar_value() {
        let mapping = mapping();
        let config = config(PduType::SetRequest);
        let resolver = Resolver::new(&mapping, &config);
        let query = resolver.resolve("sysContact=\"ops team\"").unwrap();
        assert_eq!(query.oid(), &oid!(1, 3, 6, 1, 2, 1, 1, 4, 0));
        assert_eq!(query.binding.value, Value::OctetString(Bytes::from_static(b"ops team")));

        let query = resolver.resolve("sysObjectID=OID:coldStart").unwrap();
        assert_eq!(
            query.binding.value,
            Value::ObjectIdentifier(oid!(1, 3, 6, 1, 6, 3, 1, 1, 5, 1))
        );
    }

    #[test]
    fn test_set_requires_value() {
        let mapping = mapping();
        let config = config(PduType::SetRequest);
        let err = Resolver::new(&mapping, &config).resolve("sysContact").unwrap_err();
        assert!(matches!(*err, Error::Usage(_)));
    }

    #[test]
    fn test_set_syntax_mismatch() {
        let mapping = mapping();
        let mut config = config(PduType::SetRequest);
        let err = Resolver::new(&mapping, &config)
            .resolve("sysContact=Integer:5")
            .unwrap_err();
        assert!(matches!(*err, Error::InvalidValue { .. }));

        config.ignore_errors = true;
        let query = Resolver::new(&mapping, &config)
            .resolve("sysContact=Integer:5")
            .unwrap();
        assert_eq!(query.binding.value, Value::Integer(5));
    }

    #[test]
    fn test_numeric_set() {
        let mapping = mapping();
        let config = ToolConfig {
            numeric: true,
            pdu_type: PduType::SetRequest,
            ..ToolConfig::default()
        };
        let resolver = Resolver::new(&mapping, &config);
        let query = resolver.resolve("1.3.6.1.2.1.1.4.0=OctetString:noc").unwrap();
        assert_eq!(query.binding.value, Value::OctetString(Bytes::from_static(b"noc")));
        let query = resolver.resolve("1.3.6.1.2.1.4.1.0=IpAddress:192.0.2.7").unwrap();
        assert_eq!(query.binding.value, Value::IpAddress([192, 0, 2, 7]));
        assert!(resolver.resolve("1.3.6.1.2.1.1.4.0=noc").is_err());
    }

    #[test]
    fn test_response_binding_lookup() {
        let mapping = mapping();
        let config = ToolConfig::default();
        let resolver = Resolver::new(&mapping, &config);

        let query = resolver.resolve_response_binding(VarBind::new(
            oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 7, 5),
            Value::Integer(1),
        ));
        assert_eq!(&*query.descriptor.unwrap().name, "ifAdminStatus");
        assert_eq!(query.oid().last(), Some(5));

        // wrong syntax bucket
        let query = resolver.resolve_response_binding(VarBind::new(
            oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 7, 5),
            Value::Counter32(1),
        ));
        assert!(query.descriptor.is_none());
    }
}
