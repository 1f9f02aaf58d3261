//! Definition file writer.
//!
//! Serializes a [`Mapping`] back into the grammar [`load_str`](super::load_str)
//! reads. Entries are emitted in OID order; an explicit stack of open levels
//! decides how many parentheses to close before each entry.

use std::fmt::{self, Write};

use crate::catalog::table::{IndexColumn, TableDescriptor};
use crate::catalog::{BucketKind, ObjectDescriptor};
use crate::enums::{EnumRef, EnumTable};
use crate::mapping::Mapping;
use crate::oid::Oid;
use crate::syntax::SyntaxKind;
use crate::tc::{TcRegistry, TextualConvention};

enum Entry<'a> {
    Node(&'a ObjectDescriptor),
    Row(&'a TableDescriptor),
    Leaf(BucketKind, &'a ObjectDescriptor),
}

impl Entry<'_> {
    fn oid(&self) -> &Oid {
        match self {
            Entry::Node(d) | Entry::Leaf(_, d) => &d.oid,
            Entry::Row(t) => &t.oid,
        }
    }

    fn opens_level(&self) -> bool {
        !matches!(self, Entry::Leaf(..))
    }
}

/// Render `mapping` as definition text relative to `cut`.
///
/// Entries outside `cut` are skipped.
pub fn to_string(mapping: &Mapping, cut: &Oid) -> String {
    let mut out = String::new();
    // writing to a String cannot fail
    let _ = write_defs(mapping, cut, &mut out);
    out
}

/// Write `mapping` as definition text relative to `cut`.
pub fn write_defs<W: Write>(mapping: &Mapping, cut: &Oid, out: &mut W) -> fmt::Result {
    let types = mapping.types();
    for (_, def) in types.iter() {
        write!(out, "typedef {} ", def.name)?;
        write_type(out, def.syntax, def.tc, def.enums.as_ref().map(Shape::Owned))?;
        out.write_char('\n')?;
    }

    let objects = mapping.objects();
    let mut entries: Vec<Entry<'_>> = Vec::new();
    for (kind, object) in objects.iter() {
        match kind {
            BucketKind::Node => {
                if mapping.tables().get(&object.oid).is_none() {
                    entries.push(Entry::Node(object));
                }
            }
            kind => entries.push(Entry::Leaf(kind, object)),
        }
    }
    entries.extend(mapping.tables().iter().map(Entry::Row));
    // levels before leaves at the same OID
    entries.sort_by(|a, b| {
        a.oid()
            .cmp(b.oid())
            .then_with(|| b.opens_level().cmp(&a.opens_level()))
    });

    // relative paths of the open levels, innermost last
    let mut stack: Vec<&[u32]> = Vec::new();
    for entry in &entries {
        if !cut.is_prefix_of(entry.oid()) || entry.oid().len() == cut.len() {
            tracing::debug!(target: "snmpmap::defs", { oid = %entry.oid() }, "entry outside cut, not written");
            continue;
        }
        let path = &entry.oid().arcs()[cut.len()..];
        let (parent, sub) = path.split_at(path.len() - 1);

        while let Some(top) = stack.last() {
            if parent.starts_with(top) {
                break;
            }
            stack.pop();
            indent(out, stack.len())?;
            out.write_str(")\n")?;
        }
        // levels with no node of their own get a synthetic name
        loop {
            let depth = stack.last().map_or(0, |top| top.len());
            if depth >= parent.len() {
                break;
            }
            indent(out, stack.len())?;
            writeln!(out, "({} node{}", parent[depth], parent[depth])?;
            stack.push(&parent[..=depth]);
        }

        indent(out, stack.len())?;
        write!(out, "({} ", sub[0])?;
        match entry {
            Entry::Node(node) => {
                out.write_str(&node.name)?;
                out.write_char('\n')?;
                stack.push(path);
            }
            Entry::Row(table) => {
                write!(out, "{} :", table.name)?;
                for column in &table.index {
                    write_column(out, column, types)?;
                }
                out.write_char('\n')?;
                stack.push(path);
            }
            Entry::Leaf(kind, object) => {
                write!(out, "{} ", object.name)?;
                let shape = object.enums.as_ref().and_then(|e| Shape::of(e, types));
                write_type(out, object.syntax, object.tc, shape)?;
                if *kind != BucketKind::Enum {
                    if object.access.can_get() {
                        out.write_str(" GET")?;
                    }
                    if object.access.can_set() {
                        out.write_str(" SET")?;
                    }
                }
                out.write_str(")\n")?;
            }
        }
    }
    while stack.pop().is_some() {
        indent(out, stack.len())?;
        out.write_str(")\n")?;
    }
    Ok(())
}

enum Shape<'a> {
    Owned(&'a EnumTable),
    Named(&'a str),
}

impl<'a> Shape<'a> {
    /// Shared enumerations are written as the name of their typedef.
    fn of(enums: &'a EnumRef, types: &'a TcRegistry) -> Option<Self> {
        match enums {
            EnumRef::Owned(table) => Some(Shape::Owned(table)),
            EnumRef::Shared(id) => types.get(*id).map(|def| Shape::Named(&def.name)),
        }
    }
}

fn indent<W: Write>(out: &mut W, depth: usize) -> fmt::Result {
    write!(out, "{:width$}", "", width = depth * 2)
}

fn write_column<W: Write>(out: &mut W, column: &IndexColumn, types: &TcRegistry) -> fmt::Result {
    out.write_char(' ')?;
    if column.implied {
        out.write_str("IMPLIED ")?;
    }
    let shape = column.enums.as_ref().and_then(|e| Shape::of(e, types));
    write_type(out, column.syntax, column.tc, shape)
}

fn write_type<W: Write>(
    out: &mut W,
    syntax: SyntaxKind,
    tc: TextualConvention,
    shape: Option<Shape<'_>>,
) -> fmt::Result {
    match shape {
        Some(Shape::Named(name)) => out.write_str(name),
        Some(Shape::Owned(table)) => {
            out.write_str(if syntax == SyntaxKind::Integer {
                "ENUM ("
            } else {
                "BITS ("
            })?;
            for (value, label) in table.iter() {
                write!(out, " {value} {label}")?;
            }
            out.write_str(" )")
        }
        None if tc != TextualConvention::Plain => out.write_str(tc.keyword()),
        None => out.write_str(match syntax {
            SyntaxKind::Integer => "INTEGER",
            SyntaxKind::OctetString => "OCTETSTRING",
            SyntaxKind::ObjectIdentifier => "OID",
            SyntaxKind::IpAddress => "IPADDRESS",
            SyntaxKind::Counter32 => "COUNTER",
            SyntaxKind::Gauge32 => "GAUGE",
            SyntaxKind::TimeTicks => "TIMETICKS",
            SyntaxKind::Counter64 => "COUNTER64",
            _ => "OCTETSTRING",
        }),
    }
}
