//! Table index catalog.
//!
//! A [`TableDescriptor`] records how a table's instance suffix splits into
//! index fields. The column list order is the order in which sub-identifiers
//! are consumed, which is the order the agent encodes them.
//!
//! Decoding here is structural: the suffix becomes a list of [`IndexValue`]s.
//! Turning those into display text (enum labels, textual conventions, OID
//! names) is left to [`render`](crate::render).

use crate::catalog::{Insertion, insert_sorted};
use crate::enums::EnumRef;
use crate::error::{Error, Result};
use crate::oid::{MAX_OID_LEN, Oid};
use crate::syntax::SyntaxKind;
use crate::tc::TextualConvention;

/// Longest octet string that fits an index column.
pub const MAX_INDEX_OCTETS: usize = 255;

/// One index field of a table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexColumn {
    pub syntax: SyntaxKind,
    pub tc: TextualConvention,
    pub enums: Option<EnumRef>,
    /// Variable-length column without a length prefix.
    pub implied: bool,
}

impl IndexColumn {
    pub fn new(syntax: SyntaxKind) -> Self {
        Self {
            syntax,
            tc: TextualConvention::Plain,
            enums: None,
            implied: false,
        }
    }

    pub fn with_tc(mut self, tc: TextualConvention) -> Self {
        self.tc = tc;
        self
    }

    pub fn with_enums(mut self, enums: EnumRef) -> Self {
        self.enums = Some(enums);
        self
    }

    pub fn implied(mut self) -> Self {
        self.implied = true;
        self
    }

    /// IMPLIED columns are rejected in both directions.
    pub(crate) fn reject_implied(&self) -> Result<()> {
        if self.implied {
            return Err(Error::UnsupportedImpliedIndex(self.syntax).boxed());
        }
        Ok(())
    }

    /// Take this column's value off the front of `suffix`.
    ///
    /// On success `suffix` is advanced past the consumed sub-identifiers; on
    /// failure it is left untouched.
    pub fn decode(&self, suffix: &mut &[u32]) -> Result<IndexValue> {
        self.reject_implied()?;
        let input = *suffix;
        let need = |needed: usize| -> Result<()> {
            if input.len() < needed {
                return Err(Error::IndexTooShort {
                    syntax: self.syntax,
                    needed,
                    remaining: input.len(),
                }
                .boxed());
            }
            Ok(())
        };

        let (value, used) = match self.syntax {
            SyntaxKind::Integer => {
                need(1)?;
                (IndexValue::Integer(input[0] as i32), 1)
            }
            SyntaxKind::Counter32 => {
                need(1)?;
                (IndexValue::Counter32(input[0]), 1)
            }
            SyntaxKind::Gauge32 => {
                need(1)?;
                (IndexValue::Gauge32(input[0]), 1)
            }
            SyntaxKind::TimeTicks => {
                need(1)?;
                (IndexValue::TimeTicks(input[0]), 1)
            }
            SyntaxKind::IpAddress => {
                need(4)?;
                let mut addr = [0u8; 4];
                for (byte, &arc) in addr.iter_mut().zip(&input[..4]) {
                    *byte = u8::try_from(arc).map_err(|_| {
                        invalid_index(&input[..4], "IP address octet exceeds 255")
                    })?;
                }
                (IndexValue::IpAddress(addr), 4)
            }
            SyntaxKind::Counter64 => {
                need(2)?;
                let value = u64::from(input[0]) | (u64::from(input[1]) << 32);
                (IndexValue::Counter64(value), 2)
            }
            SyntaxKind::OctetString => {
                let len = length_prefix(input, MAX_INDEX_OCTETS, self.syntax)?;
                need(1 + len)?;
                let bytes = input[1..=len]
                    .iter()
                    .map(|&arc| u8::try_from(arc))
                    .collect::<std::result::Result<Vec<u8>, _>>()
                    .map_err(|_| invalid_index(&input[..=len], "octet exceeds 255"))?;
                (IndexValue::OctetString(bytes), 1 + len)
            }
            SyntaxKind::ObjectIdentifier => {
                let len = length_prefix(input, MAX_OID_LEN, self.syntax)?;
                need(1 + len)?;
                (IndexValue::Oid(Oid::from_slice(&input[1..=len])), 1 + len)
            }
            other => return Err(Error::UnknownIndexSyntax(other).boxed()),
        };

        *suffix = &input[used..];
        Ok(value)
    }
}

fn length_prefix(input: &[u32], max: usize, syntax: SyntaxKind) -> Result<usize> {
    let len = *input.first().ok_or_else(|| {
        Error::IndexTooShort {
            syntax,
            needed: 1,
            remaining: 0,
        }
        .boxed()
    })? as usize;
    if len > max {
        return Err(Error::IndexValueTooLong { len, max }.boxed());
    }
    Ok(len)
}

fn invalid_index(arcs: &[u32], reason: &str) -> Box<Error> {
    Error::InvalidIndex {
        input: Oid::from_slice(arcs).to_string().into(),
        reason: reason.into(),
    }
    .boxed()
}

/// A decoded index field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexValue {
    Integer(i32),
    OctetString(Vec<u8>),
    Oid(Oid),
    IpAddress([u8; 4]),
    Counter32(u32),
    Gauge32(u32),
    TimeTicks(u32),
    Counter64(u64),
}

impl IndexValue {
    pub fn syntax(&self) -> SyntaxKind {
        match self {
            Self::Integer(_) => SyntaxKind::Integer,
            Self::OctetString(_) => SyntaxKind::OctetString,
            Self::Oid(_) => SyntaxKind::ObjectIdentifier,
            Self::IpAddress(_) => SyntaxKind::IpAddress,
            Self::Counter32(_) => SyntaxKind::Counter32,
            Self::Gauge32(_) => SyntaxKind::Gauge32,
            Self::TimeTicks(_) => SyntaxKind::TimeTicks,
            Self::Counter64(_) => SyntaxKind::Counter64,
        }
    }

    /// Append this value's sub-identifiers to `oid`.
    ///
    /// Octet strings and OIDs are written with a length prefix. Counter64 is
    /// written low 32 bits first.
    pub fn encode(&self, oid: &mut Oid) -> Result<()> {
        match self {
            Self::Integer(v) => oid.push(*v as u32),
            Self::Counter32(v) | Self::Gauge32(v) | Self::TimeTicks(v) => oid.push(*v),
            Self::IpAddress(addr) => oid.extend_from_slice(&addr.map(u32::from)),
            Self::Counter64(v) => oid.extend_from_slice(&[*v as u32, (*v >> 32) as u32]),
            Self::OctetString(bytes) => {
                if bytes.len() > MAX_INDEX_OCTETS {
                    return Err(Error::IndexValueTooLong {
                        len: bytes.len(),
                        max: MAX_INDEX_OCTETS,
                    }
                    .boxed());
                }
                let mut arcs = Vec::with_capacity(bytes.len() + 1);
                arcs.push(bytes.len() as u32);
                arcs.extend(bytes.iter().map(|&b| u32::from(b)));
                oid.extend_from_slice(&arcs)
            }
            Self::Oid(value) => {
                let mut arcs = Vec::with_capacity(value.len() + 1);
                arcs.push(value.len() as u32);
                arcs.extend_from_slice(value.arcs());
                oid.extend_from_slice(&arcs)
            }
        }
    }
}

/// A table row and its index columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    pub name: Box<str>,
    pub oid: Oid,
    pub index: Vec<IndexColumn>,
}

impl TableDescriptor {
    pub fn new(name: impl Into<Box<str>>, oid: Oid, index: Vec<IndexColumn>) -> Self {
        Self {
            name: name.into(),
            oid,
            index,
        }
    }

    /// Decode a full instance suffix into one value per index column.
    ///
    /// # Examples
    ///
    /// ```
    /// use snmpmap::catalog::table::{IndexColumn, IndexValue, TableDescriptor};
    /// use snmpmap::oid;
    /// use snmpmap::syntax::SyntaxKind;
    ///
    /// let table = TableDescriptor::new(
    ///     "tcpConnEntry",
    ///     oid!(1, 3, 6, 1, 2, 1, 6, 13, 1),
    ///     vec![IndexColumn::new(SyntaxKind::IpAddress), IndexColumn::new(SyntaxKind::Integer)],
    /// );
    /// let values = table.decode_index(&[10, 0, 0, 1, 80]).unwrap();
    /// assert_eq!(values, [IndexValue::IpAddress([10, 0, 0, 1]), IndexValue::Integer(80)]);
    /// ```
    pub fn decode_index(&self, suffix: &[u32]) -> Result<Vec<IndexValue>> {
        let mut rest = suffix;
        self.index.iter().map(|col| col.decode(&mut rest)).collect()
    }

    /// Encode one value per index column into `oid`.
    ///
    /// `oid` is only extended when every column encodes.
    pub fn encode_index(&self, values: &[IndexValue], oid: &mut Oid) -> Result<()> {
        if values.len() != self.index.len() {
            return Err(Error::InvalidIndex {
                input: self.name.clone(),
                reason: format!("{} index fields expected, {} given", self.index.len(), values.len())
                    .into(),
            }
            .boxed());
        }
        let mut suffix = Oid::empty();
        for (col, value) in self.index.iter().zip(values) {
            col.reject_implied()?;
            if col.syntax != value.syntax() {
                return Err(Error::IndexSyntaxMismatch {
                    expected: col.syntax,
                    found: value.syntax(),
                }
                .boxed());
            }
            value.encode(&mut suffix)?;
        }
        oid.extend_from_slice(suffix.arcs())
    }
}

/// Sorted collection of [`TableDescriptor`]s keyed by row OID.
#[derive(Debug, Default)]
pub struct TableCatalog {
    tables: Vec<TableDescriptor>,
}

impl TableCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert with the same ordering and duplicate policy as the object buckets.
    pub fn insert(&mut self, table: TableDescriptor) -> Result<Insertion> {
        insert_sorted(&mut self.tables, table, |t| &t.oid, |t| &*t.name)
    }

    pub fn get(&self, oid: &Oid) -> Option<&TableDescriptor> {
        self.tables
            .binary_search_by(|t| t.oid.cmp(oid))
            .ok()
            .map(|pos| &self.tables[pos])
    }

    pub fn lookup_name(&self, name: &str) -> Option<&TableDescriptor> {
        self.tables.iter().find(|t| &*t.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TableDescriptor> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
