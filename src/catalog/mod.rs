//! Object catalog: OID to name mappings grouped by syntax.
//!
//! Every object loaded from a definition file lands in exactly one bucket,
//! chosen by its syntax. Plain tree nodes and table rows go to the
//! [`Node`](BucketKind::Node) bucket; OID value aliases (notifications and
//! other `OID` lines without access) go to the [`Enum`](BucketKind::Enum) bucket.
//!
//! Each bucket is a `Vec` kept sorted by OID. Loading inserts one entry at a
//! time and querying only reads, so a sorted vector with binary search serves
//! both phases.

pub mod table;

use crate::enums::{EnumRef, EnumTable};
use crate::error::{Error, Result};
use crate::oid::Oid;
use crate::syntax::{Access, SyntaxKind};
use crate::tc::{TcRegistry, TextualConvention};

/// Catalog bucket selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BucketKind {
    Integer,
    OctetString,
    Oid,
    IpAddress,
    Counter32,
    Gauge32,
    TimeTicks,
    Counter64,
    /// OID value aliases.
    Enum,
    /// Plain nodes and table rows.
    Node,
}

impl BucketKind {
    /// All buckets, in union lookup order.
    pub const ALL: [BucketKind; 10] = [
        BucketKind::Integer,
        BucketKind::OctetString,
        BucketKind::Oid,
        BucketKind::IpAddress,
        BucketKind::Counter32,
        BucketKind::Gauge32,
        BucketKind::TimeTicks,
        BucketKind::Counter64,
        BucketKind::Enum,
        BucketKind::Node,
    ];

    /// The eight value-carrying buckets.
    pub const LEAVES: [BucketKind; 8] = [
        BucketKind::Integer,
        BucketKind::OctetString,
        BucketKind::Oid,
        BucketKind::IpAddress,
        BucketKind::Counter32,
        BucketKind::Gauge32,
        BucketKind::TimeTicks,
        BucketKind::Counter64,
    ];

    /// Bucket for a leaf syntax. `None` for non-leaf and exception syntaxes.
    pub fn for_syntax(syntax: SyntaxKind) -> Option<Self> {
        Some(match syntax {
            SyntaxKind::Integer => Self::Integer,
            SyntaxKind::OctetString => Self::OctetString,
            SyntaxKind::ObjectIdentifier => Self::Oid,
            SyntaxKind::IpAddress => Self::IpAddress,
            SyntaxKind::Counter32 => Self::Counter32,
            SyntaxKind::Gauge32 => Self::Gauge32,
            SyntaxKind::TimeTicks => Self::TimeTicks,
            SyntaxKind::Counter64 => Self::Counter64,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::OctetString => "octetstring",
            Self::Oid => "oid",
            Self::IpAddress => "ipaddress",
            Self::Counter32 => "counter",
            Self::Gauge32 => "gauge",
            Self::TimeTicks => "timeticks",
            Self::Counter64 => "counter64",
            Self::Enum => "enum",
            Self::Node => "node",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for BucketKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named object in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectDescriptor {
    pub name: Box<str>,
    pub oid: Oid,
    pub syntax: SyntaxKind,
    pub tc: TextualConvention,
    pub access: Access,
    /// OID of the table row this object is a column of.
    pub table: Option<Oid>,
    pub enums: Option<EnumRef>,
}

impl ObjectDescriptor {
    pub fn new(name: impl Into<Box<str>>, oid: Oid, syntax: SyntaxKind) -> Self {
        Self {
            name: name.into(),
            oid,
            syntax,
            tc: TextualConvention::Plain,
            access: Access::None,
            table: None,
            enums: None,
        }
    }

    /// A plain tree node.
    pub fn node(name: impl Into<Box<str>>, oid: Oid) -> Self {
        Self::new(name, oid, SyntaxKind::Null)
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    pub fn with_tc(mut self, tc: TextualConvention) -> Self {
        self.tc = tc;
        self
    }

    pub fn with_table(mut self, row: Oid) -> Self {
        self.table = Some(row);
        self
    }

    pub fn with_enums(mut self, enums: EnumRef) -> Self {
        self.enums = Some(enums);
        self
    }

    /// The enumeration table, if the object has one.
    pub fn enum_table<'a>(&'a self, registry: &'a TcRegistry) -> Option<&'a EnumTable> {
        self.enums.as_ref().and_then(|e| e.resolve(registry))
    }

    pub fn is_leaf(&self) -> bool {
        self.syntax.is_leaf()
    }
}

/// Outcome of a successful insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Inserted,
    /// Same OID and name were already present; the bucket is unchanged.
    AlreadyPresent,
}

/// Insert `entry` into a vector sorted by OID, applying the duplicate policy.
///
/// Shared by the object buckets and the table catalog.
pub(crate) fn insert_sorted<T>(
    entries: &mut Vec<T>,
    entry: T,
    oid: impl Fn(&T) -> &Oid,
    name: impl Fn(&T) -> &str,
) -> Result<Insertion> {
    match entries.binary_search_by(|e| oid(e).cmp(oid(&entry))) {
        Ok(pos) => {
            let existing = &entries[pos];
            if name(existing) == name(&entry) {
                return Ok(Insertion::AlreadyPresent);
            }
            tracing::warn!(
                target: "snmpmap::catalog",
                { oid = %oid(&entry), old = name(existing), new = name(&entry) },
                "matching OIDs with different names"
            );
            Err(Error::ConflictingMapping {
                oid: oid(&entry).clone(),
                existing: name(existing).into(),
                name: name(&entry).into(),
            }
            .boxed())
        }
        Err(pos) => {
            entries.insert(pos, entry);
            Ok(Insertion::Inserted)
        }
    }
}

/// Sorted per-syntax buckets of [`ObjectDescriptor`]s.
#[derive(Debug, Default)]
pub struct ObjectCatalog {
    buckets: [Vec<ObjectDescriptor>; 10],
}

impl ObjectCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert into `kind`, keeping the bucket sorted.
    ///
    /// Re-inserting an identical (OID, name) pair reports
    /// [`Insertion::AlreadyPresent`]. A different name under an existing OID
    /// fails with [`Error::ConflictingMapping`] and leaves the bucket unchanged.
    pub fn insert(&mut self, kind: BucketKind, entry: ObjectDescriptor) -> Result<Insertion> {
        let bucket = &mut self.buckets[kind.slot()];
        let result = insert_sorted(bucket, entry, |e| &e.oid, |e| &*e.name);
        if let Ok(Insertion::AlreadyPresent) = result {
            tracing::trace!(target: "snmpmap::catalog", { bucket = %kind }, "entry already present");
        }
        result
    }

    /// Insert a leaf object into the bucket of its syntax.
    pub fn insert_leaf(&mut self, entry: ObjectDescriptor) -> Result<Insertion> {
        let kind = BucketKind::for_syntax(entry.syntax)
            .ok_or_else(|| Error::UnknownSyntax(entry.syntax.as_str().into()).boxed())?;
        self.insert(kind, entry)
    }

    pub fn bucket(&self, kind: BucketKind) -> &[ObjectDescriptor] {
        &self.buckets[kind.slot()]
    }

    /// Exact OID match within one bucket.
    pub fn lookup_exact(&self, kind: BucketKind, oid: &Oid) -> Option<&ObjectDescriptor> {
        let bucket = self.bucket(kind);
        bucket
            .binary_search_by(|e| e.oid.cmp(oid))
            .ok()
            .map(|pos| &bucket[pos])
    }

    /// Exact or suboid match within one bucket.
    ///
    /// Returns the entry whose OID equals `oid` or is a prefix of it. When
    /// several prefixes are present the shortest wins, as it sorts first.
    pub fn lookup_leaf(&self, kind: BucketKind, oid: &Oid) -> Option<&ObjectDescriptor> {
        let bucket = self.bucket(kind);
        let arcs = oid.arcs();
        (1..=arcs.len()).find_map(|len| {
            bucket
                .binary_search_by(|e| e.oid.arcs().cmp(&arcs[..len]))
                .ok()
                .map(|pos| &bucket[pos])
        })
    }

    /// Union lookup: leaf buckets by suboid match, then enum and node buckets
    /// by exact match.
    pub fn lookup_any(&self, oid: &Oid) -> Option<(BucketKind, &ObjectDescriptor)> {
        BucketKind::LEAVES
            .iter()
            .find_map(|&kind| self.lookup_leaf(kind, oid).map(|d| (kind, d)))
            .or_else(|| {
                [BucketKind::Enum, BucketKind::Node]
                    .iter()
                    .find_map(|&kind| self.lookup_exact(kind, oid).map(|d| (kind, d)))
            })
    }

    /// Lookup for non-leaf syntaxes: node bucket, then enum bucket, exact only.
    pub fn lookup_nonleaf(&self, oid: &Oid) -> Option<&ObjectDescriptor> {
        self.lookup_exact(BucketKind::Node, oid)
            .or_else(|| self.lookup_exact(BucketKind::Enum, oid))
    }

    /// Lookup keyed by the syntax a response binding carried.
    ///
    /// Leaf syntaxes search their own bucket; exception sentinels search
    /// everything; `Null` searches the node and enum buckets.
    pub fn lookup_by_syntax(&self, syntax: SyntaxKind, oid: &Oid) -> Option<&ObjectDescriptor> {
        match BucketKind::for_syntax(syntax) {
            Some(kind) => self.lookup_leaf(kind, oid),
            None if syntax.is_exception() => self.lookup_any(oid).map(|(_, d)| d),
            None => self.lookup_nonleaf(oid),
        }
    }

    /// Find an object by name in one bucket.
    pub fn lookup_name_in(&self, kind: BucketKind, name: &str) -> Option<&ObjectDescriptor> {
        self.bucket(kind).iter().find(|e| &*e.name == name)
    }

    /// Find an object by name across all buckets except the enum bucket.
    ///
    /// Order: the eight leaf buckets, then the node bucket.
    pub fn lookup_name(&self, name: &str) -> Option<&ObjectDescriptor> {
        BucketKind::LEAVES
            .iter()
            .chain(std::iter::once(&BucketKind::Node))
            .find_map(|&kind| self.lookup_name_in(kind, name))
    }

    /// Iterate every entry with its bucket.
    pub fn iter(&self) -> impl Iterator<Item = (BucketKind, &ObjectDescriptor)> {
        BucketKind::ALL
            .iter()
            .flat_map(move |&kind| self.bucket(kind).iter().map(move |e| (kind, e)))
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    fn counter(name: &str, oid: Oid) -> ObjectDescriptor {
        ObjectDescriptor::new(name, oid, SyntaxKind::Counter32).with_access(Access::Get)
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut catalog = ObjectCatalog::new();
        catalog
            .insert_leaf(counter("b", oid!(1, 3, 6, 1, 2)))
            .unwrap();
        catalog.insert_leaf(counter("a", oid!(1, 3, 6, 1))).unwrap();
        catalog
            .insert_leaf(counter("c", oid!(1, 3, 6, 1, 10)))
            .unwrap();
        let names: Vec<_> = catalog
            .bucket(BucketKind::Counter32)
            .iter()
            .map(|e| &*e.name)
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_duplicate_insert_is_idempotent() {
        let mut catalog = ObjectCatalog::new();
        let entry = counter("ifInOctets", oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 10));
        assert_eq!(catalog.insert_leaf(entry.clone()).unwrap(), Insertion::Inserted);
        assert_eq!(
            catalog.insert_leaf(entry).unwrap(),
            Insertion::AlreadyPresent
        );
        assert_eq!(catalog.bucket(BucketKind::Counter32).len(), 1);
    }

    #[test]
    fn test_conflicting_insert_rejected() {
        let mut catalog = ObjectCatalog::new();
        let oid = oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 10);
        catalog.insert_leaf(counter("ifInOctets", oid.clone())).unwrap();
        let err = catalog
            .insert_leaf(counter("ifOutOctets", oid))
            .unwrap_err();
        assert!(matches!(*err, Error::ConflictingMapping { .. }));
        let bucket = catalog.bucket(BucketKind::Counter32);
        assert_eq!(bucket.len(), 1);
        assert_eq!(&*bucket[0].name, "ifInOctets");
    }

    #[test]
    fn test_same_oid_different_buckets() {
        let mut catalog = ObjectCatalog::new();
        let oid = oid!(1, 3, 6, 1, 2, 1, 2, 2);
        catalog
            .insert(BucketKind::Node, ObjectDescriptor::node("ifTable", oid.clone()))
            .unwrap();
        catalog.insert_leaf(counter("ifTable", oid)).unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_lookup_leaf_suboid() {
        let mut catalog = ObjectCatalog::new();
        catalog
            .insert_leaf(counter("ifInOctets", oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 10)))
            .unwrap();
        let hit = catalog
            .lookup_leaf(BucketKind::Counter32, &oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 10, 3))
            .unwrap();
        assert_eq!(&*hit.name, "ifInOctets");
        assert!(
            catalog
                .lookup_leaf(BucketKind::Counter32, &oid!(1, 3, 6, 1, 2, 1, 2, 2, 1))
                .is_none()
        );
        assert!(
            catalog
                .lookup_leaf(BucketKind::Integer, &oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 10))
                .is_none()
        );
    }

    #[test]
    fn test_lookup_any_order() {
        let mut catalog = ObjectCatalog::new();
        let oid = oid!(1, 3, 6, 1, 2, 1, 1);
        catalog
            .insert(BucketKind::Node, ObjectDescriptor::node("system", oid.clone()))
            .unwrap();
        let (kind, hit) = catalog.lookup_any(&oid).unwrap();
        assert_eq!(kind, BucketKind::Node);
        assert_eq!(&*hit.name, "system");
        // nodes only match exactly
        assert!(catalog.lookup_any(&oid!(1, 3, 6, 1, 2, 1, 1, 5)).is_none());
    }

    #[test]
    fn test_lookup_by_syntax() {
        let mut catalog = ObjectCatalog::new();
        catalog
            .insert_leaf(counter("sysUpTime", oid!(1, 3, 6, 1, 2, 1, 1, 3)))
            .unwrap();
        let oid = oid!(1, 3, 6, 1, 2, 1, 1, 3);
        assert!(catalog.lookup_by_syntax(SyntaxKind::Counter32, &oid).is_some());
        assert!(catalog.lookup_by_syntax(SyntaxKind::TimeTicks, &oid).is_none());
        assert!(catalog.lookup_by_syntax(SyntaxKind::NoSuchInstance, &oid).is_some());
        assert!(catalog.lookup_by_syntax(SyntaxKind::Null, &oid).is_none());
    }

    #[test]
    fn test_lookup_name() {
        let mut catalog = ObjectCatalog::new();
        catalog
            .insert(
                BucketKind::Enum,
                ObjectDescriptor::new("coldStart", oid!(1, 3, 6, 1, 6, 3, 1, 1, 5, 1), SyntaxKind::ObjectIdentifier),
            )
            .unwrap();
        catalog
            .insert(BucketKind::Node, ObjectDescriptor::node("system", oid!(1, 3, 6, 1, 2, 1, 1)))
            .unwrap();
        assert_eq!(catalog.lookup_name("system").unwrap().oid, oid!(1, 3, 6, 1, 2, 1, 1));
        assert!(catalog.lookup_name("coldStart").is_none());
        assert!(catalog.lookup_name_in(BucketKind::Enum, "coldStart").is_some());
    }
}
