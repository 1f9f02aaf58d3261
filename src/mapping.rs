//! The mapping context: every catalog a tool consults, owned in one place.
//!
//! A [`Mapping`] is filled by the definition loader (or by hand in tests),
//! then only read while requests are built and responses rendered. Dropping it
//! releases every bucket, table descriptor and shared enumeration at once.

use crate::catalog::table::{TableCatalog, TableDescriptor};
use crate::catalog::{BucketKind, Insertion, ObjectCatalog, ObjectDescriptor};
use crate::error::Result;
use crate::oid::Oid;
use crate::tc::TcRegistry;

/// Owner of the object catalog, the table catalog and the type registry.
#[derive(Debug, Default)]
pub struct Mapping {
    objects: ObjectCatalog,
    tables: TableCatalog,
    types: TcRegistry,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn objects(&self) -> &ObjectCatalog {
        &self.objects
    }

    pub fn tables(&self) -> &TableCatalog {
        &self.tables
    }

    pub fn types(&self) -> &TcRegistry {
        &self.types
    }

    pub fn types_mut(&mut self) -> &mut TcRegistry {
        &mut self.types
    }

    pub fn insert_object(&mut self, kind: BucketKind, entry: ObjectDescriptor) -> Result<Insertion> {
        self.objects.insert(kind, entry)
    }

    pub fn insert_table(&mut self, table: TableDescriptor) -> Result<Insertion> {
        self.tables.insert(table)
    }

    /// Table descriptor for a column object.
    pub fn table_of(&self, object: &ObjectDescriptor) -> Option<&TableDescriptor> {
        object.table.as_ref().and_then(|row| self.tables.get(row))
    }

    /// Look a symbolic name up across the object buckets, then the table catalog.
    ///
    /// A table name resolves to the node registered at the table's OID.
    pub fn lookup_name(&self, name: &str) -> Option<&ObjectDescriptor> {
        self.objects.lookup_name(name).or_else(|| {
            let table = self.tables.lookup_name(name)?;
            self.objects.lookup_leaf(BucketKind::Node, &table.oid)
        })
    }

    /// Name of an OID value: enum bucket, then oid bucket, then node bucket,
    /// exact matches only.
    pub fn oid_value_name(&self, oid: &Oid) -> Option<&str> {
        [BucketKind::Enum, BucketKind::Oid, BucketKind::Node]
            .iter()
            .find_map(|&kind| self.objects.lookup_exact(kind, oid))
            .map(|d| &*d.name)
    }

    /// Total number of object entries across all buckets.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.tables.is_empty()
    }

    /// Log bucket sizes at debug level.
    pub fn log_summary(&self) {
        for kind in BucketKind::ALL {
            tracing::debug!(
                target: "snmpmap::catalog",
                { bucket = %kind, entries = self.objects.bucket(kind).len() },
                "bucket loaded"
            );
        }
        tracing::debug!(
            target: "snmpmap::catalog",
            { tables = self.tables.len(), types = self.types.len() },
            "mapping ready"
        );
    }
}

impl Drop for Mapping {
    fn drop(&mut self) {
        tracing::trace!(
            target: "snmpmap::catalog",
            { objects = self.objects.len(), tables = self.tables.len(), types = self.types.len() },
            "releasing mapping"
        );
    }
}
