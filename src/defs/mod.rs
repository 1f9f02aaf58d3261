//! Definition file loader.
//!
//! Definition files describe the object tree with parenthesized nesting:
//!
//! ```text
//! typedef RowStatus ENUM ( 1 active 2 notInService 3 notReady 4 createAndGo 5 createAndWait 6 destroy )
//!
//! (1 internet                                     # 1.3.6.1 with the default cut
//!   (2 mgmt
//!     (1 mib_2
//!       (1 system
//!         (1 sysDescr DisplayString op_system GET)
//!         (2 sysObjectID OID op_system GET)
//!       )
//!       (2 interfaces
//!         (2 ifTable
//!           (1 ifEntry : INTEGER op_ifTable
//!             (1 ifIndex INTEGER GET)
//!             (7 ifAdminStatus ENUM ( 1 up 2 down 3 testing ) GET SET)
//!           )
//!         )
//!       )
//!     )
//!   )
//! )
//! ```
//!
//! Each file omits a leading OID prefix (its *cut*, `1.3.6` unless told
//! otherwise) which is prepended to every OID before insertion. A parse error
//! or a conflicting mapping aborts the file and reports its name and line.

mod lexer;
pub mod dump;
pub mod options;

use crate::catalog::table::{IndexColumn, TableDescriptor};
use crate::catalog::{BucketKind, Insertion, ObjectDescriptor};
use crate::enums::{EnumRef, EnumTable};
use crate::error::{Error, Result};
use crate::mapping::Mapping;
use crate::oid::Oid;
use crate::syntax::{Access, SyntaxKind};
use crate::tc::{TextualConvention, TypeDef};

use lexer::{Lexer, Token, TokenKind};
pub use options::{DefFile, DefFiles};

/// Counts from one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// New catalog and table entries.
    pub inserted: usize,
    /// Entries that were already present with the same name.
    pub duplicates: usize,
    /// Typedefs registered.
    pub typedefs: usize,
}

impl LoadStats {
    fn record(&mut self, insertion: Insertion) {
        match insertion {
            Insertion::Inserted => self.inserted += 1,
            Insertion::AlreadyPresent => self.duplicates += 1,
        }
    }

    fn merge(&mut self, other: LoadStats) {
        self.inserted += other.inserted;
        self.duplicates += other.duplicates;
        self.typedefs += other.typedefs;
    }
}

/// Load one definition file from disk.
pub fn load_file(mapping: &mut Mapping, file: &DefFile) -> Result<LoadStats> {
    let source = std::fs::read_to_string(&file.path).map_err(|source| {
        Error::DefinitionIo {
            path: file.path.clone(),
            source,
        }
        .boxed()
    })?;
    let name = file.path.display().to_string();
    let stats = load_str(mapping, &source, &name, &file.cut)?;
    tracing::debug!(
        target: "snmpmap::defs",
        { path = %name, inserted = stats.inserted, duplicates = stats.duplicates },
        "definition file loaded"
    );
    Ok(stats)
}

/// Load every listed file in order.
///
/// With `skip_missing` set, files that do not exist are skipped with a
/// warning; any other failure aborts.
pub fn load_all(mapping: &mut Mapping, files: &DefFiles, skip_missing: bool) -> Result<LoadStats> {
    let mut total = LoadStats::default();
    for file in files {
        if skip_missing && !file.path.exists() {
            tracing::warn!(target: "snmpmap::defs", { path = %file.path.display() }, "definition file not found, skipping");
            continue;
        }
        total.merge(load_file(mapping, file)?);
    }
    mapping.log_summary();
    Ok(total)
}

/// Load definitions from text. `name` is used in error messages.
///
/// ```
/// use snmpmap::defs::{load_str, options::default_cut};
/// use snmpmap::mapping::Mapping;
///
/// let mut mapping = Mapping::new();
/// let text = "(1 internet (2 mgmt (1 mib_2 (1 system\n\
///             (3 sysUpTime TIMETICKS op_system GET)\n\
///             ))))";
/// let stats = load_str(&mut mapping, text, "inline", &default_cut()).unwrap();
/// assert_eq!(stats.inserted, 5);
/// let obj = mapping.lookup_name("sysUpTime").unwrap();
/// assert_eq!(obj.oid.to_string(), "1.3.6.1.2.1.1.3");
/// ```
pub fn load_str(mapping: &mut Mapping, source: &str, name: &str, cut: &Oid) -> Result<LoadStats> {
    let mut parser = Parser {
        lexer: Lexer::new(source),
        peeked: None,
        mapping,
        path: name,
        cut,
        stack: Vec::new(),
        line: 1,
        stats: LoadStats::default(),
    };
    parser.parse()?;
    Ok(parser.stats)
}

/// An open level of the tree.
struct Level {
    sub: u32,
    /// Set when this level is a table row.
    row: Option<Oid>,
}

/// Resolved type of an object, column or typedef.
struct TypeSpec {
    syntax: SyntaxKind,
    tc: TextualConvention,
    enums: Option<EnumRef>,
}

impl TypeSpec {
    fn plain(syntax: SyntaxKind) -> Self {
        Self {
            syntax,
            tc: TextualConvention::Plain,
            enums: None,
        }
    }
}

struct Parser<'src, 'm> {
    lexer: Lexer<'src>,
    peeked: Option<Token<'src>>,
    mapping: &'m mut Mapping,
    path: &'src str,
    cut: &'src Oid,
    stack: Vec<Level>,
    line: usize,
    stats: LoadStats,
}

impl<'src> Parser<'src, '_> {
    fn error(&self, reason: impl Into<Box<str>>) -> Box<Error> {
        Error::Definition {
            path: self.path.into(),
            line: self.line,
            reason: reason.into(),
        }
        .boxed()
    }

    /// Attach file and line to a catalog error.
    fn at_line<T>(&self, result: Result<T>) -> Result<T> {
        result.map_err(|e| self.error(e.to_string()))
    }

    fn peek(&mut self) -> TokenKind<'src> {
        if self.peeked.is_none() {
            self.peeked = Some(self.lexer.next_token());
        }
        self.peeked.map_or(TokenKind::Eof, |t| t.kind)
    }

    fn next(&mut self) -> TokenKind<'src> {
        let token = self
            .peeked
            .take()
            .unwrap_or_else(|| self.lexer.next_token());
        self.line = token.line;
        token.kind
    }

    fn expect_word(&mut self, what: &str) -> Result<&'src str> {
        match self.next() {
            TokenKind::Word(w) => Ok(w),
            _ => Err(self.error(format!("expected {what}"))),
        }
    }

    fn parse(&mut self) -> Result<()> {
        loop {
            match self.next() {
                TokenKind::Eof => break,
                TokenKind::Word("typedef") => self.parse_typedef()?,
                TokenKind::Open => self.parse_entry()?,
                TokenKind::Close => {
                    if self.stack.pop().is_none() {
                        return Err(self.error("unbalanced ')'"));
                    }
                }
                TokenKind::Word(w) => return Err(self.error(format!("unexpected '{w}'"))),
                TokenKind::Colon => return Err(self.error("unexpected ':'")),
            }
        }
        if !self.stack.is_empty() {
            return Err(self.error(format!("{} unclosed '('", self.stack.len())));
        }
        Ok(())
    }

    /// OID of a child of the innermost open level.
    fn child_oid(&self, sub: u32) -> Result<Oid> {
        let mut oid = self.cut.clone();
        let arcs: Vec<u32> = self.stack.iter().map(|l| l.sub).chain([sub]).collect();
        self.at_line(oid.extend_from_slice(&arcs))?;
        Ok(oid)
    }

    fn parse_name(&mut self) -> Result<&'src str> {
        let name = self.expect_word("a name")?;
        let mut chars = name.chars();
        let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(self.error(format!("invalid name '{name}'")));
        }
        Ok(name)
    }

    fn parse_typedef(&mut self) -> Result<()> {
        let name = self.parse_name()?;
        let word = self.expect_word("a type")?;
        let spec = self.parse_type(word)?;
        let enums = match spec.enums {
            Some(EnumRef::Owned(table)) => Some(table),
            Some(EnumRef::Shared(id)) => self
                .mapping
                .types()
                .get(id)
                .and_then(|def| def.enums.clone()),
            None => None,
        };
        let def = TypeDef {
            name: name.into(),
            syntax: spec.syntax,
            tc: spec.tc,
            enums,
        };
        let result = self.mapping.types_mut().define(def);
        self.at_line(result)?;
        self.stats.typedefs += 1;
        Ok(())
    }

    /// `(<sub> <name> ...` after the opening parenthesis.
    fn parse_entry(&mut self) -> Result<()> {
        let sub = self.expect_word("a sub-identifier")?;
        let sub: u32 = sub
            .parse()
            .map_err(|_| self.error(format!("invalid sub-identifier '{sub}'")))?;
        let name = self.parse_name()?;
        let oid = self.child_oid(sub)?;

        match self.peek() {
            TokenKind::Colon => {
                self.next();
                self.parse_row(sub, name, oid)
            }
            TokenKind::Word(word) if self.is_type(word) => {
                self.next();
                self.parse_object(name, oid, word)
            }
            TokenKind::Open | TokenKind::Close => {
                self.insert(BucketKind::Node, ObjectDescriptor::node(name, oid))?;
                self.stack.push(Level { sub, row: None });
                Ok(())
            }
            TokenKind::Word(word) => Err(self.error(format!("unknown type '{word}'"))),
            TokenKind::Eof => Err(self.error("unexpected end of file")),
        }
    }

    /// Table row: index columns follow the colon, the level stays open.
    fn parse_row(&mut self, sub: u32, name: &'src str, oid: Oid) -> Result<()> {
        let mut index = Vec::new();
        let mut implied = false;
        while let TokenKind::Word(word) = self.peek() {
            if word == "IMPLIED" {
                self.next();
                implied = true;
                continue;
            }
            if !self.is_type(word) {
                // operation name ends the index list
                self.next();
                break;
            }
            self.next();
            let spec = self.parse_type(word)?;
            let mut column = IndexColumn::new(spec.syntax).with_tc(spec.tc);
            column.enums = spec.enums;
            if implied {
                column = column.implied();
                implied = false;
            }
            index.push(column);
        }
        if implied {
            return Err(self.error("IMPLIED must precede an index type"));
        }
        if index.is_empty() {
            return Err(self.error(format!("table row '{name}' has no index")));
        }
        if index[..index.len() - 1].iter().any(|c| c.implied) {
            return Err(self.error("only the last index column may be IMPLIED"));
        }

        self.insert(BucketKind::Node, ObjectDescriptor::node(name, oid.clone()))?;
        let result = self
            .mapping
            .insert_table(TableDescriptor::new(name, oid.clone(), index));
        let insertion = self.at_line(result)?;
        self.stats.record(insertion);
        self.stack.push(Level {
            sub,
            row: Some(oid),
        });
        Ok(())
    }

    /// Typed leaf: `<TYPE> [op] [GET] [SET] )`.
    fn parse_object(&mut self, name: &'src str, oid: Oid, word: &'src str) -> Result<()> {
        let spec = self.parse_type(word)?;
        let (mut get, mut set, mut op) = (false, false, false);
        loop {
            match self.next() {
                TokenKind::Close => break,
                TokenKind::Word("GET") => get = true,
                TokenKind::Word("SET") => set = true,
                TokenKind::Word(_) if !op && !get && !set => op = true,
                TokenKind::Word(w) => return Err(self.error(format!("unexpected '{w}'"))),
                _ => return Err(self.error(format!("missing ')' after '{name}'"))),
            }
        }

        let access = Access::from_flags(get, set);
        let mut object = ObjectDescriptor::new(name, oid, spec.syntax)
            .with_tc(spec.tc)
            .with_access(access);
        object.enums = spec.enums;
        if let Some(row) = self.stack.last().and_then(|l| l.row.clone()) {
            object = object.with_table(row);
        }

        let kind = match BucketKind::for_syntax(spec.syntax) {
            Some(BucketKind::Oid) if access == Access::None => BucketKind::Enum,
            Some(kind) => kind,
            None => return Err(self.error(format!("'{name}' has no value syntax"))),
        };
        self.insert(kind, object)
    }

    fn insert(&mut self, kind: BucketKind, object: ObjectDescriptor) -> Result<()> {
        tracing::trace!(target: "snmpmap::defs", { bucket = %kind, name = %object.name, oid = %object.oid }, "insert");
        let result = self.mapping.insert_object(kind, object);
        let insertion = self.at_line(result)?;
        self.stats.record(insertion);
        Ok(())
    }

    fn is_type(&self, word: &str) -> bool {
        base_type(word).is_some()
            || matches!(word, "ENUM" | "BITS")
            || TextualConvention::from_keyword(word).is_some()
            || self.mapping.types().lookup(word).is_some()
    }

    fn parse_type(&mut self, word: &'src str) -> Result<TypeSpec> {
        if let Some(syntax) = base_type(word) {
            return Ok(TypeSpec::plain(syntax));
        }
        match word {
            "ENUM" | "BITS" => {
                let table = self.parse_enum_body()?;
                let syntax = if word == "ENUM" {
                    SyntaxKind::Integer
                } else {
                    SyntaxKind::OctetString
                };
                return Ok(TypeSpec {
                    syntax,
                    tc: TextualConvention::Plain,
                    enums: Some(EnumRef::Owned(table)),
                });
            }
            _ => {}
        }
        if let Some(tc) = TextualConvention::from_keyword(word) {
            return Ok(TypeSpec {
                syntax: SyntaxKind::OctetString,
                tc,
                enums: None,
            });
        }
        let types = self.mapping.types();
        if let Some(id) = types.lookup(word)
            && let Some(def) = types.get(id)
        {
            return Ok(TypeSpec {
                syntax: def.syntax,
                tc: def.tc,
                enums: def.enums.as_ref().map(|_| EnumRef::Shared(id)),
            });
        }
        Err(self.error(format!("unknown type '{word}'")))
    }

    /// `( <value> <label> ... )`
    fn parse_enum_body(&mut self) -> Result<EnumTable> {
        if self.next() != TokenKind::Open {
            return Err(self.error("expected '(' after ENUM"));
        }
        let mut table = EnumTable::new();
        loop {
            match self.next() {
                TokenKind::Close => break,
                TokenKind::Word(value) => {
                    let value: i32 = value
                        .parse()
                        .map_err(|_| self.error(format!("invalid enum value '{value}'")))?;
                    let label = self.parse_name()?;
                    table.push(value, label);
                }
                _ => return Err(self.error("unterminated enumeration")),
            }
        }
        if table.is_empty() {
            return Err(self.error("empty enumeration"));
        }
        Ok(table)
    }
}

/// Base type keywords.
fn base_type(word: &str) -> Option<SyntaxKind> {
    Some(match word {
        "INTEGER" | "INTEGER32" => SyntaxKind::Integer,
        "OCTETSTRING" => SyntaxKind::OctetString,
        "OID" => SyntaxKind::ObjectIdentifier,
        "IPADDRESS" => SyntaxKind::IpAddress,
        "COUNTER" => SyntaxKind::Counter32,
        "GAUGE" | "UNSIGNED32" => SyntaxKind::Gauge32,
        "TIMETICKS" => SyntaxKind::TimeTicks,
        "COUNTER64" => SyntaxKind::Counter64,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;
    use options::default_cut;

    const IF_MIB: &str = "
typedef IfStatus ENUM ( 1 up 2 down 3 testing )
(1 internet
  (2 mgmt
    (1 mib_2
      (2 interfaces
        (1 ifNumber INTEGER op_interfaces GET)
        (2 ifTable
          (1 ifEntry : INTEGER op_ifTable
            (1 ifIndex INTEGER GET)
            (2 ifDescr DisplayString GET)
            (7 ifAdminStatus IfStatus GET SET)
            (10 ifInOctets COUNTER GET)
          )
        )
      )
    )
  )
)
";

    fn load(text: &str) -> Result<Mapping> {
        let mut mapping = Mapping::new();
        load_str(&mut mapping, text, "test.def", &default_cut())?;
        Ok(mapping)
    }

    #[test]
    fn test_routes_entries_to_buckets() {
        let mapping = load(IF_MIB).unwrap();
        let objects = mapping.objects();
        assert_eq!(objects.bucket(BucketKind::Integer).len(), 3);
        assert_eq!(objects.bucket(BucketKind::OctetString).len(), 1);
        assert_eq!(objects.bucket(BucketKind::Counter32).len(), 1);
        // internet, mgmt, mib_2, interfaces, ifTable, ifEntry
        assert_eq!(objects.bucket(BucketKind::Node).len(), 6);

        let descr = mapping.lookup_name("ifDescr").unwrap();
        assert_eq!(descr.oid, oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2));
        assert_eq!(descr.tc, TextualConvention::DisplayString);
        assert_eq!(descr.table, Some(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1)));
        assert_eq!(descr.access, Access::Get);

        let number = mapping.lookup_name("ifNumber").unwrap();
        assert_eq!(number.table, None);
    }

    #[test]
    fn test_row_registers_table() {
        let mapping = load(IF_MIB).unwrap();
        let table = mapping.tables().lookup_name("ifEntry").unwrap();
        assert_eq!(table.oid, oid!(1, 3, 6, 1, 2, 1, 2, 2, 1));
        assert_eq!(table.index.len(), 1);
        assert_eq!(table.index[0].syntax, SyntaxKind::Integer);
    }

    #[test]
    fn test_typedef_enums_shared() {
        let mapping = load(IF_MIB).unwrap();
        let admin = mapping.lookup_name("ifAdminStatus").unwrap();
        assert_eq!(admin.access, Access::GetSet);
        assert!(matches!(admin.enums, Some(EnumRef::Shared(_))));
        let table = admin.enum_table(mapping.types()).unwrap();
        assert_eq!(table.label(2), Some("down"));
    }

    #[test]
    fn test_notification_goes_to_enum_bucket() {
        let mapping = load("(1 coldStart OID op_coldStart)\n(2 sysObjectID OID op_system GET)").unwrap();
        let objects = mapping.objects();
        assert_eq!(objects.bucket(BucketKind::Enum).len(), 1);
        assert_eq!(objects.bucket(BucketKind::Oid).len(), 1);
    }

    #[test]
    fn test_cut_prepended() {
        let mut mapping = Mapping::new();
        load_str(&mut mapping, "(5 thing INTEGER GET)", "x", &oid!(1, 3, 6, 1, 4)).unwrap();
        assert_eq!(
            mapping.lookup_name("thing").unwrap().oid,
            oid!(1, 3, 6, 1, 4, 5)
        );
    }

    #[test]
    fn test_conflict_reports_line() {
        let err = load("(1 a INTEGER GET)\n(1 b INTEGER GET)").unwrap_err();
        match *err {
            Error::Definition { ref path, line, .. } => {
                assert_eq!(&**path, "test.def");
                assert_eq!(line, 2);
            }
            ref other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_file_is_idempotent() {
        let mut mapping = Mapping::new();
        let first = load_str(&mut mapping, IF_MIB, "a", &default_cut()).unwrap();
        let second = load_str(&mut mapping, IF_MIB, "b", &default_cut()).unwrap();
        assert_eq!(second.inserted, 0);
        assert_eq!(second.duplicates, first.inserted);
    }

    #[test]
    fn test_syntax_errors() {
        assert!(load("(1 a INTEGER GET").is_err());
        assert!(load(")").is_err());
        assert!(load("(1 a FLOAT GET)").is_err());
        assert!(load("(x a INTEGER)").is_err());
        assert!(load("(1 9a INTEGER)").is_err());
        assert!(load("(1 e ENUM ( 1 ) GET)").is_err());
        assert!(load("(1 t : op_t\n)").is_err());
    }

    #[test]
    fn test_implied_must_be_last() {
        let ok = load("(1 tEntry : INTEGER IMPLIED OCTETSTRING op_t\n)").unwrap();
        let table = ok.tables().lookup_name("tEntry").unwrap();
        assert!(table.index[1].implied);
        assert!(load("(1 tEntry : IMPLIED OCTETSTRING INTEGER op_t\n)").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let mut mapping = Mapping::new();
        let mut files = DefFiles::new();
        files.push("/nonexistent/snmpmap/tree.def".into(), default_cut());
        let err = load_all(&mut mapping, &files, false).unwrap_err();
        assert!(matches!(*err, Error::DefinitionIo { .. }));
        let stats = load_all(&mut mapping, &files, true).unwrap();
        assert_eq!(stats, LoadStats::default());
    }
}
