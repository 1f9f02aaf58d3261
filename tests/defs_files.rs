//! Loading definition files from disk.

mod common;

use std::fs;

use snmpmap::defs::{self, DefFiles, dump, options::default_cut};
use snmpmap::{Error, Mapping, Oid, SyntaxKind, oid};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, text: &str) {
    fs::write(dir.path().join(name), text).unwrap();
}

fn listed(dir: &TempDir, names: &[(&str, Oid)]) -> DefFiles {
    let mut files = DefFiles::new();
    for (name, cut) in names {
        assert!(files.push(dir.path().join(name), cut.clone()));
    }
    files
}

#[test]
fn loads_files_in_order_with_cuts() {
    let dir = TempDir::new().unwrap();
    write(&dir, "tree.def", common::DEFS);
    write(&dir, "vendor.def", "(1 enterprises\n  (99 acme\n    (1 acmeUptime TIMETICKS op_acme GET)\n  )\n)\n");

    let files = listed(&dir, &[("tree.def", default_cut()), ("vendor.def", oid!(1, 3, 6, 1, 4))]);
    assert_eq!(files.len(), 2);

    let mut mapping = Mapping::new();
    let stats = defs::load_all(&mut mapping, &files, false).unwrap();
    assert_eq!(stats.typedefs, 1);
    assert_eq!(
        mapping.lookup_name("acmeUptime").unwrap().oid,
        oid!(1, 3, 6, 1, 4, 1, 99, 1)
    );
    assert_eq!(
        mapping.lookup_name("ifAdminStatus").unwrap().oid,
        oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 7)
    );
}

#[test]
fn missing_files_skipped_only_on_request() {
    let dir = TempDir::new().unwrap();
    write(&dir, "tree.def", common::DEFS);
    let files = listed(&dir, &[("absent.def", default_cut()), ("tree.def", default_cut())]);

    let mut mapping = Mapping::new();
    defs::load_all(&mut mapping, &files, true).unwrap();
    assert!(mapping.lookup_name("sysDescr").is_some());

    let err = defs::load_all(&mut Mapping::new(), &files, false).unwrap_err();
    assert!(matches!(*err, Error::DefinitionIo { .. }));
}

#[test]
fn parse_error_names_file_and_line() {
    let dir = TempDir::new().unwrap();
    write(&dir, "broken.def", "(1 internet\n  (2 mgmt\n    (1 bad WIDGET GET)\n  )\n)\n");
    let files = listed(&dir, &[("broken.def", default_cut())]);

    let err = defs::load_all(&mut Mapping::new(), &files, false).unwrap_err();
    match *err {
        Error::Definition { ref path, line, .. } => {
            assert!(path.ends_with("broken.def"));
            assert_eq!(line, 3);
        }
        ref other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn conflicting_names_across_files() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.def", "(1 internet (4 private (1 enterprises (99 acmeName DisplayString op GET))))\n");
    write(&dir, "b.def", "(1 internet (4 private (1 enterprises (99 otherName DisplayString op GET))))\n");
    let files = listed(&dir, &[("a.def", default_cut()), ("b.def", default_cut())]);

    let err = defs::load_all(&mut Mapping::new(), &files, false).unwrap_err();
    assert!(matches!(*err, Error::Definition { .. }));
}

#[test]
fn dump_reloads_to_same_catalog() {
    let original = common::mapping();
    let text = dump::to_string(&original, &default_cut());

    let mut reloaded = Mapping::new();
    defs::load_str(&mut reloaded, &text, "dump", &default_cut()).unwrap();

    assert_eq!(reloaded.len(), original.len());
    for name in ["sysObjectID", "ipNetToMediaPhysAddress", "coldStart"] {
        assert_eq!(reloaded.lookup_name(name), original.lookup_name(name), "{name}");
    }
    let admin = reloaded.lookup_name("ifAdminStatus").unwrap();
    assert_eq!(admin.enum_table(reloaded.types()).unwrap().label(2), Some("down"));
    let row = reloaded.tables().lookup_name("ipNetToMediaEntry").unwrap();
    let syntaxes: Vec<SyntaxKind> = row.index.iter().map(|c| c.syntax).collect();
    assert_eq!(syntaxes, [SyntaxKind::Integer, SyntaxKind::IpAddress]);
}
