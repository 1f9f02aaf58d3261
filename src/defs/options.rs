//! Definition file selection: `-I` sub-options, `-i` file lists and defaults.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::oid::Oid;

/// Directory searched for bare definition file names.
pub const DEFAULT_DEFS_DIR: &str = "/usr/share/snmp/defs";

/// Files loaded when none are named on the command line.
pub const DEFAULT_DEFS: [&str; 2] = ["tree.def", "mibII_tree.def"];

/// Longest cut prefix a file may declare.
pub const MAX_CUT_LEN: usize = 5;

/// Default prefix omitted from definition files (`iso.org.dod`).
pub fn default_cut() -> Oid {
    Oid::from_slice(&[1, 3, 6])
}

/// One definition file and the prefix to re-prepend to its OIDs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefFile {
    pub path: PathBuf,
    pub cut: Oid,
}

/// Ordered, duplicate-free list of definition files to load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefFiles {
    files: Vec<DefFile>,
}

impl DefFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// The two default files under [`DEFAULT_DEFS_DIR`].
    pub fn defaults() -> Self {
        let mut files = Self::new();
        for name in DEFAULT_DEFS {
            files.push(Path::new(DEFAULT_DEFS_DIR).join(name), default_cut());
        }
        files
    }

    /// Add a file unless the same path is already listed.
    pub fn push(&mut self, path: PathBuf, cut: Oid) -> bool {
        if self.files.iter().any(|f| f.path == path) {
            tracing::debug!(target: "snmpmap::defs", { path = %path.display() }, "file already listed");
            return false;
        }
        self.files.push(DefFile { path, cut });
        true
    }

    /// Parse a `-i` argument: comma separated file names with the default cut.
    ///
    /// ```
    /// use snmpmap::defs::options::DefFiles;
    ///
    /// let mut files = DefFiles::new();
    /// files.add_list("tree.def,./local.def").unwrap();
    /// assert_eq!(files.len(), 2);
    /// assert!(files.add_list("bad$name").is_err());
    /// ```
    pub fn add_list(&mut self, list: &str) -> Result<()> {
        self.add_names(list, None, &default_cut())
    }

    /// Parse a `-I` argument: `cut=<oid>`, `path=<dir>` and `file=<name>`
    /// sub-options separated by commas. Each `file=` uses the most recent
    /// `cut=` and `path=` seen before it.
    ///
    /// ```
    /// use snmpmap::defs::options::DefFiles;
    /// use snmpmap::oid;
    ///
    /// let mut files = DefFiles::new();
    /// files.add_include("cut=1.3.6.1.4,path=/etc/defs,file=vendor.def").unwrap();
    /// let file = files.iter().next().unwrap();
    /// assert_eq!(file.path.to_str(), Some("/etc/defs/vendor.def"));
    /// assert_eq!(file.cut, oid!(1, 3, 6, 1, 4));
    /// ```
    pub fn add_include(&mut self, arg: &str) -> Result<()> {
        let mut cut = default_cut();
        let mut path: Option<String> = None;

        for option in arg.split([',', ' ', '\t']).filter(|s| !s.is_empty()) {
            let (key, value) = match option.split_once('=') {
                Some((key, value)) => (key, Some(value)),
                None => (option, None),
            };
            match (key, value) {
                ("cut", Some(value)) => cut = parse_cut(value)?,
                ("path", Some(value)) => {
                    validate_path(value)?;
                    path = Some(value.to_string());
                }
                ("file", Some(value)) if !value.is_empty() => {
                    self.add_names(value, path.as_deref(), &cut)?;
                }
                ("cut" | "path" | "file", _) => {
                    return Err(Error::usage(format!("suboption '{key}' requires an argument")));
                }
                ("", _) => return Err(Error::usage("missing suboption")),
                (other, _) => return Err(Error::usage(format!("unknown suboption - '{other}'"))),
            }
        }
        Ok(())
    }

    fn add_names(&mut self, list: &str, dir: Option<&str>, cut: &Oid) -> Result<()> {
        for name in list.split(',').filter(|s| !s.is_empty()) {
            validate_path(name)?;
            let path = match dir {
                Some(dir) => Path::new(dir).join(name),
                None if name.starts_with(|c: char| c.is_ascii_alphabetic()) => {
                    Path::new(DEFAULT_DEFS_DIR).join(name)
                }
                None => PathBuf::from(name),
            };
            self.push(path, cut.clone());
        }
        Ok(())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DefFile> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl<'a> IntoIterator for &'a DefFiles {
    type Item = &'a DefFile;
    type IntoIter = std::slice::Iter<'a, DefFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

/// Check every character of a path or file name.
///
/// Allowed: letters, `/`, `_`, `.`, `~`, and digits anywhere but the first
/// position.
pub fn validate_path(path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(Error::usage("empty path"));
    }
    for (pos, ch) in path.chars().enumerate() {
        let ok = ch.is_ascii_alphabetic()
            || matches!(ch, '/' | '_' | '.' | '~')
            || (pos != 0 && ch.is_ascii_digit());
        if !ok {
            return Err(Error::InvalidPath {
                path: path.into(),
                ch,
            }
            .boxed());
        }
    }
    Ok(())
}

/// An empty value is the empty cut: the file carries full OIDs.
fn parse_cut(value: &str) -> Result<Oid> {
    let cut = Oid::parse(value)?;
    if cut.len() > MAX_CUT_LEN {
        return Err(Error::usage(format!(
            "cut '{value}' longer than {MAX_CUT_LEN} sub-identifiers"
        )));
    }
    Ok(cut)
}
