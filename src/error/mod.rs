//! Errors.
//!
//! [`Error`] covers mapping, parsing, loading and transport failures and is
//! always boxed, so `Result<()>` stays one word. [`ErrorStatus`] is the
//! `error-status` field of an agent's response (RFC 3416); agent errors are
//! reported, not raised.
//!
//! ```rust
//! use snmpmap::{Error, Result};
//!
//! fn handle_error(result: Result<()>) {
//!     match result {
//!         Ok(()) => println!("Success"),
//!         Err(e) => match &*e {
//!             Error::ConflictingMapping { oid, existing, name } => {
//!                 println!("{} claimed by both {} and {}", oid, existing, name);
//!             }
//!             Error::Timeout { target, retries, .. } => {
//!                 println!("{} unreachable after {} retries", target, retries);
//!             }
//!             _ => println!("Error: {}", e),
//!         }
//!     }
//! }
//! ```

pub(crate) mod internal;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::oid::Oid;
use crate::syntax::SyntaxKind;

pub(crate) use internal::DecodeErrorKind;
pub use internal::OidErrorKind;

/// Placeholder target address used when no target is known.
pub(crate) const UNKNOWN_TARGET: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0)), 0);

pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Crate error.
///
/// Parse and catalog errors abort the item (or definition file) being processed.
/// Lookup misses are not errors at all: lookups return `Option` and callers fall
/// back to numeric rendering.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Dotted-decimal text that is not a valid OID.
    #[error("malformed OID '{input}': {kind}")]
    MalformedOid { input: Box<str>, kind: OidErrorKind },

    /// Appending would exceed [`MAX_OID_LEN`](crate::oid::MAX_OID_LEN).
    #[error("OID length exceeds maximum of {max} sub-identifiers")]
    LengthExceeded { max: usize },

    /// Pop from an OID with no sub-identifiers.
    #[error("cannot remove a sub-identifier from an empty OID")]
    EmptyOid,

    /// Slice bounds outside the source OID.
    #[error("invalid OID slice {start}..{end} of an OID with {len} sub-identifiers")]
    InvalidSlice { start: usize, end: usize, len: usize },

    /// Two different names claim the same OID within one catalog bucket.
    #[error("conflicting mapping for {oid}: '{existing}' already registered, refusing '{name}'")]
    ConflictingMapping {
        oid: Oid,
        existing: Box<str>,
        name: Box<str>,
    },

    /// A typedef name redefined with a different type.
    #[error("conflicting definitions for type '{0}'")]
    ConflictingTypedef(Box<str>),

    /// Fewer sub-identifiers remain than an index column needs.
    #[error("index suffix too short for {syntax} column: need {needed}, have {remaining}")]
    IndexTooShort {
        syntax: SyntaxKind,
        needed: usize,
        remaining: usize,
    },

    /// Length prefix of a variable-length index column exceeds the format maximum.
    #[error("index value length {len} exceeds maximum of {max}")]
    IndexValueTooLong { len: usize, max: usize },

    /// Column syntax cannot be used to index a table.
    #[error("syntax {0} cannot be used as a table index")]
    UnknownIndexSyntax(SyntaxKind),

    /// IMPLIED variable-length index columns are not handled.
    #[error("implied {0} index columns are not supported")]
    UnsupportedImpliedIndex(SyntaxKind),

    /// A `syntax:value` index token disagrees with the column's syntax.
    #[error("mismatching index syntax: {expected} expected, {found} given")]
    IndexSyntaxMismatch {
        expected: SyntaxKind,
        found: SyntaxKind,
    },

    /// Index literal does not have the shape the table expects.
    #[error("invalid index '{input}': {reason}")]
    InvalidIndex { input: Box<str>, reason: Box<str> },

    /// Value text cannot be converted to the target syntax.
    #[error("invalid {syntax} value '{input}': {reason}")]
    InvalidValue {
        syntax: SyntaxKind,
        input: Box<str>,
        reason: Box<str>,
    },

    /// No catalog entry for a symbolic name.
    #[error("no entry for {0} in mapping lists")]
    UnknownObject(Box<str>),

    /// Unrecognized syntax keyword.
    #[error("unknown syntax '{0}'")]
    UnknownSyntax(Box<str>),

    /// Definition file content error.
    #[error("{path}:{line}: {reason}")]
    Definition {
        path: Box<str>,
        line: usize,
        reason: Box<str>,
    },

    /// Definition file could not be read.
    #[error("cannot read definition file {path}: {source}")]
    DefinitionIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Definition path contains a character outside the permitted set.
    #[error("invalid character '{ch}' in path '{path}'")]
    InvalidPath { path: Box<str>, ch: char },

    /// Invalid command line usage.
    #[error("{0}")]
    Usage(Box<str>),

    /// Writing tool output failed.
    #[error("cannot write output: {0}")]
    Output(#[source] std::io::Error),

    /// More bindings than fit into one request.
    #[error("too many bindings: {count} exceeds maximum of {max}")]
    TooManyBindings { count: usize, max: usize },

    /// Socket failure talking to the agent.
    #[error("network error communicating with {target}: {source}")]
    Network {
        target: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// No matching response within the timeout, retries included.
    #[error("timeout after {elapsed:?} waiting for {target} ({retries} retries)")]
    Timeout {
        target: SocketAddr,
        elapsed: Duration,
        retries: u32,
    },

    /// Response that does not decode as a v1/v2c message.
    #[error("malformed response from {target}")]
    MalformedResponse { target: SocketAddr },
}

impl Error {
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Log a BER decode failure and convert it to [`Error::MalformedResponse`].
    pub(crate) fn decode(offset: usize, kind: DecodeErrorKind) -> Box<Self> {
        tracing::debug!(target: "snmpmap::ber", { snmp.offset = offset, kind = %kind }, "decode error");
        Error::MalformedResponse {
            target: UNKNOWN_TARGET,
        }
        .boxed()
    }

    pub(crate) fn malformed_oid(input: &str, kind: OidErrorKind) -> Box<Self> {
        Error::MalformedOid {
            input: input.into(),
            kind,
        }
        .boxed()
    }

    pub(crate) fn invalid_value(
        syntax: SyntaxKind,
        input: &str,
        reason: impl Into<Box<str>>,
    ) -> Box<Self> {
        Error::InvalidValue {
            syntax,
            input: input.into(),
            reason: reason.into(),
        }
        .boxed()
    }

    pub(crate) fn usage(msg: impl Into<Box<str>>) -> Box<Self> {
        Error::Usage(msg.into()).boxed()
    }
}

/// Response `error-status` (RFC 3416).
///
/// ```
/// use snmpmap::ErrorStatus;
///
/// let status = ErrorStatus::from_i32(17);
/// assert_eq!(status, ErrorStatus::NotWritable);
/// assert_eq!(status.to_string(), "notWritable");
/// assert_eq!(status.description(), "Not writable");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorStatus {
    /// Operation completed successfully (status = 0).
    NoError,
    /// Response message would be too large for transport (status = 1).
    TooBig,
    /// Requested OID not found (status = 2). SNMPv1 only; v2c+ uses exception values.
    NoSuchName,
    /// Invalid value provided in SET request (status = 3).
    BadValue,
    /// Attempted to SET a read-only object (status = 4).
    ReadOnly,
    /// Unspecified error occurred (status = 5).
    GenErr,
    /// Object exists but access is denied (status = 6).
    NoAccess,
    /// SET value has wrong ASN.1 type (status = 7).
    WrongType,
    /// SET value has incorrect length (status = 8).
    WrongLength,
    /// SET value uses wrong encoding (status = 9).
    WrongEncoding,
    /// SET value is out of range or otherwise invalid (status = 10).
    WrongValue,
    /// Object does not support row creation (status = 11).
    NoCreation,
    /// Value is inconsistent with other managed objects (status = 12).
    InconsistentValue,
    /// Resource required for SET is unavailable (status = 13).
    ResourceUnavailable,
    /// SET commit phase failed (status = 14).
    CommitFailed,
    /// SET undo phase failed (status = 15).
    UndoFailed,
    /// Access denied by VACM (status = 16).
    AuthorizationError,
    /// Object does not support modification (status = 17).
    NotWritable,
    /// Named object cannot be created (status = 18).
    InconsistentName,
    /// Unknown or future error status code.
    Unknown(i32),
}

/// Wire name and tool description, indexed by status code.
static STATUS_TABLE: [(ErrorStatus, &str, &str); 19] = [
    (ErrorStatus::NoError, "noError", "Unknown"),
    (ErrorStatus::TooBig, "tooBig", "Too big"),
    (ErrorStatus::NoSuchName, "noSuchName", "No such Name"),
    (ErrorStatus::BadValue, "badValue", "Bad Value"),
    (ErrorStatus::ReadOnly, "readOnly", "Readonly"),
    (ErrorStatus::GenErr, "genErr", "General error"),
    (ErrorStatus::NoAccess, "noAccess", "No access"),
    (ErrorStatus::WrongType, "wrongType", "Wrong type"),
    (ErrorStatus::WrongLength, "wrongLength", "Wrong length"),
    (ErrorStatus::WrongEncoding, "wrongEncoding", "Wrong encoding"),
    (ErrorStatus::WrongValue, "wrongValue", "Wrong value"),
    (ErrorStatus::NoCreation, "noCreation", "No creation"),
    (ErrorStatus::InconsistentValue, "inconsistentValue", "Inconsistent value"),
    (ErrorStatus::ResourceUnavailable, "resourceUnavailable", "Resource unavailable"),
    (ErrorStatus::CommitFailed, "commitFailed", "Commit failed"),
    (ErrorStatus::UndoFailed, "undoFailed", "Undo failed"),
    (ErrorStatus::AuthorizationError, "authorizationError", "Authorization error"),
    (ErrorStatus::NotWritable, "notWritable", "Not writable"),
    (ErrorStatus::InconsistentName, "inconsistentName", "Inconsistent name"),
];

impl ErrorStatus {
    /// Status for a raw `error-status` field.
    pub fn from_i32(value: i32) -> Self {
        match usize::try_from(value).ok().and_then(|i| STATUS_TABLE.get(i)) {
            Some(&(status, _, _)) => status,
            None => {
                tracing::warn!(target: "snmpmap::ber", { snmp.error_status = value }, "unknown SNMP error status");
                Self::Unknown(value)
            }
        }
    }

    pub fn as_i32(&self) -> i32 {
        match self {
            Self::Unknown(code) => *code,
            known => STATUS_TABLE
                .iter()
                .position(|(status, _, _)| status == known)
                .map_or(-1, |i| i as i32),
        }
    }

    fn entry(&self) -> Option<&'static (ErrorStatus, &'static str, &'static str)> {
        match self {
            Self::Unknown(_) => None,
            known => STATUS_TABLE.iter().find(|(status, _, _)| status == known),
        }
    }

    /// Fixed display text used by the command line tools.
    ///
    /// Anything outside `1..=18` (including `noError`) reads `Unknown`.
    pub fn description(&self) -> &'static str {
        self.entry().map_or("Unknown", |&(_, _, text)| text)
    }
}

impl std::fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.entry() {
            Some(&(_, name, _)) => f.write_str(name),
            None => write!(f, "unknown({})", self.as_i32()),
        }
    }
}
