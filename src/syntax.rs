//! Object syntax kinds and access rights.

use crate::error::{Error, Result};
use std::fmt;

/// Protocol-level value type of an object, including the v2 exception sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SyntaxKind {
    /// Non-leaf node or a request placeholder.
    Null,
    Integer,
    OctetString,
    ObjectIdentifier,
    IpAddress,
    Counter32,
    Gauge32,
    TimeTicks,
    Counter64,
    NoSuchObject,
    NoSuchInstance,
    EndOfMibView,
}

impl SyntaxKind {
    /// Syntaxes that carry a value and may appear in a `Syntax:value` literal.
    pub const VALUE_KINDS: [SyntaxKind; 8] = [
        SyntaxKind::Integer,
        SyntaxKind::OctetString,
        SyntaxKind::ObjectIdentifier,
        SyntaxKind::IpAddress,
        SyntaxKind::Counter32,
        SyntaxKind::Gauge32,
        SyntaxKind::TimeTicks,
        SyntaxKind::Counter64,
    ];

    /// Display name, also the prefix accepted in `Syntax:value` literals.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Integer => "Integer",
            Self::OctetString => "OctetString",
            Self::ObjectIdentifier => "OID",
            Self::IpAddress => "IpAddress",
            Self::Counter32 => "Counter32",
            Self::Gauge32 => "Gauge",
            Self::TimeTicks => "TimeTicks",
            Self::Counter64 => "Counter64",
            Self::NoSuchObject => "NoSuchObject",
            Self::NoSuchInstance => "NoSuchInstance",
            Self::EndOfMibView => "EndOfMibView",
        }
    }

    /// True for the eight value-carrying syntaxes.
    pub fn is_leaf(self) -> bool {
        Self::VALUE_KINDS.contains(&self)
    }

    /// True for the v2 exception sentinels.
    pub fn is_exception(self) -> bool {
        matches!(
            self,
            Self::NoSuchObject | Self::NoSuchInstance | Self::EndOfMibView
        )
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SyntaxKind {
    type Err = Box<Error>;

    /// Parse a value syntax name as written before the `:` of a literal.
    ///
    /// `Gauge32` and `Unsigned32` are accepted as aliases of `Gauge`.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Integer" | "Integer32" => Ok(Self::Integer),
            "OctetString" => Ok(Self::OctetString),
            "OID" => Ok(Self::ObjectIdentifier),
            "IpAddress" => Ok(Self::IpAddress),
            "Counter32" | "Counter" => Ok(Self::Counter32),
            "Gauge" | "Gauge32" | "Unsigned32" => Ok(Self::Gauge32),
            "TimeTicks" => Ok(Self::TimeTicks),
            "Counter64" => Ok(Self::Counter64),
            _ => Err(Error::UnknownSyntax(s.into()).boxed()),
        }
    }
}

/// Access rights of a catalog object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    #[default]
    None,
    Get,
    Set,
    GetSet,
}

impl Access {
    /// Combine `GET`/`SET` keywords.
    pub fn from_flags(get: bool, set: bool) -> Self {
        match (get, set) {
            (false, false) => Self::None,
            (true, false) => Self::Get,
            (false, true) => Self::Set,
            (true, true) => Self::GetSet,
        }
    }

    pub fn can_get(self) -> bool {
        matches!(self, Self::Get | Self::GetSet)
    }

    pub fn can_set(self) -> bool {
        matches!(self, Self::Set | Self::GetSet)
    }
}
