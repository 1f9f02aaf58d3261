//! Community-based messages (v1 and v2c).
//!
//! Both versions share `SEQUENCE { version INTEGER, community OCTET STRING, pdu }`
//! and differ only in the version number.

mod community;

pub use community::CommunityMessage;

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Protocol version carried in the message header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Version {
    V1,
    #[default]
    V2c,
}

impl Version {
    pub fn as_i32(self) -> i32 {
        match self {
            Version::V1 => 0,
            Version::V2c => 1,
        }
    }

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Version::V1),
            1 => Some(Version::V2c),
            _ => None,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Version::V1 => "1",
            Version::V2c => "2",
        })
    }
}

impl FromStr for Version {
    type Err = Box<Error>;

    /// `1` or `2`, as given to `-v`.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "1" => Ok(Version::V1),
            "2" | "2c" => Ok(Version::V2c),
            other => Err(Error::usage(format!("unsupported SNMP version '{other}'"))),
        }
    }
}
