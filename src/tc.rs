//! Textual conventions: octet-string codecs and the named type registry.
//!
//! A [`TextualConvention`] tag selects how an OCTET STRING is shown to the user
//! and how user text is turned back into octets. The same codec serves values,
//! SET arguments and octet-string table index columns.
//!
//! Named types declared with `typedef` in definition files live in the
//! [`TcRegistry`], which owns their enumeration tables for the whole lifetime of
//! the mapping. Objects refer to them by [`TcId`].

use std::borrow::Cow;
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::enums::EnumTable;
use crate::error::{Error, Result};
use crate::format::hex;
use crate::syntax::SyntaxKind;

/// Octet-string rendering convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextualConvention {
    /// Text when printable, otherwise `0x` followed by hex digits.
    #[default]
    Plain,
    DisplayString,
    /// RFC 2579 DateAndTime, 8 or 11 octets.
    DateAndTime,
    PhysAddress,
    MacAddress,
    InetAddress,
    /// 2 octets priority followed by a 6 octet MAC.
    BridgeId,
    /// 1 octet priority followed by 1 octet port.
    BridgePortId,
    NtpTimeStamp,
}

impl TextualConvention {
    /// Keyword used in definition files.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Plain => "OCTETSTRING",
            Self::DisplayString => "DisplayString",
            Self::DateAndTime => "DateAndTime",
            Self::PhysAddress => "PhysAddress",
            Self::MacAddress => "MacAddress",
            Self::InetAddress => "InetAddress",
            Self::BridgeId => "BridgeId",
            Self::BridgePortId => "BridgePortId",
            Self::NtpTimeStamp => "NTPTimeStamp",
        }
    }

    /// Parse a definition file keyword.
    pub fn from_keyword(word: &str) -> Option<Self> {
        Some(match word {
            "OCTETSTRING" => Self::Plain,
            "DisplayString" => Self::DisplayString,
            "DateAndTime" => Self::DateAndTime,
            "PhysAddress" => Self::PhysAddress,
            "MacAddress" => Self::MacAddress,
            "InetAddress" => Self::InetAddress,
            "BridgeId" => Self::BridgeId,
            "BridgePortId" => Self::BridgePortId,
            "NTPTimeStamp" => Self::NtpTimeStamp,
            _ => return None,
        })
    }

    /// Render octets for display.
    ///
    /// Octets that do not fit the convention's fixed layout fall back to
    /// [`Plain`](Self::Plain) rendering.
    ///
    /// # Examples
    ///
    /// ```
    /// use snmpmap::tc::TextualConvention;
    ///
    /// let mac = [0x00, 0x1a, 0x2b, 0x3c, 0x4d, 0x5e];
    /// assert_eq!(TextualConvention::MacAddress.decode(&mac), "00:1a:2b:3c:4d:5e");
    /// assert_eq!(TextualConvention::Plain.decode(b"eth0"), "eth0");
    /// assert_eq!(TextualConvention::Plain.decode(&[0x00, 0xff]), "0x00ff");
    /// ```
    pub fn decode(self, octets: &[u8]) -> String {
        match self {
            Self::Plain => decode_plain(octets),
            Self::DisplayString => String::from_utf8_lossy(octets).into_owned(),
            Self::DateAndTime => decode_date_and_time(octets).unwrap_or_else(|| decode_plain(octets)),
            Self::PhysAddress => hex::join(octets, ':'),
            Self::MacAddress if octets.len() == 6 => hex::join(octets, ':'),
            Self::InetAddress => match octets.len() {
                4 => Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]).to_string(),
                16 => {
                    let mut raw = [0u8; 16];
                    raw.copy_from_slice(octets);
                    Ipv6Addr::from(raw).to_string()
                }
                _ => decode_plain(octets),
            },
            Self::BridgeId if octets.len() == 8 => format!(
                "{}.{}",
                u16::from_be_bytes([octets[0], octets[1]]),
                hex::join(&octets[2..], ':')
            ),
            Self::BridgePortId if octets.len() == 2 => format!("{}.{}", octets[0], octets[1]),
            Self::NtpTimeStamp if octets.len() == 8 => format!("0x{}", hex::encode(octets)),
            Self::MacAddress | Self::BridgeId | Self::BridgePortId | Self::NtpTimeStamp => {
                decode_plain(octets)
            }
        }
    }

    /// Octets as one token of an index literal.
    ///
    /// Same text as [`decode`](Self::decode), wrapped in double quotes (with
    /// inner quotes doubled) whenever the bare text would not read back as
    /// the same octets: separators, quotes, surrounding blanks, or a
    /// printable string that looks like `0x` hex.
    ///
    /// ```
    /// use snmpmap::tc::TextualConvention;
    ///
    /// assert_eq!(TextualConvention::Plain.index_token(b"eth0"), "eth0");
    /// assert_eq!(TextualConvention::Plain.index_token(b"0x41"), "\"0x41\"");
    /// assert_eq!(TextualConvention::Plain.index_token(b"a,\"b"), "\"a,\"\"b\"");
    /// assert_eq!(TextualConvention::Plain.index_token(&[0, 1]), "0x0001");
    /// ```
    pub fn index_token(self, octets: &[u8]) -> String {
        let text = self.decode(octets);
        let looks_hex = self == Self::Plain && is_printable(octets) && text.starts_with("0x");
        let needs_quotes = looks_hex
            || text.contains([',', ']', '"'])
            || text.trim() != text;
        if needs_quotes {
            format!("\"{}\"", text.replace('"', "\"\""))
        } else {
            text
        }
    }

    /// Convert user text to octets.
    ///
    /// Text in double quotes is taken literally, with `""` standing for one
    /// quote; for [`Plain`](Self::Plain) only unquoted `0x` text is hex.
    ///
    /// # Examples
    ///
    /// ```
    /// use snmpmap::tc::TextualConvention;
    ///
    /// assert_eq!(TextualConvention::Plain.encode("\"ab\"").unwrap(), b"ab");
    /// assert_eq!(TextualConvention::BridgePortId.encode("128.3").unwrap(), [128, 3]);
    /// assert!(TextualConvention::MacAddress.encode("00:11").is_err());
    /// ```
    pub fn encode(self, text: &str) -> Result<Vec<u8>> {
        let unquoted = unquote(text);
        let quoted = unquoted.is_some();
        let text = unquoted.as_deref().unwrap_or(text);
        match self {
            Self::Plain => {
                if !quoted
                    && let Some(digits) = text.strip_prefix("0x")
                    && !digits.is_empty()
                    && let Ok(bytes) = hex::decode(digits)
                {
                    return Ok(bytes);
                }
                Ok(text.as_bytes().to_vec())
            }
            Self::DisplayString => {
                if text.len() > 255 {
                    return Err(Error::invalid_value(
                        SyntaxKind::OctetString,
                        text,
                        "DisplayString longer than 255 octets",
                    ));
                }
                Ok(text.as_bytes().to_vec())
            }
            Self::DateAndTime => encode_date_and_time(text),
            Self::PhysAddress => hex::split(text, ':').map_err(|e| invalid(text, e.to_string())),
            Self::MacAddress => {
                let bytes = hex::split(text, ':').map_err(|e| invalid(text, e.to_string()))?;
                if bytes.len() != 6 {
                    return Err(invalid(text, "MAC address must have 6 octets"));
                }
                Ok(bytes)
            }
            Self::InetAddress => {
                if let Ok(v4) = text.parse::<Ipv4Addr>() {
                    Ok(v4.octets().to_vec())
                } else if let Ok(v6) = text.parse::<Ipv6Addr>() {
                    Ok(v6.octets().to_vec())
                } else {
                    Err(invalid(text, "not an IPv4 or IPv6 address"))
                }
            }
            Self::BridgeId => {
                let (prio, mac) = text
                    .split_once('.')
                    .ok_or_else(|| invalid(text, "expected <priority>.<mac>"))?;
                let prio: u16 = prio
                    .parse()
                    .map_err(|_| invalid(text, "priority must be 0..65535"))?;
                let mac = Self::MacAddress.encode(mac)?;
                let mut out = prio.to_be_bytes().to_vec();
                out.extend_from_slice(&mac);
                Ok(out)
            }
            Self::BridgePortId => {
                let (prio, port) = text
                    .split_once('.')
                    .ok_or_else(|| invalid(text, "expected <priority>.<port>"))?;
                let prio: u8 = prio
                    .parse()
                    .map_err(|_| invalid(text, "priority must be 0..255"))?;
                let port: u8 = port
                    .parse()
                    .map_err(|_| invalid(text, "port must be 0..255"))?;
                Ok(vec![prio, port])
            }
            Self::NtpTimeStamp => {
                let digits = text.strip_prefix("0x").unwrap_or(text);
                let bytes = hex::decode(digits).map_err(|e| invalid(text, e.to_string()))?;
                if bytes.len() != 8 {
                    return Err(invalid(text, "NTP timestamp must have 8 octets"));
                }
                Ok(bytes)
            }
        }
    }
}

fn invalid(text: &str, reason: impl Into<Box<str>>) -> Box<Error> {
    Error::invalid_value(SyntaxKind::OctetString, text, reason)
}

/// Inner text of a double-quoted token, `None` when not quoted.
fn unquote(text: &str) -> Option<Cow<'_, str>> {
    let inner = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))?;
    Some(if inner.contains("\"\"") {
        Cow::Owned(inner.replace("\"\"", "\""))
    } else {
        Cow::Borrowed(inner)
    })
}

fn is_printable(octets: &[u8]) -> bool {
    octets.iter().all(|&b| b.is_ascii_graphic() || b == b' ')
}

fn decode_plain(octets: &[u8]) -> String {
    if is_printable(octets) {
        // all printable ASCII, so this cannot fail
        String::from_utf8_lossy(octets).into_owned()
    } else {
        format!("0x{}", hex::encode(octets))
    }
}

fn decode_date_and_time(octets: &[u8]) -> Option<String> {
    if octets.len() != 8 && octets.len() != 11 {
        return None;
    }
    let year = u16::from_be_bytes([octets[0], octets[1]]);
    let mut out = format!(
        "{}-{}-{},{}:{}:{}.{}",
        year, octets[2], octets[3], octets[4], octets[5], octets[6], octets[7]
    );
    if octets.len() == 11 {
        let direction = match octets[8] {
            b'+' | b'-' => octets[8] as char,
            _ => return None,
        };
        out.push_str(&format!(",{}{}:{}", direction, octets[9], octets[10]));
    }
    Some(out)
}

fn encode_date_and_time(text: &str) -> Result<Vec<u8>> {
    let fail = |reason: &str| invalid(text, reason.to_string());
    let mut parts = text.splitn(3, ',');
    let date = parts.next().unwrap_or_default();
    let time = parts.next().ok_or_else(|| fail("expected Y-M-D,H:M:S.d"))?;
    let zone = parts.next();

    let date: Vec<&str> = date.split('-').collect();
    let (clock, deci) = time
        .split_once('.')
        .ok_or_else(|| fail("missing deci-seconds"))?;
    let clock: Vec<&str> = clock.split(':').collect();
    if date.len() != 3 || clock.len() != 3 {
        return Err(fail("expected Y-M-D,H:M:S.d"));
    }

    let year: u16 = date[0].parse().map_err(|_| fail("bad year"))?;
    let field = |s: &str, max: u8, what: &str| -> Result<u8> {
        match s.parse::<u8>() {
            Ok(v) if v <= max => Ok(v),
            _ => Err(fail(what)),
        }
    };
    let month = field(date[1], 12, "bad month")?;
    let day = field(date[2], 31, "bad day")?;
    if month == 0 || day == 0 {
        return Err(fail("month and day start at 1"));
    }

    let mut out = year.to_be_bytes().to_vec();
    out.extend_from_slice(&[
        month,
        day,
        field(clock[0], 23, "bad hour")?,
        field(clock[1], 59, "bad minute")?,
        field(clock[2], 60, "bad second")?,
        field(deci, 9, "bad deci-seconds")?,
    ]);

    if let Some(zone) = zone {
        let direction = match zone.as_bytes().first() {
            Some(b'+') => b'+',
            Some(b'-') => b'-',
            _ => return Err(fail("UTC offset must start with + or -")),
        };
        let (hours, minutes) = zone[1..]
            .split_once(':')
            .ok_or_else(|| fail("expected +H:M"))?;
        out.extend_from_slice(&[
            direction,
            field(hours, 13, "bad UTC hour offset")?,
            field(minutes, 59, "bad UTC minute offset")?,
        ]);
    }

    Ok(out)
}

/// Handle to a registry entry. Stable for the registry's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TcId(usize);

/// A named type from a `typedef` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    pub name: Box<str>,
    pub syntax: SyntaxKind,
    pub tc: TextualConvention,
    pub enums: Option<EnumTable>,
}

/// Owner of all named textual conventions.
#[derive(Debug, Default)]
pub struct TcRegistry {
    defs: Vec<TypeDef>,
}

impl TcRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named type.
    ///
    /// Re-declaring an identical type returns the existing id, so definition
    /// files that repeat a typedef share one table. A different type under an
    /// existing name is rejected.
    pub fn define(&mut self, def: TypeDef) -> Result<TcId> {
        if let Some(id) = self.lookup(&def.name) {
            if self.defs[id.0] == def {
                tracing::trace!(target: "snmpmap::catalog", { tc.name = %def.name }, "typedef already present");
                return Ok(id);
            }
            return Err(Error::ConflictingTypedef(def.name).boxed());
        }
        self.defs.push(def);
        Ok(TcId(self.defs.len() - 1))
    }

    pub fn lookup(&self, name: &str) -> Option<TcId> {
        self.defs
            .iter()
            .position(|d| &*d.name == name)
            .map(TcId)
    }

    pub fn get(&self, id: TcId) -> Option<&TypeDef> {
        self.defs.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TcId, &TypeDef)> {
        self.defs.iter().enumerate().map(|(i, d)| (TcId(i), d))
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_type() -> TypeDef {
        TypeDef {
            name: "RowStatus".into(),
            syntax: SyntaxKind::Integer,
            tc: TextualConvention::Plain,
            enums: Some([(1, "active"), (2, "notInService")].into_iter().collect()),
        }
    }

    #[test]
    fn test_keywords_roundtrip() {
        for tc in [
            TextualConvention::Plain,
            TextualConvention::DisplayString,
            TextualConvention::DateAndTime,
            TextualConvention::PhysAddress,
            TextualConvention::MacAddress,
            TextualConvention::InetAddress,
            TextualConvention::BridgeId,
            TextualConvention::BridgePortId,
            TextualConvention::NtpTimeStamp,
        ] {
            assert_eq!(TextualConvention::from_keyword(tc.keyword()), Some(tc));
        }
        assert_eq!(TextualConvention::from_keyword("INTEGER"), None);
    }

    #[test]
    fn test_date_and_time() {
        let tc = TextualConvention::DateAndTime;
        let octets = tc.encode("2024-1-15,13:30:15.0,+2:0").unwrap();
        assert_eq!(octets, [0x07, 0xe8, 1, 15, 13, 30, 15, 0, b'+', 2, 0]);
        assert_eq!(tc.decode(&octets), "2024-1-15,13:30:15.0,+2:0");

        let short = tc.encode("1999-12-31,23:59:59.9").unwrap();
        assert_eq!(short.len(), 8);
        assert_eq!(tc.decode(&short), "1999-12-31,23:59:59.9");

        assert!(tc.encode("2024-13-1,0:0:0.0").is_err());
        assert!(tc.encode("2024-1-1").is_err());
    }

    #[test]
    fn test_date_and_time_bad_length_falls_back() {
        assert_eq!(TextualConvention::DateAndTime.decode(b"abc"), "abc");
    }

    #[test]
    fn test_inet_address() {
        let tc = TextualConvention::InetAddress;
        assert_eq!(tc.encode("10.0.0.1").unwrap(), [10, 0, 0, 1]);
        assert_eq!(tc.decode(&[10, 0, 0, 1]), "10.0.0.1");
        let v6 = tc.encode("fe80::1").unwrap();
        assert_eq!(v6.len(), 16);
        assert_eq!(tc.decode(&v6), "fe80::1");
    }

    #[test]
    fn test_bridge_id() {
        let tc = TextualConvention::BridgeId;
        let octets = tc.encode("32768.00:11:22:33:44:55").unwrap();
        assert_eq!(octets, [0x80, 0x00, 0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
        assert_eq!(tc.decode(&octets), "32768.00:11:22:33:44:55");
    }

    #[test]
    fn test_ntp_timestamp() {
        let tc = TextualConvention::NtpTimeStamp;
        let octets = tc.encode("0x0102030405060708").unwrap();
        assert_eq!(tc.decode(&octets), "0x0102030405060708");
        assert!(tc.encode("0x01").is_err());
    }

    #[test]
    fn test_plain_hex_input() {
        let tc = TextualConvention::Plain;
        assert_eq!(tc.encode("0x00ff").unwrap(), [0x00, 0xff]);
        assert_eq!(tc.encode("0xford").unwrap(), b"0xford");
    }

    #[test]
    fn test_registry_dedup() {
        let mut registry = TcRegistry::new();
        let a = registry.define(status_type()).unwrap();
        let b = registry.define(status_type()).unwrap();
        assert_eq!(a, b);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("RowStatus"), Some(a));
        let table = registry.get(a).unwrap().enums.as_ref().unwrap();
        assert_eq!(table.label(2), Some("notInService"));
    }

    #[test]
    fn test_registry_conflict() {
        let mut registry = TcRegistry::new();
        registry.define(status_type()).unwrap();
        let mut other = status_type();
        other.enums = None;
        let err = registry.define(other).unwrap_err();
        assert!(matches!(*err, Error::ConflictingTypedef(_)));
    }
}
