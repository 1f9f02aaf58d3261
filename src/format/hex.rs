//! Hex text for octet strings: plain runs for `0x` values, separated
//! groups for MAC and physical addresses.

use std::fmt;

/// Lowercase hex digits, no separators.
///
/// ```
/// use snmpmap::format::hex::encode;
///
/// assert_eq!(encode(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
/// assert_eq!(encode(&[0x00, 0xff]), "00ff");
/// ```
pub fn encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Encode bytes as two-digit hex groups joined by `sep`.
///
/// ```
/// use snmpmap::format::hex::join;
///
/// assert_eq!(join(&[0x00, 0x1a, 0xff], ':'), "00:1a:ff");
/// assert_eq!(join(&[], ':'), "");
/// ```
pub fn join(bytes: &[u8], sep: char) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(sep);
        }
        out.push_str(&format!("{b:02x}"));
    }
    out
}

/// Decode a contiguous hex string to bytes.
///
/// ```
/// use snmpmap::format::hex::decode;
///
/// assert_eq!(decode("deadbeef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
/// assert!(decode("abc").is_err()); // odd length
/// ```
pub fn decode(s: &str) -> Result<Vec<u8>, DecodeError> {
    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(DecodeError::InvalidChar);
    }
    if !s.len().is_multiple_of(2) {
        return Err(DecodeError::OddLength);
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).map_err(|_| DecodeError::InvalidChar))
        .collect()
}

/// Decode hex groups separated by `sep`, each group one or two digits.
///
/// ```
/// use snmpmap::format::hex::split;
///
/// assert_eq!(split("0:1a:ff", ':').unwrap(), vec![0x00, 0x1a, 0xff]);
/// assert!(split("0::1", ':').is_err());
/// ```
pub fn split(s: &str, sep: char) -> Result<Vec<u8>, DecodeError> {
    s.split(sep)
        .map(|group| {
            if group.is_empty() || group.len() > 2 || !group.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(DecodeError::InvalidChar);
            }
            u8::from_str_radix(group, 16).map_err(|_| DecodeError::InvalidChar)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    OddLength,
    /// Non-hex character, or a group that is empty or longer than two digits.
    InvalidChar,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OddLength => write!(f, "odd number of hex digits"),
            Self::InvalidChar => write!(f, "invalid hex digit"),
        }
    }
}

/// Hex view of a byte slice, formatted on display. Used for trace logging
/// of datagrams.
pub struct Bytes<'a>(pub &'a [u8]);

impl fmt::Debug for Bytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl fmt::Display for Bytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_view_matches_encode() {
        let datagram = [0x30, 0x26, 0x02, 0x01, 0x01];
        assert_eq!(Bytes(&datagram).to_string(), encode(&datagram));
        assert_eq!(format!("{:?}", Bytes(&[])), "");
    }

    #[test]
    fn test_decode_mixed_case() {
        assert_eq!(decode("DeAdBeEf").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(decode("123"), Err(DecodeError::OddLength));
        assert_eq!(decode("gg"), Err(DecodeError::InvalidChar));
        assert_eq!(decode("é0"), Err(DecodeError::InvalidChar));
    }

    #[test]
    fn test_join_split_roundtrip() {
        let mac = [0x00, 0x11, 0x22, 0xaa, 0xbb, 0xff];
        let text = join(&mac, ':');
        assert_eq!(text, "00:11:22:aa:bb:ff");
        assert_eq!(split(&text, ':').unwrap(), mac);
    }

    #[test]
    fn test_split_rejects_long_group() {
        assert_eq!(split("123:4", ':'), Err(DecodeError::InvalidChar));
    }
}
