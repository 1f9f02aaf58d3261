//! BER definite lengths (X.690 8.1.3). Indefinite lengths are rejected.

use crate::error::{DecodeErrorKind, Error, Result};

/// Largest content length accepted while decoding.
pub const MAX_LENGTH: usize = 0x20_0000;

/// Encode `len` for an [`EncodeBuf`](super::EncodeBuf): the returned octets
/// are in reverse order, ready to be prepended.
pub fn encode_length(len: usize) -> ([u8; 5], usize) {
    let mut buf = [0u8; 5];
    if len <= 0x7F {
        buf[0] = len as u8;
        return (buf, 1);
    }
    let mut n = 0;
    let mut rest = len;
    while rest > 0 && n < 4 {
        buf[n] = rest as u8;
        rest >>= 8;
        n += 1;
    }
    buf[n] = 0x80 | n as u8;
    (buf, n + 1)
}

/// Decode a length at the start of `data`, returning it with the number of
/// octets consumed. `base_offset` positions errors within the message.
pub fn decode_length(data: &[u8], base_offset: usize) -> Result<(usize, usize)> {
    let Some(&first) = data.first() else {
        return Err(Error::decode(base_offset, DecodeErrorKind::TruncatedData));
    };
    if first & 0x80 == 0 {
        return Ok((usize::from(first), 1));
    }
    let octets = usize::from(first & 0x7F);
    match octets {
        0 => return Err(Error::decode(base_offset, DecodeErrorKind::IndefiniteLength)),
        1..=4 => {}
        _ => return Err(Error::decode(base_offset, DecodeErrorKind::LengthTooLong { octets })),
    }
    let Some(bytes) = data.get(1..=octets) else {
        return Err(Error::decode(base_offset, DecodeErrorKind::TruncatedData));
    };
    let len = bytes.iter().fold(0usize, |acc, &b| (acc << 8) | usize::from(b));
    if len > MAX_LENGTH {
        return Err(Error::decode(
            base_offset,
            DecodeErrorKind::LengthExceedsMax {
                length: len,
                max: MAX_LENGTH,
            },
        ));
    }
    Ok((len, 1 + octets))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_and_long_form() {
        assert_eq!(decode_length(&[0], 0).unwrap(), (0, 1));
        assert_eq!(decode_length(&[127], 0).unwrap(), (127, 1));
        assert_eq!(decode_length(&[0x81, 0x80], 0).unwrap(), (128, 2));
        assert_eq!(decode_length(&[0x82, 0x01, 0x00], 0).unwrap(), (256, 3));
    }

    #[test]
    fn test_non_minimal_accepted() {
        assert_eq!(decode_length(&[0x82, 0x00, 0x05], 0).unwrap(), (5, 3));
    }

    #[test]
    fn test_rejected_lengths() {
        assert!(decode_length(&[], 0).is_err());
        assert!(decode_length(&[0x80], 0).is_err());
        assert!(decode_length(&[0x85, 1, 1, 1, 1, 1], 0).is_err());
        assert!(decode_length(&[0x82, 0x01], 0).is_err());
        assert!(decode_length(&[0x84, 0x01, 0x00, 0x00, 0x00], 0).is_err());
    }

    #[test]
    fn test_encode() {
        let (buf, n) = encode_length(5);
        assert_eq!(&buf[..n], &[5]);
        let (buf, n) = encode_length(128);
        assert_eq!(&buf[..n], &[128, 0x81]);
        let (buf, n) = encode_length(256);
        assert_eq!(&buf[..n], &[0, 1, 0x82]);
    }
}
