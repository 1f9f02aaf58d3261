//! Minimal BER codec for community-based SNMP messages.
//!
//! Encoding builds the message back to front in an [`EncodeBuf`], so the
//! length of a constructed value is known when its header is written.
//! Decoding reads from a shared [`bytes::Bytes`] buffer without copying.

mod decode;
mod length;

pub use decode::Decoder;
pub use length::{MAX_LENGTH, decode_length, encode_length};

use crate::oid::Oid;
use bytes::Bytes;

/// Tag bytes used by SNMP.
pub mod tag {
    pub mod universal {
        pub const INTEGER: u8 = 0x02;
        pub const OCTET_STRING: u8 = 0x04;
        pub const NULL: u8 = 0x05;
        pub const OBJECT_IDENTIFIER: u8 = 0x06;
        pub const SEQUENCE: u8 = 0x30;
    }

    pub mod application {
        pub const IP_ADDRESS: u8 = 0x40;
        pub const COUNTER32: u8 = 0x41;
        pub const GAUGE32: u8 = 0x42;
        pub const TIMETICKS: u8 = 0x43;
        pub const OPAQUE: u8 = 0x44;
        pub const COUNTER64: u8 = 0x46;
    }

    pub mod context {
        pub const NO_SUCH_OBJECT: u8 = 0x80;
        pub const NO_SUCH_INSTANCE: u8 = 0x81;
        pub const END_OF_MIB_VIEW: u8 = 0x82;
    }

    pub mod pdu {
        pub const GET_REQUEST: u8 = 0xA0;
        pub const GET_NEXT_REQUEST: u8 = 0xA1;
        pub const RESPONSE: u8 = 0xA2;
        pub const SET_REQUEST: u8 = 0xA3;
        pub const GET_BULK_REQUEST: u8 = 0xA5;
    }
}

/// Reverse-order encode buffer.
///
/// Every `push_*` call prepends, so values are pushed last field first.
#[derive(Debug, Default)]
pub struct EncodeBuf {
    buf: Vec<u8>,
}

impl EncodeBuf {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn push_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Prepend raw content bytes.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend(bytes.iter().rev());
    }

    pub fn push_tag(&mut self, tag: u8) {
        self.push_byte(tag);
    }

    pub fn push_length(&mut self, len: usize) {
        let (bytes, n) = encode_length(len);
        self.buf.extend_from_slice(&bytes[..n]);
    }

    /// Prepend a constructed value whose content is written by `f`.
    pub fn push_constructed(&mut self, tag: u8, f: impl FnOnce(&mut Self)) {
        let start = self.len();
        f(self);
        let len = self.len() - start;
        self.push_length(len);
        self.push_tag(tag);
    }

    pub fn push_sequence(&mut self, f: impl FnOnce(&mut Self)) {
        self.push_constructed(tag::universal::SEQUENCE, f);
    }

    pub fn push_integer(&mut self, value: i32) {
        let bytes = value.to_be_bytes();
        // drop redundant sign octets
        let mut skip = 0;
        while skip < 3 {
            let (b, next) = (bytes[skip], bytes[skip + 1]);
            if (b == 0x00 && next & 0x80 == 0) || (b == 0xFF && next & 0x80 != 0) {
                skip += 1;
            } else {
                break;
            }
        }
        self.push_bytes(&bytes[skip..]);
        self.push_length(4 - skip);
        self.push_tag(tag::universal::INTEGER);
    }

    /// Unsigned 32-bit value with an application tag.
    pub fn push_unsigned32(&mut self, tag: u8, value: u32) {
        self.push_unsigned(tag, u64::from(value));
    }

    pub fn push_integer64(&mut self, value: u64) {
        self.push_unsigned(tag::application::COUNTER64, value);
    }

    fn push_unsigned(&mut self, tag: u8, value: u64) {
        let bytes = value.to_be_bytes();
        let first = bytes.iter().position(|&b| b != 0).unwrap_or(7);
        let content = &bytes[first..];
        let pad = content[0] & 0x80 != 0;
        self.push_bytes(content);
        if pad {
            self.push_byte(0);
        }
        self.push_length(content.len() + usize::from(pad));
        self.push_tag(tag);
    }

    pub fn push_octet_string(&mut self, data: &[u8]) {
        self.push_bytes(data);
        self.push_length(data.len());
        self.push_tag(tag::universal::OCTET_STRING);
    }

    pub fn push_null(&mut self) {
        self.push_length(0);
        self.push_tag(tag::universal::NULL);
    }

    pub fn push_oid(&mut self, oid: &Oid) {
        let ber = oid.to_ber_smallvec();
        self.push_bytes(&ber);
        self.push_length(ber.len());
        self.push_tag(tag::universal::OBJECT_IDENTIFIER);
    }

    pub fn push_ip_address(&mut self, addr: [u8; 4]) {
        self.push_bytes(&addr);
        self.push_length(4);
        self.push_tag(tag::application::IP_ADDRESS);
    }

    /// Finish encoding, returning the bytes in wire order.
    pub fn finish(mut self) -> Bytes {
        self.buf.reverse();
        Bytes::from(self.buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    fn encoded(f: impl FnOnce(&mut EncodeBuf)) -> Vec<u8> {
        let mut buf = EncodeBuf::new();
        f(&mut buf);
        buf.finish().to_vec()
    }

    #[test]
    fn test_encode_integer() {
        assert_eq!(encoded(|b| b.push_integer(0)), [0x02, 0x01, 0x00]);
        assert_eq!(encoded(|b| b.push_integer(127)), [0x02, 0x01, 0x7F]);
        assert_eq!(encoded(|b| b.push_integer(128)), [0x02, 0x02, 0x00, 0x80]);
        assert_eq!(encoded(|b| b.push_integer(-1)), [0x02, 0x01, 0xFF]);
        assert_eq!(encoded(|b| b.push_integer(-129)), [0x02, 0x02, 0xFF, 0x7F]);
    }

    #[test]
    fn test_encode_unsigned() {
        assert_eq!(
            encoded(|b| b.push_unsigned32(tag::application::COUNTER32, 0)),
            [0x41, 0x01, 0x00]
        );
        assert_eq!(
            encoded(|b| b.push_unsigned32(tag::application::GAUGE32, u32::MAX)),
            [0x42, 0x05, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]
        );
        assert_eq!(
            encoded(|b| b.push_integer64(1 << 32)),
            [0x46, 0x05, 0x01, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test_encode_sequence() {
        let bytes = encoded(|b| {
            b.push_sequence(|b| {
                b.push_null();
                b.push_oid(&oid!(1, 3, 6, 1));
            })
        });
        assert_eq!(bytes, [0x30, 0x07, 0x06, 0x03, 0x2B, 0x06, 0x01, 0x05, 0x00]);
    }

    #[test]
    fn test_encode_decode_octet_string() {
        let bytes = encoded(|b| b.push_octet_string(b"public"));
        let mut dec = Decoder::new(Bytes::from(bytes));
        assert_eq!(&dec.read_octet_string().unwrap()[..], b"public");
        assert!(dec.is_empty());
    }
}
