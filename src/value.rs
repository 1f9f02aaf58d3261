//! Values carried in variable bindings.

use crate::ber::{Decoder, EncodeBuf, tag};
use crate::error::{DecodeErrorKind, Error, Result};
use crate::oid::Oid;
use crate::syntax::SyntaxKind;
use bytes::Bytes;

/// Binding value, including the v2 exception sentinels.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Value {
    Integer(i32),
    OctetString(Bytes),
    /// Placeholder in requests and v1 responses.
    Null,
    ObjectIdentifier(Oid),
    IpAddress([u8; 4]),
    Counter32(u32),
    Gauge32(u32),
    TimeTicks(u32),
    Counter64(u64),
    NoSuchObject,
    NoSuchInstance,
    EndOfMibView,
    /// Tag this crate does not interpret (Opaque and friends).
    Unknown { tag: u8, data: Bytes },
}

impl Value {
    /// Syntax kind used for catalog lookups and rendering.
    ///
    /// ```
    /// use snmpmap::Value;
    /// use snmpmap::syntax::SyntaxKind;
    ///
    /// assert_eq!(Value::Counter32(7).syntax(), SyntaxKind::Counter32);
    /// assert_eq!(Value::EndOfMibView.syntax(), SyntaxKind::EndOfMibView);
    /// ```
    pub fn syntax(&self) -> SyntaxKind {
        match self {
            Value::Integer(_) => SyntaxKind::Integer,
            Value::OctetString(_) => SyntaxKind::OctetString,
            Value::ObjectIdentifier(_) => SyntaxKind::ObjectIdentifier,
            Value::IpAddress(_) => SyntaxKind::IpAddress,
            Value::Counter32(_) => SyntaxKind::Counter32,
            Value::Gauge32(_) => SyntaxKind::Gauge32,
            Value::TimeTicks(_) => SyntaxKind::TimeTicks,
            Value::Counter64(_) => SyntaxKind::Counter64,
            Value::NoSuchObject => SyntaxKind::NoSuchObject,
            Value::NoSuchInstance => SyntaxKind::NoSuchInstance,
            Value::EndOfMibView => SyntaxKind::EndOfMibView,
            Value::Null | Value::Unknown { .. } => SyntaxKind::Null,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::OctetString(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_oid(&self) -> Option<&Oid> {
        match self {
            Value::ObjectIdentifier(oid) => Some(oid),
            _ => None,
        }
    }

    pub fn is_exception(&self) -> bool {
        self.syntax().is_exception()
    }

    pub fn encode(&self, buf: &mut EncodeBuf) {
        match self {
            Value::Integer(v) => buf.push_integer(*v),
            Value::OctetString(data) => buf.push_octet_string(data),
            Value::Null => buf.push_null(),
            Value::ObjectIdentifier(oid) => buf.push_oid(oid),
            Value::IpAddress(addr) => buf.push_ip_address(*addr),
            Value::Counter32(v) => buf.push_unsigned32(tag::application::COUNTER32, *v),
            Value::Gauge32(v) => buf.push_unsigned32(tag::application::GAUGE32, *v),
            Value::TimeTicks(v) => buf.push_unsigned32(tag::application::TIMETICKS, *v),
            Value::Counter64(v) => buf.push_integer64(*v),
            Value::NoSuchObject => push_empty(buf, tag::context::NO_SUCH_OBJECT),
            Value::NoSuchInstance => push_empty(buf, tag::context::NO_SUCH_INSTANCE),
            Value::EndOfMibView => push_empty(buf, tag::context::END_OF_MIB_VIEW),
            Value::Unknown { tag, data } => {
                buf.push_bytes(data);
                buf.push_length(data.len());
                buf.push_tag(*tag);
            }
        }
    }

    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let tag = decoder.read_tag()?;
        let len = decoder.read_length()?;

        let value = match tag {
            tag::universal::INTEGER => Value::Integer(decoder.read_integer_value(len)?),
            tag::universal::OCTET_STRING => Value::OctetString(decoder.read_bytes(len)?),
            tag::universal::NULL => {
                if len != 0 {
                    return Err(Error::decode(decoder.offset(), DecodeErrorKind::InvalidNull));
                }
                Value::Null
            }
            tag::universal::OBJECT_IDENTIFIER => {
                Value::ObjectIdentifier(decoder.read_oid_value(len)?)
            }
            tag::application::IP_ADDRESS => {
                if len != 4 {
                    return Err(Error::decode(
                        decoder.offset(),
                        DecodeErrorKind::InvalidIpAddressLength { length: len },
                    ));
                }
                let data = decoder.read_bytes(4)?;
                Value::IpAddress([data[0], data[1], data[2], data[3]])
            }
            tag::application::COUNTER32 => Value::Counter32(decoder.read_unsigned32_value(len)?),
            tag::application::GAUGE32 => Value::Gauge32(decoder.read_unsigned32_value(len)?),
            tag::application::TIMETICKS => Value::TimeTicks(decoder.read_unsigned32_value(len)?),
            tag::application::COUNTER64 => Value::Counter64(decoder.read_integer64_value(len)?),
            tag::context::NO_SUCH_OBJECT
            | tag::context::NO_SUCH_INSTANCE
            | tag::context::END_OF_MIB_VIEW => {
                decoder.read_bytes(len)?;
                match tag {
                    tag::context::NO_SUCH_OBJECT => Value::NoSuchObject,
                    tag::context::NO_SUCH_INSTANCE => Value::NoSuchInstance,
                    _ => Value::EndOfMibView,
                }
            }
            _ => Value::Unknown {
                tag,
                data: decoder.read_bytes(len)?,
            },
        };
        Ok(value)
    }
}

fn push_empty(buf: &mut EncodeBuf, tag: u8) {
    buf.push_length(0);
    buf.push_tag(tag);
}
