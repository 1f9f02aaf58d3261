//! Object identifiers.
//!
//! An [`Oid`] keeps up to 16 sub-identifiers inline. Ordering is lexicographic
//! over the sub-identifiers, so a strict prefix sorts before every OID it
//! prefixes; the catalogs keep their buckets sorted this way.

use std::cmp::Ordering;
use std::fmt;

use smallvec::SmallVec;

use crate::error::{DecodeErrorKind, Error, OidErrorKind, Result};

/// Longest OID accepted anywhere in the crate (RFC 2578 Section 3.5).
pub const MAX_OID_LEN: usize = 128;

/// Inline capacity of a BER encoded OID body.
pub(crate) type BerOid = SmallVec<[u8; 64]>;

/// Object identifier.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Oid {
    arcs: SmallVec<[u32; 16]>,
}

impl Oid {
    pub fn empty() -> Self {
        Self::default()
    }

    /// ```
    /// use snmpmap::oid::Oid;
    ///
    /// let column = Oid::new([1, 3, 6, 1, 2, 1, 2, 2, 1].into_iter().chain([2]));
    /// assert_eq!(column.to_string(), "1.3.6.1.2.1.2.2.1.2");
    /// ```
    pub fn new(arcs: impl IntoIterator<Item = u32>) -> Self {
        Self {
            arcs: arcs.into_iter().collect(),
        }
    }

    pub fn from_slice(arcs: &[u32]) -> Self {
        Self {
            arcs: SmallVec::from_slice(arcs),
        }
    }

    /// Parse an OID from dotted-decimal notation (e.g., "1.3.6.1.2.1.1.1.0").
    ///
    /// A single leading dot is accepted. Empty components, non-digit characters,
    /// values above `u32::MAX` and more than [`MAX_OID_LEN`] components are rejected
    /// with [`Error::MalformedOid`].
    ///
    /// # Examples
    ///
    /// ```
    /// use snmpmap::oid::Oid;
    ///
    /// let oid = Oid::parse("1.3.6.1.2.1.1.1.0").unwrap();
    /// assert_eq!(oid.to_string(), "1.3.6.1.2.1.1.1.0");
    ///
    /// assert!(Oid::parse("1.3.x").is_err());
    /// assert!(Oid::parse("1.4294967296").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let body = s.strip_prefix('.').unwrap_or(s);
        if body.is_empty() {
            return Ok(Self::empty());
        }

        let mut arcs = SmallVec::new();

        for part in body.split('.') {
            if part.is_empty() {
                return Err(Error::malformed_oid(s, OidErrorKind::EmptyArc));
            }
            if !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::malformed_oid(s, OidErrorKind::InvalidArc));
            }
            let arc: u32 = part
                .parse()
                .map_err(|_| Error::malformed_oid(s, OidErrorKind::ArcOverflow))?;
            if arcs.len() == MAX_OID_LEN {
                return Err(Error::malformed_oid(s, OidErrorKind::TooManyArcs));
            }
            arcs.push(arc);
        }

        Ok(Self { arcs })
    }

    /// Get the arc values.
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    /// Number of arcs.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Check if the OID has no arcs.
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Last arc, if any.
    pub fn last(&self) -> Option<u32> {
        self.arcs.last().copied()
    }

    /// Check if this OID starts with another OID.
    ///
    /// Every OID starts with itself and with the empty OID.
    pub fn starts_with(&self, other: &Oid) -> bool {
        self.arcs.len() >= other.arcs.len() && self.arcs[..other.arcs.len()] == other.arcs[..]
    }

    /// Check if this OID is a prefix of `other` (equal OIDs included).
    ///
    /// # Examples
    ///
    /// ```
    /// use snmpmap::oid;
    ///
    /// let system = oid!(1, 3, 6, 1, 2, 1, 1);
    /// assert!(system.is_prefix_of(&oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)));
    /// assert!(!system.is_prefix_of(&oid!(1, 3, 6, 1, 2, 1, 2)));
    /// ```
    pub fn is_prefix_of(&self, other: &Oid) -> bool {
        other.starts_with(self)
    }

    /// Append one sub-identifier.
    ///
    /// Fails with [`Error::LengthExceeded`] once the OID holds [`MAX_OID_LEN`] arcs.
    pub fn push(&mut self, arc: u32) -> Result<()> {
        if self.arcs.len() >= MAX_OID_LEN {
            return Err(Error::LengthExceeded { max: MAX_OID_LEN }.boxed());
        }
        self.arcs.push(arc);
        Ok(())
    }

    /// Append several sub-identifiers, all or nothing.
    pub fn extend_from_slice(&mut self, arcs: &[u32]) -> Result<()> {
        if self.arcs.len() + arcs.len() > MAX_OID_LEN {
            return Err(Error::LengthExceeded { max: MAX_OID_LEN }.boxed());
        }
        self.arcs.extend_from_slice(arcs);
        Ok(())
    }

    /// Remove and return the last sub-identifier.
    pub fn pop(&mut self) -> Result<u32> {
        self.arcs.pop().ok_or_else(|| Error::EmptyOid.boxed())
    }

    /// Copy the arcs in `start..end` into a new OID.
    ///
    /// # Examples
    ///
    /// ```
    /// use snmpmap::oid;
    ///
    /// let row = oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 10, 3);
    /// assert_eq!(row.slice(10, 11).unwrap().arcs(), &[3]);
    /// assert!(row.slice(5, 20).is_err());
    /// ```
    pub fn slice(&self, start: usize, end: usize) -> Result<Oid> {
        if start > end || end > self.arcs.len() {
            return Err(Error::InvalidSlice {
                start,
                end,
                len: self.arcs.len(),
            }
            .boxed());
        }
        Ok(Self::from_slice(&self.arcs[start..end]))
    }

    /// OID without its last sub-identifier, `None` when empty.
    pub fn parent(&self) -> Option<Oid> {
        let (_, rest) = self.arcs.split_last()?;
        Some(Self::from_slice(rest))
    }

    /// Copy of this OID with `arc` appended.
    pub fn child(&self, arc: u32) -> Result<Oid> {
        let mut child = self.clone();
        child.push(arc)?;
        Ok(child)
    }

    /// BER content octets (X.690 8.19), without tag and length.
    ///
    /// The first two arcs share one sub-identifier, `40 * first + second`;
    /// a single-arc OID encodes as `40 * first`.
    pub fn to_ber_smallvec(&self) -> BerOid {
        let mut out = BerOid::new();
        let (head, tail) = match self.arcs.as_slice() {
            [] => return out,
            [first] => (first.saturating_mul(40), &[][..]),
            [first, second, tail @ ..] => (first.saturating_mul(40).saturating_add(*second), tail),
        };
        push_base128(&mut out, head);
        for &arc in tail {
            push_base128(&mut out, arc);
        }
        out
    }

    /// Parse BER content octets back into an OID.
    ///
    /// More than [`MAX_OID_LEN`] sub-identifiers is an error.
    pub fn from_ber(data: &[u8]) -> Result<Self> {
        let mut arcs = SmallVec::new();
        let mut pos = 0;
        while pos < data.len() {
            let (value, used) = read_base128(&data[pos..], pos)?;
            pos += used;
            if arcs.is_empty() {
                let first = (value / 40).min(2);
                arcs.push(first);
                arcs.push(value - first * 40);
            } else {
                arcs.push(value);
            }
            if arcs.len() > MAX_OID_LEN {
                return Err(Error::decode(
                    pos,
                    DecodeErrorKind::OidTooLong {
                        count: arcs.len(),
                        max: MAX_OID_LEN,
                    },
                ));
            }
        }
        Ok(Self { arcs })
    }
}

fn push_base128(out: &mut BerOid, value: u32) {
    let groups = (32 - value.leading_zeros()).div_ceil(7).max(1);
    for shift in (1..groups).rev() {
        out.push(0x80 | (value >> (shift * 7)) as u8 & 0x7f);
    }
    out.push(value as u8 & 0x7f);
}

/// One base-128 sub-identifier from the front of `data`. `offset` is only
/// used to position errors.
fn read_base128(data: &[u8], offset: usize) -> Result<(u32, usize)> {
    let mut value: u32 = 0;
    for (i, &byte) in data.iter().enumerate() {
        if value >> 25 != 0 {
            return Err(Error::decode(offset + i, DecodeErrorKind::IntegerOverflow));
        }
        value = value << 7 | u32::from(byte & 0x7f);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(Error::decode(offset + data.len(), DecodeErrorKind::TruncatedData))
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({self})")
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut arcs = self.arcs.iter();
        if let Some(first) = arcs.next() {
            write!(f, "{first}")?;
        }
        arcs.try_for_each(|arc| write!(f, ".{arc}"))
    }
}

impl std::str::FromStr for Oid {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl PartialOrd for Oid {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Oid {
    fn cmp(&self, other: &Self) -> Ordering {
        self.arcs.as_slice().cmp(other.arcs.as_slice())
    }
}

/// Build an [`Oid`] from literal sub-identifiers.
///
/// ```
/// use snmpmap::oid;
///
/// let if_descr = oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2);
/// assert_eq!(if_descr.to_string(), "1.3.6.1.2.1.2.2.1.2");
/// assert!(oid!(1, 3, 6, 1, 2, 1, 2).is_prefix_of(&if_descr));
/// ```
#[macro_export]
macro_rules! oid {
    ($($arc:expr),* $(,)?) => {
        $crate::oid::Oid::from_slice(&[$($arc),*])
    };
}
