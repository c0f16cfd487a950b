// src/data/dlis.rs

//! Primitive byte-to-value codecs of the DLIS binary grammar: the Logical
//! Record Segment Header, the Storage Unit Label and Visible Record
//! search patterns, segment-trim arithmetic, and the representation-code
//! decoders needed to read an object name (`UVARI`, `USHORT`, `IDENT`,
//! `OBNAME`).
//!
//! All functions here are pure; they never touch a stream.

use ::more_asserts::debug_assert_ge;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Logical Record Segment Header
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Size in bytes of a Logical Record Segment Header (LRSH).
pub const LRSH_SIZE: usize = 4;

/// Size in bytes of a Storage Unit Label (SUL).
pub const SUL_SIZE: usize = 80;

/// Record type of a FILE-HEADER explicitly formatted logical record.
/// A logical file begins at a FILE-HEADER.
pub const RECTYPE_FHLR: u8 = 0;

/// Record type of a FDATA (frame data) indirectly formatted logical
/// record.
pub const RECTYPE_FDATA: u8 = 0;

/// Record type of a NOFORMAT (unformatted data) indirectly formatted
/// logical record.
pub const RECTYPE_NOFORMAT: u8 = 1;

/// Segment attribute bit: record is explicitly formatted (an EFLR);
/// unset means indirectly formatted (an IFLR).
pub const SEGATTR_EXPLICIT: u8 = 1 << 7;
/// Segment attribute bit: segment continues a prior segment.
pub const SEGATTR_PREDECESSOR: u8 = 1 << 6;
/// Segment attribute bit: segment is continued by another segment.
pub const SEGATTR_SUCCESSOR: u8 = 1 << 5;
/// Segment attribute bit: record is encrypted.
pub const SEGATTR_ENCRYPTED: u8 = 1 << 4;
/// Segment attribute bit: an encryption packet is present.
pub const SEGATTR_ENCRYPT_PACKET: u8 = 1 << 3;
/// Segment attribute bit: a 2-byte checksum trails the segment body.
pub const SEGATTR_CHECKSUM: u8 = 1 << 2;
/// Segment attribute bit: a 2-byte copy of the segment length trails the
/// segment body.
pub const SEGATTR_TRAILING_LENGTH: u8 = 1 << 1;
/// Segment attribute bit: pad bytes trail the segment body; the last pad
/// byte holds the pad count.
pub const SEGATTR_PADDING: u8 = 1 << 0;

/// Decode a Logical Record Segment Header.
///
/// Layout is 4 bytes: `length:u16_be, attributes:u8, type:u8`.
/// `length` is inclusive of the header itself.
pub fn lrsh(buf: &[u8; LRSH_SIZE]) -> (u16, u8, u8) {
    let len: u16 = u16::from_be_bytes([buf[0], buf[1]]);

    (len, buf[2], buf[3])
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// anchor pattern searches
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Result of an anchor pattern search over a buffer;
/// for [`find_sul`] and [`find_vrl`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PatternFind {
    /// Pattern located; contains the byte offset of the anchor start
    /// within the searched buffer.
    Found(usize),
    /// Search exhausted the buffer without locating the pattern.
    NotFound,
    /// Parts of the pattern were located but the whole does not fit;
    /// the file may be corrupted.
    Inconsistent,
}

/// ASCII needle within a SUL; the storage set structure field.
const SUL_NEEDLE: &[u8] = b"RECORD";

/// Count of bytes preceding the structure field of a SUL:
/// 4-byte sequence number then 5-byte version `"V1.00"`.
const SUL_STRUCTURE_OFFSET: usize = 9;

/// Search `buf` for the start of a Storage Unit Label.
///
/// The SUL has no magic marker of its own; the structure field `"RECORD"`
/// is the needle, and the label starts [`SUL_STRUCTURE_OFFSET`] bytes
/// before it. A needle with fewer preceding bytes than that is
/// [`PatternFind::Inconsistent`].
pub fn find_sul(buf: &[u8]) -> PatternFind {
    let pos: usize = match buf
        .windows(SUL_NEEDLE.len())
        .position(|window| window == SUL_NEEDLE)
    {
        Some(pos) => pos,
        None => return PatternFind::NotFound,
    };
    if pos < SUL_STRUCTURE_OFFSET {
        return PatternFind::Inconsistent;
    }

    PatternFind::Found(pos - SUL_STRUCTURE_OFFSET)
}

/// Size in bytes of a Visible Record envelope header:
/// marker `0xFF 0x01` then a big-endian `u16` length.
pub const VRL_SIZE: usize = 4;

/// Visible Record envelope marker.
pub const VRL_MARKER: [u8; 2] = [0xFF, 0x01];

/// Search `buf` for a Visible Record envelope header.
///
/// A Visible Record has no intrinsic check; it begins with the marker
/// `0xFF 0x01` followed by a 2-byte big-endian length. A marker whose
/// length field does not fit within `buf` is
/// [`PatternFind::Inconsistent`].
pub fn find_vrl(buf: &[u8]) -> PatternFind {
    let pos: usize = match buf
        .windows(VRL_MARKER.len())
        .position(|window| window == VRL_MARKER)
    {
        Some(pos) => pos,
        None => return PatternFind::NotFound,
    };
    if pos + VRL_SIZE > buf.len() {
        return PatternFind::Inconsistent;
    }

    PatternFind::Found(pos)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// segment trailer trim
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Result of [`trim_segment`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SegmentTrim {
    /// Count of trailer bytes to remove from the end of the segment body.
    Trim(usize),
    /// The declared trailer is larger than the segment body; contains the
    /// computed trim count.
    BadSize(usize),
}

/// Compute the count of trailer bytes (pad bytes, checksum, trailing
/// length) to remove from the end of a segment body.
///
/// `body` is the segment body as read; `body_len` its declared length.
/// The pad count is stored in the last pad byte, which sits immediately
/// before the checksum and trailing length.
///
/// The checksum and trailing-length values themselves are not verified.
// TODO: verify integrity by checking the trailing length
// TODO: calculate the checksum
pub fn trim_segment(
    attrs: u8,
    body: &[u8],
    body_len: usize,
) -> SegmentTrim {
    let mut trim: usize = 0;
    if attrs & SEGATTR_TRAILING_LENGTH != 0 {
        trim += 2;
    }
    if attrs & SEGATTR_CHECKSUM != 0 {
        trim += 2;
    }
    if attrs & SEGATTR_PADDING != 0 {
        // a partial body read only happens when no trailer bits are set
        debug_assert_ge!(body.len(), body_len);
        if trim + 1 > body_len {
            // the pad count byte would sit before the segment start
            return SegmentTrim::BadSize(trim);
        }
        let pad: usize = body[body_len - trim - 1] as usize;
        trim += pad;
    }
    if trim > body_len {
        return SegmentTrim::BadSize(trim);
    }

    SegmentTrim::Trim(trim)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// representation-code decoders for OBNAME
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Upper bound in bytes of an encoded `OBNAME`:
/// a 4-byte `UVARI` origin, a 1-byte `USHORT` copy number, and an `IDENT`
/// of up to 1 + 255 bytes, with headroom.
pub const OBNAME_SIZE_MAX: usize = 262;

/// Decode a `UVARI`, the 1/2/4-byte variable-length unsigned integer.
///
/// The two high bits of the first byte select the width:
/// `0x` is a 1-byte value, `10` a 2-byte value, `11` a 4-byte value.
/// Returns the value and the count of bytes consumed, or `None` when the
/// encoding extends past the end of `buf`.
pub fn uvari(buf: &[u8]) -> Option<(i32, usize)> {
    let b0: u8 = *buf.first()?;
    match b0 >> 6 {
        0b00 | 0b01 => Some((b0 as i32, 1)),
        0b10 => {
            let b1: u8 = *buf.get(1)?;
            let val: i32 = (((b0 & 0x3F) as i32) << 8) | (b1 as i32);

            Some((val, 2))
        }
        _ => {
            if buf.len() < 4 {
                return None;
            }
            let val: i32 = (((b0 & 0x3F) as i32) << 24)
                | ((buf[1] as i32) << 16)
                | ((buf[2] as i32) << 8)
                | (buf[3] as i32);

            Some((val, 4))
        }
    }
}

/// Decode a `USHORT`, a 1-byte unsigned integer.
pub fn ushort(buf: &[u8]) -> Option<(u8, usize)> {
    let b0: u8 = *buf.first()?;

    Some((b0, 1))
}

/// Decode an `IDENT`: a 1-byte length then that many bytes of identifier.
///
/// Identifiers are nominally ASCII; anything else is replaced, not
/// rejected.
pub fn ident(buf: &[u8]) -> Option<(String, usize)> {
    let len: usize = *buf.first()? as usize;
    let id: &[u8] = buf.get(1..1 + len)?;

    Some((String::from_utf8_lossy(id).into_owned(), 1 + len))
}

/// An object name: the composite identifier
/// `(origin, copy number, identifier)` that names an object within a
/// logical file.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct ObName {
    pub origin: i32,
    pub copy: u8,
    pub id: String,
}

impl ObName {
    /// Deterministic string key for this object name under namespace tag
    /// `kind`; e.g. `"T.FRAME-I.DEPTH-O.1-C.0"`.
    ///
    /// Distinct object names yield distinct fingerprints within one
    /// logical file, and the same name under different namespace tags
    /// yields distinct fingerprints.
    pub fn fingerprint(
        &self,
        kind: &str,
    ) -> String {
        format!("T.{}-I.{}-O.{}-C.{}", kind, self.id, self.origin, self.copy)
    }
}

/// Decode an `OBNAME`: `origin:UVARI, copy:USHORT, ident:IDENT`.
///
/// Returns the name and the count of bytes consumed, or `None` when the
/// encoding extends past the end of `buf`.
pub fn obname(buf: &[u8]) -> Option<(ObName, usize)> {
    let (origin, n_origin) = uvari(buf)?;
    let (copy, n_copy) = ushort(&buf[n_origin..])?;
    let (id, n_id) = ident(&buf[n_origin + n_copy..])?;

    Some((
        ObName { origin, copy, id },
        n_origin + n_copy + n_id,
    ))
}
