// src/data/record.rs

//! Implement [`Record`] and [`StreamOffsets`], the data containers
//! produced by reading a logical file.
//!
//! [`Record`]: self::Record
//! [`StreamOffsets`]: self::StreamOffsets

use std::collections::BTreeMap;

use crate::common::{Bytes, Ltell};
use crate::data::dlis::{SEGATTR_ENCRYPTED, SEGATTR_EXPLICIT};

/// Record type from the first segment's LRSH.
pub type RecordType = u8;

/// A reassembled Logical Record.
///
/// Produced by [`extract`]: the concatenated payloads of all constituent
/// segments with per-segment trailers removed.
///
/// [`extract`]: crate::readers::indexreader::extract
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Record {
    /// Concatenated segment payloads, trailers trimmed.
    pub data: Bytes,
    /// Record type, from the first segment.
    pub rtype: RecordType,
    /// Only the explicitly-formatted and encrypted bits, from the first
    /// segment. Nothing else in the attributes describes the record;
    /// the rest only describe how to read a specific segment.
    pub attributes: u8,
    /// `false` when constituent segments disagreed on formatting or
    /// encryption, or on successor/predecessor chaining.
    /// Disagreement does not abort reassembly.
    pub consistent: bool,
}

impl Record {
    /// Is this record an explicitly formatted logical record (EFLR)?
    /// Otherwise it is an indirectly formatted logical record (IFLR).
    pub fn is_explicit(&self) -> bool {
        self.attributes & SEGATTR_EXPLICIT != 0
    }

    /// Is this record encrypted?
    pub fn is_encrypted(&self) -> bool {
        self.attributes & SEGATTR_ENCRYPTED != 0
    }
}

/// Start offsets of every Logical Record in one logical file, partitioned
/// by indexing outcome. Each list is in file order.
///
/// Produced by [`findoffsets`].
///
/// [`findoffsets`]: crate::readers::indexreader::findoffsets
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StreamOffsets {
    /// Start offsets of explicitly formatted logical records (metadata).
    pub explicits: Vec<Ltell>,
    /// Start offsets of indirectly formatted logical records (bulk data).
    pub implicits: Vec<Ltell>,
    /// Start offsets of records where indexing aborted locally.
    pub broken: Vec<Ltell>,
}

/// Map of object-name fingerprint to the start offsets of the implicit
/// records carrying that name, in file order.
///
/// Produced by [`findfdata`].
///
/// [`findfdata`]: crate::readers::indexreader::findfdata
pub type FdataMap = BTreeMap<String, Vec<Ltell>>;
