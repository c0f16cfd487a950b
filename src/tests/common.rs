// src/tests/common.rs

//! Common test data builders and file fixtures for _dlislib_ tests.
//!
//! Synthetic DLIS byte images are built from small composable helpers;
//! the `NTF_*` statics are those images written to temporary files.

#![allow(non_snake_case)]

use crate::common::{FPath, Ltell};
use crate::data::dlis::{
    LRSH_SIZE,
    SEGATTR_ENCRYPTED,
    SEGATTR_EXPLICIT,
    SEGATTR_PREDECESSOR,
    SEGATTR_SUCCESSOR,
    SUL_SIZE,
    VRL_MARKER,
    VRL_SIZE,
};
use crate::debug::helpers::{create_temp_file_bytes, ntf_fpath, NamedTempFile};
use crate::readers::tapeimage::{TIF_HEADER_SIZE, TIF_KIND_DATA, TIF_KIND_MARK};

extern crate lazy_static;
use lazy_static::lazy_static;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// byte image builders
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// An 80-byte Storage Unit Label: sequence number, version `"V1.00"`,
/// structure `"RECORD"`, maximum record length, then a padded identifier.
pub fn sul_bytes() -> Vec<u8> {
    let mut sul: Vec<u8> = Vec::with_capacity(SUL_SIZE);
    sul.extend_from_slice(b"   1V1.00RECORD 8192Default Storage Set");
    sul.resize(SUL_SIZE, b' ');

    sul
}

/// A Logical Record Segment Header.
pub fn lrsh_bytes(
    len: u16,
    attrs: u8,
    rtype: u8,
) -> Vec<u8> {
    let mut hdr: Vec<u8> = Vec::with_capacity(LRSH_SIZE);
    hdr.extend_from_slice(&len.to_be_bytes());
    hdr.push(attrs);
    hdr.push(rtype);

    hdr
}

/// A whole Logical Record Segment: header with the inclusive length
/// computed from `body`, then `body`.
pub fn segment(
    attrs: u8,
    rtype: u8,
    body: &[u8],
) -> Vec<u8> {
    let mut seg: Vec<u8> = lrsh_bytes((LRSH_SIZE + body.len()) as u16, attrs, rtype);
    seg.extend_from_slice(body);

    seg
}

/// An encoded `OBNAME` with a 1-byte `UVARI` origin.
pub fn obname_bytes(
    origin: u8,
    copy: u8,
    id: &str,
) -> Vec<u8> {
    assert!(origin < 0x80, "origin must fit a 1-byte UVARI");
    assert!(id.len() < 256);
    let mut name: Vec<u8> = vec![origin, copy, id.len() as u8];
    name.extend_from_slice(id.as_bytes());

    name
}

/// A Visible Record: marker `0xFF 0x01`, inclusive big-endian length,
/// then `payload`.
pub fn visible_record(payload: &[u8]) -> Vec<u8> {
    let mut vr: Vec<u8> = Vec::with_capacity(VRL_SIZE + payload.len());
    vr.extend_from_slice(&VRL_MARKER);
    vr.extend_from_slice(&((VRL_SIZE + payload.len()) as u16).to_be_bytes());
    vr.extend_from_slice(payload);

    vr
}

/// A TapeImage byte stream: one data record per payload, then a tape
/// mark.
pub fn tapeimage_wrap(payloads: &[&[u8]]) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::new();
    let mut prev: u32 = 0;
    for payload in payloads.iter() {
        let cur: usize = out.len();
        let next: usize = cur + TIF_HEADER_SIZE + payload.len();
        out.extend_from_slice(&TIF_KIND_DATA.to_le_bytes());
        out.extend_from_slice(&prev.to_le_bytes());
        out.extend_from_slice(&(next as u32).to_le_bytes());
        out.extend_from_slice(payload);
        prev = cur as u32;
    }
    let cur: usize = out.len();
    out.extend_from_slice(&TIF_KIND_MARK.to_le_bytes());
    out.extend_from_slice(&prev.to_le_bytes());
    out.extend_from_slice(&((cur + TIF_HEADER_SIZE) as u32).to_le_bytes());

    out
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// file image fixtures
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// 16-byte FILE-HEADER body filler.
pub const FH_BODY: &[u8] = b"FILE-HEADER-BODY";

/// Tell of the first record of every fixture beginning with a SUL.
pub const TELL_FIRST_LR: Ltell = SUL_SIZE as Ltell;

/// Minimal compliant file: SUL then one single-segment FILE-HEADER.
fn build_minimal_image() -> Vec<u8> {
    let mut bytes: Vec<u8> = sul_bytes();
    bytes.extend(segment(SEGATTR_EXPLICIT, 0, FH_BODY));

    bytes
}

/// 500 bytes of garbage, then the minimal file.
pub const LATE_SUL_GARBAGE: usize = 500;

fn build_late_sul_image() -> Vec<u8> {
    let mut bytes: Vec<u8> = vec![0xAA; LATE_SUL_GARBAGE];
    bytes.extend(build_minimal_image());

    bytes
}

/// FILE-HEADER, then one explicitly formatted record of three chained
/// segments.
pub const TELL_MULTISEG_LR: Ltell = TELL_FIRST_LR + 20;
/// Payload of the three-segment record of `NTF_MULTISEG`, trimmed and
/// stitched.
pub const MULTISEG_PAYLOAD: &[u8] = b"AAAABBBBCCCC";

fn multiseg_segments() -> Vec<u8> {
    let mut lrs: Vec<u8> = Vec::new();
    lrs.extend(segment(SEGATTR_EXPLICIT | SEGATTR_SUCCESSOR, 5, b"AAAA"));
    lrs.extend(segment(
        SEGATTR_EXPLICIT | SEGATTR_PREDECESSOR | SEGATTR_SUCCESSOR,
        5,
        b"BBBB",
    ));
    lrs.extend(segment(SEGATTR_EXPLICIT | SEGATTR_PREDECESSOR, 5, b"CCCC"));

    lrs
}

fn build_multiseg_image() -> Vec<u8> {
    let mut bytes: Vec<u8> = build_minimal_image();
    bytes.extend(multiseg_segments());

    bytes
}

/// Two logical files: FILE-HEADER, an explicit record, two implicit
/// records, then a second FILE-HEADER and one more implicit record.
pub const TELL_LF1_FH: Ltell = TELL_FIRST_LR;
pub const TELL_LF1_EFLR: Ltell = TELL_LF1_FH + 20;
pub const TELL_LF1_FDATA: Ltell = TELL_LF1_EFLR + 16;
pub const TELL_LF1_NOFORMAT: Ltell = TELL_LF1_FDATA + 12;
pub const TELL_LF2_FH: Ltell = TELL_LF1_NOFORMAT + 11;
pub const TELL_LF2_FDATA: Ltell = TELL_LF2_FH + 20;

fn build_two_lf_image() -> Vec<u8> {
    let mut bytes: Vec<u8> = sul_bytes();
    bytes.extend(segment(SEGATTR_EXPLICIT, 0, b"LOGICAL-FILE-ONE"));
    bytes.extend(segment(SEGATTR_EXPLICIT, 4, b"ORIGIN-DATA!"));
    let mut body: Vec<u8> = obname_bytes(1, 0, "A");
    body.extend_from_slice(&[0x01, 0x02, 0x03, 0x04]);
    bytes.extend(segment(0, 0, &body));
    let mut body: Vec<u8> = obname_bytes(1, 0, "A");
    body.extend_from_slice(b"raw");
    bytes.extend(segment(0, 1, &body));
    bytes.extend(segment(SEGATTR_EXPLICIT, 0, b"LOGICAL-FILE-TWO"));
    let mut body: Vec<u8> = obname_bytes(1, 0, "B");
    body.extend_from_slice(&[0x05, 0x06]);
    bytes.extend(segment(0, 0, &body));

    bytes
}

/// FILE-HEADER, then a segment declaring 96 bytes of body with only 50
/// present.
pub const TELL_TRUNCATED_LR: Ltell = TELL_FIRST_LR + 20;

fn build_truncated_image() -> Vec<u8> {
    let mut bytes: Vec<u8> = build_minimal_image();
    bytes.extend(lrsh_bytes(100, 0, 0));
    bytes.extend(vec![0x55; 50]);

    bytes
}

/// FILE-HEADER, then a run of implicit records exercising every
/// [`findfdata`] filter.
///
/// [`findfdata`]: crate::readers::indexreader::findfdata
pub struct FdataImage {
    pub bytes: Vec<u8>,
    /// tells of every implicit record, file order
    pub tells: Vec<Ltell>,
}

fn build_fdata_image() -> FdataImage {
    let mut bytes: Vec<u8> = build_minimal_image();
    let mut tells: Vec<Ltell> = Vec::new();

    // FDATA, object A
    tells.push(bytes.len() as Ltell);
    let mut body: Vec<u8> = obname_bytes(1, 0, "A");
    body.extend_from_slice(&[0x01, 0x02, 0x03, 0x04]);
    bytes.extend(segment(0, 0, &body));

    // FDATA, object A again
    tells.push(bytes.len() as Ltell);
    let mut body: Vec<u8> = obname_bytes(1, 0, "A");
    body.extend_from_slice(&[0x05, 0x06]);
    bytes.extend(segment(0, 0, &body));

    // NOFORMAT, object A; distinct namespace, distinct fingerprint
    tells.push(bytes.len() as Ltell);
    let mut body: Vec<u8> = obname_bytes(1, 0, "A");
    body.extend_from_slice(b"raw");
    bytes.extend(segment(0, 1, &body));

    // encrypted; excluded
    tells.push(bytes.len() as Ltell);
    let body: Vec<u8> = obname_bytes(1, 0, "A");
    bytes.extend(segment(SEGATTR_ENCRYPTED, 0, &body));

    // record type neither FDATA nor NOFORMAT; excluded
    tells.push(bytes.len() as Ltell);
    let body: Vec<u8> = obname_bytes(1, 0, "A");
    bytes.extend(segment(0, 2, &body));

    // empty; excluded
    tells.push(bytes.len() as Ltell);
    bytes.extend(segment(0, 0, b""));

    // OBNAME closes over the record end; skipped with an incident
    tells.push(bytes.len() as Ltell);
    bytes.extend(segment(0, 0, &[0x01, 0x00, 0x05, 0x41]));

    FdataImage { bytes, tells }
}

/// The multi-segment stream of `NTF_MULTISEG` wrapped in two Visible
/// Records, the second record beginning mid-segment.
pub const VR_SPLIT: usize = 30;

fn logical_file_segments() -> Vec<u8> {
    let mut lrs: Vec<u8> = segment(SEGATTR_EXPLICIT, 0, FH_BODY);
    lrs.extend(multiseg_segments());

    lrs
}

fn build_vr_image() -> Vec<u8> {
    let lrs: Vec<u8> = logical_file_segments();
    let mut bytes: Vec<u8> = sul_bytes();
    bytes.extend(visible_record(&lrs[..VR_SPLIT]));
    bytes.extend(visible_record(&lrs[VR_SPLIT..]));

    bytes
}

/// The Visible Record image wrapped again in TapeImage framing, split
/// into three data records.
fn build_tif_vr_image() -> Vec<u8> {
    let lrs: Vec<u8> = logical_file_segments();
    let sul: Vec<u8> = sul_bytes();
    let vr1: Vec<u8> = visible_record(&lrs[..VR_SPLIT]);
    let vr2: Vec<u8> = visible_record(&lrs[VR_SPLIT..]);

    tapeimage_wrap(&[&sul, &vr1, &vr2])
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// NamedTempFile fixtures
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

lazy_static! {
    pub static ref FDATA_IMAGE: FdataImage = build_fdata_image();

    pub static ref NTF_MINIMAL: NamedTempFile = create_temp_file_bytes(&build_minimal_image());
    pub static ref NTF_MINIMAL_FPATH: FPath = ntf_fpath(&NTF_MINIMAL);

    pub static ref NTF_LATE_SUL: NamedTempFile = create_temp_file_bytes(&build_late_sul_image());
    pub static ref NTF_LATE_SUL_FPATH: FPath = ntf_fpath(&NTF_LATE_SUL);

    pub static ref NTF_MULTISEG: NamedTempFile = create_temp_file_bytes(&build_multiseg_image());
    pub static ref NTF_MULTISEG_FPATH: FPath = ntf_fpath(&NTF_MULTISEG);

    pub static ref NTF_TWO_LF: NamedTempFile = create_temp_file_bytes(&build_two_lf_image());
    pub static ref NTF_TWO_LF_FPATH: FPath = ntf_fpath(&NTF_TWO_LF);

    pub static ref NTF_TRUNCATED: NamedTempFile = create_temp_file_bytes(&build_truncated_image());
    pub static ref NTF_TRUNCATED_FPATH: FPath = ntf_fpath(&NTF_TRUNCATED);

    pub static ref NTF_FDATA: NamedTempFile = create_temp_file_bytes(&FDATA_IMAGE.bytes);
    pub static ref NTF_FDATA_FPATH: FPath = ntf_fpath(&NTF_FDATA);

    pub static ref NTF_VR: NamedTempFile = create_temp_file_bytes(&build_vr_image());
    pub static ref NTF_VR_FPATH: FPath = ntf_fpath(&NTF_VR);

    pub static ref NTF_TIF_VR: NamedTempFile = create_temp_file_bytes(&build_tif_vr_image());
    pub static ref NTF_TIF_VR_FPATH: FPath = ntf_fpath(&NTF_TIF_VR);
}
