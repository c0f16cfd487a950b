// src/readers/indexreader.rs

//! The physical-to-logical framing engine: locate the Storage Unit Label
//! and Visible Record anchors in a possibly noisy byte stream
//! ([`findsul`], [`findvrl`]), reassemble whole Logical Records from
//! their segment chains ([`extract`], [`extract_into`]), index every
//! Logical Record of a Logical File ([`findoffsets`]), and group
//! implicit records by object name ([`findfdata`]).
//!
//! All functions take the stream and the error handler as explicit
//! parameters. Non-fatal problems become one [`Incident`] each, carrying
//! physical and logical offsets; fatal problems abort the requesting call
//! with a [`DlisError`]. [`findoffsets`] and [`findfdata`] never fail;
//! they record trouble and move on, or stop at the last valid record.
//!
//! [`findsul`]: self::findsul
//! [`findvrl`]: self::findvrl
//! [`extract`]: self::extract
//! [`extract_into`]: self::extract_into
//! [`findoffsets`]: self::findoffsets
//! [`findfdata`]: self::findfdata
//! [`Incident`]: crate::common::Incident
//! [`DlisError`]: crate::common::DlisError

use crate::common::{
    Bytes,
    DlisError,
    DlisResult,
    ErrorHandler,
    ErrorSeverity,
    Ltell,
    Ptell,
};
use crate::data::dlis::{
    find_sul,
    find_vrl,
    lrsh,
    obname,
    trim_segment,
    ObName,
    PatternFind,
    SegmentTrim,
    LRSH_SIZE,
    OBNAME_SIZE_MAX,
    RECTYPE_FDATA,
    RECTYPE_FHLR,
    RECTYPE_NOFORMAT,
    SEGATTR_CHECKSUM,
    SEGATTR_ENCRYPTED,
    SEGATTR_EXPLICIT,
    SEGATTR_PADDING,
    SEGATTR_PREDECESSOR,
    SEGATTR_SUCCESSOR,
    SEGATTR_TRAILING_LENGTH,
};
use crate::data::record::{FdataMap, Record, RecordType, StreamOffsets};
use crate::readers::stream::DlisStream;

use ::more_asserts::{debug_assert_ge, debug_assert_gt};
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// anchor finders
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Read `toread` bytes ahead and search them for a SUL; returns the
/// logical tell of the label. Does not reposition the stream on success.
fn search_sul<S: DlisStream>(
    file: &mut S,
    toread: usize,
) -> DlisResult<Ltell> {
    defn!("({})", toread);
    let lfrom: Ltell = file.ltell();
    let pfrom: Ptell = file.ptell();

    let mut buffer: Bytes = vec![0; toread];
    let nread: usize = file.read(&mut buffer)?;

    match find_sul(&buffer[..nread]) {
        PatternFind::Found(offset) => {
            defx!("return Ok({})", lfrom + offset as Ltell);
            Ok(lfrom + offset as Ltell)
        }
        PatternFind::NotFound => {
            defx!("return Err(NotFound)");
            Err(DlisError::NotFound(format!(
                "searched {} bytes from tell {} (dec), but could not find storage label",
                nread, pfrom
            )))
        }
        PatternFind::Inconsistent => {
            defx!("return Err(Corrupt)");
            Err(DlisError::Corrupt(String::from(
                "found something that could be parts of a SUL, file may be corrupted",
            )))
        }
    }
}

/// Read `toread` bytes ahead and search them for a Visible Record
/// envelope; returns the logical tell of the envelope header. Does not
/// reposition the stream on success.
fn search_vrl<S: DlisStream>(
    file: &mut S,
    toread: usize,
) -> DlisResult<Ltell> {
    defn!("({})", toread);
    let lfrom: Ltell = file.ltell();
    let pfrom: Ptell = file.ptell();

    let mut buffer: Bytes = vec![0; toread];
    let nread: usize = file.read(&mut buffer)?;

    match find_vrl(&buffer[..nread]) {
        PatternFind::Found(offset) => {
            defx!("return Ok({})", lfrom + offset as Ltell);
            Ok(lfrom + offset as Ltell)
        }
        PatternFind::NotFound => {
            defx!("return Err(NotFound)");
            Err(DlisError::NotFound(format!(
                "searched {} bytes from tell {} (dec), but could not find visible record envelope pattern [0xFF 0x01]",
                nread, pfrom
            )))
        }
        PatternFind::Inconsistent => {
            defx!("return Err(Corrupt)");
            Err(DlisError::Corrupt(String::from(
                "found [0xFF 0x01] but len field not intact, file may be corrupted",
            )))
        }
    }
}

/// Seek the stream to the Storage Unit Label that begins a compliant
/// file, tolerating prefix garbage in some real files.
///
/// The stream must be positioned at the logical origin. In most cases
/// files are well-formed and the stream already is on the SUL, so the
/// fast path reads the minimum bytes required to see the needle. When
/// that fails and `expected` is set, a larger window is searched and the
/// garbage prefix reported as a [`Minor`] incident.
///
/// Fails [`NotFound`] when no SUL is within reach, [`Corrupt`] on a
/// mangled partial label.
///
/// [`Minor`]: crate::common::ErrorSeverity::Minor
/// [`NotFound`]: crate::common::DlisError::NotFound
/// [`Corrupt`]: crate::common::DlisError::Corrupt
pub fn findsul<S: DlisStream>(
    file: &mut S,
    errorhandler: &dyn ErrorHandler,
    expected: bool,
) -> DlisResult<()> {
    defn!("(expected {})", expected);
    let lfrom: Ltell = file.ltell();
    let pfrom: Ptell = file.ptell();
    debug_assert_eq!(lfrom, 0, "stream must be positioned at the logical origin");

    const MINREAD: usize = 15;
    let offset: Ltell = match search_sul(file, MINREAD) {
        Ok(offset) => {
            debug_assert_eq!(offset, lfrom);
            offset
        }
        Err(err) => {
            // Find a late SUL. For performance reasons attempt reading
            // more bytes only if a SUL is expected.
            if !expected {
                defx!("return Err({})", err);
                return Err(err);
            }
            // the maxread value comes from real files with trash before
            // the SUL
            const MAXREAD: usize = 1700;
            file.seek(lfrom)?;
            let offset: Ltell = search_sul(file, MAXREAD)?;
            debug_assert_gt!(offset, lfrom);
            errorhandler.log(
                ErrorSeverity::Minor,
                "dlis::findsul: Searching for SUL",
                "Unexpected bytes found before SUL",
                "2.3.2 Storage Unit Label (SUL): The first 80 bytes of the \
                 Visible Envelope ... constitute a Storage Unit Label.",
                "Unexpected bytes are ignored",
                &format!(
                    "SUL found at ptell {} (dec), but expected at {}",
                    pfrom + (offset - lfrom),
                    pfrom
                ),
            );
            offset
        }
    };
    file.seek(offset)?;
    defx!("seeked to tell {}", offset);

    Ok(())
}

/// Seek the stream to the next Visible Record envelope marker
/// `[0xFF 0x01]`.
///
/// Same two-phase structure as [`findsul`]: the fast path expects the
/// stream to be positioned right before a VR; the fallback searches a
/// small window and reports skipped bytes as a [`Minor`] incident. No
/// real file saved by the fallback is known, but such files might exist
/// exactly because this tolerance is in place.
///
/// [`Minor`]: crate::common::ErrorSeverity::Minor
pub fn findvrl<S: DlisStream>(
    file: &mut S,
    errorhandler: &dyn ErrorHandler,
) -> DlisResult<()> {
    defn!();
    let lfrom: Ltell = file.ltell();
    let pfrom: Ptell = file.ptell();

    const MINREAD: usize = 4;
    let offset: Ltell = match search_vrl(file, MINREAD) {
        Ok(offset) => {
            debug_assert_eq!(offset, lfrom);
            offset
        }
        Err(_err) => {
            const MAXREAD: usize = 200;
            file.seek(lfrom)?;
            let offset: Ltell = search_vrl(file, MAXREAD)?;
            debug_assert_gt!(offset, lfrom);
            errorhandler.log(
                ErrorSeverity::Minor,
                "dlis::findvrl: Searching for VR",
                "Unexpected bytes found before VR",
                "",
                "Unexpected bytes ignored",
                &format!(
                    "VR found at ptell {} (dec), but expected at {}",
                    pfrom + (offset - lfrom),
                    pfrom
                ),
            );
            offset
        }
    };
    file.seek(offset)?;
    defx!("seeked to tell {}", offset);

    Ok(())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// segment reassembly
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

// TODO: implement; interior segments should have both successor and
//       predecessor, the first only successor, the last only predecessor
fn attr_consistent(_attributes: &[u8]) -> bool {
    true
}

// TODO: implement; should be all-equal
fn type_consistent(_types: &[RecordType]) -> bool {
    true
}

/// Read one complete Logical Record starting at logical tell `tell`.
///
/// Walks the segment chain, stitching trimmed segment payloads into
/// [`Record::data`]. See [`extract_into`] for the budgeted variant.
pub fn extract<S: DlisStream>(
    file: &mut S,
    tell: Ltell,
    errorhandler: &dyn ErrorHandler,
) -> DlisResult<Record> {
    let mut rec: Record = Record::default();
    rec.data.reserve(8192);
    extract_into(file, tell, i64::MAX, &mut rec, errorhandler)?;

    Ok(rec)
}

/// Read the Logical Record starting at logical tell `tell` into `rec`,
/// stopping after roughly `bytes` bytes of payload.
///
/// The budget bounds how far the segment chain is walked: a partial body
/// is read when no trailer needs aligning against, and a finished record
/// is cut to exactly `bytes` when the last segment overshot. Always
/// holds `rec.data.len() <= bytes`.
///
/// `rec` is cleared first; reusing one `Record` across calls reuses its
/// allocation.
///
/// Fails [`Truncated`] when the stream ends inside a declared header or
/// body, [`Corrupt`] on a nonsensical segment length or trailer trim.
///
/// [`Truncated`]: crate::common::DlisError::Truncated
/// [`Corrupt`]: crate::common::DlisError::Corrupt
pub fn extract_into<S: DlisStream>(
    file: &mut S,
    tell: Ltell,
    bytes: i64,
    rec: &mut Record,
    errorhandler: &dyn ErrorHandler,
) -> DlisResult<()> {
    defn!("({}, {})", tell, bytes);
    // per-segment logs, checked for consistency just before commit;
    // nearly all records are single-segment so start small
    let mut attributes: Vec<u8> = Vec::with_capacity(4);
    let mut types: Vec<RecordType> = Vec::with_capacity(4);
    let consistent: bool = true;

    rec.data.clear();
    file.seek(tell)?;

    loop {
        let mut buffer = [0u8; LRSH_SIZE];
        let nread: usize = file.read(&mut buffer)?;
        if nread < LRSH_SIZE {
            defx!("return Err(Truncated); nread {}", nread);
            return Err(DlisError::Truncated(String::from(
                "extract: unable to read LRSH, file truncated",
            )));
        }
        let (len16, attrs, rtype) = lrsh(&buffer);
        if (len16 as usize) < LRSH_SIZE {
            defx!("return Err(Corrupt); len {}", len16);
            return Err(DlisError::Corrupt(format!(
                "extract: segment length (which is {}) shorter than its header",
                len16
            )));
        }
        let len: usize = len16 as usize - LRSH_SIZE;

        attributes.push(attrs);
        types.push(rtype);

        let prevsize: usize = rec.data.len();
        let remaining: i64 = bytes - prevsize as i64;
        debug_assert_ge!(remaining, 0);

        // If the remaining bytes-to-read is less than the full LRS, a
        // partial LRS read is fine as long as there is no padding,
        // checksum or trailing length to align against.
        const TRAILERS: u8 = SEGATTR_PADDING | SEGATTR_TRAILING_LENGTH | SEGATTR_CHECKSUM;
        let mut to_read: usize = len;
        if attrs & TRAILERS == 0 && remaining < len as i64 {
            to_read = remaining as usize;
        }

        rec.data.resize(prevsize + to_read, 0);
        let nread: usize = file.read(&mut rec.data[prevsize..])?;
        if nread < to_read {
            defx!("return Err(Truncated); nread {}, to_read {}", nread, to_read);
            return Err(DlisError::Truncated(String::from(
                "extract: unable to read LRS, file truncated",
            )));
        }

        // chop off the pad bytes, checksum and trailing length
        match trim_segment(attrs, &rec.data[prevsize..], len) {
            SegmentTrim::Trim(trim) => {
                let newlen: usize = rec.data.len() - trim;
                rec.data.truncate(newlen);
            }
            SegmentTrim::BadSize(trim) => {
                if trim as i64 - len as i64 != LRSH_SIZE as i64 {
                    defx!("return Err(Corrupt); trim {}, len {}", trim, len);
                    return Err(DlisError::Corrupt(format!(
                        "bad segment trim: trim size (which is {}) >= segment.size() (which is {})",
                        trim, len
                    )));
                }
                errorhandler.log(
                    ErrorSeverity::Minor,
                    "extract (trim_segment)",
                    "trim size (padbytes + checksum + trailing length) = \
                     logical record segment length",
                    "[from 2.2.2.1 Logical Record Segment Header (LRSH) and \
                     2.2.2.4 Logical Record Segment Trailer (LRST) situation \
                     should be impossible]",
                    "Segment is skipped",
                    "",
                );
                // The whole segment is dropped. Whether the successor
                // attribute should be erased along with it is unclear;
                // left as read. Suspecting the situation never occurs as
                // the too-many-padbytes problem might be caused by
                // encryption.
                let newlen: usize = rec.data.len() - len;
                rec.data.truncate(newlen);
            }
        }

        let has_successor: bool = attrs & SEGATTR_SUCCESSOR != 0;
        let bytes_left: i64 = bytes - rec.data.len() as i64;
        if has_successor && bytes_left > 0 {
            continue;
        }

        // The record type only cares about encryption and formatting, so
        // only keep those bits for consistency checking. Nothing else is
        // interesting to users; the rest only describes how to read
        // specific segments.
        const FMTENC: u8 = SEGATTR_EXPLICIT | SEGATTR_ENCRYPTED;
        rec.attributes = attributes[0] & FMTENC;
        rec.rtype = types[0];

        rec.consistent = consistent;
        if !attr_consistent(&attributes) {
            rec.consistent = false;
        }
        if !type_consistent(&types) {
            rec.consistent = false;
        }
        if bytes_left < 0 {
            rec.data.truncate(bytes as usize);
        }
        defx!(
            "return Ok; data len {}, type {}, consistent {}",
            rec.data.len(),
            rec.rtype,
            rec.consistent
        );
        return Ok(());
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// logical file indexing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One [`Critical`] incident for a local indexing abort, and the broken
/// record remembered.
///
/// [`Critical`]: crate::common::ErrorSeverity::Critical
fn handle_broken(
    errorhandler: &dyn ErrorHandler,
    ofs: &mut StreamOffsets,
    problem: &str,
    ptell: Ptell,
    lr_offset: Ltell,
    lrs_offset: Ltell,
) {
    errorhandler.log(
        ErrorSeverity::Critical,
        "dlis::findoffsets (indexing logical file)",
        problem,
        "",
        "Indexing is suspended at last valid Logical Record",
        &format!(
            "Physical tell: {} (dec), Logical Record tell: {} (dec), \
             Logical Record Segment tell: {} (dec)",
            ptell, lr_offset, lrs_offset
        ),
    );
    ofs.broken.push(lr_offset);
}

/// Index one Logical File in a single linear scan, partitioning every
/// Logical Record start offset into explicits, implicits, and broken.
///
/// Indexing begins wherever the caller positioned the stream. The first
/// record encountered is expected to be a FILE-HEADER; records are
/// gathered until the next FILE-HEADER, which ends the logical file. The
/// stream is then repositioned to that header, so re-invoking indexes
/// the next logical file. At the end of the last logical file the scan
/// stops cleanly at EOF and a further call returns empty lists.
///
/// Never fails: local trouble is logged [`Critical`], the current record
/// is remembered as broken, and the scan stops at the last valid record.
///
/// [`Critical`]: crate::common::ErrorSeverity::Critical
pub fn findoffsets<S: DlisStream>(
    file: &mut S,
    errorhandler: &dyn ErrorHandler,
) -> StreamOffsets {
    defn!("(ltell {})", file.ltell());
    let mut ofs: StreamOffsets = StreamOffsets::default();

    let mut lr_offset: Ltell = file.ltell();
    let mut lrs_offset: Ltell = lr_offset;

    let mut has_successor: bool = false;

    if let Err(err) = file.seek(lrs_offset) {
        handle_broken(
            errorhandler,
            &mut ofs,
            &err.to_string(),
            file.ptell(),
            lr_offset,
            lrs_offset,
        );
        defx!("return; initial seek failed");
        return ofs;
    }

    loop {
        let mut buffer = [0u8; LRSH_SIZE];
        let nread: usize = match file.read(&mut buffer) {
            Ok(val) => val,
            Err(err) => {
                handle_broken(
                    errorhandler,
                    &mut ofs,
                    &err.to_string(),
                    file.ptell(),
                    lr_offset,
                    lrs_offset,
                );
                break;
            }
        };

        // the read operation is enough to set eof correctly
        if file.eof() {
            if nread == 0 {
                if has_successor {
                    handle_broken(
                        errorhandler,
                        &mut ofs,
                        "Reached EOF, but last logical record segment expects successor",
                        file.ptell(),
                        lr_offset,
                        lrs_offset,
                    );
                }
                break;
            }
            if nread < LRSH_SIZE {
                // very unlikely; layered streams usually fail the read
                handle_broken(
                    errorhandler,
                    &mut ofs,
                    "File truncated in Logical Record Header",
                    file.ptell(),
                    lr_offset,
                    lrs_offset,
                );
                break;
            }
            // nread == LRSH_SIZE: might be the concern of the next
            // logical file; if not, it is dealt with below
        }

        let (len16, attrs, rtype) = lrsh(&buffer);
        let len: Ltell = len16 as Ltell;
        if len < LRSH_SIZE as Ltell {
            handle_broken(
                errorhandler,
                &mut ofs,
                &format!(
                    "Too short logical record. Length can't be less than 4, but was {}",
                    len
                ),
                file.ptell(),
                lr_offset,
                lrs_offset,
            );
            break;
        }

        let is_explicit: bool = attrs & SEGATTR_EXPLICIT != 0;
        let has_predecessor: bool = attrs & SEGATTR_PREDECESSOR != 0;

        if !has_predecessor
            && is_explicit
            && rtype == RECTYPE_FHLR
            && !ofs.explicits.is_empty()
        {
            // Wrap up at a FILE-HEADER that is not the first record:
            // the first record of the scan is expected to be a
            // FILE-HEADER, and records are gathered until the next one.
            if has_successor {
                handle_broken(
                    errorhandler,
                    &mut ofs,
                    "End of logical file, but last logical record segment expects successor",
                    file.ptell(),
                    lr_offset,
                    lrs_offset,
                );
                break;
            }
            // reposition so the next call starts at this logical file
            if let Err(err) = file.seek(lrs_offset) {
                handle_broken(
                    errorhandler,
                    &mut ofs,
                    &err.to_string(),
                    file.ptell(),
                    lr_offset,
                    lrs_offset,
                );
            }
            break;
        }

        has_successor = attrs & SEGATTR_SUCCESSOR != 0;
        lrs_offset += len;

        // Skip the segment by moving the cursor to the next offset.
        // A seek alone is not enough to correctly set EOF on every
        // envelope type; to make sure the segment is not truncated, read
        // its last byte instead of seeking past it.
        if let Err(err) = file.seek(lrs_offset - 1) {
            handle_broken(
                errorhandler,
                &mut ofs,
                &err.to_string(),
                file.ptell(),
                lr_offset,
                lrs_offset,
            );
            break;
        }
        let mut tmp = [0u8; 1];
        match file.read(&mut tmp) {
            Ok(1) => {}
            _ => {
                handle_broken(
                    errorhandler,
                    &mut ofs,
                    "File truncated in Logical Record Segment",
                    file.ptell(),
                    lr_offset,
                    lrs_offset,
                );
                break;
            }
        }

        if !has_successor {
            if is_explicit {
                ofs.explicits.push(lr_offset);
            } else {
                // TODO: consider doing fdata-indexing on the fly, as the
                //       cursor is at the correct offset to read the
                //       OBNAME; the file would then be traversed a
                //       single time to index it
                ofs.implicits.push(lr_offset);
            }
            lr_offset = lrs_offset;
        }
    }
    defx!(
        "return; explicits {}, implicits {}, broken {}",
        ofs.explicits.len(),
        ofs.implicits.len(),
        ofs.broken.len()
    );

    ofs
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// fdata (implicit record) indexing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One [`Critical`] incident for an implicit record that could not be
/// fdata-indexed.
///
/// [`Critical`]: crate::common::ErrorSeverity::Critical
fn handle_skipped(
    errorhandler: &dyn ErrorHandler,
    problem: &str,
    ptell: Ptell,
) {
    errorhandler.log(
        ErrorSeverity::Critical,
        "dlis::findfdata: Indexing implicit records",
        problem,
        "",
        "Record is skipped",
        &format!("Physical tell (end of the record): {} (dec)", ptell),
    );
}

/// Group implicit records by the object name they carry.
///
/// For each tell of `tells` (typically the implicits of a prior
/// [`findoffsets`] pass) the head of the record is read and its OBNAME
/// decoded. FDATA records (type 0) are grouped under their fingerprint
/// in namespace `"FRAME"`, NOFORMAT records (type 1) under namespace
/// `"NO-FORMAT"`. Encrypted records, other record types, and empty
/// records are excluded.
///
/// Never fails: a record that cannot be read or whose OBNAME does not
/// decode is logged [`Critical`] and skipped.
///
/// [`Critical`]: crate::common::ErrorSeverity::Critical
pub fn findfdata<S: DlisStream>(
    file: &mut S,
    tells: &[Ltell],
    errorhandler: &dyn ErrorHandler,
) -> FdataMap {
    defn!("({} tells)", tells.len());
    let mut xs: FdataMap = FdataMap::new();

    // scratch record reused across iterations
    let mut rec: Record = Record::default();
    rec.data.reserve(OBNAME_SIZE_MAX);

    for tell in tells.iter().copied() {
        if let Err(err) = extract_into(
            file,
            tell,
            OBNAME_SIZE_MAX as i64,
            &mut rec,
            errorhandler,
        ) {
            handle_skipped(errorhandler, &err.to_string(), file.ptell());
            continue;
        }

        if rec.is_encrypted() {
            continue;
        }
        if rec.rtype != RECTYPE_FDATA && rec.rtype != RECTYPE_NOFORMAT {
            continue;
        }
        if rec.data.is_empty() {
            continue;
        }

        let name: ObName = match obname(&rec.data) {
            Some((name, _namesz)) => name,
            None => {
                handle_skipped(
                    errorhandler,
                    "fdata record corrupted, error on reading obname",
                    file.ptell(),
                );
                continue;
            }
        };

        let fingerprint: String = match rec.rtype {
            RECTYPE_FDATA => name.fingerprint("FRAME"),
            _ => name.fingerprint("NO-FORMAT"),
        };
        defo!("tell {} fingerprint {:?}", tell, fingerprint);
        xs.entry(fingerprint)
            .or_default()
            .push(tell);
    }
    defx!("return; {} fingerprints", xs.len());

    xs
}
