// src/readers/tapeimage.rs

//! Implement [`TapeImageStream`], the stream adapter that removes
//! TapeImage (TIF) framing.
//!
//! A TIF record is a 12-byte little-endian header
//! `kind:u32, prev:u32, next:u32` followed by payload up to offset
//! `next`. `kind` 0 is a data record; `kind` 1 is a tape mark, the end of
//! the taped stream. The logical byte sequence of a [`TapeImageStream`]
//! is the concatenation of all data-record payloads before the first
//! tape mark.
//!
//! Like [`Rp66Stream`], records are discovered lazily and remembered for
//! backward seeks.
//!
//! [`TapeImageStream`]: self::TapeImageStream
//! [`Rp66Stream`]: crate::readers::rp66::Rp66Stream

use crate::common::{DlisError, DlisResult, Ltell, Ptell};
use crate::readers::stream::DlisStream;

use std::fmt;

use ::more_asserts::debug_assert_gt;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Size in bytes of a TapeImage record header.
pub const TIF_HEADER_SIZE: usize = 12;

/// TapeImage record kind: data.
pub const TIF_KIND_DATA: u32 = 0;

/// TapeImage record kind: tape mark; end of the taped stream.
pub const TIF_KIND_MARK: u32 = 1;

/// One discovered TapeImage data record.
#[derive(Clone, Copy, Debug)]
struct TapeRecord {
    /// logical offset of the first payload byte
    lstart: Ltell,
    /// inner-stream logical offset of the first payload byte
    inner_start: Ltell,
    /// payload length; header removed
    len: Ltell,
}

/// Stream adapter removing TapeImage framing from an inner
/// [`DlisStream`].
pub struct TapeImageStream<S: DlisStream> {
    inner: S,
    /// data records discovered so far, ascending `lstart`
    records: Vec<TapeRecord>,
    /// inner-stream offset of the next undiscovered record header
    next_header: Ltell,
    /// logical size of all discovered records
    logical_end: Ltell,
    /// a tape mark was read, or the inner stream ended cleanly
    complete: bool,
    /// logical cursor
    pos: Ltell,
    eof: bool,
}

impl<S: DlisStream> fmt::Debug for TapeImageStream<S> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("TapeImageStream")
            .field("records", &self.records.len())
            .field("next_header", &self.next_header)
            .field("logical_end", &self.logical_end)
            .field("complete", &self.complete)
            .field("pos", &self.pos)
            .field("eof", &self.eof)
            .finish()
    }
}

/// Wrap `inner` in a [`TapeImageStream`], removing one layer of TIF
/// framing starting at the inner stream's current position.
///
/// Opening on an exhausted stream fails with [`DlisError::Eof`].
pub fn open_tapeimage<S: DlisStream>(inner: S) -> DlisResult<TapeImageStream<S>> {
    defñ!("(inner ltell {})", inner.ltell());
    if inner.eof() {
        return Err(DlisError::Eof(String::from(
            "cannot open tapeimage past eof",
        )));
    }
    let next_header: Ltell = inner.ltell();

    Ok(TapeImageStream {
        inner,
        records: Vec::new(),
        next_header,
        logical_end: 0,
        complete: false,
        pos: 0,
        eof: false,
    })
}

impl<S: DlisStream> TapeImageStream<S> {
    /// Read the next undiscovered record header. A tape mark or a clean
    /// end of the inner stream sets `complete`.
    fn discover_next(&mut self) -> DlisResult<()> {
        defn!("next_header {}", self.next_header);
        self.inner.seek(self.next_header)?;
        let mut hdr = [0u8; TIF_HEADER_SIZE];
        let nread: usize = self.inner.read(&mut hdr)?;
        if nread == 0 {
            defx!("complete; no tape mark");
            self.complete = true;
            return Ok(());
        }
        if nread < TIF_HEADER_SIZE {
            defx!("return Err; nread {}", nread);
            return Err(DlisError::Io(format!(
                "truncated tapeimage header at tell {} (dec)",
                self.next_header
            )));
        }
        let kind: u32 = u32::from_le_bytes([hdr[0], hdr[1], hdr[2], hdr[3]]);
        let next: Ltell = u32::from_le_bytes([hdr[8], hdr[9], hdr[10], hdr[11]]) as Ltell;
        match kind {
            TIF_KIND_MARK => {
                defx!("complete; tape mark");
                self.complete = true;
            }
            TIF_KIND_DATA => {
                let payload_start: Ltell = self.next_header + TIF_HEADER_SIZE as Ltell;
                if next < payload_start {
                    defx!("return Err; next {}", next);
                    return Err(DlisError::Io(format!(
                        "broken tapeimage header at tell {} (dec): next record at {}",
                        self.next_header, next
                    )));
                }
                self.records.push(TapeRecord {
                    lstart: self.logical_end,
                    inner_start: payload_start,
                    len: next - payload_start,
                });
                self.logical_end += next - payload_start;
                self.next_header = next;
                defx!(
                    "records {}, logical_end {}",
                    self.records.len(),
                    self.logical_end
                );
            }
            _ => {
                defx!("return Err; kind {}", kind);
                return Err(DlisError::Io(format!(
                    "unknown tapeimage record type {} at tell {} (dec)",
                    kind, self.next_header
                )));
            }
        }

        Ok(())
    }

    /// Map logical offset `pos` to the inner-stream offset of that byte
    /// and the count of payload bytes remaining in its record. `None`
    /// when `pos` is at or past the end of the taped stream.
    fn locate(
        &mut self,
        pos: Ltell,
    ) -> DlisResult<Option<(Ltell, usize)>> {
        while !self.complete && pos >= self.logical_end {
            self.discover_next()?;
        }
        if pos >= self.logical_end {
            return Ok(None);
        }
        let idx: usize = self
            .records
            .partition_point(|rec| rec.lstart <= pos)
            - 1;
        let rec: &TapeRecord = &self.records[idx];
        let delta: Ltell = pos - rec.lstart;
        let avail: usize = (rec.len - delta) as usize;
        debug_assert_gt!(avail, 0);

        Ok(Some((rec.inner_start + delta, avail)))
    }
}

impl<S: DlisStream> DlisStream for TapeImageStream<S> {
    fn read(
        &mut self,
        buf: &mut [u8],
    ) -> DlisResult<usize> {
        defn!("(buf len {}) pos {}", buf.len(), self.pos);
        let mut total: usize = 0;
        while total < buf.len() {
            let (inner_off, avail) = match self.locate(self.pos)? {
                Some(val) => val,
                None => {
                    self.eof = true;
                    break;
                }
            };
            self.inner.seek(inner_off)?;
            let want: usize = (buf.len() - total).min(avail);
            let nread: usize = self
                .inner
                .read(&mut buf[total..total + want])?;
            total += nread;
            self.pos += nread as Ltell;
            if nread < want {
                // truncation inside a declared payload
                self.eof = true;
                break;
            }
        }
        defx!("return {}, eof {}", total, self.eof);

        Ok(total)
    }

    fn seek(
        &mut self,
        ltell: Ltell,
    ) -> DlisResult<()> {
        defñ!("({})", ltell);
        if ltell < 0 {
            return Err(DlisError::Io(format!(
                "cannot seek to negative tell {}",
                ltell
            )));
        }
        // resolution to an inner offset is deferred to the next read
        self.pos = ltell;
        self.eof = false;

        Ok(())
    }

    fn ltell(&self) -> Ltell {
        self.pos
    }

    fn ptell(&self) -> Ptell {
        self.inner.ptell()
    }

    fn eof(&self) -> bool {
        self.eof
    }
}
