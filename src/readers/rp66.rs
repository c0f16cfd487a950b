// src/readers/rp66.rs

//! Implement [`Rp66Stream`], the stream adapter that removes Visible
//! Record envelope framing.
//!
//! A Visible Record (VR) is a 4-byte envelope header, the marker
//! `0xFF 0x01` then a big-endian `u16` length inclusive of the header,
//! followed by its payload. The logical byte sequence of an
//! [`Rp66Stream`] is the concatenation of all VR payloads.
//!
//! VRs are discovered lazily, front to back, and remembered; a backward
//! seek never re-reads envelope headers.
//!
//! [`Rp66Stream`]: self::Rp66Stream

use crate::common::{DlisError, DlisResult, Ltell, Ptell};
use crate::data::dlis::{VRL_MARKER, VRL_SIZE};
use crate::readers::stream::DlisStream;

use std::fmt;

use ::more_asserts::debug_assert_gt;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// One discovered Visible Record.
#[derive(Clone, Copy, Debug)]
struct VisibleRecord {
    /// logical offset of the first payload byte
    lstart: Ltell,
    /// inner-stream logical offset of the first payload byte
    inner_start: Ltell,
    /// payload length; envelope header removed
    len: Ltell,
}

/// Stream adapter removing Visible Record envelope framing from an inner
/// [`DlisStream`].
pub struct Rp66Stream<S: DlisStream> {
    inner: S,
    /// Visible Records discovered so far, ascending `lstart`.
    records: Vec<VisibleRecord>,
    /// inner-stream offset of the next undiscovered envelope header
    next_header: Ltell,
    /// logical size of all discovered records
    logical_end: Ltell,
    /// no more envelope headers follow the discovered records
    complete: bool,
    /// logical cursor
    pos: Ltell,
    eof: bool,
}

impl<S: DlisStream> fmt::Debug for Rp66Stream<S> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("Rp66Stream")
            .field("records", &self.records.len())
            .field("next_header", &self.next_header)
            .field("logical_end", &self.logical_end)
            .field("complete", &self.complete)
            .field("pos", &self.pos)
            .field("eof", &self.eof)
            .finish()
    }
}

/// Wrap `inner` in an [`Rp66Stream`], removing one layer of Visible
/// Record envelope framing starting at the inner stream's current
/// position.
///
/// Opening on an exhausted stream fails with [`DlisError::Eof`].
pub fn open_rp66<S: DlisStream>(inner: S) -> DlisResult<Rp66Stream<S>> {
    defñ!("(inner ltell {})", inner.ltell());
    if inner.eof() {
        return Err(DlisError::Eof(String::from(
            "cannot open visible envelope past eof",
        )));
    }
    let next_header: Ltell = inner.ltell();

    Ok(Rp66Stream {
        inner,
        records: Vec::new(),
        next_header,
        logical_end: 0,
        complete: false,
        pos: 0,
        eof: false,
    })
}

impl<S: DlisStream> Rp66Stream<S> {
    /// Read the next undiscovered envelope header and remember its
    /// Visible Record. Sets `complete` on a clean end of the inner
    /// stream.
    fn discover_next(&mut self) -> DlisResult<()> {
        defn!("next_header {}", self.next_header);
        self.inner.seek(self.next_header)?;
        let mut hdr = [0u8; VRL_SIZE];
        let nread: usize = self.inner.read(&mut hdr)?;
        if nread == 0 {
            defx!("complete");
            self.complete = true;
            return Ok(());
        }
        if nread < VRL_SIZE {
            defx!("return Err; nread {}", nread);
            return Err(DlisError::Io(format!(
                "truncated visible record header at tell {} (dec)",
                self.next_header
            )));
        }
        if hdr[0..2] != VRL_MARKER {
            defx!("return Err; marker {:?}", &hdr[0..2]);
            return Err(DlisError::Io(format!(
                "broken visible envelope: expected [0xFF 0x01] at tell {} (dec), was [{:#04X} {:#04X}]",
                self.next_header, hdr[0], hdr[1]
            )));
        }
        let len: Ltell = u16::from_be_bytes([hdr[2], hdr[3]]) as Ltell;
        if len < VRL_SIZE as Ltell {
            defx!("return Err; len {}", len);
            return Err(DlisError::Io(format!(
                "broken visible envelope: length {} at tell {} (dec)",
                len, self.next_header
            )));
        }
        self.records.push(VisibleRecord {
            lstart: self.logical_end,
            inner_start: self.next_header + VRL_SIZE as Ltell,
            len: len - VRL_SIZE as Ltell,
        });
        self.logical_end += len - VRL_SIZE as Ltell;
        self.next_header += len;
        defx!("records {}, logical_end {}", self.records.len(), self.logical_end);

        Ok(())
    }

    /// Map logical offset `pos` to the inner-stream offset of that byte
    /// and the count of payload bytes remaining in its Visible Record.
    /// `None` when `pos` is at or past the end of the last record.
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
        // last record beginning at or before `pos`
        let idx: usize = self
            .records
            .partition_point(|rec| rec.lstart <= pos)
            - 1;
        let rec: &VisibleRecord = &self.records[idx];
        let delta: Ltell = pos - rec.lstart;
        let avail: usize = (rec.len - delta) as usize;
        debug_assert_gt!(avail, 0);

        Ok(Some((rec.inner_start + delta, avail)))
    }
}

impl<S: DlisStream> DlisStream for Rp66Stream<S> {
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
