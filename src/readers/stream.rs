// src/readers/stream.rs

//! Implement [`DlisStream`], the two-tell byte-source contract every
//! reader consumes, and [`FileStream`], the raw-file bottom layer.
//!
//! [`DlisStream`]: self::DlisStream
//! [`FileStream`]: self::FileStream

use crate::common::{DlisError, DlisResult, FPath, FileSz, Ltell, Ptell};

use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DlisStream
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A positioned byte source with two monotonically advancing tells.
///
/// Every stream exposes:
///
/// * _ltell_, the logical offset within the outermost virtual byte
///   sequence, after envelope removal. Seek operations use _ltell_.
/// * _ptell_, the physical offset in the underlying file. Diagnostics
///   report both.
///
/// The end-of-file indicator is sticky after exhaustion: any read that
/// cannot be fully satisfied sets it, a zero-length read at the end must
/// set it, and only `seek` clears it.
pub trait DlisStream {
    /// Read up to `buf.len()` bytes into `buf`, returning the count read.
    ///
    /// Short reads are legal at the end of the stream; a protocol error
    /// in an envelope framing fails with [`DlisError::Io`].
    fn read(
        &mut self,
        buf: &mut [u8],
    ) -> DlisResult<usize>;

    /// Absolute seek in logical space. Clears the end-of-file indicator.
    fn seek(
        &mut self,
        ltell: Ltell,
    ) -> DlisResult<()>;

    /// Current logical offset.
    fn ltell(&self) -> Ltell;

    /// Current physical offset in the underlying file.
    fn ptell(&self) -> Ptell;

    /// Has the stream been read to exhaustion?
    fn eof(&self) -> bool;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FileStream
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The bottom layer of every stream stack: a file on disk whose logical
/// origin is a fixed physical byte offset.
///
/// `ltell` counts from the opening offset; `ptell` is the position within
/// the file itself.
pub struct FileStream {
    path: FPath,
    file: File,
    /// physical offset of the logical origin
    offset: Ptell,
    /// physical cursor
    pos: Ptell,
    filesz: FileSz,
    eof: bool,
}

impl fmt::Debug for FileStream {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("FileStream")
            .field("path", &self.path)
            .field("offset", &self.offset)
            .field("pos", &self.pos)
            .field("filesz", &self.filesz)
            .field("eof", &self.eof)
            .finish()
    }
}

/// Open `path` as a [`FileStream`] whose logical origin is physical byte
/// `offset`.
///
/// Opening past the end of the file fails with [`DlisError::Eof`]; any
/// other failure is [`DlisError::Io`].
pub fn open(
    path: &FPath,
    offset: Ptell,
) -> DlisResult<FileStream> {
    defn!("({:?}, {})", path, offset);
    let file: File = match File::open(path) {
        Ok(val) => val,
        Err(err) => {
            defx!("return Err({})", err);
            return Err(DlisError::Io(format!(
                "unable to open file for path {}: {}",
                path, err
            )));
        }
    };
    let filesz: FileSz = match file.metadata() {
        Ok(val) => val.len(),
        Err(err) => {
            defx!("return Err({})", err);
            return Err(DlisError::Io(format!(
                "unable to stat file for path {}: {}",
                path, err
            )));
        }
    };
    if offset < 0 || offset as FileSz > filesz {
        defx!("return Err(Eof)");
        return Err(DlisError::Eof(format!(
            "cannot open file at tell {}; file size is {}",
            offset, filesz
        )));
    }
    let mut stream = FileStream {
        path: path.clone(),
        file,
        offset,
        pos: offset,
        filesz,
        eof: false,
    };
    stream.seek(0)?;
    defx!("return {:?}", stream);

    Ok(stream)
}

impl DlisStream for FileStream {
    fn read(
        &mut self,
        buf: &mut [u8],
    ) -> DlisResult<usize> {
        defn!("(buf len {}) pos {}", buf.len(), self.pos);
        let mut total: usize = 0;
        while total < buf.len() {
            let n: usize = match self.file.read(&mut buf[total..]) {
                Ok(val) => val,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    defx!("return Err({})", err);
                    return Err(DlisError::Io(format!(
                        "read error at tell {} for path {}: {}",
                        self.pos, self.path, err
                    )));
                }
            };
            if n == 0 {
                // exhausted; sticky until the next seek
                self.eof = true;
                break;
            }
            total += n;
        }
        self.pos += total as Ptell;
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
        let pos: Ptell = self.offset + ltell;
        if let Err(err) = self
            .file
            .seek(SeekFrom::Start(pos as u64))
        {
            return Err(DlisError::Io(format!(
                "seek error to tell {} for path {}: {}",
                ltell, self.path, err
            )));
        }
        self.pos = pos;
        self.eof = false;

        Ok(())
    }

    fn ltell(&self) -> Ltell {
        self.pos - self.offset
    }

    fn ptell(&self) -> Ptell {
        self.pos
    }

    fn eof(&self) -> bool {
        self.eof
    }
}
