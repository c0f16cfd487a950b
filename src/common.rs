// src/common.rs

//! Common type aliases, the error type, and the error-handler capability
//! for _dlislib_.

use std::fmt;
use std::sync::Mutex;

use ::thiserror::Error;

use crate::debug::printers::{e_err, e_wrn};

/// `F`ake `Path` or `F`ile `Path`.
///
/// Type alias `FPath` is a simpler stand-in for formalized file system path
/// [`std::path::Path`].
///
/// `std::path::Path` does not have trait `Sized` so instances of
/// `std::path::Path` must be passed-by-reference which in some code areas
/// requires marking explicit lifetimes. It's much easier to use a [`String`]
/// and convert to a `Path` as needed.
///
/// [`String`]: std::string::String
pub type FPath = String;

/// File Size in bytes.
pub type FileSz = u64;

/// A general-purpose counting type, typically used for internal statistics
/// counting.
pub type Count = u64;

/// A logical tell; a byte offset into the outermost virtual byte sequence
/// of a stream, after envelope removal.
///
/// Seek operations use `Ltell`. Signed because record-budget arithmetic
/// around it may go negative.
pub type Ltell = i64;

/// A physical tell; a byte offset into the underlying file, before envelope
/// removal. For diagnostics and human triage, never for seeking.
pub type Ptell = i64;

/// A sequence of bytes.
pub type Bytes = Vec<u8>;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DlisError
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Error type for all _dlislib_ operations.
///
/// Kinds, not call sites: a failing operation maps its local condition onto
/// one of these five kinds and carries a formatted message.
#[derive(Debug, Error)]
pub enum DlisError {
    /// Underlying stream failure.
    #[error("I/O error: {0}")]
    Io(String),
    /// Operation attempted past the end of a stream.
    #[error("end of file: {0}")]
    Eof(String),
    /// Search exhausted without locating the anchor.
    #[error("not found: {0}")]
    NotFound(String),
    /// Record body short of its declared length.
    #[error("truncated: {0}")]
    Truncated(String),
    /// Structural inconsistency in the file.
    #[error("corrupt: {0}")]
    Corrupt(String),
}

impl From<std::io::Error> for DlisError {
    fn from(err: std::io::Error) -> DlisError {
        DlisError::Io(err.to_string())
    }
}

/// A typed [`Result`] for _dlislib_ operations.
///
/// [`Result`]: std::result::Result
pub type DlisResult<T> = std::result::Result<T, DlisError>;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// error-handler capability
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity of a non-fatal [`Incident`] reported through an
/// [`ErrorHandler`].
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum ErrorSeverity {
    /// Format violation common enough in real files to be worked around.
    Minor,
    /// Format violation that distorts data but allows processing to
    /// continue.
    Major,
    /// Format violation that suspends processing of the current record
    /// or logical file.
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        match self {
            ErrorSeverity::Minor => write!(f, "minor"),
            ErrorSeverity::Major => write!(f, "major"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// One non-fatal problem encountered while processing a stream.
///
/// All fields are human-readable strings. `specification` may be empty;
/// `debug_info` typically carries physical and logical offsets.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Incident {
    pub severity: ErrorSeverity,
    /// What was being done, e.g. `"dlis::findoffsets (indexing logical file)"`.
    pub context: String,
    /// What is wrong.
    pub problem: String,
    /// Reference into the RP66 V1 specification, when one applies.
    pub specification: String,
    /// What was done about it.
    pub action: String,
    pub debug_info: String,
}

/// Capability to report non-fatal problems.
///
/// Passed as an explicit parameter, not a process-wide singleton, so
/// concurrent streams can log to independent sinks. Implementations decide
/// whether to collect, print, or escalate.
pub trait ErrorHandler {
    fn log(
        &self,
        severity: ErrorSeverity,
        context: &str,
        problem: &str,
        specification: &str,
        action: &str,
        debug_info: &str,
    );
}

/// An [`ErrorHandler`] that collects every [`Incident`] in order.
///
/// The interior `Mutex` keeps `log` callable through a shared reference;
/// streams are single-threaded so the lock is never contended.
#[derive(Debug, Default)]
pub struct CollectingErrorHandler {
    incidents: Mutex<Vec<Incident>>,
}

impl CollectingErrorHandler {
    pub fn new() -> CollectingErrorHandler {
        CollectingErrorHandler::default()
    }

    /// Copy of every incident logged so far, in log order.
    pub fn incidents(&self) -> Vec<Incident> {
        self.incidents
            .lock()
            .unwrap()
            .clone()
    }

    pub fn count(&self) -> Count {
        self.incidents
            .lock()
            .unwrap()
            .len() as Count
    }

    pub fn count_severity(
        &self,
        severity: ErrorSeverity,
    ) -> Count {
        self.incidents
            .lock()
            .unwrap()
            .iter()
            .filter(|incident| incident.severity == severity)
            .count() as Count
    }
}

impl ErrorHandler for CollectingErrorHandler {
    fn log(
        &self,
        severity: ErrorSeverity,
        context: &str,
        problem: &str,
        specification: &str,
        action: &str,
        debug_info: &str,
    ) {
        self.incidents
            .lock()
            .unwrap()
            .push(Incident {
                severity,
                context: String::from(context),
                problem: String::from(problem),
                specification: String::from(specification),
                action: String::from(action),
                debug_info: String::from(debug_info),
            });
    }
}

/// An [`ErrorHandler`] that prints incidents to _stderr_ as they occur.
#[derive(Debug, Default)]
pub struct PrintErrorHandler {}

impl PrintErrorHandler {
    pub fn new() -> PrintErrorHandler {
        PrintErrorHandler {}
    }
}

impl ErrorHandler for PrintErrorHandler {
    fn log(
        &self,
        severity: ErrorSeverity,
        context: &str,
        problem: &str,
        _specification: &str,
        action: &str,
        debug_info: &str,
    ) {
        match severity {
            ErrorSeverity::Critical => {
                e_err!("({}) {}; {} ({})", context, problem, action, debug_info)
            }
            _ => e_wrn!("({}) {}; {} ({})", context, problem, action, debug_info),
        }
    }
}
