// src/lib.rs

//! Library to read RP66 V1 "DLIS" well-log files; _dlislib_.
//!
//! A DLIS file is a stream of variable-length Logical Record Segments,
//! possibly wrapped in one or more envelope framings (raw, visible records,
//! TapeImage), organized into Logical Records spread across one or more
//! Logical Files.
//!
//! This library implements the physical-to-logical framing engine:
//! finding the Storage Unit Label and Visible Record anchors
//! ([`findsul`], [`findvrl`]), reassembling whole Logical Records from
//! segment chains ([`extract`]), indexing every Logical Record of a Logical
//! File ([`findoffsets`]), and grouping implicit records by their object
//! name ([`findfdata`]).
//!
//! Decoding record bytes to typed sets, frames, and channels is a concern
//! of higher-level consumers and is not implemented here.
//!
//! [`findsul`]: crate::readers::indexreader::findsul
//! [`findvrl`]: crate::readers::indexreader::findvrl
//! [`extract`]: crate::readers::indexreader::extract
//! [`findoffsets`]: crate::readers::indexreader::findoffsets
//! [`findfdata`]: crate::readers::indexreader::findfdata

pub mod common;
pub mod data;
pub mod debug;
pub mod readers;
#[cfg(test)]
pub mod tests;
