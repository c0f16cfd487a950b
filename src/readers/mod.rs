// src/readers/mod.rs

//! "Readers" for _dlislib_.
//!
//! ## Overview of readers
//!
//! * The functions in [`indexreader`] drive a [`DlisStream`] to derive
//!   [`Record`s] and [`StreamOffsets`].
//! * A [`DlisStream`] only handles `u8` bytes of the logical byte
//!   sequence; envelope framing is peeled off by stacking stream adapters.
//!
//! A [`FileStream`] is the bottom of every stack. A [`TapeImageStream`]
//! and a [`Rp66Stream`] each wrap another stream and remove one envelope
//! framing. A fully-dressed storage unit reads as:
//!
//! ```text
//! Rp66Stream ── TapeImageStream ── FileStream ── file on disk
//! ```
//!
//! The index functions never branch on envelope type; they see only the
//! [`DlisStream`] contract.
//!
//! _These are not rust "Readers"; these structs do not implement the trait
//! [`Read`]. These are "readers" in an informal sense._
//!
//! [`indexreader`]: crate::readers::indexreader
//! [`DlisStream`]: crate::readers::stream::DlisStream
//! [`FileStream`]: crate::readers::stream::FileStream
//! [`TapeImageStream`]: crate::readers::tapeimage::TapeImageStream
//! [`Rp66Stream`]: crate::readers::rp66::Rp66Stream
//! [`Record`s]: crate::data::record::Record
//! [`StreamOffsets`]: crate::data::record::StreamOffsets
//! [`Read`]: std::io::Read

pub mod indexreader;
pub mod rp66;
pub mod stream;
pub mod tapeimage;
