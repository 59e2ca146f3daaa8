//! STX/ETX Framing Protocol
//!
//! This crate decodes a byte stream of delimited, length-prefixed frames one
//! byte at a time. The decoder is a small finite state machine that never
//! blocks, never allocates, and does constant work per byte, so it can be
//! driven from an interrupt handler or a streaming task alike.
//!
//! # Protocol Overview
//!
//! ```text
//! ┌───────┬────────┬─────────────┬──────────┬─────┐
//! │ START │ LENGTH │ PAYLOAD     │ CHECKSUM │ END │
//! │ 0x02  │ 1B     │ 0–255B      │ 1B       │ 0x03│
//! └───────┴────────┴─────────────┴──────────┴─────┘
//! ```
//!
//! The checksum byte is captured but not interpreted by the decoder. Callers
//! pick a [`ChecksumPolicy`] and verify completed frames themselves.

#![no_std]
#![deny(unsafe_code)]

#[cfg(feature = "std")]
extern crate std;

pub mod checksum;
pub mod decoder;
pub mod frame;
pub mod source;

pub use checksum::{ChecksumMismatch, ChecksumPolicy};
pub use decoder::{Failure, FailureKind, FrameDecoder, Phase, Signal};
pub use frame::{
    EncodeError, Frame, DEFAULT_CAPACITY, END_MARKER, MAX_FRAME_SIZE, MIN_FRAME_SIZE,
    START_MARKER,
};
pub use source::{ByteSource, SliceSource};
