//! Caller-side checksum policies
//!
//! The decoder stores the CHECKSUM byte without interpreting it. Once a frame
//! is complete, the receiving side chooses how (and whether) to check it.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::frame::Frame;

/// Checksum algorithm applied to completed frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChecksumPolicy {
    /// Accept any checksum byte
    #[default]
    Unchecked,
    /// XOR of the LENGTH byte and every PAYLOAD byte
    Xor,
    /// Wrapping sum of the LENGTH byte and every PAYLOAD byte
    Sum8,
}

/// A completed frame whose checksum byte does not match its contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChecksumMismatch {
    /// Checksum computed from the frame contents
    pub expected: u8,
    /// Checksum byte carried by the frame
    pub found: u8,
}

impl fmt::Display for ChecksumMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "checksum mismatch: expected {:#04x}, found {:#04x}",
            self.expected, self.found
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ChecksumMismatch {}

impl ChecksumPolicy {
    /// Compute the checksum for a LENGTH byte and payload
    ///
    /// Returns `None` for [`ChecksumPolicy::Unchecked`].
    pub fn compute(self, length: u8, payload: &[u8]) -> Option<u8> {
        match self {
            ChecksumPolicy::Unchecked => None,
            ChecksumPolicy::Xor => Some(payload.iter().fold(length, |acc, &b| acc ^ b)),
            ChecksumPolicy::Sum8 => {
                Some(payload.iter().fold(length, |acc, &b| acc.wrapping_add(b)))
            }
        }
    }

    /// Check a completed frame against this policy
    pub fn verify<const C: usize>(self, frame: &Frame<C>) -> Result<(), ChecksumMismatch> {
        self.verify_parts(frame.length(), frame.payload(), frame.checksum)
    }

    /// Check raw frame parts against this policy
    ///
    /// Useful straight after `FrameReady`, without copying the payload out of
    /// the decoder.
    pub fn verify_parts(
        self,
        length: u8,
        payload: &[u8],
        found: u8,
    ) -> Result<(), ChecksumMismatch> {
        match self.compute(length, payload) {
            Some(expected) if expected != found => Err(ChecksumMismatch { expected, found }),
            _ => Ok(()),
        }
    }
}
