//! Frame layout, constants and encoding.
//!
//! Frame format:
//! - START (1 byte): 0x02
//! - LENGTH (1 byte): payload length (0-255)
//! - PAYLOAD (LENGTH bytes)
//! - CHECKSUM (1 byte): opaque to the decoder, see [`crate::ChecksumPolicy`]
//! - END (1 byte): 0x03

use core::fmt;

use heapless::Vec;

use crate::checksum::ChecksumPolicy;

/// Frame start marker (ASCII STX)
pub const START_MARKER: u8 = 0x02;

/// Frame end marker (ASCII ETX)
pub const END_MARKER: u8 = 0x03;

/// Default payload buffer capacity; large enough for any `u8` length
pub const DEFAULT_CAPACITY: usize = 256;

/// Largest payload a LENGTH byte can announce
pub const MAX_DECLARED_LENGTH: usize = u8::MAX as usize;

/// Smallest complete frame (START + LENGTH + CHECKSUM + END)
pub const MIN_FRAME_SIZE: usize = 4;

/// Largest complete frame on the wire
pub const MAX_FRAME_SIZE: usize = MIN_FRAME_SIZE + MAX_DECLARED_LENGTH;

/// Errors that can occur while building or encoding a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Payload does not fit the LENGTH byte or the frame capacity
    PayloadTooLarge,
    /// Output buffer too small for the encoded frame
    BufferTooSmall,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::PayloadTooLarge => f.write_str("payload too large for frame"),
            EncodeError::BufferTooSmall => f.write_str("output buffer too small"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodeError {}

/// A completed or constructed frame
///
/// `C` is the payload capacity and matches the decoder that produced the
/// frame. The payload never exceeds [`MAX_DECLARED_LENGTH`], whatever `C` is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<const C: usize = DEFAULT_CAPACITY> {
    payload: Vec<u8, C>,
    /// Trailer checksum byte, exactly as received or supplied
    pub checksum: u8,
}

#[cfg(feature = "defmt")]
impl<const C: usize> defmt::Format for Frame<C> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Frame(len={}, checksum={=u8:#x}, payload={=[u8]:x})",
            self.payload.len(),
            self.checksum,
            &self.payload[..]
        );
    }
}

impl<const C: usize> Frame<C> {
    /// Create a frame from a payload and an explicit checksum byte
    pub fn new(payload: &[u8], checksum: u8) -> Result<Self, EncodeError> {
        if payload.len() > MAX_DECLARED_LENGTH {
            return Err(EncodeError::PayloadTooLarge);
        }

        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| EncodeError::PayloadTooLarge)?;

        Ok(Self {
            payload: payload_vec,
            checksum,
        })
    }

    /// Create a frame whose checksum is computed with `policy`
    ///
    /// [`ChecksumPolicy::Unchecked`] leaves the checksum at zero.
    pub fn sealed(payload: &[u8], policy: ChecksumPolicy) -> Result<Self, EncodeError> {
        let mut frame = Self::new(payload, 0)?;
        if let Some(checksum) = policy.compute(frame.length(), &frame.payload) {
            frame.checksum = checksum;
        }
        Ok(frame)
    }

    /// Payload data
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Value of the LENGTH byte for this frame
    pub fn length(&self) -> u8 {
        // payload is private and only `new` fills it, after the length check
        self.payload.len() as u8
    }

    /// Number of bytes this frame occupies on the wire
    pub fn encoded_len(&self) -> usize {
        MIN_FRAME_SIZE + self.payload.len()
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, EncodeError> {
        let frame_len = self.encoded_len();
        if buffer.len() < frame_len {
            return Err(EncodeError::BufferTooSmall);
        }

        let end = 2 + self.payload.len();
        buffer[0] = START_MARKER;
        buffer[1] = self.length();
        buffer[2..end].copy_from_slice(&self.payload);
        buffer[end] = self.checksum;
        buffer[end + 1] = END_MARKER;

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, EncodeError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| EncodeError::BufferTooSmall)?;
        Ok(vec)
    }
}
