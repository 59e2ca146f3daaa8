//! Frame decoder state machine
//!
//! The decoder consumes one byte per call and reports one of three
//! outcomes. Each phase consumes a fixed, pre-declared number of bytes before
//! advancing, so there is no lookahead and no backtracking.

use crate::frame::{Frame, DEFAULT_CAPACITY, END_MARKER, START_MARKER};
use crate::source::ByteSource;

/// Position within the frame being reconstructed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Discarding bytes until START
    AwaitStart,
    /// Got START, next byte is LENGTH
    ReadLength,
    /// Collecting PAYLOAD bytes
    ReadPayload,
    /// Next byte is CHECKSUM
    ReadChecksum,
    /// Next byte must be END
    AwaitEnd,
    /// A frame was reported with [`Signal::FrameReady`]
    Complete,
    /// A frame was reported with [`Signal::FrameError`]
    Failed,
}

impl Phase {
    /// Check if the current frame has finished, successfully or not
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Complete | Phase::Failed)
    }
}

/// Outcome of feeding one byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Signal {
    /// More bytes are needed
    InProgress,
    /// A complete frame is available
    FrameReady,
    /// The current frame was rejected
    FrameError,
}

impl Signal {
    /// Check if this signal ends the current frame
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Signal::InProgress)
    }
}

/// Reason a frame was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FailureKind {
    /// Trailer byte was not END
    BadEndMarker { found: u8 },
    /// LENGTH announces more bytes than the payload buffer holds
    LengthExceedsCapacity { declared: u8, capacity: usize },
}

/// Diagnostics for the last rejected frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Failure {
    /// What went wrong
    pub kind: FailureKind,
    /// Phase the decoder was in when the offending byte arrived
    pub phase: Phase,
}

/// Byte-at-a-time frame decoder
///
/// `C` is the payload buffer capacity. With the default of 256 every LENGTH
/// value fits; smaller decoders reject oversized frames at the LENGTH byte.
#[derive(Debug, Clone)]
pub struct FrameDecoder<const C: usize = DEFAULT_CAPACITY> {
    phase: Phase,
    declared_length: u8,
    buffer: [u8; C],
    write_index: usize,
    checksum: u8,
    failure: Option<Failure>,
}

impl<const C: usize> Default for FrameDecoder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const C: usize> FrameDecoder<C> {
    /// Create a decoder ready for a fresh frame
    pub const fn new() -> Self {
        Self {
            phase: Phase::AwaitStart,
            declared_length: 0,
            buffer: [0; C],
            write_index: 0,
            checksum: 0,
            failure: None,
        }
    }

    /// Reset to [`Phase::AwaitStart`], discarding any partial frame
    pub fn initialize(&mut self) {
        self.phase = Phase::AwaitStart;
        self.declared_length = 0;
        self.write_index = 0;
        self.checksum = 0;
        self.failure = None;
    }

    /// Feed a single byte to the decoder
    ///
    /// A byte arriving after `Complete` or `Failed` starts a new frame: the
    /// decoder resets and handles the byte as if it were waiting for START.
    pub fn feed(&mut self, byte: u8) -> Signal {
        match self.phase {
            Phase::AwaitStart => {
                if byte == START_MARKER {
                    self.phase = Phase::ReadLength;
                }
                // Anything else is line noise
                Signal::InProgress
            }
            Phase::ReadLength => self.read_length(byte),
            Phase::ReadPayload => {
                debug_assert!(self.write_index < usize::from(self.declared_length));
                self.buffer[self.write_index] = byte;
                self.write_index += 1;
                if self.write_index == usize::from(self.declared_length) {
                    self.phase = Phase::ReadChecksum;
                }
                Signal::InProgress
            }
            Phase::ReadChecksum => {
                self.checksum = byte;
                self.phase = Phase::AwaitEnd;
                Signal::InProgress
            }
            Phase::AwaitEnd => {
                if byte == END_MARKER {
                    self.phase = Phase::Complete;
                    Signal::FrameReady
                } else {
                    self.fail(FailureKind::BadEndMarker { found: byte })
                }
            }
            Phase::Complete | Phase::Failed => {
                self.initialize();
                self.feed(byte)
            }
        }
    }

    fn read_length(&mut self, byte: u8) -> Signal {
        if usize::from(byte) > C {
            return self.fail(FailureKind::LengthExceedsCapacity {
                declared: byte,
                capacity: C,
            });
        }

        self.declared_length = byte;
        self.write_index = 0;
        self.phase = if byte == 0 {
            Phase::ReadChecksum
        } else {
            Phase::ReadPayload
        };
        Signal::InProgress
    }

    fn fail(&mut self, kind: FailureKind) -> Signal {
        self.failure = Some(Failure {
            kind,
            phase: self.phase,
        });
        self.phase = Phase::Failed;
        Signal::FrameError
    }

    /// Feed bytes until a frame completes or fails
    ///
    /// Returns the number of bytes consumed and the last signal. Bytes after
    /// a terminal signal are not consumed.
    pub fn feed_slice(&mut self, bytes: &[u8]) -> (usize, Signal) {
        let mut signal = Signal::InProgress;
        for (i, &byte) in bytes.iter().enumerate() {
            signal = self.feed(byte);
            if signal.is_terminal() {
                return (i + 1, signal);
            }
        }
        (bytes.len(), signal)
    }

    /// Pull bytes from `source` until a frame completes or fails
    ///
    /// Returns `None` if the source ran dry first; the decoder keeps its
    /// partial frame and the next call carries on from there.
    pub fn drain<S: ByteSource>(&mut self, mut source: S) -> Option<Signal> {
        while let Some(byte) = source.pop() {
            let signal = self.feed(byte);
            if signal.is_terminal() {
                return Some(signal);
            }
        }
        None
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// LENGTH of the frame in progress (zero before it is read)
    pub fn declared_length(&self) -> u8 {
        self.declared_length
    }

    /// Payload bytes written so far
    pub fn payload(&self) -> &[u8] {
        &self.buffer[..self.write_index]
    }

    /// Captured CHECKSUM byte (zero before it is read)
    pub fn checksum(&self) -> u8 {
        self.checksum
    }

    /// Payload buffer capacity
    pub const fn capacity(&self) -> usize {
        C
    }

    /// Diagnostics for the rejected frame while in [`Phase::Failed`]
    pub fn failure(&self) -> Option<Failure> {
        self.failure
    }

    /// Owned copy of the completed frame
    ///
    /// Only available while in [`Phase::Complete`].
    pub fn frame(&self) -> Option<Frame<C>> {
        if self.phase != Phase::Complete {
            return None;
        }
        Frame::new(self.payload(), self.checksum).ok()
    }
}
