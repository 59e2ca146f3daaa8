//! Frame receive link
//!
//! Feeds received bytes into a [`FrameDecoder`], checks completed frames
//! against the configured checksum policy and publishes them on a channel.
//! The link owns its decoder outright; producers reach it only through a
//! reader or a [`ByteSource`].

use core::fmt;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;
use embedded_io_async::Read;

use stxframe_protocol::{ByteSource, Frame, FrameDecoder, Signal, DEFAULT_CAPACITY};

use crate::config::LinkConfig;

/// Buffer size for each reader call
pub const RX_CHUNK_SIZE: usize = 64;

/// Link counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStats {
    /// Bytes fed to the decoder
    pub bytes: u32,
    /// Frames that reached `FrameReady`
    pub frames: u32,
    /// Frames rejected by the decoder
    pub errors: u32,
    /// Completed frames that failed the checksum policy
    pub checksum_failures: u32,
    /// Frames lost because the channel was full
    pub dropped: u32,
}

/// Errors that stop the receive loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError<E> {
    /// The underlying reader failed
    Read(E),
}

impl<E: fmt::Debug> fmt::Display for LinkError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::Read(e) => write!(f, "read error: {:?}", e),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for LinkError<E> {}

/// Receive side of a framed serial link
pub struct FrameLink<'ch, M: RawMutex, const C: usize = DEFAULT_CAPACITY, const Q: usize = 4> {
    decoder: FrameDecoder<C>,
    config: LinkConfig,
    frames: &'ch Channel<M, Frame<C>, Q>,
    stats: LinkStats,
}

impl<'ch, M: RawMutex, const C: usize, const Q: usize> FrameLink<'ch, M, C, Q> {
    /// Create a link publishing completed frames on `frames`
    pub fn new(config: LinkConfig, frames: &'ch Channel<M, Frame<C>, Q>) -> Self {
        Self {
            decoder: FrameDecoder::new(),
            config,
            frames,
            stats: LinkStats::default(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Counters since creation
    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    /// Read-only view of the decoder, for diagnostics
    pub fn decoder(&self) -> &FrameDecoder<C> {
        &self.decoder
    }

    /// Abandon any partial frame
    pub fn reset(&mut self) {
        self.decoder.initialize();
    }

    /// Feed one byte and handle the outcome
    pub fn push_byte(&mut self, byte: u8) -> Signal {
        self.stats.bytes = self.stats.bytes.wrapping_add(1);

        let signal = self.decoder.feed(byte);
        match signal {
            Signal::InProgress => {}
            Signal::FrameReady => self.frame_ready(),
            Signal::FrameError => {
                self.stats.errors = self.stats.errors.wrapping_add(1);
                if let Some(failure) = self.decoder.failure() {
                    warn!("Frame error: {:?}", failure);
                }
            }
        }
        signal
    }

    /// Drain every byte currently available from `source`
    ///
    /// Returns the number of bytes consumed. Partial frames carry over to the
    /// next call.
    pub fn poll_source<S: ByteSource>(&mut self, mut source: S) -> usize {
        let mut consumed = 0;
        while let Some(byte) = source.pop() {
            self.push_byte(byte);
            consumed += 1;
        }
        consumed
    }

    /// Receive loop over an async reader
    ///
    /// Runs until the reader reports end of stream (a zero-length read) or
    /// fails.
    pub async fn run<R: Read>(&mut self, mut rx: R) -> Result<(), LinkError<R::Error>> {
        info!("Frame link started");

        let mut buf = [0u8; RX_CHUNK_SIZE];
        loop {
            let n = rx.read(&mut buf).await.map_err(LinkError::Read)?;
            if n == 0 {
                debug!("RX end of stream");
                return Ok(());
            }

            trace!("RX: {} bytes", n);
            for &byte in &buf[..n] {
                self.push_byte(byte);
            }
        }
    }

    fn frame_ready(&mut self) {
        self.stats.frames = self.stats.frames.wrapping_add(1);

        let verdict = self.config.checksum.verify_parts(
            self.decoder.declared_length(),
            self.decoder.payload(),
            self.decoder.checksum(),
        );
        if let Err(mismatch) = verdict {
            self.stats.checksum_failures = self.stats.checksum_failures.wrapping_add(1);
            warn!("Checksum mismatch: {:?}", mismatch);
            if !self.config.deliver_unverified {
                return;
            }
        }

        let Some(frame) = self.decoder.frame() else {
            return;
        };
        trace!("Frame ready: {} bytes", frame.payload().len());

        // Send to frame channel, dropping if full
        if self.frames.try_send(frame).is_err() {
            self.stats.dropped = self.stats.dropped.wrapping_add(1);
            warn!("Frame channel full, dropping frame");
        }
    }
}
