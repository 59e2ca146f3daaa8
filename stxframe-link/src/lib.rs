//! STX/ETX Frame Link
//!
//! Receive-side plumbing around [`stxframe_protocol::FrameDecoder`]:
//!
//! - [`queue::ByteQueue`] - single-producer byte queue that lets an interrupt
//!   handler hand bytes to a task without sharing the decoder
//! - [`link::FrameLink`] - decode loop that drains a byte source or an async
//!   reader, applies the configured checksum policy and publishes frames on an
//!   `embassy-sync` channel
//! - [`config::LinkConfig`] - link settings, persisted as postcard binary data
//!
//! ```text
//! UART IRQ ──► ByteQueue ──► FrameLink ──► Channel<Frame> ──► consumer task
//! ```

#![no_std]
#![deny(unsafe_code)]

#[cfg(feature = "std")]
extern crate std;

// Must come first so the logging macros are visible to every module
mod fmt;

pub mod config;
pub mod link;
pub mod queue;

pub use config::{ConfigError, LinkConfig, CONFIG_VERSION};
pub use link::{FrameLink, LinkError, LinkStats, RX_CHUNK_SIZE};
pub use queue::{ByteProducer, ByteQueue};
