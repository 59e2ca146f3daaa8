//! Interrupt-to-task byte queue
//!
//! The receive interrupt owns the producer half and never touches the
//! decoder. The decode task owns the consumer half, which is a
//! [`stxframe_protocol::ByteSource`]. One producer, one consumer, no lock.

use heapless::spsc::{Consumer, Producer, Queue};
use portable_atomic::{AtomicU32, Ordering};

/// Fixed-capacity byte queue with overrun accounting
///
/// Holds at most `N - 1` bytes (one slot distinguishes full from empty).
pub struct ByteQueue<const N: usize> {
    queue: Queue<u8, N>,
    overruns: AtomicU32,
}

impl<const N: usize> Default for ByteQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ByteQueue<N> {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            queue: Queue::new(),
            overruns: AtomicU32::new(0),
        }
    }

    /// Split into the interrupt-side producer and the task-side consumer
    pub fn split(&mut self) -> (ByteProducer<'_, N>, Consumer<'_, u8, N>) {
        let (producer, consumer) = self.queue.split();
        (
            ByteProducer {
                producer,
                overruns: &self.overruns,
            },
            consumer,
        )
    }
}

/// Producer half of a [`ByteQueue`]
pub struct ByteProducer<'a, const N: usize> {
    producer: Producer<'a, u8, N>,
    overruns: &'a AtomicU32,
}

impl<'a, const N: usize> ByteProducer<'a, N> {
    /// Enqueue a received byte
    ///
    /// Never blocks. When the queue is full the byte is dropped, the overrun
    /// counter is bumped and `false` is returned.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.producer.enqueue(byte).is_ok() {
            return true;
        }
        self.overruns.fetch_add(1, Ordering::Relaxed);
        false
    }

    /// Enqueue a burst of bytes, returning how many were accepted
    pub fn push_slice(&mut self, bytes: &[u8]) -> usize {
        let mut accepted = 0;
        for &byte in bytes {
            if self.push(byte) {
                accepted += 1;
            }
        }
        accepted
    }

    /// Check if the queue has room for another byte
    pub fn ready(&self) -> bool {
        self.producer.ready()
    }

    /// Bytes dropped because the queue was full
    pub fn overruns(&self) -> u32 {
        self.overruns.load(Ordering::Relaxed)
    }
}
