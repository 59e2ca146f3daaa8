//! Byte sources the decoder can pull from
//!
//! A source yields bytes one at a time, in order, without duplication. How
//! bytes are buffered upstream (UART FIFO, ring buffer, file) is up to the
//! source; full/empty signalling belongs to it as well.

use heapless::spsc::Consumer;
use heapless::Deque;

/// Pull-one-byte-at-a-time input
pub trait ByteSource {
    /// Check whether a byte is available without consuming it
    fn has_item(&self) -> bool;

    /// Take the next byte, if any
    fn pop(&mut self) -> Option<u8>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn has_item(&self) -> bool {
        (**self).has_item()
    }

    fn pop(&mut self) -> Option<u8> {
        (**self).pop()
    }
}

impl<const N: usize> ByteSource for Deque<u8, N> {
    fn has_item(&self) -> bool {
        !self.is_empty()
    }

    fn pop(&mut self) -> Option<u8> {
        self.pop_front()
    }
}

impl<'a, const N: usize> ByteSource for Consumer<'a, u8, N> {
    fn has_item(&self) -> bool {
        self.ready()
    }

    fn pop(&mut self) -> Option<u8> {
        self.dequeue()
    }
}

/// Cursor over a borrowed byte slice
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    /// Create a source positioned at the start of `bytes`
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Bytes not yet popped
    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    /// Number of bytes popped so far
    pub fn consumed(&self) -> usize {
        self.pos
    }
}

impl ByteSource for SliceSource<'_> {
    fn has_item(&self) -> bool {
        self.pos < self.bytes.len()
    }

    fn pop(&mut self) -> Option<u8> {
        let byte = *self.bytes.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::spsc::Queue;

    #[test]
    fn test_slice_source_order() {
        let mut src = SliceSource::new(&[1, 2, 3]);
        assert!(src.has_item());
        assert_eq!(src.pop(), Some(1));
        assert_eq!(src.remaining(), &[2, 3]);
        assert_eq!(src.pop(), Some(2));
        assert_eq!(src.pop(), Some(3));
        assert!(!src.has_item());
        assert_eq!(src.pop(), None);
        assert_eq!(src.consumed(), 3);
    }

    #[test]
    fn test_deque_source_is_fifo() {
        let mut deque: Deque<u8, 4> = Deque::new();
        deque.push_back(0x02).unwrap();
        deque.push_back(0x00).unwrap();

        assert!(deque.has_item());
        assert_eq!(ByteSource::pop(&mut deque), Some(0x02));
        assert_eq!(ByteSource::pop(&mut deque), Some(0x00));
        assert!(!deque.has_item());
    }

    #[test]
    fn test_spsc_consumer_source() {
        let mut queue: Queue<u8, 4> = Queue::new();
        let (mut producer, mut consumer) = queue.split();

        assert!(!consumer.has_item());
        producer.enqueue(7).unwrap();
        assert!(consumer.has_item());
        assert_eq!(ByteSource::pop(&mut consumer), Some(7));
    }
}
