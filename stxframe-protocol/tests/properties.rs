use proptest::collection::vec;
use proptest::prelude::*;

use stxframe_protocol::{
    FailureKind, Frame, FrameDecoder, Phase, Signal, END_MARKER, START_MARKER,
};

fn wire(payload: &[u8], checksum: u8) -> Vec<u8> {
    let frame: Frame = Frame::new(payload, checksum).unwrap();
    frame.encode_to_vec().unwrap().to_vec()
}

proptest! {
    #[test]
    fn valid_frame_ready_on_last_byte_only(
        payload in vec(any::<u8>(), 0..=255),
        checksum in any::<u8>(),
    ) {
        let bytes = wire(&payload, checksum);
        let mut decoder: FrameDecoder = FrameDecoder::new();

        let (last, rest) = bytes.split_last().unwrap();
        for &byte in rest {
            prop_assert_eq!(decoder.feed(byte), Signal::InProgress);
        }
        prop_assert_eq!(decoder.feed(*last), Signal::FrameReady);
        prop_assert_eq!(decoder.payload(), &payload[..]);
        prop_assert_eq!(decoder.checksum(), checksum);
    }

    #[test]
    fn noise_without_start_is_discarded(
        noise in vec(any::<u8>().prop_filter("not START", |b| *b != START_MARKER), 0..512),
    ) {
        let mut decoder: FrameDecoder = FrameDecoder::new();
        for byte in noise {
            prop_assert_eq!(decoder.feed(byte), Signal::InProgress);
            prop_assert_eq!(decoder.phase(), Phase::AwaitStart);
        }
        prop_assert_eq!(decoder.feed(START_MARKER), Signal::InProgress);
        prop_assert_eq!(decoder.phase(), Phase::ReadLength);
    }

    #[test]
    fn corrupted_trailer_is_an_error(
        payload in vec(any::<u8>(), 0..=255),
        checksum in any::<u8>(),
        trailer in any::<u8>().prop_filter("not END", |b| *b != END_MARKER),
    ) {
        let mut bytes = wire(&payload, checksum);
        *bytes.last_mut().unwrap() = trailer;

        let mut decoder: FrameDecoder = FrameDecoder::new();
        let signals: Vec<Signal> = bytes.iter().map(|&b| decoder.feed(b)).collect();

        prop_assert_eq!(signals.last(), Some(&Signal::FrameError));
        prop_assert!(!signals.contains(&Signal::FrameReady));
        prop_assert_eq!(
            decoder.failure().map(|f| f.kind),
            Some(FailureKind::BadEndMarker { found: trailer })
        );
    }

    #[test]
    fn oversized_length_rejected_at_length_byte(declared in 17u8..=255) {
        let mut decoder: FrameDecoder<16> = FrameDecoder::new();

        prop_assert_eq!(decoder.feed(START_MARKER), Signal::InProgress);
        prop_assert_eq!(decoder.feed(declared), Signal::FrameError);
        prop_assert!(decoder.payload().is_empty());
        prop_assert_eq!(decoder.failure().map(|f| f.phase), Some(Phase::ReadLength));
    }

    #[test]
    fn no_state_leaks_between_frames(
        first in vec(any::<u8>(), 0..64),
        cut in any::<prop::sample::Index>(),
        bad_trailer in any::<bool>(),
        second in vec(any::<u8>(), 0..64),
        checksum in any::<u8>(),
    ) {
        let target = wire(&second, checksum);

        let mut fresh: FrameDecoder = FrameDecoder::new();
        let (_, expected) = fresh.feed_slice(&target);

        // Stop anywhere up to and including the END byte, optionally with a
        // corrupted trailer, then reinitialize
        let mut earlier = wire(&first, 0);
        if bad_trailer {
            *earlier.last_mut().unwrap() = END_MARKER ^ 0xFF;
        }
        let stop = cut.index(earlier.len() + 1);
        let mut reused: FrameDecoder = FrameDecoder::new();
        reused.feed_slice(&earlier[..stop]);
        if stop == earlier.len() {
            let terminal = if bad_trailer { Phase::Failed } else { Phase::Complete };
            prop_assert_eq!(reused.phase(), terminal);
        }
        reused.initialize();
        let (_, signal) = reused.feed_slice(&target);

        prop_assert_eq!(signal, expected);
        prop_assert_eq!(reused.frame(), fresh.frame());
    }

    #[test]
    fn no_state_leaks_after_capacity_error(
        declared in 17u8..=255,
        second in vec(any::<u8>(), 0..=16),
        checksum in any::<u8>(),
    ) {
        let target = wire(&second, checksum);

        let mut fresh: FrameDecoder<16> = FrameDecoder::new();
        let (_, expected) = fresh.feed_slice(&target);

        let mut reused: FrameDecoder<16> = FrameDecoder::new();
        let (_, signal) = reused.feed_slice(&[START_MARKER, declared]);
        prop_assert_eq!(signal, Signal::FrameError);
        prop_assert_eq!(reused.phase(), Phase::Failed);
        reused.initialize();
        let (_, signal) = reused.feed_slice(&target);

        prop_assert_eq!(signal, expected);
        prop_assert_eq!(reused.payload(), fresh.payload());
        prop_assert_eq!(reused.checksum(), fresh.checksum());
    }

    #[test]
    fn back_to_back_frames(
        frames in vec((vec(any::<u8>(), 0..32), any::<u8>()), 1..8),
    ) {
        let mut stream = Vec::new();
        for (payload, checksum) in &frames {
            stream.extend(wire(payload, *checksum));
        }

        let mut decoder: FrameDecoder = FrameDecoder::new();
        let mut decoded = Vec::new();
        for byte in stream {
            if decoder.feed(byte) == Signal::FrameReady {
                let frame = decoder.frame().unwrap();
                decoded.push((frame.payload().to_vec(), frame.checksum));
            }
        }

        prop_assert_eq!(decoded, frames);
    }
}
