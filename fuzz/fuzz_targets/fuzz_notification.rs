//! Fuzz target: `LinkMailbox::post_notification`
//!
//! Splits the input into a stream of notification payloads (each prefixed
//! by a length byte) and feeds them through the mailbox, checking:
//! - No panics under any byte sequence
//! - Payloads shorter than 2 bytes are rejected and counted
//! - An accepted sample never carries bpm 0 and always differs from the
//!   previously held value
//! - Every payload is either accepted, filtered, or rejected exactly once
//!
//! cargo fuzz run fuzz_notification

#![no_main]

use hrfan::mailbox::LinkMailbox;
use hrfan::sensors::heart_rate::Verdict;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mailbox = LinkMailbox::new();
    let mut rest = data;
    let mut posted = 0u32;
    let mut accepted = 0u32;
    let mut now_ms = 0u64;

    while let [len, tail @ ..] = rest {
        let len = (*len as usize % 8).min(tail.len());
        let (payload, next) = tail.split_at(len);
        rest = next;
        now_ms += 1_000;

        let held = mailbox.held_bpm();
        posted += 1;
        match mailbox.post_notification(payload, now_ms) {
            Ok(Verdict::Accepted(sample)) => {
                accepted += 1;
                assert_ne!(sample.bpm, 0);
                assert_ne!(sample.bpm, held);
                assert_eq!(sample.bpm, payload[1]);
                assert_eq!(mailbox.take_sample(), Some(sample));
            }
            Ok(Verdict::Filtered(_)) => assert!(payload.len() >= 2),
            Err(_) => assert!(payload.len() < 2),
        }

        // Occasionally drop the link to exercise the held-value reset.
        if payload.first() == Some(&0xFF) {
            mailbox.post_disconnect();
            assert!(mailbox.take_link_lost());
            assert_eq!(mailbox.held_bpm(), 0);
        }
    }

    assert_eq!(
        accepted + mailbox.filtered_readings() + mailbox.rejected_payloads(),
        posted
    );
});
