//! Fuzz target: `advertises_service` (advertising data walker)
//!
//! Arbitrary advertising payloads must never panic, and a match must be
//! backed by a real 16-bit UUID list entry.
//!
//! cargo fuzz run fuzz_adv_parser

#![no_main]

use hrfan::adapters::ble_central::advertises_service;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let uuid = u16::from_le_bytes([data[0], data[1]]);
    let adv = &data[2..];

    if advertises_service(adv, uuid) {
        let needle = uuid.to_le_bytes();
        assert!(adv.windows(2).any(|w| w == needle));
    }
});
