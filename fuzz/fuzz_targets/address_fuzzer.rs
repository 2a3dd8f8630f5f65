//! Fuzz target for address validation
//!
//! Feeds arbitrary host/port strings through [`AddressErrors::check`] and
//! [`PeerAddr`] parsing to find:
//! - Panics on malformed or non-ASCII input
//! - Disagreement between classification and parsing
//! - Display output that fails to round-trip
//!
//! The fuzzer should NEVER panic. Every input classifies; a clean
//! classification must parse.

#![no_main]

use std::str::FromStr;

use libfuzzer_sys::fuzz_target;
use tincan_core::{AddressErrors, PeerAddr};

fuzz_target!(|input: (&str, &str)| {
    let (host, port) = input;

    // Classification is total over arbitrary strings.
    let errors = AddressErrors::check(host, port);

    // Accessors agree with the raw bitmask.
    assert_eq!(errors.is_valid(), errors.bits() == 0);
    assert_eq!(errors.invalid_host(), errors.bits() & AddressErrors::INVALID_HOST != 0);
    assert_eq!(errors.invalid_port(), errors.bits() & AddressErrors::INVALID_PORT != 0);

    if errors.is_valid() {
        // A clean classification means the joined pair parses.
        let addr = PeerAddr::from_str(&format!("{host}:{port}"))
            .expect("valid classification must parse");

        // Display output reparses to the same address.
        let reparsed = PeerAddr::from_str(&addr.to_string()).expect("display must reparse");
        assert_eq!(addr, reparsed);
    }
});
