//! Property tests for address validation.
//!
//! The classification must be total (no panic on any input), agree with
//! parsing, and flag each field independently.

use proptest::prelude::*;
use tincan_core::{AddressErrors, PeerAddr};

proptest! {
    #[test]
    fn prop_well_formed_pairs_are_valid(
        a in 0u8..=255,
        b in 0u8..=255,
        c in 0u8..=255,
        d in 0u8..=255,
        port in 0u32..=65535,
    ) {
        let host = format!("{a}.{b}.{c}.{d}");
        let errors = AddressErrors::check(&host, &port.to_string());
        prop_assert!(errors.is_valid(), "{host}:{port} classified as {errors}");
    }

    #[test]
    fn prop_out_of_range_octet_flags_host(
        bad in 256u32..=9999,
        b in 0u8..=255,
        c in 0u8..=255,
        d in 0u8..=255,
        port in 0u32..=65535,
    ) {
        let host = format!("{bad}.{b}.{c}.{d}");
        let errors = AddressErrors::check(&host, &port.to_string());
        prop_assert!(errors.invalid_host());
        prop_assert!(!errors.invalid_port());
    }

    #[test]
    fn prop_out_of_range_port_flags_port(
        a in 0u8..=255,
        b in 0u8..=255,
        c in 0u8..=255,
        d in 0u8..=255,
        port in 65536u64..=10_000_000,
    ) {
        let host = format!("{a}.{b}.{c}.{d}");
        let errors = AddressErrors::check(&host, &port.to_string());
        prop_assert!(!errors.invalid_host());
        prop_assert!(errors.invalid_port());
    }

    #[test]
    fn prop_classification_never_panics(host in ".{0,64}", port in ".{0,16}") {
        let _ = AddressErrors::check(&host, &port);
        let _ = format!("{host}:{port}").parse::<PeerAddr>();
    }

    #[test]
    fn prop_valid_classification_agrees_with_parsing(host in ".{0,32}", port in ".{0,8}") {
        let errors = AddressErrors::check(&host, &port);
        let parsed = format!("{host}:{port}").parse::<PeerAddr>();
        if errors.is_valid() {
            // A valid host never contains ':', so the joined form splits
            // back at the separator we inserted.
            prop_assert!(parsed.is_ok());
        }
    }

    #[test]
    fn prop_display_round_trips(
        a in 0u8..=255,
        b in 0u8..=255,
        c in 0u8..=255,
        d in 0u8..=255,
        port in 0u16..=65535,
    ) {
        let addr: PeerAddr = format!("{a}.{b}.{c}.{d}:{port}").parse().unwrap();
        let back: PeerAddr = addr.to_string().parse().unwrap();
        prop_assert_eq!(addr, back);
    }
}
