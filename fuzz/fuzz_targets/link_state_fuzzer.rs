//! Fuzz target for the link lifecycle state machine
//!
//! Drives [`Link`] with arbitrary operation sequences to find:
//! - Backward transitions
//! - Escapes from the terminal state
//! - A later close overwriting the first reason
//!
//! # Strategy
//!
//! - Op soup: configure/establish/close in any order, valid or not
//! - Reasons: every disconnect reason variant, including carried strings
//!
//! # Invariants
//!
//! - State rank never decreases (forward-only machine)
//! - `Closed` is absorbing: no op leaves it
//! - The first close reason is retained across later closes
//! - Failed transitions leave the state untouched

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tincan_core::{DisconnectReason, Link, LinkState};

#[derive(Debug, Clone, Arbitrary)]
enum LinkOp {
    Configure,
    Establish,
    Close(ReasonChoice),
}

#[derive(Debug, Clone, Arbitrary)]
enum ReasonChoice {
    PeerClosed,
    RecvFailed(String),
    InvalidUtf8,
    ConnectFailed(String),
    BindFailed(String),
}

fuzz_target!(|ops: Vec<LinkOp>| {
    let mut link = Link::new();
    let mut expected_reason: Option<DisconnectReason> = None;

    for op in ops {
        let before = link.state();

        match op {
            LinkOp::Configure => {
                if link.configure().is_err() {
                    assert_eq!(link.state(), before);
                }
            }
            LinkOp::Establish => {
                if link.establish().is_err() {
                    assert_eq!(link.state(), before);
                }
            }
            LinkOp::Close(choice) => {
                let reason = make_reason(choice);
                // close() is total, so the first Close op is the close
                // whose reason must survive.
                if expected_reason.is_none() {
                    expected_reason = Some(reason.clone());
                }
                link.close(reason);
                assert!(link.is_closed());
            }
        }

        if rank(link.state()) < rank(before) {
            panic!("state went backwards: {:?} -> {:?}", before, link.state());
        }
        if before == LinkState::Closed {
            assert_eq!(link.state(), LinkState::Closed);
        }
    }

    assert_eq!(link.disconnect_reason(), expected_reason.as_ref());
    assert_eq!(link.is_closed(), expected_reason.is_some());
});

fn rank(state: LinkState) -> u8 {
    match state {
        LinkState::Unconfigured => 0,
        LinkState::Connecting => 1,
        LinkState::Connected => 2,
        LinkState::Closed => 3,
    }
}

fn make_reason(choice: ReasonChoice) -> DisconnectReason {
    match choice {
        ReasonChoice::PeerClosed => DisconnectReason::PeerClosed,
        ReasonChoice::RecvFailed(detail) => DisconnectReason::RecvFailed(detail),
        ReasonChoice::InvalidUtf8 => DisconnectReason::InvalidUtf8,
        ReasonChoice::ConnectFailed(detail) => DisconnectReason::ConnectFailed(detail),
        ReasonChoice::BindFailed(detail) => DisconnectReason::BindFailed(detail),
    }
}
