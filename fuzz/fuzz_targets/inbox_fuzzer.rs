//! Fuzz target for the inbox delivery queue
//!
//! Runs arbitrary push/drain sequences against [`Inbox`] with a plain
//! `VecDeque` as the model to find:
//! - Lost or duplicated chunks
//! - Reordering across drains
//! - `len`/`is_empty` disagreeing with the contents
//!
//! # Invariants
//!
//! - Every drain returns exactly what the model holds, in push order
//! - `len` and `is_empty` always match the model
//! - The queue stays usable after any drain

#![no_main]

use std::collections::VecDeque;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tincan_core::Inbox;

#[derive(Debug, Clone, Arbitrary)]
enum InboxOp {
    Push(String),
    DrainAll,
}

fuzz_target!(|ops: Vec<InboxOp>| {
    let inbox = Inbox::new();
    let mut model: VecDeque<String> = VecDeque::new();

    for op in ops {
        match op {
            InboxOp::Push(chunk) => {
                model.push_back(chunk.clone());
                inbox.push(chunk);
            }
            InboxOp::DrainAll => {
                let drained = inbox.drain_all();
                let expected: Vec<String> = model.drain(..).collect();
                assert_eq!(drained, expected);
            }
        }

        assert_eq!(inbox.len(), model.len());
        assert_eq!(inbox.is_empty(), model.is_empty());
    }

    let drained = inbox.drain_all();
    let expected: Vec<String> = model.drain(..).collect();
    assert_eq!(drained, expected);
    assert!(inbox.is_empty());
});
