//! Core state machines and shared types for the tincan peer link.
//!
//! Pure logic only: no sockets, no terminal, no I/O. The net crate drives
//! these types from its tokio task and the TUI mirrors them on the
//! presentation side, which keeps every rule here testable without a peer.
//!
//! # Components
//!
//! - [`Link`]: connection lifecycle state machine (forward-only, with an
//!   absorbing closed state)
//! - [`Inbox`]: notified FIFO handing received text to the presentation layer
//! - [`PeerAddr`]: validated dotted-quad address of the single peer
//! - [`AddressErrors`]: per-field classification of user-supplied addresses
//! - [`DisconnectReason`]: why a link ended, for the terminal notification

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod address;
mod error;
mod inbox;
mod link;

pub use address::{AddressErrors, PeerAddr};
pub use error::LinkError;
pub use inbox::Inbox;
pub use link::{DisconnectReason, Link, LinkState};
