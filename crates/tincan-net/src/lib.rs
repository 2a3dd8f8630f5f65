//! TCP transport for the tincan peer link.
//!
//! One socket, one peer: this crate dials or listens, then runs the read
//! loop that feeds the shared [`Inbox`](tincan_core::Inbox) while the
//! presentation layer keeps the write half. The wire carries raw UTF-8
//! text with no framing; chunk boundaries are whatever the socket returns.
//!
//! # Components
//!
//! - [`transport`]: connect-with-retry, single-accept listener, send handle
//! - [`lifecycle`]: the background task that orders startup and publishes
//!   [`LinkEvent`]s

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod lifecycle;
mod relay;
pub mod transport;

pub use lifecycle::{LinkEvent, LinkHandle, spawn_dial, spawn_listen};
pub use transport::{Listener, Outbound, TransportError};
