//! Connection lifecycle state machine.
//!
//! Tracks one end of the single peer link from "no address yet" to the
//! absorbing closed state. The net crate drives it from its network task;
//! keeping it pure means the transition rules are testable without sockets.
//!
//! # State Machine
//!
//! ```text
//! ┌──────────────┐ configure  ┌────────────┐ establish  ┌───────────┐
//! │ Unconfigured │───────────>│ Connecting │───────────>│ Connected │
//! └──────────────┘            └────────────┘            └───────────┘
//!        │                          │                         │
//!        │ close                    │ close                   │ close
//!        ↓                          ↓                         ↓
//!      ┌─────────────────────────────────────────────────────────┐
//!      │                         Closed                          │
//!      └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Refused connection attempts loop inside the transport's retry and never
//! show up as transitions here. Every state reaches `Closed`; `Closed` has
//! no way out, and the first close reason sticks.

use thiserror::Error;

use crate::error::LinkError;

/// Lifecycle states of the peer link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No peer address supplied yet; nothing is happening on the network.
    Unconfigured,
    /// Dialing the peer (with retry) or waiting for one to accept.
    Connecting,
    /// The byte stream is up in both directions.
    Connected,
    /// The link ended; terminal.
    Closed,
}

/// Why a link ended, carried in the terminal notification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DisconnectReason {
    /// The peer shut down its end of the stream (zero-length read).
    #[error("peer closed the connection")]
    PeerClosed,
    /// The receive loop hit a socket error. Carries the rendered error.
    #[error("{0}")]
    RecvFailed(String),
    /// The peer sent bytes that do not decode as UTF-8. Fatal: the stream
    /// is unframed text with no point to resynchronize at.
    #[error("peer sent invalid UTF-8")]
    InvalidUtf8,
    /// The connection attempt failed with an error retry does not cover.
    #[error("{0}")]
    ConnectFailed(String),
    /// The listening socket failed while binding or accepting the peer.
    #[error("{0}")]
    BindFailed(String),
}

/// State machine for one end of the peer link.
///
/// Transitions are forward-only. [`Link::close`] is total and idempotent;
/// everything else returns [`LinkError`] when called out of order.
#[derive(Debug, Clone, Default)]
pub struct Link {
    state: LinkState,
    disconnect_reason: Option<DisconnectReason>,
}

impl Default for LinkState {
    fn default() -> Self {
        Self::Unconfigured
    }
}

impl Link {
    /// Create a link with no address configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// True once the link reached the terminal state.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state == LinkState::Closed
    }

    /// Why the link closed, once it has.
    #[must_use]
    pub fn disconnect_reason(&self) -> Option<&DisconnectReason> {
        self.disconnect_reason.as_ref()
    }

    /// A peer address is known; start connecting.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::InvalidTransition`] unless the link is
    /// `Unconfigured`.
    pub fn configure(&mut self) -> Result<(), LinkError> {
        match self.state {
            LinkState::Unconfigured => {
                self.state = LinkState::Connecting;
                Ok(())
            },
            state => Err(LinkError::InvalidTransition {
                state,
                operation: "configure".to_owned(),
            }),
        }
    }

    /// The byte stream is up; the link is live.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::InvalidTransition`] unless the link is
    /// `Connecting`.
    pub fn establish(&mut self) -> Result<(), LinkError> {
        match self.state {
            LinkState::Connecting => {
                self.state = LinkState::Connected;
                Ok(())
            },
            state => Err(LinkError::InvalidTransition {
                state,
                operation: "establish".to_owned(),
            }),
        }
    }

    /// Close the link, recording why.
    ///
    /// Total from every state and idempotent: closing an already-closed
    /// link keeps the first reason.
    pub fn close(&mut self, reason: DisconnectReason) {
        if self.state == LinkState::Closed {
            return;
        }
        self.state = LinkState::Closed;
        self.disconnect_reason = Some(reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_lifecycle_reaches_connected() {
        let mut link = Link::new();
        assert_eq!(link.state(), LinkState::Unconfigured);

        link.configure().unwrap();
        assert_eq!(link.state(), LinkState::Connecting);

        link.establish().unwrap();
        assert_eq!(link.state(), LinkState::Connected);
        assert!(!link.is_closed());
    }

    #[test]
    fn establish_requires_connecting() {
        let mut link = Link::new();
        let err = link.establish().unwrap_err();
        assert_eq!(
            err,
            LinkError::InvalidTransition {
                state: LinkState::Unconfigured,
                operation: "establish".to_owned(),
            }
        );
    }

    #[test]
    fn configure_twice_is_rejected() {
        let mut link = Link::new();
        link.configure().unwrap();
        assert!(link.configure().is_err());
    }

    #[test]
    fn close_is_total_from_every_state() {
        for advance in 0..3 {
            let mut link = Link::new();
            if advance >= 1 {
                link.configure().unwrap();
            }
            if advance >= 2 {
                link.establish().unwrap();
            }
            link.close(DisconnectReason::PeerClosed);
            assert!(link.is_closed());
            assert_eq!(link.disconnect_reason(), Some(&DisconnectReason::PeerClosed));
        }
    }

    #[test]
    fn double_close_keeps_first_reason() {
        let mut link = Link::new();
        link.configure().unwrap();
        link.establish().unwrap();

        link.close(DisconnectReason::PeerClosed);
        link.close(DisconnectReason::InvalidUtf8);

        assert_eq!(link.disconnect_reason(), Some(&DisconnectReason::PeerClosed));
    }

    #[test]
    fn closed_rejects_forward_transitions() {
        let mut link = Link::new();
        link.close(DisconnectReason::ConnectFailed("unreachable".to_owned()));

        assert!(link.configure().is_err());
        assert!(link.establish().is_err());
        assert_eq!(link.state(), LinkState::Closed);
    }

    #[test]
    fn reason_is_absent_until_close() {
        let mut link = Link::new();
        assert_eq!(link.disconnect_reason(), None);
        link.configure().unwrap();
        assert_eq!(link.disconnect_reason(), None);
    }
}
