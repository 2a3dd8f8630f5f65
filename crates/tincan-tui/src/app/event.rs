//! Events fed into the app state machine.

use std::net::SocketAddr;

use tincan_core::DisconnectReason;

use crate::input::KeyInput;

/// Everything the runtime can feed into [`App::handle`](crate::App::handle).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyInput),
    /// Terminal resize (columns, rows).
    Resize(u16, u16),
    /// The listening socket is bound and waiting for the peer.
    Listening {
        /// Local address of the listening socket.
        local: SocketAddr,
    },
    /// The link is established.
    Connected {
        /// Local address of the connected socket.
        local: SocketAddr,
        /// Address of the peer.
        peer: SocketAddr,
    },
    /// One received chunk is ready to display.
    MessageReceived {
        /// Decoded text, boundaries as the socket produced them.
        text: String,
    },
    /// The link ended; nothing more will arrive.
    Disconnected {
        /// Why the link ended.
        reason: DisconnectReason,
    },
    /// A send failed; the link may or may not still be alive.
    SendFailed {
        /// Rendered failure for the status line.
        message: String,
    },
}
