//! Presentation state types.

/// Which side of the link this process is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Binds the fixed address and waits for the peer.
    Listener,
    /// Connects to a configured address.
    Dialer,
}

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Typed locally and sent to the peer.
    Sent,
    /// Received from the peer.
    Received,
}

/// One transcript entry: a sent message, or one received chunk.
///
/// Received entries are chunk-per-bubble on purpose. The wire has no
/// framing, so a chunk is the only message boundary there is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bubble {
    /// Message text.
    pub text: String,
    /// Sent or received.
    pub origin: Origin,
}

impl Bubble {
    /// A locally sent entry.
    pub fn sent(text: impl Into<String>) -> Self {
        Self { text: text.into(), origin: Origin::Sent }
    }

    /// A received entry.
    pub fn received(text: impl Into<String>) -> Self {
        Self { text: text.into(), origin: Origin::Received }
    }
}
