//! Actions the app returns for the runtime to execute.

use tincan_core::PeerAddr;

/// Side effects requested by [`App::handle`](crate::App::handle).
///
/// The app never performs these itself; returning them keeps it pure and
/// lets tests assert on intent instead of observing I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Redraw the UI.
    Render,
    /// Quit the application.
    Quit,
    /// Send text to the peer.
    Send {
        /// Message text, written to the wire as UTF-8.
        text: String,
    },
    /// Hand the dial address to the network task.
    SupplyAddress {
        /// Address the user picked.
        addr: PeerAddr,
    },
    /// Persist the picked address to the config file.
    StoreConfig {
        /// Address to persist.
        addr: PeerAddr,
    },
}
