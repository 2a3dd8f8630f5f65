//! Terminal UI for the tincan chat.
//!
//! The presentation half of the link: a pure [`App`] state machine, ratatui
//! rendering, and an async runtime bridging terminal events, lifecycle
//! events, and the shared inbox. Nothing here touches a socket beyond the
//! send handle the link hands over once it is up.
//!
//! # Components
//!
//! - [`app`]: event-in, actions-out presentation state (no I/O)
//! - [`ui`]: stateless ratatui rendering of an [`App`]
//! - [`runtime`]: the terminal + event loop that owns both
//! - [`config`]: the persisted `{server, port, theme}` record
//! - [`theme`]: the color palette the config selects

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod app;
pub mod config;
pub mod input;
pub mod runtime;
pub mod theme;
pub mod ui;

pub use app::{App, AppAction, AppEvent, Role};
pub use input::{InputState, KeyInput};
pub use runtime::{Runtime, RuntimeError};
pub use theme::Theme;
