//! Async runtime.
//!
//! Event loop that drives terminal I/O and coordinates the pure [`App`]
//! with the link task. One `tokio::select!` multiplexes terminal events,
//! lifecycle events, and inbox wakeups; every state change goes through
//! the app and every side effect comes back out of it as an action.

use std::{
    io::{self, Stdout, stdout},
    net::SocketAddr,
    path::PathBuf,
};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use tincan_core::PeerAddr;
use tincan_net::{LinkEvent, LinkHandle, Outbound, spawn_dial, spawn_listen, transport};
use tokio::sync::watch;

use crate::{
    App, Theme,
    app::{AppAction, AppEvent},
    config::{self, ChatConfig},
    input::KeyInput,
    ui,
};

/// Runtime errors.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Async runtime for the chat TUI.
///
/// Manages terminal setup/teardown and the main event loop. The network
/// task runs on its own; the runtime only talks to it through the
/// [`LinkHandle`] and the watch channel carrying the dial address.
pub struct Runtime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    app: App,
    theme: Theme,
    handle: LinkHandle,
    outbound: Option<Outbound>,
    addr_tx: Option<watch::Sender<Option<PeerAddr>>>,
    config_path: PathBuf,
    events_closed: bool,
}

impl Runtime {
    /// Host a chat: bind `bind_addr` and wait for the one peer.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Io`] when the terminal cannot be set up.
    pub fn host(
        bind_addr: SocketAddr,
        theme: Theme,
        config_path: PathBuf,
    ) -> Result<Self, RuntimeError> {
        let handle = spawn_listen(bind_addr);
        Self::create(App::listener(), theme, handle, None, config_path)
    }

    /// Join a chat: dial `addr` right away, or open the address form when
    /// none is resolved yet.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Io`] when the terminal cannot be set up.
    pub fn join(
        addr: Option<PeerAddr>,
        theme: Theme,
        config_path: PathBuf,
    ) -> Result<Self, RuntimeError> {
        let (addr_tx, addr_rx) = watch::channel(addr);
        let handle = spawn_dial(addr_rx, transport::DEFAULT_RETRY_BACKOFF);
        let app = App::dialer(addr.is_some());
        Self::create(app, theme, handle, Some(addr_tx), config_path)
    }

    fn create(
        app: App,
        theme: Theme,
        handle: LinkHandle,
        addr_tx: Option<watch::Sender<Option<PeerAddr>>>,
        config_path: PathBuf,
    ) -> Result<Self, RuntimeError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            app,
            theme,
            handle,
            outbound: None,
            addr_tx,
            config_path,
            events_closed: false,
        })
    }

    /// Run the main event loop until quit or terminal failure.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Io`] when the terminal fails; link failures
    /// are not errors here, they surface in the UI as a disconnect.
    pub async fn run(mut self) -> Result<(), RuntimeError> {
        self.render()?;

        let mut event_stream = EventStream::new();

        loop {
            let events = tokio::select! {
                biased;

                // Terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => {
                            Self::convert_terminal_event(event).into_iter().collect::<Vec<_>>()
                        },
                        Some(Err(e)) => return Err(RuntimeError::Io(e)),
                        // Terminal gone; nothing left to drive.
                        None => return Ok(()),
                    }
                }

                // Link lifecycle events, until the task hangs up
                link_event = self.handle.events.recv(), if !self.events_closed => {
                    match link_event {
                        Some(event) => self.handle_link_event(event),
                        None => {
                            self.events_closed = true;
                            vec![]
                        },
                    }
                }

                // Received text
                () = self.handle.inbox.notified() => {
                    self.drain_inbox()
                }
            };

            for event in events {
                if self.dispatch(event).await? {
                    return Ok(());
                }
            }
        }
    }

    /// Convert a crossterm event into an app event, dropping the rest.
    fn convert_terminal_event(event: Event) -> Option<AppEvent> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                Self::convert_key(key.code).map(AppEvent::Key)
            },
            Event::Resize(cols, rows) => Some(AppEvent::Resize(cols, rows)),
            _ => None,
        }
    }

    /// Convert crossterm `KeyCode` to `KeyInput`.
    fn convert_key(code: KeyCode) -> Option<KeyInput> {
        match code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Tab => Some(KeyInput::Tab),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            KeyCode::F(2) => Some(KeyInput::F2),
            _ => None,
        }
    }

    /// Translate one lifecycle event into app events, keeping the write
    /// half when it is handed over.
    fn handle_link_event(&mut self, event: LinkEvent) -> Vec<AppEvent> {
        match event {
            LinkEvent::Listening { local } => vec![AppEvent::Listening { local }],
            LinkEvent::Connected { outbound } => {
                let local = outbound.local_addr();
                let peer = outbound.peer_addr();
                self.outbound = Some(outbound);
                vec![AppEvent::Connected { local, peer }]
            },
            LinkEvent::Disconnected { reason } => {
                self.outbound = None;
                // Chunks pushed before the link died must not hide behind
                // the terminal notification; drain them first.
                let mut events = self.drain_inbox();
                events.push(AppEvent::Disconnected { reason });
                events
            },
        }
    }

    fn drain_inbox(&self) -> Vec<AppEvent> {
        self.handle
            .inbox
            .drain_all()
            .into_iter()
            .map(|text| AppEvent::MessageReceived { text })
            .collect()
    }

    /// Feed one event through the app and execute the resulting actions.
    /// Returns true on quit.
    async fn dispatch(&mut self, event: AppEvent) -> Result<bool, RuntimeError> {
        let actions = self.app.handle(event);
        for action in actions {
            match action {
                AppAction::Render => self.render()?,
                AppAction::Quit => return Ok(true),
                AppAction::Send { text } => self.send(&text).await?,
                AppAction::SupplyAddress { addr } => {
                    if let Some(tx) = &self.addr_tx {
                        // The link task holds the receiver for its whole
                        // life; a failed send means it already died and
                        // Disconnected is on its way.
                        let _ = tx.send(Some(addr));
                    }
                },
                AppAction::StoreConfig { addr } => {
                    let chat_config = ChatConfig::for_addr(addr);
                    if let Err(err) = config::store(&self.config_path, &chat_config) {
                        tracing::warn!(
                            %err,
                            path = %self.config_path.display(),
                            "could not persist the address",
                        );
                    }
                },
            }
        }
        Ok(false)
    }

    async fn send(&mut self, text: &str) -> Result<(), RuntimeError> {
        let Some(outbound) = self.outbound.as_mut() else {
            // Sending is only enabled while connected; a missing handle
            // means the link died between render and keypress.
            return Ok(());
        };
        if let Err(err) = outbound.send(text).await {
            tracing::warn!(%err, "send failed");
            let actions = self.app.handle(AppEvent::SendFailed { message: err.to_string() });
            for action in actions {
                if action == AppAction::Render {
                    self.render()?;
                }
            }
        }
        Ok(())
    }

    fn render(&mut self) -> Result<(), RuntimeError> {
        self.terminal.draw(|frame| {
            ui::render(frame, &self.app, &self.theme);
        })?;
        Ok(())
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.handle.stop();
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}
