//! Presentation state machine.
//!
//! Pure: consumes [`AppEvent`]s, returns [`AppAction`]s, owns no I/O. The
//! runtime executes the actions and feeds outcomes back as new events,
//! which makes every flow here drivable from a plain test.

mod action;
mod event;
mod form;
mod state;

pub use action::AppAction;
pub use event::AppEvent;
pub use form::{AddressForm, FormField};
pub use state::{Bubble, Origin, Role};

use std::net::SocketAddr;

use tincan_core::{DisconnectReason, LinkState};

use crate::input::{InputState, KeyInput};

/// Presentation state for one side of the link.
#[derive(Debug, Clone)]
pub struct App {
    role: Role,
    link: LinkState,
    local: Option<SocketAddr>,
    peer: Option<SocketAddr>,
    transcript: Vec<Bubble>,
    message: InputState,
    form: Option<AddressForm>,
    status: Option<String>,
    disconnect: Option<DisconnectReason>,
    terminal_size: (u16, u16),
    persist_on_submit: bool,
}

impl App {
    /// Create the listening-side app. The listener needs no address from
    /// the user, so its link counts as connecting from the start.
    #[must_use]
    pub fn listener() -> Self {
        Self::new(Role::Listener, LinkState::Connecting, None, false)
    }

    /// Create the dialing-side app.
    ///
    /// With `configured` the address is already resolved (flag or config
    /// file) and the link starts connecting. Without it the address form
    /// opens, and a submitted address is also persisted.
    #[must_use]
    pub fn dialer(configured: bool) -> Self {
        if configured {
            Self::new(Role::Dialer, LinkState::Connecting, None, false)
        } else {
            Self::new(
                Role::Dialer,
                LinkState::Unconfigured,
                Some(AddressForm::new(true)),
                true,
            )
        }
    }

    fn new(
        role: Role,
        link: LinkState,
        form: Option<AddressForm>,
        persist_on_submit: bool,
    ) -> Self {
        Self {
            role,
            link,
            local: None,
            peer: None,
            transcript: Vec::new(),
            message: InputState::new(),
            form,
            status: None,
            disconnect: None,
            terminal_size: (0, 0),
            persist_on_submit,
        }
    }

    /// Process one event into actions for the runtime.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::Listening { local } => {
                self.local = Some(local);
                vec![AppAction::Render]
            },
            AppEvent::Connected { local, peer } => {
                self.link = LinkState::Connected;
                self.local = Some(local);
                self.peer = Some(peer);
                self.status = None;
                vec![AppAction::Render]
            },
            AppEvent::MessageReceived { text } => {
                self.transcript.push(Bubble::received(text));
                vec![AppAction::Render]
            },
            AppEvent::Disconnected { reason } => {
                self.link = LinkState::Closed;
                self.disconnect = Some(reason);
                // A transient notice must not mask the disconnect banner.
                self.status = None;
                vec![AppAction::Render]
            },
            AppEvent::SendFailed { message } => {
                self.status = Some(message);
                vec![AppAction::Render]
            },
        }
    }

    fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        if self.form.is_some() {
            return self.handle_form_key(key);
        }
        match key {
            KeyInput::Esc => vec![AppAction::Quit],
            KeyInput::F2 => self.open_form(),
            KeyInput::Enter => self.submit_message(),
            key => {
                // The message line only takes input while the link is up.
                if self.link == LinkState::Connected && self.message.handle_edit(key) {
                    vec![AppAction::Render]
                } else {
                    vec![]
                }
            },
        }
    }

    fn handle_form_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        if key == KeyInput::Esc {
            self.form = None;
            return vec![AppAction::Render];
        }
        let Some(form) = self.form.as_mut() else {
            return vec![];
        };
        match form.handle_key(key) {
            Some(addr) => {
                let persist = form.persist;
                self.form = None;
                self.link = LinkState::Connecting;
                self.status = None;

                let mut actions = vec![AppAction::SupplyAddress { addr }];
                if persist {
                    actions.push(AppAction::StoreConfig { addr });
                }
                actions.push(AppAction::Render);
                actions
            },
            None => vec![AppAction::Render],
        }
    }

    /// Reopen the address form. Only meaningful on the dialing side before
    /// an address was supplied; the dial target is immutable afterwards.
    fn open_form(&mut self) -> Vec<AppAction> {
        if self.role != Role::Dialer || self.link != LinkState::Unconfigured {
            return vec![];
        }
        self.form = Some(AddressForm::new(self.persist_on_submit));
        vec![AppAction::Render]
    }

    fn submit_message(&mut self) -> Vec<AppAction> {
        if self.link != LinkState::Connected {
            return vec![];
        }
        let text = self.message.take();
        // Empty sends would be invisible zero-byte writes; ignore them.
        if text.is_empty() {
            return vec![];
        }
        self.transcript.push(Bubble::sent(text.clone()));
        vec![AppAction::Send { text }, AppAction::Render]
    }

    /// Which side of the link this app drives.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Mirror of the link lifecycle state.
    #[must_use]
    pub fn link(&self) -> LinkState {
        self.link
    }

    /// Local socket address, once known.
    #[must_use]
    pub fn local(&self) -> Option<SocketAddr> {
        self.local
    }

    /// Peer socket address, once connected.
    #[must_use]
    pub fn peer(&self) -> Option<SocketAddr> {
        self.peer
    }

    /// Transcript entries in display order.
    #[must_use]
    pub fn transcript(&self) -> &[Bubble] {
        &self.transcript
    }

    /// The message line editing state.
    #[must_use]
    pub fn message(&self) -> &InputState {
        &self.message
    }

    /// The address form, while open.
    #[must_use]
    pub fn form(&self) -> Option<&AddressForm> {
        self.form.as_ref()
    }

    /// Transient status message, if any (e.g. a failed send).
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Why the link closed, once it has.
    #[must_use]
    pub fn disconnect_reason(&self) -> Option<&DisconnectReason> {
        self.disconnect.as_ref()
    }

    /// Last reported terminal size (columns, rows).
    #[must_use]
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connected() -> App {
        let mut app = App::dialer(true);
        app.handle(AppEvent::Connected {
            local: "127.0.0.1:50000".parse().unwrap(),
            peer: "127.0.0.1:9092".parse().unwrap(),
        });
        app
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle(AppEvent::Key(KeyInput::Char(c)));
        }
    }

    #[test]
    fn enter_sends_and_clears_the_message_line() {
        let mut app = connected();
        type_text(&mut app, "hello");

        let actions = app.handle(AppEvent::Key(KeyInput::Enter));
        assert_eq!(
            actions,
            vec![AppAction::Send { text: "hello".to_owned() }, AppAction::Render]
        );
        assert!(app.message().is_empty());
        assert_eq!(app.transcript(), &[Bubble::sent("hello")]);
    }

    #[test]
    fn empty_enter_sends_nothing() {
        let mut app = connected();
        assert!(app.handle(AppEvent::Key(KeyInput::Enter)).is_empty());
        assert!(app.transcript().is_empty());
    }

    #[test]
    fn typing_is_ignored_until_connected() {
        let mut app = App::dialer(true);
        type_text(&mut app, "too early");
        assert!(app.message().is_empty());
        assert!(app.handle(AppEvent::Key(KeyInput::Enter)).is_empty());
    }

    #[test]
    fn esc_quits_outside_the_form() {
        let mut app = connected();
        assert_eq!(app.handle(AppEvent::Key(KeyInput::Esc)), vec![AppAction::Quit]);
    }

    #[test]
    fn disconnect_closes_the_link_and_disables_sending() {
        let mut app = connected();
        app.handle(AppEvent::Disconnected { reason: DisconnectReason::PeerClosed });

        assert_eq!(app.link(), LinkState::Closed);
        assert_eq!(app.disconnect_reason(), Some(&DisconnectReason::PeerClosed));

        type_text(&mut app, "anyone there?");
        assert!(app.handle(AppEvent::Key(KeyInput::Enter)).is_empty());
        assert!(app.transcript().is_empty());
    }

    #[test]
    fn received_chunks_append_in_order() {
        let mut app = connected();
        app.handle(AppEvent::MessageReceived { text: "first".to_owned() });
        app.handle(AppEvent::MessageReceived { text: "second".to_owned() });

        assert_eq!(
            app.transcript(),
            &[Bubble::received("first"), Bubble::received("second")]
        );
    }

    #[test]
    fn f2_reopens_the_form_only_before_an_address_exists() {
        let mut app = App::dialer(false);
        assert!(app.form().is_some(), "first run opens the form");

        // Cancel, then reopen.
        app.handle(AppEvent::Key(KeyInput::Esc));
        assert!(app.form().is_none());
        app.handle(AppEvent::Key(KeyInput::F2));
        assert!(app.form().is_some());

        // Once connecting, the target is locked in.
        let mut app = App::dialer(true);
        assert!(app.handle(AppEvent::Key(KeyInput::F2)).is_empty());
        assert!(app.form().is_none());
    }
}
