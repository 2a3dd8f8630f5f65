//! Modal address form.
//!
//! A two-field dialog (host, port) shown when no usable address is
//! configured, or reopened with F2 before the dial starts. Submitting
//! validates both fields in one pass and flags the bad ones for the
//! renderer to mark.

use tincan_core::{AddressErrors, PeerAddr};

use crate::input::{InputState, KeyInput};

/// Field focus inside the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    /// The dotted-quad host field.
    Host,
    /// The port field.
    Port,
}

/// State of the modal address form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressForm {
    /// Host field editing state.
    pub host: InputState,
    /// Port field editing state.
    pub port: InputState,
    /// Which field has focus.
    pub focus: FormField,
    /// Validation result of the last submit attempt.
    pub errors: AddressErrors,
    /// Persist the address on submit. Set on a first run, when no usable
    /// config file existed yet.
    pub persist: bool,
}

impl AddressForm {
    /// Create an empty form with focus on the host field.
    #[must_use]
    pub fn new(persist: bool) -> Self {
        Self {
            host: InputState::new(),
            port: InputState::new(),
            focus: FormField::Host,
            errors: AddressErrors::NONE,
            persist,
        }
    }

    /// Handle a key. Returns the validated address on a successful submit;
    /// the caller closes the form.
    pub fn handle_key(&mut self, key: KeyInput) -> Option<PeerAddr> {
        match key {
            KeyInput::Tab => {
                self.focus = match self.focus {
                    FormField::Host => FormField::Port,
                    FormField::Port => FormField::Host,
                };
                None
            },
            KeyInput::Enter => self.submit(),
            key => {
                let field = match self.focus {
                    FormField::Host => &mut self.host,
                    FormField::Port => &mut self.port,
                };
                field.handle_edit(key);
                None
            },
        }
    }

    /// Validate both fields. On failure the error bits stay set until the
    /// next submit, so the renderer keeps the bad fields marked while the
    /// user fixes them.
    fn submit(&mut self) -> Option<PeerAddr> {
        self.errors = AddressErrors::check(self.host.buffer(), self.port.buffer());
        if !self.errors.is_valid() {
            return None;
        }
        let host = self.host.buffer().parse().ok()?;
        let port = self.port.buffer().parse().ok()?;
        Some(PeerAddr::new(host, port))
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;

    fn type_text(form: &mut AddressForm, text: &str) {
        for c in text.chars() {
            assert_eq!(form.handle_key(KeyInput::Char(c)), None);
        }
    }

    #[test]
    fn typing_lands_in_the_focused_field() {
        let mut form = AddressForm::new(true);
        type_text(&mut form, "10.0.0.1");
        form.handle_key(KeyInput::Tab);
        type_text(&mut form, "9092");

        assert_eq!(form.host.buffer(), "10.0.0.1");
        assert_eq!(form.port.buffer(), "9092");
    }

    #[test]
    fn tab_cycles_between_the_two_fields() {
        let mut form = AddressForm::new(true);
        assert_eq!(form.focus, FormField::Host);
        form.handle_key(KeyInput::Tab);
        assert_eq!(form.focus, FormField::Port);
        form.handle_key(KeyInput::Tab);
        assert_eq!(form.focus, FormField::Host);
    }

    #[test]
    fn valid_submit_returns_the_address() {
        let mut form = AddressForm::new(true);
        type_text(&mut form, "192.168.1.1");
        form.handle_key(KeyInput::Tab);
        type_text(&mut form, "9092");

        let addr = form.handle_key(KeyInput::Enter);
        assert_eq!(addr, Some(PeerAddr::new(Ipv4Addr::new(192, 168, 1, 1), 9092)));
        assert!(form.errors.is_valid());
    }

    #[test]
    fn invalid_fields_are_both_flagged_and_the_form_stays() {
        let mut form = AddressForm::new(true);
        type_text(&mut form, "999.1.1.1");
        form.handle_key(KeyInput::Tab);
        type_text(&mut form, "-1");

        assert_eq!(form.handle_key(KeyInput::Enter), None);
        assert!(form.errors.invalid_host());
        assert!(form.errors.invalid_port());
    }

    #[test]
    fn fixing_the_fields_clears_the_flags_on_resubmit() {
        let mut form = AddressForm::new(false);
        type_text(&mut form, "not-an-ip");
        assert_eq!(form.handle_key(KeyInput::Enter), None);
        assert!(form.errors.invalid_host());

        // Clear the host and type a good pair.
        for _ in 0.."not-an-ip".len() {
            form.handle_key(KeyInput::Backspace);
        }
        type_text(&mut form, "127.0.0.1");
        form.handle_key(KeyInput::Tab);
        type_text(&mut form, "4000");

        let addr = form.handle_key(KeyInput::Enter);
        assert_eq!(addr, Some(PeerAddr::new(Ipv4Addr::LOCALHOST, 4000)));
    }

    #[test]
    fn empty_fields_fail_validation() {
        let mut form = AddressForm::new(true);
        assert_eq!(form.handle_key(KeyInput::Enter), None);
        assert!(form.errors.invalid_host());
        assert!(form.errors.invalid_port());
    }
}
