use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::EventInfo;
use crate::id;
use crate::types::{AvatarFile, AvatarPane, AvatarStatus, Field, FormState, Screen, Ticket};
use crate::validate::{self, ValidationError, AVATAR_HINT};
use crate::view::View;

/// Owns the form state and mediates between the entry view and the ticket view.
///
/// Every handler runs to completion and reports back through the [`View`].
/// Validation failures are never errors here: they are shown inline and the
/// handler returns `false` (or `None`).
pub struct FormController<V: View> {
    view: V,
    state: FormState,
    // What the file input control currently holds, accepted or not.
    file_input: Option<AvatarFile>,
    screen: Screen,
    ticket: Option<Ticket>,
    event: EventInfo,
    rng: StdRng,
}

impl<V: View> FormController<V> {
    pub fn new(view: V, event: EventInfo) -> Self {
        Self {
            view,
            state: FormState::default(),
            file_input: None,
            screen: Screen::Entry,
            ticket: None,
            event,
            rng: StdRng::from_entropy(),
        }
    }

    #[cfg(test)]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn set_full_name(&mut self, value: impl Into<String>) {
        self.state.full_name = value.into();
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.state.email = value.into();
    }

    pub fn set_username(&mut self, value: impl Into<String>) {
        self.state.username = value.into();
    }

    #[cfg(test)]
    pub fn state(&self) -> &FormState {
        &self.state
    }

    #[cfg(test)]
    pub fn file_input(&self) -> Option<&AvatarFile> {
        self.file_input.as_ref()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[cfg(test)]
    pub fn ticket(&self) -> Option<&Ticket> {
        self.ticket.as_ref()
    }

    #[cfg(test)]
    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn validate_full_name(&mut self) -> bool {
        let result = validate::full_name(&self.state.full_name);
        self.report(Field::FullName, result)
    }

    pub fn validate_email(&mut self) -> bool {
        let result = validate::email(&self.state.email);
        self.report(Field::Email, result)
    }

    pub fn validate_username(&mut self) -> bool {
        let result = validate::username(&self.state.username);
        self.report(Field::Username, result)
    }

    pub fn validate_avatar(&mut self) -> bool {
        match validate::avatar(self.file_input.as_ref()) {
            Ok(()) => {
                self.view
                    .set_avatar_status(&AvatarStatus::Info(AVATAR_HINT.to_string()));
                true
            }
            Err(err) => {
                self.view
                    .set_avatar_status(&AvatarStatus::Warning(err.to_string()));
                false
            }
        }
    }

    fn report(&mut self, field: Field, result: Result<(), ValidationError>) -> bool {
        self.view.set_field_error(field, result.as_ref().err());
        result.is_ok()
    }

    /// Run every validator so all messages show at once.
    pub fn validate_all(&mut self) -> bool {
        let results = [
            self.validate_full_name(),
            self.validate_email(),
            self.validate_username(),
            self.validate_avatar(),
        ];
        results.iter().all(|ok| *ok)
    }

    /// Validate and, if everything passes, issue the ticket and switch to the
    /// ticket view. The ticket view is terminal: later calls return the ticket
    /// already issued.
    pub fn submit(&mut self) -> Option<&Ticket> {
        if self.screen == Screen::Ticket {
            return self.ticket.as_ref();
        }
        if !self.validate_all() {
            return None;
        }
        let avatar = self.state.avatar.clone()?;

        self.state.username = validate::normalize_username(&self.state.username);

        let ticket = Ticket {
            number: id::ticket_number(&mut self.rng),
            full_name: self.state.full_name.clone(),
            email: self.state.email.clone(),
            username: self.state.username.clone(),
            avatar,
            event: self.event.clone(),
            issued: Utc::now(),
        };
        tracing::debug!(number = ticket.number, username = %ticket.username, "issued ticket");

        self.view.populate_ticket(&ticket);
        self.screen = Screen::Ticket;
        self.view.switch_view(Screen::Ticket);

        self.ticket = Some(ticket);
        self.ticket.as_ref()
    }

    /// Put `file` into the file input and accept it if it validates.
    /// A rejected file clears any previously accepted avatar.
    pub fn select_avatar(&mut self, file: AvatarFile) -> bool {
        self.file_input = Some(file);

        if !self.validate_avatar() {
            if self.state.avatar.take().is_some() {
                self.view.show_avatar_pane(&AvatarPane::Empty);
            }
            return false;
        }

        let Some(file) = self.file_input.as_ref() else {
            return false;
        };
        let avatar = id::avatar_ref(file);
        tracing::debug!(file = %avatar.file_name, size = file.size, "avatar accepted");

        self.view.show_avatar_pane(&AvatarPane::Preview(avatar.clone()));
        self.state.avatar = Some(avatar);
        true
    }

    pub fn remove_avatar(&mut self) {
        self.state.avatar = None;
        self.file_input = None;
        self.view.show_avatar_pane(&AvatarPane::Empty);
        tracing::debug!("avatar removed");
    }

    /// Re-open the picker. Cancelling it leaves everything as it was.
    pub fn change_avatar(&mut self) -> bool {
        match self.view.open_file_picker() {
            Some(file) => self.select_avatar(file),
            None => false,
        }
    }

    pub fn drag_over(&mut self) {
        self.view.set_dragover(true);
    }

    pub fn drag_leave(&mut self) {
        self.view.set_dragover(false);
    }

    /// Handle a drop on the dropzone. Only the first file counts; an empty
    /// drop is a no-op.
    pub fn drop_files(&mut self, files: Vec<AvatarFile>) -> bool {
        self.view.set_dragover(false);
        match files.into_iter().next() {
            Some(file) => self.select_avatar(file),
            None => false,
        }
    }
}
