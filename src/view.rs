use crate::types::{AvatarFile, AvatarPane, AvatarStatus, Field, Screen, Ticket};
use crate::validate::ValidationError;

/// What the form controller can ask of whatever is rendering it.
pub trait View {
    /// Show `error` next to `field`, or clear it when `None`.
    fn set_field_error(&mut self, field: Field, error: Option<&ValidationError>);

    fn set_avatar_status(&mut self, status: &AvatarStatus);

    /// Swap between the empty dropzone and the preview pane.
    fn show_avatar_pane(&mut self, pane: &AvatarPane);

    fn set_dragover(&mut self, active: bool);

    fn switch_view(&mut self, screen: Screen);

    fn populate_ticket(&mut self, ticket: &Ticket);

    /// Open the file selection affordance. Returns the picked file, if any.
    fn open_file_picker(&mut self) -> Option<AvatarFile>;
}

/// Renders the form to the terminal.
///
/// Field errors and avatar warnings go to stderr, the ticket card to stdout.
/// With `json` set the card is left to the caller.
pub struct TerminalView {
    json: bool,
    echo: bool,
    picked: Option<AvatarFile>,
    // Last avatar status printed; a repeat of it stays quiet.
    shown_status: Option<AvatarStatus>,
}

impl TerminalView {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            echo: false,
            picked: None,
            shown_status: None,
        }
    }

    /// Also report pane and dropzone changes, for interactive sessions.
    pub fn with_echo(mut self) -> Self {
        self.echo = true;
        self
    }

    /// Stage the file the next `open_file_picker` call hands back.
    pub fn stage_pick(&mut self, file: Option<AvatarFile>) {
        self.picked = file;
    }

    /// Record `status` as shown. Returns false if it is already on screen.
    fn mark_shown(&mut self, status: &AvatarStatus) -> bool {
        if self.shown_status.as_ref() == Some(status) {
            return false;
        }
        self.shown_status = Some(status.clone());
        true
    }
}

impl View for TerminalView {
    fn set_field_error(&mut self, field: Field, error: Option<&ValidationError>) {
        if let Some(err) = error {
            eprintln!("{}: {}", field, err);
        }
    }

    fn set_avatar_status(&mut self, status: &AvatarStatus) {
        if !self.mark_shown(status) {
            return;
        }
        if status.is_warning() {
            eprintln!("avatar: {}", status.message());
        } else if self.echo {
            eprintln!("{}", status.message());
        }
    }

    fn show_avatar_pane(&mut self, pane: &AvatarPane) {
        if !self.echo {
            return;
        }
        match pane {
            AvatarPane::Empty => eprintln!("[dropzone] Drag and drop or click to upload"),
            AvatarPane::Preview(avatar) => {
                eprintln!("[preview] {} ({})", avatar.file_name, avatar.url)
            }
        }
    }

    fn set_dragover(&mut self, active: bool) {
        if self.echo {
            let state = if active { "dragover" } else { "idle" };
            eprintln!("[dropzone] {}", state);
        }
    }

    fn switch_view(&mut self, screen: Screen) {
        tracing::debug!(?screen, "switching view");
    }

    fn populate_ticket(&mut self, ticket: &Ticket) {
        if self.json {
            return;
        }
        println!("{}", render_card(ticket));
    }

    fn open_file_picker(&mut self) -> Option<AvatarFile> {
        self.picked.take()
    }
}

/// Plain-text rendering of a ticket
pub fn render_card(ticket: &Ticket) -> String {
    let mut out = String::new();
    out.push_str(&ticket.headline());
    out.push('\n');
    out.push_str(&ticket.subtitle());
    out.push_str("\n\n");

    let lines = [
        ticket.event.name.clone(),
        format!("{} / {}", ticket.event.date, ticket.event.location),
        String::new(),
        format!("[{}] {}", ticket.avatar.file_name, ticket.full_name),
        ticket.username.clone(),
    ];
    let number = ticket.number_label();
    let width = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max(number.len())
        + 4;

    out.push_str(&format!("┌{}┐\n", "─".repeat(width + 2)));
    for line in &lines {
        out.push_str(&format!("│ {:<width$} │\n", line, width = width));
    }
    out.push_str(&format!("│ {:>width$} │\n", number, width = width));
    out.push_str(&format!("└{}┘", "─".repeat(width + 2)));
    out
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EventInfo;
    use crate::types::AvatarRef;
    use chrono::Utc;

    #[test]
    fn card_shows_name_handle_and_number() {
        let ticket = Ticket {
            number: 123456,
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            username: "@jane".to_string(),
            avatar: AvatarRef {
                url: "blob:ticket-form/x".to_string(),
                file_name: "jane.png".to_string(),
                sha256: String::new(),
            },
            event: EventInfo::default(),
            issued: Utc::now(),
        };

        let card = render_card(&ticket);
        assert!(card.starts_with("Congrats, Jane Doe! Your ticket is ready."));
        assert!(card.contains("[jane.png] Jane Doe"));
        assert!(card.contains("@jane"));
        assert!(card.contains("#123456"));
        assert!(card.contains("Coding Conf"));
    }

    #[test]
    fn repeated_avatar_status_is_reported_once() {
        let mut view = TerminalView::new(true);
        let too_large = AvatarStatus::Warning(ValidationError::AvatarTooLarge.to_string());
        let hint = AvatarStatus::Info(crate::validate::AVATAR_HINT.to_string());

        assert!(view.mark_shown(&too_large));
        assert!(!view.mark_shown(&too_large));
        assert!(view.mark_shown(&hint));
        assert!(view.mark_shown(&too_large));
    }

    #[test]
    fn oversized_avatar_warning_survives_submit_without_repeat() {
        use crate::form::FormController;

        let mut form = FormController::new(TerminalView::new(true), EventInfo::default());
        let big = AvatarFile::new("big.png", vec![0; crate::validate::MAX_AVATAR_BYTES as usize + 1]);
        assert!(!form.select_avatar(big));
        assert!(form.submit().is_none());

        let warning = AvatarStatus::Warning(ValidationError::AvatarTooLarge.to_string());
        assert!(!form.view_mut().mark_shown(&warning));
    }

    #[test]
    fn picker_hands_back_staged_file_once() {
        let mut view = TerminalView::new(true);
        view.stage_pick(Some(AvatarFile::new("a.png", vec![1])));
        assert!(view.open_file_picker().is_some());
        assert!(view.open_file_picker().is_none());
    }
}
