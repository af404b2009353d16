use anyhow::{Context, Result};
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::form::FormController;
use crate::types::{AvatarFile, Screen};
use crate::view::TerminalView;

/// One user event, as written in a session script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    FullName(String),
    Email(String),
    Username(String),
    Avatar(PathBuf),
    DragOver,
    DragLeave,
    Drop(Option<PathBuf>),
    Remove,
    Change(Option<PathBuf>),
    Submit,
}

impl std::str::FromStr for Event {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Text after the single separating space is taken verbatim.
        let (cmd, text) = s.split_once(' ').unwrap_or((s, ""));
        let arg = text.trim();
        let path = || (!arg.is_empty()).then(|| PathBuf::from(arg));

        match cmd {
            "name" => Ok(Event::FullName(text.to_string())),
            "email" => Ok(Event::Email(text.to_string())),
            "username" => Ok(Event::Username(text.to_string())),
            "avatar" => match path() {
                Some(p) => Ok(Event::Avatar(p)),
                None => anyhow::bail!("avatar needs a file path"),
            },
            "dragover" => Ok(Event::DragOver),
            "dragleave" => Ok(Event::DragLeave),
            "drop" => Ok(Event::Drop(path())),
            "remove" => Ok(Event::Remove),
            "change" => Ok(Event::Change(path())),
            "submit" => Ok(Event::Submit),
            _ => anyhow::bail!(
                "Unknown event: {}. Use: name, email, username, avatar, dragover, dragleave, drop, remove, change, submit",
                cmd
            ),
        }
    }
}

fn load(path: Option<&Path>) -> Result<Option<AvatarFile>> {
    path.map(AvatarFile::from_path).transpose()
}

/// Replay events from `input` line by line. Blank lines and `#` comments are skipped.
/// Returns once input is exhausted.
pub fn replay(
    form: &mut FormController<TerminalView>,
    input: impl BufRead,
    json: bool,
) -> Result<()> {
    for (n, line) in input.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches('\r').trim_start();
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let event: Event = line
            .parse()
            .with_context(|| format!("line {}", n + 1))?;
        apply(form, event, json).with_context(|| format!("line {}", n + 1))?;
    }
    Ok(())
}

fn apply(form: &mut FormController<TerminalView>, event: Event, json: bool) -> Result<()> {
    match event {
        Event::FullName(v) => form.set_full_name(v),
        Event::Email(v) => form.set_email(v),
        Event::Username(v) => form.set_username(v),
        Event::Avatar(path) => {
            let file = AvatarFile::from_path(&path)?;
            form.select_avatar(file);
        }
        Event::DragOver => form.drag_over(),
        Event::DragLeave => form.drag_leave(),
        Event::Drop(path) => {
            let files = load(path.as_deref())?.into_iter().collect();
            form.drop_files(files);
        }
        Event::Remove => form.remove_avatar(),
        Event::Change(path) => {
            let file = load(path.as_deref())?;
            form.view_mut().stage_pick(file);
            form.change_avatar();
        }
        Event::Submit => {
            let already_issued = form.screen() == Screen::Ticket;
            if let Some(ticket) = form.submit() {
                if json && !already_issued {
                    println!("{}", serde_json::to_string_pretty(ticket)?);
                }
            }
        }
    }
    Ok(())
}
