mod config;
mod form;
mod id;
mod session;
mod types;
mod validate;
mod view;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::Config;
use form::FormController;
use std::path::{Path, PathBuf};
use types::{AvatarFile, Screen, Ticket};
use view::{TerminalView, View};

#[derive(Parser)]
#[command(name = "ticket")]
#[command(about = "Generate a conference ticket from a validated entry form")]
#[command(
    long_about = "Fill in the entry form, attach an avatar, and get your conference ticket.

The form asks for a full name, an email address, a username and an avatar
(JPG or PNG, max 500KB). All fields are checked on submit and every problem is
reported at once. A valid form produces a ticket with a random 6-digit number.

The event printed on the ticket comes from .ticket-form.yaml (searched in the
current and parent directories) or $TICKET_FORM_CONFIG:

  event:
    name: Coding Conf
    date: Jan 31, 2025
    location: Austin, TX

Examples:
  ticket generate --name \"Jane Doe\" --email jane@example.com --username jane --avatar me.png
  printf 'name Jane\\nemail j@x.io\\nusername j\\ndrop me.png\\nsubmit\\n' | ticket session"
)]
#[command(version)]
struct Cli {
    /// Output the ticket as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill in the form from arguments and submit it
    #[command(alias = "gen")]
    Generate {
        /// Full name
        #[arg(short, long, default_value = "")]
        name: String,
        /// Email address
        #[arg(short, long, default_value = "")]
        email: String,
        /// Username (an "@" is added if missing)
        #[arg(short, long, default_value = "")]
        username: String,
        /// Avatar image file
        #[arg(short, long)]
        avatar: Option<PathBuf>,
    },

    /// Replay form events from stdin, one per line
    ///
    /// Events: name <text>, email <text>, username <text>, avatar <path>,
    /// dragover, dragleave, drop [path], remove, change [path], submit
    Session,

    /// Check an avatar file against the upload limits
    #[command(name = "check-avatar")]
    CheckAvatar {
        /// Avatar image file
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            name,
            email,
            username,
            avatar,
        } => cmd_generate(name, email, username, avatar, cli.json),
        Commands::Session => cmd_session(cli.json),
        Commands::CheckAvatar { path } => cmd_check_avatar(&path, cli.json),
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_generate(
    name: String,
    email: String,
    username: String,
    avatar: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let config = Config::load()?;
    let mut form = FormController::new(TerminalView::new(json), config.event);

    match fill_and_submit(&mut form, name, email, username, avatar.as_deref())? {
        Some(ticket) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&ticket)?);
            }
            Ok(())
        }
        None => std::process::exit(1),
    }
}

/// Fill every input, attach the avatar if given, and submit.
fn fill_and_submit<V: View>(
    form: &mut FormController<V>,
    name: String,
    email: String,
    username: String,
    avatar: Option<&Path>,
) -> Result<Option<Ticket>> {
    form.set_full_name(name);
    form.set_email(email);
    form.set_username(username);
    if let Some(path) = avatar {
        form.select_avatar(AvatarFile::from_path(path)?);
    }
    Ok(form.submit().cloned())
}

fn cmd_session(json: bool) -> Result<()> {
    let config = Config::load()?;
    let mut form = FormController::new(TerminalView::new(json).with_echo(), config.event);

    let stdin = std::io::stdin();
    session::replay(&mut form, stdin.lock(), json)?;

    if form.screen() != Screen::Ticket {
        eprintln!("Session ended without a ticket.");
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_check_avatar(path: &Path, json: bool) -> Result<()> {
    let file = AvatarFile::from_path(path)?;
    let result = validate::avatar(Some(&file));

    if json {
        println!("{}", serde_json::to_string(&avatar_report(&file, result))?);
    } else {
        match result {
            Ok(()) => println!("{}: ok ({} bytes)", file.name, file.size),
            Err(e) => eprintln!("{}: {}", file.name, e),
        }
    }

    if result.is_err() {
        std::process::exit(1);
    }
    Ok(())
}

fn avatar_report(
    file: &AvatarFile,
    result: Result<(), validate::ValidationError>,
) -> serde_json::Value {
    serde_json::json!({
        "file": file.name,
        "size": file.size,
        "max_size": validate::MAX_AVATAR_BYTES,
        "ok": result.is_ok(),
        "message": result.err().map(|e| e.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::EventInfo;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn form() -> FormController<TerminalView> {
        FormController::new(TerminalView::new(true), EventInfo::default())
    }

    #[test]
    fn generate_issues_ticket_from_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let avatar = dir.path().join("jane.png");
        fs::write(&avatar, b"png").unwrap();

        let ticket = fill_and_submit(
            &mut form(),
            "Jane Doe".to_string(),
            "jane@example.com".to_string(),
            "jane".to_string(),
            Some(avatar.as_path()),
        )
        .unwrap()
        .unwrap();

        assert_eq!(ticket.full_name, "Jane Doe");
        assert_eq!(ticket.username, "@jane");
        assert_eq!(ticket.avatar.file_name, "jane.png");

        let value = serde_json::to_value(&ticket).unwrap();
        assert_eq!(value["number"], serde_json::json!(ticket.number));
        assert_eq!(value["event"]["name"], "Coding Conf");
    }

    #[test]
    fn generate_without_avatar_gives_no_ticket() {
        let ticket = fill_and_submit(
            &mut form(),
            "Jane Doe".to_string(),
            "jane@example.com".to_string(),
            "jane".to_string(),
            None,
        )
        .unwrap();
        assert!(ticket.is_none());
    }

    #[test]
    fn generate_with_unreadable_avatar_fails() {
        let err = fill_and_submit(
            &mut form(),
            String::new(),
            String::new(),
            String::new(),
            Some(Path::new("/nonexistent/jane.png")),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Failed to read avatar"));
    }

    #[test]
    fn avatar_report_fields() {
        let ok = AvatarFile::new("ok.png", vec![0; 10]);
        assert_eq!(
            avatar_report(&ok, validate::avatar(Some(&ok))),
            serde_json::json!({
                "file": "ok.png",
                "size": 10,
                "max_size": 512000,
                "ok": true,
                "message": null,
            })
        );

        let big = AvatarFile::new("big.png", vec![0; 512_001]);
        let report = avatar_report(&big, validate::avatar(Some(&big)));
        assert_eq!(report["ok"], false);
        assert_eq!(
            report["message"],
            "File too large. Please upload a photo under 500KB."
        );
    }
}
