//! Headless commands for scripting and quick checks.
//!
//! With no arguments the TUI runs. Each command here drives the same `App`
//! operations and prints the resulting notice instead of rendering it.

use std::io::{self, Write};

use anyhow::{bail, Result};
use clap::{ArgGroup, Parser};
use tracing::warn;

use crate::app::{App, NoticeKind};
use crate::config::Config;

/// Terminal client for login, registration and profile management
#[derive(Parser, Debug)]
#[command(name = "authdesk")]
#[command(version)]
#[command(group(ArgGroup::new("command").args(["login", "whoami", "logout"])))]
#[command(after_help = "Environment:
  AUTHDESK_API_URL  API base URL (overrides config.json)
  AUTHDESK_STORAGE  Token storage: file, keyring or memory
  AUTHDESK_EMAIL    Pre-filled login email")]
pub struct Args {
    /// Log in without the UI; the password is prompted
    #[arg(long, value_name = "EMAIL")]
    login: Option<Option<String>>,

    /// Show the signed-in user
    #[arg(long)]
    whoami: bool,

    /// Log out and forget the stored token
    #[arg(long)]
    logout: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tui,
    Login { email: Option<String> },
    WhoAmI,
    Logout,
}

impl Args {
    /// With no flags the TUI runs
    pub fn into_command(self) -> Command {
        if let Some(email) = self.login {
            Command::Login { email }
        } else if self.whoami {
            Command::WhoAmI
        } else if self.logout {
            Command::Logout
        } else {
            Command::Tui
        }
    }
}

/// Run a headless command. Error notices become a failing exit.
pub async fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Login { email } => {
            let mut app = App::new(config)?;
            let email = match email.or_else(|| config.default_email.clone()) {
                Some(email) => email,
                None => prompt_email()?,
            };
            let password = rpassword::prompt_password("Password: ")?;
            app.login(&email, &password).await;
            report(&mut app)
        }
        Command::WhoAmI => {
            let mut app = App::new(config)?;
            app.restore_session().await;
            if !app.is_authenticated() {
                bail!("Not logged in");
            }
            println!("{} <{}>", app.profile.name, app.profile.email);
            Ok(())
        }
        Command::Logout => {
            let mut app = App::new(config)?;
            if let Err(e) = app.session.load() {
                warn!(error = %e, "Failed to read persisted token");
            }
            app.logout().await;
            report(&mut app)
        }
        Command::Tui => bail!("The terminal UI is not a headless command"),
    }
}

fn prompt_email() -> Result<String> {
    print!("Email: ");
    io::stdout().flush()?;

    let mut email = String::new();
    io::stdin().read_line(&mut email)?;
    Ok(email.trim().to_string())
}

fn report(app: &mut App) -> Result<()> {
    match app.take_notice() {
        Some(notice) if notice.kind == NoticeKind::Error => bail!("{}", notice.message),
        Some(notice) => {
            println!("{}", notice.message);
            Ok(())
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    use crate::config::{ENV_API_URL, ENV_EMAIL, ENV_STORAGE};

    fn parse(args: &[&str]) -> Result<Command, clap::Error> {
        let argv = std::iter::once("authdesk").chain(args.iter().copied());
        Args::try_parse_from(argv).map(Args::into_command)
    }

    #[test]
    fn test_args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_no_args_runs_tui() {
        assert_eq!(parse(&[]).expect("parse"), Command::Tui);
    }

    #[test]
    fn test_login_with_optional_email() {
        assert_eq!(parse(&["--login"]).expect("parse"), Command::Login { email: None });
        assert_eq!(
            parse(&["--login", "ada@example.com"]).expect("parse"),
            Command::Login {
                email: Some("ada@example.com".to_string())
            }
        );
    }

    #[test]
    fn test_simple_flags() {
        assert_eq!(parse(&["--whoami"]).expect("parse"), Command::WhoAmI);
        assert_eq!(parse(&["--logout"]).expect("parse"), Command::Logout);
    }

    #[test]
    fn test_help_and_version_are_handled_by_clap() {
        let help = parse(&["--help"]).expect_err("help exits early");
        assert_eq!(help.kind(), clap::error::ErrorKind::DisplayHelp);
        let version = parse(&["-V"]).expect_err("version exits early");
        assert_eq!(version.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_rejects_unknown_conflicting_and_extra_args() {
        assert!(parse(&["--frobnicate"]).is_err());
        assert!(parse(&["--whoami", "--logout"]).is_err());
        assert!(parse(&["--whoami", "extra"]).is_err());
        assert!(parse(&["--login", "a@b.c", "extra"]).is_err());
    }

    #[test]
    fn test_help_names_env_vars() {
        let help = Args::command().render_long_help().to_string();
        assert!(help.contains(ENV_API_URL));
        assert!(help.contains(ENV_STORAGE));
        assert!(help.contains(ENV_EMAIL));
    }
}
