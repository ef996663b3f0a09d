use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::ArgAction;
use roster::{Config, Session, Store, User, storage::store::CONFIG_FILE};
use tracing::instrument;

mod code;
mod crew;
mod log;
mod personnel;
mod report;
mod summary;
mod terminal;
mod truck;

use terminal::Colorize;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the roster directory
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(flatten)]
    login: Login,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::Report(report::Command::default()))
            .run(&self.root, &self.login)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// Who is acting, for commands that change the roster.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct Login {
    /// Station to act as; the admin station logs in as headquarters
    #[arg(long, global = true, value_name = "STATION")]
    user: Option<String>,

    /// Access code for the station (prompted when omitted)
    #[arg(long, global = true)]
    code: Option<String>,
}

impl Login {
    /// Checks the access code and opens a session.
    fn session(&self, store: &Store) -> anyhow::Result<Session> {
        let admin_station = &store.config().admin_station;
        let station = self.user.as_deref().unwrap_or(admin_station);
        let user = if station == admin_station {
            User::admin(station)
        } else {
            User::operator(station)
        };

        let code = self.code(station)?;
        Ok(store.login(user, &code)?)
    }

    fn code(&self, station: &str) -> anyhow::Result<String> {
        match &self.code {
            Some(code) => Ok(code.clone()),
            None => dialoguer::Password::new()
                .with_prompt(format!("Access code for {station}"))
                .interact()
                .context("failed to read access code"),
        }
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Print the roster grouped by zone and station (default)
    Report(report::Command),

    /// Initialize a new roster directory
    Init(Init),

    /// Show operational counts and per-status and per-type listings
    Summary(summary::Command),

    /// Add, edit, move and assign trucks
    Truck(truck::Command),

    /// Manage a station's standing crew
    Crew(crew::Command),

    /// Manage the personnel database
    Personnel(personnel::Command),

    /// Show or clear the activity log
    Log(log::Command),

    /// Manage station access codes
    Code(code::Command),
}

impl Command {
    fn run(self, root: &Path, login: &Login) -> anyhow::Result<()> {
        match self {
            Self::Report(command) => command.run(root, login)?,
            Self::Init(command) => command.run(root, login)?,
            Self::Summary(command) => command.run(root)?,
            Self::Truck(command) => command.run(root, login)?,
            Self::Crew(command) => command.run(root, login)?,
            Self::Personnel(command) => command.run(root, login)?,
            Self::Log(command) => command.run(root, login)?,
            Self::Code(command) => command.run(root, login)?,
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Init {
    /// Zones to list first in reports, in order
    #[arg(long, value_delimiter = ',', value_name = "ZONE")]
    zones: Vec<String>,

    /// Detachments and their parent station, as DETACHMENT=PARENT
    #[arg(long, value_parser = parse_detachment, value_name = "DETACHMENT=PARENT")]
    detachment: Vec<(String, String)>,
}

impl Init {
    #[instrument(skip(login))]
    fn run(self, root: &Path, login: &Login) -> anyhow::Result<()> {
        if root.join(CONFIG_FILE).exists() {
            anyhow::bail!("Roster already initialized (found existing {CONFIG_FILE})");
        }

        let config = Config::new(
            self.zones.into_iter().collect(),
            self.detachment.into_iter().collect(),
        );
        let admin_station = config.admin_station.clone();
        let code = login.code(&admin_station)?;

        Store::init(root, config, &code)?;

        println!(
            "{}",
            format!("✅ Initialized roster in {}", root.display()).success()
        );
        println!("  Created: {CONFIG_FILE}");
        println!("  Created: {}", roster::storage::store::ROSTER_FILE);
        println!();
        println!("Next steps:");
        println!("  roster truck add \"Autobomba 1\" --zone \"Zona 1\" --station CENTRAL");
        println!("  roster code set CENTRAL <CODE>");

        Ok(())
    }
}

fn parse_detachment(value: &str) -> Result<(String, String), String> {
    let (detachment, parent) = value
        .split_once('=')
        .ok_or_else(|| format!("expected DETACHMENT=PARENT, got '{value}'"))?;
    let (detachment, parent) = (detachment.trim(), parent.trim());
    if detachment.is_empty() || parent.is_empty() {
        return Err(format!("expected DETACHMENT=PARENT, got '{value}'"));
    }
    Ok((detachment.to_string(), parent.to_string()))
}

/// Opens the roster and a session, runs `action`, then writes the roster back.
fn with_session<T>(
    root: &Path,
    login: &Login,
    action: impl FnOnce(&mut Store, &Session) -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    let mut store = Store::open(root)?;
    let session = login.session(&store)?;
    let value = action(&mut store, &session)?;
    store.flush()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;
    use test_case::test_case;

    use super::*;

    #[test_case("DESTACAMENTO NORTE=CENTRAL", Some(("DESTACAMENTO NORTE", "CENTRAL")); "pair")]
    #[test_case(" A = B ", Some(("A", "B")); "trimmed")]
    #[test_case("A=", None; "missing parent")]
    #[test_case("A", None; "no separator")]
    fn detachment_argument(input: &str, expected: Option<(&str, &str)>) {
        let parsed = parse_detachment(input).ok();
        assert_eq!(
            parsed,
            expected.map(|(d, p)| (d.to_string(), p.to_string()))
        );
    }

    fn login(user: Option<&str>, code: &str) -> Login {
        Login {
            user: user.map(String::from),
            code: Some(code.to_string()),
        }
    }

    #[test]
    fn init_then_session() {
        let tmp = tempdir().unwrap();
        let init = Init {
            zones: vec!["Zona 1".into()],
            detachment: vec![("DESTACAMENTO NORTE".into(), "CENTRAL".into())],
        };

        init.run(tmp.path(), &login(None, "secret")).unwrap();

        let store = Store::open(tmp.path()).unwrap();
        assert_eq!(store.config().zone_order().zones(), vec!["Zona 1".to_string()]);
        assert!(login(None, "secret").session(&store).is_ok());
        assert!(login(None, "wrong").session(&store).is_err());
        assert!(login(Some("CENTRAL"), "secret").session(&store).is_err());
    }

    #[test]
    fn init_refuses_existing_roster() {
        let tmp = tempdir().unwrap();
        let init = || Init {
            zones: Vec::new(),
            detachment: Vec::new(),
        };

        init().run(tmp.path(), &login(None, "secret")).unwrap();

        assert!(init().run(tmp.path(), &login(None, "secret")).is_err());
    }
}
