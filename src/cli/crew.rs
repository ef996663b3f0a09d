use std::path::Path;

use clap::Parser;
use roster::Store;
use tracing::instrument;

use super::{Login, terminal::Colorize, with_session};

#[derive(Debug, Parser)]
pub struct Command {
    #[command(subcommand)]
    command: CrewCommand,
}

#[derive(Debug, Parser)]
enum CrewCommand {
    /// List a station's standing crew
    List {
        /// The station
        station: String,
    },

    /// Add a firefighter to a station's crew
    Add {
        /// The station
        station: String,

        /// Full name
        name: String,

        /// Internal number
        #[arg(long)]
        interno: String,
    },

    /// Remove a firefighter from a station's crew
    Remove {
        /// The station
        station: String,

        /// Full name
        name: String,
    },
}

impl Command {
    #[instrument(skip(login))]
    pub fn run(self, root: &Path, login: &Login) -> anyhow::Result<()> {
        match self.command {
            CrewCommand::List { station } => {
                let store = Store::open(root)?;
                let crew = store.crew(&station);
                if crew.is_empty() {
                    println!("{}", format!("No crew recorded for {station}").dim());
                    return Ok(());
                }
                println!("{}", station.station());
                for member in crew {
                    println!("  {:<30} {}", member.name, member.interno.dim());
                }
            }
            CrewCommand::Add {
                station,
                name,
                interno,
            } => {
                let added = with_session(root, login, |store, session| {
                    Ok(store.add_crew_member(session, &station, &name, &interno)?)
                })?;
                if added {
                    println!("{}", format!("✅ Added {name} to {station}").success());
                } else {
                    println!("{}", format!("{name} is already in the crew of {station}").warning());
                }
            }
            CrewCommand::Remove { station, name } => {
                let removed = with_session(root, login, |store, session| {
                    Ok(store.remove_crew_member(session, &station, &name)?)
                })?;
                if removed {
                    println!("{}", format!("✅ Removed {name} from {station}").success());
                } else {
                    println!("{}", format!("{name} is not in the crew of {station}").warning());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use roster::Config;
    use tempfile::tempdir;

    use super::*;

    fn run(root: &Path, command: CrewCommand, user: Option<&str>, code: &str) -> anyhow::Result<()> {
        let login = Login {
            user: user.map(String::from),
            code: Some(code.into()),
        };
        Command { command }.run(root, &login)
    }

    #[test]
    fn operator_manages_own_crew_only() {
        let tmp = tempdir().unwrap();
        let mut store = Store::init(tmp.path(), Config::default(), "admin").unwrap();
        let admin = store.login(roster::User::admin("O.C.O.B."), "admin").unwrap();
        store.set_station_code(&admin, "CENTRAL", "central").unwrap();
        store.flush().unwrap();

        let add = |station: &str| CrewCommand::Add {
            station: station.into(),
            name: "Juan Perez".into(),
            interno: "101".into(),
        };
        run(tmp.path(), add("CENTRAL"), Some("CENTRAL"), "central").unwrap();
        assert!(run(tmp.path(), add("OESTE"), Some("CENTRAL"), "central").is_err());

        let store = Store::open(tmp.path()).unwrap();
        assert_eq!(store.crew("CENTRAL").len(), 1);
        assert!(store.crew("OESTE").is_empty());
    }

    #[test]
    fn removing_unknown_member_is_not_an_error() {
        let tmp = tempdir().unwrap();
        Store::init(tmp.path(), Config::default(), "admin").unwrap();

        let remove = CrewCommand::Remove {
            station: "CENTRAL".into(),
            name: "Nadie".into(),
        };

        assert!(run(tmp.path(), remove, None, "admin").is_ok());
    }
}
