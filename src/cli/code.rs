use std::path::Path;

use clap::Parser;
use roster::Store;
use tracing::instrument;

use super::{Login, terminal::Colorize, with_session};

#[derive(Debug, Parser)]
pub struct Command {
    #[command(subcommand)]
    command: CodeCommand,
}

#[derive(Debug, Parser)]
enum CodeCommand {
    /// Set the access code of a station
    Set {
        /// The station
        station: String,

        /// The new access code
        #[arg(value_name = "CODE")]
        new_code: String,
    },

    /// List the stations that have an access code
    List,
}

impl Command {
    #[instrument(skip(login))]
    pub fn run(self, root: &Path, login: &Login) -> anyhow::Result<()> {
        match self.command {
            CodeCommand::Set { station, new_code } => {
                with_session(root, login, |store, session| {
                    Ok(store.set_station_code(session, &station, &new_code)?)
                })?;
                println!("{}", format!("✅ Access code set for {station}").success());
            }
            CodeCommand::List => {
                let store = Store::open(root)?;
                for station in store.coded_stations() {
                    println!("{station}");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use roster::{Config, User};
    use tempfile::tempdir;

    use super::*;

    fn set(station: &str, code: &str) -> Command {
        Command {
            command: CodeCommand::Set {
                station: station.into(),
                new_code: code.into(),
            },
        }
    }

    #[test]
    fn new_code_admits_the_station() {
        let tmp = tempdir().unwrap();
        Store::init(tmp.path(), Config::default(), "admin").unwrap();
        let admin = Login {
            user: None,
            code: Some("admin".into()),
        };

        set("CENTRAL", "central").run(tmp.path(), &admin).unwrap();

        let store = Store::open(tmp.path()).unwrap();
        assert!(store.login(User::operator("CENTRAL"), "central").is_ok());
        assert_eq!(store.coded_stations().collect::<Vec<_>>(), ["CENTRAL", "O.C.O.B."]);
    }

    #[test]
    fn operators_cannot_set_codes() {
        let tmp = tempdir().unwrap();
        Store::init(tmp.path(), Config::default(), "admin").unwrap();
        let admin = Login {
            user: None,
            code: Some("admin".into()),
        };
        set("CENTRAL", "central").run(tmp.path(), &admin).unwrap();
        let operator = Login {
            user: Some("CENTRAL".into()),
            code: Some("central".into()),
        };

        assert!(set("CENTRAL", "other").run(tmp.path(), &operator).is_err());
        assert!(set("CENTRAL", "").run(tmp.path(), &admin).is_err());
    }
}
