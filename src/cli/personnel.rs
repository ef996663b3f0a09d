use std::path::Path;

use clap::Parser;
use roster::{Personnel, Store};
use tracing::instrument;

use super::{Login, terminal, terminal::Colorize, with_session};

#[derive(Debug, Parser)]
pub struct Command {
    #[command(subcommand)]
    command: PersonnelCommand,
}

#[derive(Debug, Parser)]
enum PersonnelCommand {
    /// List the personnel database
    List {
        /// Case-insensitive filter over name, lp and dni
        #[arg(long)]
        search: Option<String>,
    },

    /// Add a record to the personnel database
    Add(Record),

    /// Replace the record with the given lp
    Update {
        /// The current lp of the record
        #[arg(value_name = "LP")]
        current: String,

        #[command(flatten)]
        record: Record,
    },

    /// Remove a record from the personnel database
    Remove {
        /// Personnel number
        lp: String,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Set or clear a record's internal number
    SetInterno {
        /// Personnel number
        lp: String,

        /// The internal number; omit to clear it
        interno: Option<String>,
    },
}

#[derive(Debug, Clone, clap::Args)]
struct Record {
    /// Rank
    #[arg(long)]
    rank: String,

    /// Personnel number
    #[arg(long)]
    lp: String,

    /// National identity document number
    #[arg(long)]
    dni: String,

    /// Family name
    #[arg(long)]
    last_name: String,

    /// Given names
    #[arg(long)]
    first_name: String,

    /// Internal number
    #[arg(long)]
    interno: Option<String>,
}

impl From<Record> for Personnel {
    fn from(record: Record) -> Self {
        Self {
            rank: record.rank,
            lp: record.lp,
            dni: record.dni,
            last_name: record.last_name,
            first_name: record.first_name,
            interno: record.interno.filter(|interno| !interno.trim().is_empty()),
        }
    }
}

impl Command {
    #[instrument(skip(login))]
    pub fn run(self, root: &Path, login: &Login) -> anyhow::Result<()> {
        match self.command {
            PersonnelCommand::List { search } => {
                let store = Store::open(root)?;
                let people = matching(store.personnel(), search.as_deref());
                if people.is_empty() {
                    println!("No personnel records found.");
                    return Ok(());
                }
                for person in people {
                    println!(
                        "{:<8} {:<10} {:<40} {}",
                        person.lp,
                        person.dni,
                        person.display_name(),
                        person.interno.as_deref().unwrap_or("-").dim()
                    );
                }
            }
            PersonnelCommand::Add(record) => {
                let person = Personnel::from(record);
                let lp = person.lp.clone();
                with_session(root, login, |store, session| {
                    Ok(store.add_personnel(session, person)?)
                })?;
                println!("{}", format!("✅ Added LP {lp}").success());
            }
            PersonnelCommand::Update { current, record } => {
                with_session(root, login, |store, session| {
                    Ok(store.update_personnel(session, &current, record.into())?)
                })?;
                println!("{}", format!("✅ Updated LP {current}").success());
            }
            PersonnelCommand::Remove { lp, yes } => {
                if !terminal::confirm(&format!("Remove LP {lp} from the personnel database?"), yes)? {
                    println!("Cancelled");
                    return Ok(());
                }
                let removed = with_session(root, login, |store, session| {
                    Ok(store.delete_personnel(session, &lp)?)
                })?;
                println!("{}", format!("✅ Removed {}", removed.display_name()).success());
            }
            PersonnelCommand::SetInterno { lp, interno } => {
                with_session(root, login, |store, session| {
                    Ok(store.set_personnel_interno(session, &lp, interno)?)
                })?;
                println!("{}", format!("✅ Updated interno of LP {lp}").success());
            }
        }
        Ok(())
    }
}

/// Records matching `search` in name, `lp` or `dni`, sorted by last name.
fn matching<'a>(people: &'a [Personnel], search: Option<&str>) -> Vec<&'a Personnel> {
    let search = search.map(str::to_lowercase).unwrap_or_default();
    let mut matched: Vec<&Personnel> = people
        .iter()
        .filter(|person| {
            search.is_empty()
                || person.lp.contains(&search)
                || person.dni.contains(&search)
                || person.display_name().to_lowercase().contains(&search)
        })
        .collect();
    matched.sort_by(|a, b| {
        roster::roster::locale_cmp(&a.last_name, &b.last_name)
            .then_with(|| roster::roster::locale_cmp(&a.first_name, &b.first_name))
    });
    matched
}

#[cfg(test)]
mod tests {
    use roster::Config;
    use tempfile::tempdir;

    use super::*;

    fn record(lp: &str, dni: &str, last_name: &str) -> Record {
        Record {
            rank: "Bombero".into(),
            lp: lp.into(),
            dni: dni.into(),
            last_name: last_name.into(),
            first_name: "Ana".into(),
            interno: None,
        }
    }

    fn run(root: &Path, command: PersonnelCommand) -> anyhow::Result<()> {
        let login = Login {
            user: None,
            code: Some("admin".into()),
        };
        Command { command }.run(root, &login)
    }

    #[test]
    fn add_update_and_set_interno() {
        let tmp = tempdir().unwrap();
        Store::init(tmp.path(), Config::default(), "admin").unwrap();

        run(tmp.path(), PersonnelCommand::Add(record("10", "30111222", "Diaz"))).unwrap();
        assert!(run(tmp.path(), PersonnelCommand::Add(record("10", "1", "Otro"))).is_err());
        run(
            tmp.path(),
            PersonnelCommand::Update {
                current: "10".into(),
                record: record("11", "30111222", "Díaz"),
            },
        )
        .unwrap();
        run(
            tmp.path(),
            PersonnelCommand::SetInterno {
                lp: "11".into(),
                interno: Some("204".into()),
            },
        )
        .unwrap();

        let store = Store::open(tmp.path()).unwrap();
        assert!(store.person("10").is_none());
        let person = store.person("11").unwrap();
        assert_eq!(person.last_name, "Díaz");
        assert_eq!(person.interno.as_deref(), Some("204"));
    }

    #[test]
    fn blank_interno_is_dropped() {
        let mut with_blank = record("1", "2", "Diaz");
        with_blank.interno = Some("  ".into());

        assert_eq!(Personnel::from(with_blank).interno, None);
    }

    #[test]
    fn list_filters_and_sorts() {
        let people: Vec<Personnel> = [
            record("3", "300", "Zapata"),
            record("1", "100", "Álvarez"),
            record("2", "200", "Benítez"),
        ]
        .into_iter()
        .map(Personnel::from)
        .collect();

        let all: Vec<&str> = matching(&people, None)
            .iter()
            .map(|person| person.lp.as_str())
            .collect();
        assert_eq!(all, ["1", "2", "3"]);

        let found = matching(&people, Some("BENÍ"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].lp, "2");
    }
}
