use std::path::Path;

use clap::Parser;
use roster::{
    Officer, Status, Store, Truck, roster::summary::move_destinations, storage::TruckPatch,
};
use tracing::instrument;

use super::{Login, terminal, terminal::Colorize, with_session};

#[derive(Debug, Parser)]
pub struct Command {
    #[command(subcommand)]
    command: TruckCommand,
}

#[derive(Debug, Parser)]
enum TruckCommand {
    /// Add a truck to the fleet
    Add(Add),

    /// Change a truck's name, type, zone or station
    Edit(Edit),

    /// Remove a truck from the fleet
    Remove {
        /// The truck id
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Move a truck to another station, taking that station's zone
    Move {
        /// The truck id
        id: String,

        /// The destination station
        station: String,
    },

    /// List the stations a truck can be moved to, by zone
    Destinations,

    /// Change a truck's operational status
    Status {
        /// The truck id
        id: String,

        /// The new status (uifs, servicio, reserva, alternativa, prestamo,
        /// fuera, or the full label)
        #[arg(value_parser = parse_status)]
        status: Status,

        /// Reason, kept for Reserva and Fuera de Servicio
        #[arg(long)]
        reason: Option<String>,
    },

    /// Assign an officer and crew to a truck
    Assign(Assign),

    /// Remove a truck's officer and crew
    Unassign {
        /// The truck id
        id: String,
    },

    /// Set or clear a truck's internal number
    Interno {
        /// The truck id
        id: String,

        /// The internal number; omit to clear it
        interno: Option<String>,
    },
}

#[derive(Debug, Parser)]
struct Add {
    /// Display name
    name: String,

    /// Unique id (generated when omitted)
    #[arg(long)]
    id: Option<String>,

    /// Truck type, e.g. Autobomba or Cisterna
    #[arg(long = "type", value_name = "TYPE")]
    kind: Option<String>,

    /// Zone
    #[arg(long)]
    zone: String,

    /// Station or detachment
    #[arg(long)]
    station: String,

    /// Initial status
    #[arg(long, value_parser = parse_status, default_value = "servicio")]
    status: Status,

    /// Internal fleet number
    #[arg(long)]
    interno: Option<String>,
}

#[derive(Debug, Parser)]
struct Edit {
    /// The truck id
    id: String,

    /// New display name
    #[arg(long)]
    name: Option<String>,

    /// New type
    #[arg(long = "type", value_name = "TYPE")]
    kind: Option<String>,

    /// New zone
    #[arg(long)]
    zone: Option<String>,

    /// New station
    #[arg(long)]
    station: Option<String>,
}

#[derive(Debug, Parser)]
struct Assign {
    /// The truck id
    id: String,

    /// Officer rank, e.g. "Oficial Principal"
    #[arg(long)]
    hierarchy: String,

    /// Officer full name; the last word is the last name
    #[arg(long)]
    officer: String,

    /// Officer personnel number
    #[arg(long)]
    lp: String,

    /// Point of contact
    #[arg(long)]
    poc: Option<String>,

    /// Officer internal number
    #[arg(long)]
    interno: Option<String>,

    /// Crew count, including the officer
    #[arg(long)]
    personnel: u32,

    /// Crew names (comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "NAME")]
    crew: Vec<String>,
}

impl Command {
    #[instrument(skip(login))]
    pub fn run(self, root: &Path, login: &Login) -> anyhow::Result<()> {
        match self.command {
            TruckCommand::Add(add) => {
                let truck = add.into_truck();
                let added = with_session(root, login, |store, session| {
                    Ok(store.add_truck(session, truck)?.id.clone())
                })?;
                println!("{}", format!("✅ Added truck {added}").success());
            }
            TruckCommand::Edit(edit) => {
                let id = edit.id.clone();
                let patch = edit.into_patch();
                if patch == TruckPatch::default() {
                    anyhow::bail!("Nothing to change: pass --name, --type, --zone or --station");
                }
                with_session(root, login, |store, session| {
                    Ok(store.update_truck(session, &id, patch)?)
                })?;
                println!("{}", format!("✅ Updated truck {id}").success());
            }
            TruckCommand::Remove { id, yes } => {
                if !terminal::confirm(&format!("Remove truck {id}?"), yes)? {
                    println!("Cancelled");
                    return Ok(());
                }
                let removed = with_session(root, login, |store, session| {
                    Ok(store.delete_truck(session, &id)?)
                })?;
                println!("{}", format!("✅ Removed {} ({})", removed.name, removed.id).success());
            }
            TruckCommand::Move { id, station } => {
                with_session(root, login, |store, session| {
                    Ok(store.move_truck(session, &id, &station)?)
                })?;
                println!("{}", format!("✅ Moved {id} to {station}").success());
            }
            TruckCommand::Destinations => {
                let store = Store::open(root)?;
                for destination in move_destinations(store.trucks()) {
                    println!("{}", destination.zone.zone());
                    for station in &destination.stations {
                        println!("  {}", station.station());
                    }
                }
            }
            TruckCommand::Status { id, status, reason } => {
                if reason.is_some() && !status.takes_reason() {
                    println!(
                        "{}",
                        format!("⚠️  A reason is not kept for \"{status}\"").warning()
                    );
                }
                let label = status.to_string();
                with_session(root, login, |store, session| {
                    Ok(store.set_status(session, &id, status, reason)?)
                })?;
                println!("{}", format!("✅ {id} is now \"{label}\"").success());
            }
            TruckCommand::Assign(assign) => {
                let id = assign.id.clone();
                let (officer, personnel, crew) = assign.into_parts();
                with_session(root, login, |store, session| {
                    Ok(store.assign_officer(session, &id, officer, personnel, crew)?)
                })?;
                println!("{}", format!("✅ Assigned {id}").success());
            }
            TruckCommand::Unassign { id } => {
                with_session(root, login, |store, session| {
                    Ok(store.clear_assignment(session, &id)?)
                })?;
                println!("{}", format!("✅ Cleared assignment of {id}").success());
            }
            TruckCommand::Interno { id, interno } => {
                with_session(root, login, |store, session| {
                    Ok(store.set_truck_interno(session, &id, interno)?)
                })?;
                println!("{}", format!("✅ Updated interno of {id}").success());
            }
        }
        Ok(())
    }
}

impl Add {
    fn into_truck(self) -> Truck {
        let mut truck = Truck::new(self.id.unwrap_or_default(), self.name, self.status);
        truck.kind = self.kind;
        truck.zone = Some(self.zone);
        truck.station = Some(self.station);
        truck.interno = self.interno;
        truck
    }
}

impl Edit {
    fn into_patch(self) -> TruckPatch {
        TruckPatch {
            name: self.name,
            kind: self.kind,
            zone: self.zone,
            station: self.station,
        }
    }
}

impl Assign {
    fn into_parts(self) -> (Officer, u32, Vec<String>) {
        let officer = Officer {
            poc: self.poc,
            ..Officer::new(self.hierarchy, self.officer, self.lp)
        }
        .with_interno(self.interno);
        (officer, self.personnel, self.crew)
    }
}

fn parse_status(value: &str) -> Result<Status, String> {
    Status::parse_known(value).ok_or_else(|| {
        let known: Vec<String> = Status::ALL.iter().map(ToString::to_string).collect();
        format!("unknown status '{value}' (expected one of: {})", known.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use roster::{Config, ZoneOrder};
    use tempfile::tempdir;

    use super::*;

    fn login() -> Login {
        Login {
            user: None,
            code: Some("secret".into()),
        }
    }

    fn add(name: &str, id: &str, station: &str, zone: &str) -> Command {
        Command {
            command: TruckCommand::Add(Add {
                name: name.into(),
                id: Some(id.into()),
                kind: Some("Autobomba".into()),
                zone: zone.into(),
                station: station.into(),
                status: Status::InService,
                interno: None,
            }),
        }
    }

    #[test]
    fn add_move_and_status_persist() {
        let tmp = tempdir().unwrap();
        Store::init(tmp.path(), Config::new(ZoneOrder::default(), Default::default()), "secret")
            .unwrap();

        add("Autobomba 1", "AB-1", "CENTRAL", "Zona 1").run(tmp.path(), &login()).unwrap();
        add("Cisterna 1", "CI-1", "OESTE", "Zona 2").run(tmp.path(), &login()).unwrap();
        Command {
            command: TruckCommand::Move {
                id: "AB-1".into(),
                station: "OESTE".into(),
            },
        }
        .run(tmp.path(), &login())
        .unwrap();
        Command {
            command: TruckCommand::Status {
                id: "AB-1".into(),
                status: Status::OutOfService,
                reason: Some("Motor".into()),
            },
        }
        .run(tmp.path(), &login())
        .unwrap();

        let store = Store::open(tmp.path()).unwrap();
        let truck = store.truck("AB-1").unwrap();
        assert_eq!(truck.zone.as_deref(), Some("Zona 2"));
        assert_eq!(truck.status_text(), "Fuera de Servicio - Motor");
    }

    #[test]
    fn wrong_code_changes_nothing() {
        let tmp = tempdir().unwrap();
        Store::init(tmp.path(), Config::default(), "secret").unwrap();
        let bad = Login {
            user: None,
            code: Some("nope".into()),
        };

        assert!(add("Autobomba 1", "AB-1", "CENTRAL", "Zona 1").run(tmp.path(), &bad).is_err());
        assert!(Store::open(tmp.path()).unwrap().trucks().is_empty());
    }

    #[test]
    fn status_argument_accepts_aliases() {
        assert_eq!(parse_status("reserva"), Ok(Status::Reserve));
        assert!(parse_status("taller").unwrap_err().contains("Para Servicio"));
    }

    #[test]
    fn assign_arguments_build_officer() {
        let assign = Assign {
            id: "AB-1".into(),
            hierarchy: "Oficial".into(),
            officer: "Ana Maria Diaz".into(),
            lp: "12".into(),
            poc: Some("555".into()),
            interno: Some(String::new()),
            personnel: 3,
            crew: vec!["A".into()],
        };

        let (officer, personnel, crew) = assign.into_parts();

        assert_eq!(officer.last_name, "Diaz");
        assert_eq!(officer.poc.as_deref(), Some("555"));
        assert_eq!(officer.interno, None);
        assert_eq!(personnel, 3);
        assert_eq!(crew, vec!["A"]);
    }
}
