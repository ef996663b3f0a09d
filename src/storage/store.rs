//! A filesystem backed roster.
//!
//! The [`Store`] owns everything the roster tools edit: the fleet, station
//! crews, the personnel database, station access codes and the activity log.
//! It is loaded from `roster.json` in the roster root, alongside the static
//! metadata in `config.toml`, and written back with [`Store::flush`].
//!
//! Every mutation takes the acting [`Session`], checks its permissions and
//! appends one line to the activity log.

use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
};

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::{
    domain::{AccessError, Config, CrewMember, LogEntry, Permission, Personnel, Session, Truck, User},
    roster::{GroupedHierarchy, compute_grouped_hierarchy},
};

mod people;
mod trucks;

pub use trucks::TruckPatch;

/// File holding the mutable roster state.
pub const ROSTER_FILE: &str = "roster.json";

/// File holding the static configuration.
pub const CONFIG_FILE: &str = "config.toml";

/// The serialized roster state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RosterState {
    #[serde(default)]
    trucks: Vec<Truck>,
    #[serde(default)]
    crews: BTreeMap<String, Vec<CrewMember>>,
    #[serde(default)]
    codes: BTreeMap<String, String>,
    /// Newest first.
    #[serde(default)]
    logs: Vec<LogEntry>,
    #[serde(default)]
    personnel: Vec<Personnel>,
}

/// A filesystem backed roster.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
    config: Config,
    state: RosterState,
}

impl Store {
    /// Opens the roster in `root`.
    ///
    /// A missing `roster.json` gives an empty roster. A missing or invalid
    /// `config.toml` falls back to the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `roster.json` exists but cannot be read or parsed.
    #[instrument(skip_all, fields(root = %root.as_ref().display()))]
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        let config = load_config(&root);

        let path = root.join(ROSTER_FILE);
        let state = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No roster at {}, starting empty", path.display());
                RosterState::default()
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        Ok(Self {
            root,
            config,
            state,
        })
    }

    /// Creates a new roster in `root` with the given configuration.
    ///
    /// `admin_code` becomes the access code of the configured admin station.
    /// Existing files are overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or either file cannot be written.
    pub fn init(
        root: impl AsRef<Path>,
        config: Config,
        admin_code: &str,
    ) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            path: root.clone(),
            source,
        })?;
        config
            .save(&root.join(CONFIG_FILE))
            .map_err(StoreError::Config)?;

        let mut state = RosterState::default();
        let code = required("admin code", admin_code)?;
        state
            .codes
            .insert(config.admin_station.clone(), code.as_str().to_string());

        let store = Self {
            root,
            config,
            state,
        };
        store.flush()?;
        tracing::info!("Initialised roster in {}", store.root.display());
        Ok(store)
    }

    /// Writes the roster state back to `roster.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn flush(&self) -> Result<(), StoreError> {
        let path = self.root.join(ROSTER_FILE);
        let content =
            serde_json::to_string_pretty(&self.state).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?;
        std::fs::write(&path, content).map_err(|source| StoreError::Io { path, source })?;
        tracing::debug!("Wrote roster to {}", self.root.display());
        Ok(())
    }

    /// Checks an access code and opens a session for `user`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::InvalidCode`] if the code does not match.
    pub fn login(&self, user: User, code: &str) -> Result<Session, AccessError> {
        Session::login(user, code, &self.state.codes, &self.config.admin_station)
    }

    /// The static configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The fleet, in insertion order.
    #[must_use]
    pub fn trucks(&self) -> &[Truck] {
        &self.state.trucks
    }

    /// Looks up a truck by id.
    #[must_use]
    pub fn truck(&self, id: &str) -> Option<&Truck> {
        self.state.trucks.iter().find(|truck| truck.id == id)
    }

    /// The standing crew of a station.
    #[must_use]
    pub fn crew(&self, station: &str) -> &[CrewMember] {
        self.state
            .crews
            .get(station)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The personnel database.
    #[must_use]
    pub fn personnel(&self) -> &[Personnel] {
        &self.state.personnel
    }

    /// Looks up a personnel record by `lp`.
    #[must_use]
    pub fn person(&self, lp: &str) -> Option<&Personnel> {
        self.state.personnel.iter().find(|person| person.lp == lp)
    }

    /// Stations with an access code.
    pub fn coded_stations(&self) -> impl Iterator<Item = &str> {
        self.state.codes.keys().map(String::as_str)
    }

    /// The activity log, newest first, filtered by a case-insensitive search
    /// over user and message.
    ///
    /// # Errors
    ///
    /// Fails if the session may not view logs.
    pub fn logs(&self, session: &Session, search: &str) -> Result<Vec<&LogEntry>, AccessError> {
        session.require(Permission::ViewLogs)?;
        Ok(self
            .state
            .logs
            .iter()
            .filter(|entry| search.is_empty() || entry.matches(search))
            .collect())
    }

    /// Groups and orders the fleet with the configured metadata.
    ///
    /// # Errors
    ///
    /// Fails if the session may not generate reports.
    pub fn grouped_hierarchy(
        &self,
        session: &Session,
    ) -> Result<GroupedHierarchy<'_>, AccessError> {
        session.require(Permission::GenerateReport)?;
        Ok(compute_grouped_hierarchy(
            &self.state.trucks,
            self.config.detachments(),
            self.config.zone_order(),
        ))
    }

    /// Sets the access code of a station.
    ///
    /// # Errors
    ///
    /// Fails if the session may not manage the nomenclador or the code is
    /// blank.
    #[instrument(skip(self, session, code))]
    pub fn set_station_code(
        &mut self,
        session: &Session,
        station: &str,
        code: &str,
    ) -> Result<(), StoreError> {
        session.require(Permission::ManageNomenclador)?;
        let code = required("code", code)?;
        self.state
            .codes
            .insert(station.to_string(), code.as_str().to_string());
        self.record(session, format!("Cambió el código de acceso para {station}."));
        Ok(())
    }

    /// Empties the activity log.
    ///
    /// # Errors
    ///
    /// Fails if the session may not clear logs.
    pub fn clear_logs(&mut self, session: &Session) -> Result<(), AccessError> {
        session.require(Permission::ClearLogs)?;
        tracing::info!(cleared = self.state.logs.len(), "Cleared activity log");
        self.state.logs.clear();
        Ok(())
    }

    fn record(&mut self, session: &Session, message: String) {
        tracing::info!(user = %session.user().name, "{message}");
        self.state
            .logs
            .insert(0, LogEntry::now(session.user().name.clone(), message));
    }
}

fn load_config(root: &Path) -> Config {
    let path = root.join(CONFIG_FILE);
    Config::load(&path).unwrap_or_else(|e| {
        tracing::debug!("Failed to load config: {e}");
        Config::default()
    })
}

/// Trims `value` and rejects it if nothing is left.
fn required(field: &'static str, value: &str) -> Result<NonEmptyString, ValidationError> {
    NonEmptyString::new(value.trim().to_string()).map_err(|_| ValidationError::Missing(field))
}

/// Errors raised by the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A file could not be read or written.
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        /// The file.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// `roster.json` could not be parsed or serialized.
    #[error("invalid roster file {}: {source}", .path.display())]
    Json {
        /// The file.
        path: PathBuf,
        /// The underlying error.
        source: serde_json::Error,
    },
    /// `config.toml` could not be written.
    #[error("{0}")]
    Config(String),
    /// The input was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// No truck has the given id.
    #[error("no truck with id {0}")]
    TruckNotFound(String),
    /// No personnel record has the given `lp`.
    #[error("no personnel with LP {0}")]
    PersonnelNotFound(String),
    /// The session may not perform the action.
    #[error(transparent)]
    Access(#[from] AccessError),
}

/// Input rejected by a store operation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was blank.
    #[error("{0} is required")]
    Missing(&'static str),
    /// Several required fields were blank.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    /// A truck with the id already exists.
    #[error("a truck with id {0} already exists")]
    DuplicateTruck(String),
    /// A personnel record with the `lp` already exists.
    #[error("personnel with LP {0} already exists")]
    DuplicateLp(String),
    /// A personnel record with the `dni` already exists.
    #[error("personnel with DNI {0} already exists")]
    DuplicateDni(String),
    /// An assignment had no crew.
    #[error("crew count must be at least one")]
    EmptyCrew,
    /// No truck is based at the destination, so its zone is unknown.
    #[error("no truck is based at {0}; cannot determine its zone")]
    UnknownDestination(String),
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::domain::{Role, Status, ZoneOrder};

    pub(super) fn admin() -> Session {
        Session::new(User::admin("O.C.O.B."))
    }

    pub(super) fn operator(station: &str) -> Session {
        Session::new(User::operator(station))
    }

    pub(super) fn store_with_config(config: Config) -> (TempDir, Store) {
        let tmp = TempDir::new().unwrap();
        let store = Store::init(tmp.path(), config, "admin").unwrap();
        (tmp, store)
    }

    pub(super) fn store() -> (TempDir, Store) {
        let detachments = [("DESTACAMENTO NORTE", "CENTRAL")].into_iter().collect();
        store_with_config(Config::new(ZoneOrder::default(), detachments))
    }

    #[test]
    fn open_empty_directory_gives_empty_roster() {
        let tmp = TempDir::new().unwrap();

        let store = Store::open(tmp.path()).unwrap();

        assert!(store.trucks().is_empty());
        assert_eq!(store.config(), &Config::default());
    }

    #[test]
    fn open_rejects_corrupt_roster() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(ROSTER_FILE), "{ not json").unwrap();

        let result = Store::open(tmp.path());

        assert!(matches!(result, Err(StoreError::Json { .. })));
    }

    #[test]
    fn invalid_config_falls_back_to_default() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE), "zone_order = [").unwrap();

        let store = Store::open(tmp.path()).unwrap();

        assert_eq!(store.config(), &Config::default());
    }

    #[test]
    fn flush_then_open_round_trips() {
        let (tmp, mut store) = store();
        let mut truck = Truck::new("AB-1".into(), "Autobomba 1".into(), Status::InService);
        truck.zone = Some("Zona 1".into());
        truck.station = Some("CENTRAL".into());
        store.add_truck(&admin(), truck).unwrap();
        store.flush().unwrap();

        let reopened = Store::open(tmp.path()).unwrap();

        assert_eq!(reopened.trucks(), store.trucks());
        assert_eq!(reopened.config(), store.config());
        assert_eq!(reopened.state.logs.len(), 1);
    }

    #[test]
    fn grouped_hierarchy_uses_configured_detachments() {
        let (_tmp, mut store) = store();
        for (id, station) in [("1", "DESTACAMENTO NORTE"), ("2", "CENTRAL")] {
            let mut truck = Truck::new(id.into(), format!("Unidad {id}"), Status::InService);
            truck.zone = Some("Zona 1".into());
            truck.station = Some(station.into());
            store.add_truck(&admin(), truck).unwrap();
        }

        let hierarchy = store.grouped_hierarchy(&operator("OESTE")).unwrap();

        let central = hierarchy.zone("Zona 1").unwrap().station("CENTRAL").unwrap();
        assert_eq!(central.trucks.len(), 1);
        assert!(central.detachment("DESTACAMENTO NORTE").is_some());
        assert!(store.grouped_hierarchy(&admin()).is_ok());
    }

    #[test]
    fn init_records_admin_code() {
        let (_tmp, store) = store();

        assert!(store.login(User::admin("O.C.O.B."), "admin").is_ok());
        assert_eq!(
            store.login(User::admin("O.C.O.B."), "wrong"),
            Err(AccessError::InvalidCode("O.C.O.B.".into()))
        );
    }

    #[test]
    fn operator_logs_in_with_station_code() {
        let (_tmp, mut store) = store();
        store.set_station_code(&admin(), "CENTRAL", "1234").unwrap();

        let session = store.login(User::operator("CENTRAL"), "1234").unwrap();

        assert_eq!(session.user().role, Role::Operador);
        assert!(store.login(User::operator("OESTE"), "1234").is_err());
    }

    #[test]
    fn blank_code_is_rejected() {
        let (_tmp, mut store) = store();

        let result = store.set_station_code(&admin(), "CENTRAL", "  ");

        assert!(matches!(
            result,
            Err(StoreError::Validation(ValidationError::Missing("code")))
        ));
    }

    #[test]
    fn logs_are_newest_first_and_searchable() {
        let (_tmp, mut store) = store();
        store.set_station_code(&admin(), "CENTRAL", "1").unwrap();
        store.set_station_code(&admin(), "OESTE", "2").unwrap();

        let all = store.logs(&admin(), "").unwrap();
        assert!(all[0].message.contains("OESTE"));
        assert!(all[1].message.contains("CENTRAL"));

        let found = store.logs(&admin(), "central").unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn operator_may_not_read_or_clear_logs() {
        let (_tmp, mut store) = store();
        let session = operator("CENTRAL");

        assert!(store.logs(&session, "").is_err());
        assert!(store.clear_logs(&session).is_err());
        assert!(store.clear_logs(&admin()).is_ok());
    }
}
