use tracing::instrument;
use uuid::Uuid;

use super::{Store, StoreError, ValidationError, required};
use crate::domain::{Officer, Permission, Session, Status, Truck};

/// A partial update to a truck's identifying fields.
///
/// `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TruckPatch {
    /// New display name.
    pub name: Option<String>,
    /// New type.
    pub kind: Option<String>,
    /// New zone.
    pub zone: Option<String>,
    /// New station.
    pub station: Option<String>,
}

impl TruckPatch {
    /// Checks that no required field is being blanked.
    fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("name", &self.name),
            ("zone", &self.zone),
            ("station", &self.station),
        ] {
            if let Some(value) = value {
                required(field, value)?;
            }
        }
        Ok(())
    }

    fn apply(self, truck: &mut Truck) {
        let trimmed = |value: String| value.trim().to_string();
        if let Some(name) = self.name {
            truck.name = trimmed(name);
        }
        if let Some(kind) = self.kind {
            truck.kind = Some(trimmed(kind)).filter(|kind| !kind.is_empty());
        }
        if let Some(zone) = self.zone {
            truck.zone = Some(trimmed(zone));
        }
        if let Some(station) = self.station {
            truck.station = Some(trimmed(station));
        }
    }
}

impl Store {
    /// Adds a truck to the fleet.
    ///
    /// A blank id is replaced by a fresh UUID. Name, station and zone are
    /// required.
    ///
    /// # Errors
    ///
    /// Fails if the session may not manage the nomenclador, a required field
    /// is blank, or the id is already taken.
    #[instrument(skip(self, session, truck), fields(id = %truck.id))]
    pub fn add_truck(&mut self, session: &Session, mut truck: Truck) -> Result<&Truck, StoreError> {
        session.require(Permission::ManageNomenclador)?;

        if truck.id.trim().is_empty() {
            truck.id = Uuid::new_v4().to_string();
        }
        truck.name = required("name", &truck.name)?.as_str().to_string();
        required("station", truck.station.as_deref().unwrap_or_default())?;
        required("zone", truck.zone.as_deref().unwrap_or_default())?;

        if self.truck(&truck.id).is_some() {
            return Err(ValidationError::DuplicateTruck(truck.id).into());
        }

        let message = format!(
            "Agregó la unidad {} ({}) a {}.",
            truck.name,
            truck.id,
            truck.station.as_deref().unwrap_or_default()
        );
        self.state.trucks.push(truck);
        self.record(session, message);

        let index = self.state.trucks.len() - 1;
        Ok(&self.state.trucks[index])
    }

    /// Applies a partial update to a truck.
    ///
    /// Name, zone and station may be changed but not blanked. A blank type
    /// clears the type.
    ///
    /// # Errors
    ///
    /// Fails if the session may not manage the nomenclador, the truck does
    /// not exist, or the patch blanks a required field. A failed update
    /// changes nothing.
    #[instrument(skip(self, session))]
    pub fn update_truck(
        &mut self,
        session: &Session,
        id: &str,
        patch: TruckPatch,
    ) -> Result<(), StoreError> {
        session.require(Permission::ManageNomenclador)?;
        patch.validate()?;
        let truck = self.truck_mut(id)?;
        patch.apply(truck);
        let message = format!("Actualizó los datos de la unidad {} ({id}).", truck.name);
        self.record(session, message);
        Ok(())
    }

    /// Removes a truck from the fleet.
    ///
    /// # Errors
    ///
    /// Fails if the session may not manage the nomenclador or the truck does
    /// not exist.
    #[instrument(skip(self, session))]
    pub fn delete_truck(&mut self, session: &Session, id: &str) -> Result<Truck, StoreError> {
        session.require(Permission::ManageNomenclador)?;
        let index = self
            .state
            .trucks
            .iter()
            .position(|truck| truck.id == id)
            .ok_or_else(|| StoreError::TruckNotFound(id.to_string()))?;

        let truck = self.state.trucks.remove(index);
        self.record(session, format!("Eliminó la unidad {} ({}).", truck.name, truck.id));
        Ok(truck)
    }

    /// Assigns an officer and crew to a truck.
    ///
    /// The officer's rank, name and `lp` are required, as is a crew count of
    /// at least one. The officer's first and last name are derived from the
    /// full name. If the officer's `interno` differs from the personnel record
    /// with the same `lp`, the record is updated to match.
    ///
    /// # Errors
    ///
    /// Fails if the session may not edit assignments at the truck's station,
    /// the truck does not exist, or a required field is missing.
    #[instrument(skip(self, session, officer, crew), fields(officer = %officer.name))]
    pub fn assign_officer(
        &mut self,
        session: &Session,
        id: &str,
        officer: Officer,
        personnel: u32,
        crew: Vec<String>,
    ) -> Result<(), StoreError> {
        self.authorize(session, Permission::EditAssignment, id)?;
        required("hierarchy", &officer.hierarchy)?;
        required("officer name", &officer.name)?;
        required("lp", &officer.lp)?;
        if personnel == 0 {
            return Err(ValidationError::EmptyCrew.into());
        }

        if let Some(person) = self
            .state
            .personnel
            .iter_mut()
            .find(|person| person.lp == officer.lp)
            .filter(|person| person.interno != officer.interno)
        {
            person.interno.clone_from(&officer.interno);
            let message = format!(
                "Actualizó los datos de {} (LP: {}).",
                person.display_name(),
                person.lp
            );
            self.record(session, message);
        }

        let officer = Officer {
            poc: officer.poc.filter(|poc| !poc.is_empty()),
            ..Officer::new(officer.hierarchy, officer.name, officer.lp)
        }
        .with_interno(officer.interno);

        let truck = self.truck_mut(id)?;
        let previous = truck.officer.as_ref().map(|officer| officer.name.clone());
        let message = if officer.is_named() && previous.as_deref() != Some(officer.name.as_str()) {
            let poc = officer
                .poc
                .as_ref()
                .map(|poc| format!(", POC: {poc}"))
                .unwrap_or_default();
            format!(
                "Asignó a {} {} (LP: {}{poc}) con {} efectivos a la unidad {}.",
                officer.hierarchy,
                officer.name,
                officer.lp,
                personnel,
                truck.name
            )
        } else {
            format!("Actualizó la asignación de la unidad {}.", truck.name)
        };

        truck.personnel = Some(personnel);
        truck.personnel_list = crew;
        truck.officer = Some(officer);
        self.record(session, message);
        Ok(())
    }

    /// Removes a truck's officer and crew.
    ///
    /// # Errors
    ///
    /// Fails if the session may not edit assignments at the truck's station,
    /// or the truck does not exist.
    #[instrument(skip(self, session))]
    pub fn clear_assignment(&mut self, session: &Session, id: &str) -> Result<(), StoreError> {
        self.authorize(session, Permission::EditAssignment, id)?;
        let truck = self.truck_mut(id)?;
        truck.officer = None;
        truck.personnel = None;
        truck.personnel_list.clear();
        let message = format!("Quitó la asignación de la unidad {}.", truck.name);
        self.record(session, message);
        Ok(())
    }

    /// Moves a truck to another station.
    ///
    /// The truck takes the zone of a truck already based at the destination.
    ///
    /// # Errors
    ///
    /// Fails if the session may not move the truck, the truck does not exist,
    /// or no truck is based at the destination.
    #[instrument(skip(self, session))]
    pub fn move_truck(
        &mut self,
        session: &Session,
        id: &str,
        station: &str,
    ) -> Result<(), StoreError> {
        self.authorize(session, Permission::MoveTruck, id)?;

        let zone = self
            .state
            .trucks
            .iter()
            .find(|truck| truck.station.as_deref() == Some(station))
            .map(|truck| truck.zone.clone())
            .ok_or_else(|| ValidationError::UnknownDestination(station.to_string()))?;

        let truck = self.truck_mut(id)?;
        let message = format!(
            "Movió la unidad {} de {} a {station}.",
            truck.name,
            truck.station.as_deref().unwrap_or_default()
        );
        truck.station = Some(station.to_string());
        truck.zone = zone;
        self.record(session, message);
        Ok(())
    }

    /// Changes a truck's status.
    ///
    /// The reason is kept only for statuses that take one and cleared
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Fails if the session may not change status at the truck's station, or
    /// the truck does not exist.
    #[instrument(skip(self, session))]
    pub fn set_status(
        &mut self,
        session: &Session,
        id: &str,
        status: Status,
        reason: Option<String>,
    ) -> Result<(), StoreError> {
        self.authorize(session, Permission::ChangeStatus, id)?;

        let reason = reason.filter(|reason| !reason.trim().is_empty());
        let reason_text = reason
            .as_ref()
            .map(|reason| format!(" (Motivo: {reason})"))
            .unwrap_or_default();

        let truck = self.truck_mut(id)?;
        let message = format!(
            "Cambió el estado de la unidad {} a \"{status}\"{reason_text}.",
            truck.name
        );
        truck.status_reason = reason.filter(|_| status.takes_reason());
        truck.status = status;
        self.record(session, message);
        Ok(())
    }

    /// Sets a truck's internal number.
    ///
    /// # Errors
    ///
    /// Fails if the session may not manage internos or the truck does not
    /// exist.
    #[instrument(skip(self, session))]
    pub fn set_truck_interno(
        &mut self,
        session: &Session,
        id: &str,
        interno: Option<String>,
    ) -> Result<(), StoreError> {
        session.require(Permission::ManageInternos)?;
        let truck = self.truck_mut(id)?;
        truck.interno = interno.filter(|interno| !interno.trim().is_empty());
        let message = format!(
            "Cambió el interno de la unidad {} a {}.",
            truck.name,
            truck.interno.as_deref().unwrap_or("-")
        );
        self.record(session, message);
        Ok(())
    }

    fn truck_mut(&mut self, id: &str) -> Result<&mut Truck, StoreError> {
        self.state
            .trucks
            .iter_mut()
            .find(|truck| truck.id == id)
            .ok_or_else(|| StoreError::TruckNotFound(id.to_string()))
    }

    /// Checks `permission` at the station the truck is based at.
    fn authorize(
        &self,
        session: &Session,
        permission: Permission,
        id: &str,
    ) -> Result<(), StoreError> {
        let truck = self
            .truck(id)
            .ok_or_else(|| StoreError::TruckNotFound(id.to_string()))?;
        let station = truck.station.as_deref().unwrap_or_default();
        session.require_at(permission, station, self.config.detachments())?;
        Ok(())
    }
}
