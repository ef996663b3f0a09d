use tracing::instrument;

use super::{Store, StoreError, ValidationError, required};
use crate::domain::{CrewMember, Permission, Personnel, Session};

impl Store {
    /// Adds a firefighter to a station's standing crew.
    ///
    /// Returns `false` without changing anything if the station's crew
    /// already has someone with that name.
    ///
    /// # Errors
    ///
    /// Fails if the session may not manage the station's crew, or the name or
    /// interno is blank.
    #[instrument(skip(self, session))]
    pub fn add_crew_member(
        &mut self,
        session: &Session,
        station: &str,
        name: &str,
        interno: &str,
    ) -> Result<bool, StoreError> {
        session.require_at(Permission::ManageCrew, station, self.config.detachments())?;
        let name = required("name", name)?;
        let interno = required("interno", interno)?;

        let crew = self.state.crews.entry(station.to_string()).or_default();
        if crew.iter().any(|member| member.name == name.as_str()) {
            tracing::debug!("{} is already in the crew of {station}", name.as_str());
            return Ok(false);
        }
        crew.push(CrewMember {
            name: name.as_str().to_string(),
            interno: interno.as_str().to_string(),
        });

        let message = format!(
            "Agregó a {} (Interno: {}) a la dotación de {station}.",
            name.as_str(),
            interno.as_str()
        );
        self.record(session, message);
        Ok(true)
    }

    /// Removes a firefighter from a station's standing crew.
    ///
    /// Returns whether anyone was removed.
    ///
    /// # Errors
    ///
    /// Fails if the session may not manage the station's crew.
    #[instrument(skip(self, session))]
    pub fn remove_crew_member(
        &mut self,
        session: &Session,
        station: &str,
        name: &str,
    ) -> Result<bool, StoreError> {
        session.require_at(Permission::ManageCrew, station, self.config.detachments())?;

        let Some(crew) = self.state.crews.get_mut(station) else {
            return Ok(false);
        };
        let before = crew.len();
        crew.retain(|member| member.name != name);
        let removed = crew.len() != before;

        self.record(session, format!("Quitó a {name} de la dotación de {station}."));
        Ok(removed)
    }

    /// Adds a record to the personnel database.
    ///
    /// # Errors
    ///
    /// Fails if the session may not manage personnel, a required field is
    /// blank, or the `lp` or `dni` is already taken.
    #[instrument(skip(self, session, person), fields(lp = %person.lp))]
    pub fn add_personnel(&mut self, session: &Session, person: Personnel) -> Result<(), StoreError> {
        session.require(Permission::ManagePersonnel)?;
        self.validate_personnel(&person, None)?;

        let message = format!(
            "Agregó a {} (LP: {}) a la base de datos de personal.",
            person.display_name(),
            person.lp
        );
        self.state.personnel.push(person);
        self.record(session, message);
        Ok(())
    }

    /// Replaces the record with the given `lp`.
    ///
    /// # Errors
    ///
    /// Fails if the session may not manage personnel, no record has the `lp`,
    /// a required field is blank, or the new `lp` or `dni` belongs to another
    /// record.
    #[instrument(skip(self, session, person))]
    pub fn update_personnel(
        &mut self,
        session: &Session,
        lp: &str,
        person: Personnel,
    ) -> Result<(), StoreError> {
        session.require(Permission::ManagePersonnel)?;
        let index = self.personnel_index(lp)?;
        self.validate_personnel(&person, Some(index))?;

        let message = format!("Actualizó los datos de {} (LP: {lp}).", person.display_name());
        self.state.personnel[index] = person;
        self.record(session, message);
        Ok(())
    }

    /// Removes the record with the given `lp`.
    ///
    /// # Errors
    ///
    /// Fails if the session may not manage personnel or no record has the
    /// `lp`.
    #[instrument(skip(self, session))]
    pub fn delete_personnel(&mut self, session: &Session, lp: &str) -> Result<Personnel, StoreError> {
        session.require(Permission::ManagePersonnel)?;
        let index = self.personnel_index(lp)?;

        let person = self.state.personnel.remove(index);
        let message = format!(
            "Eliminó a {} (LP: {lp}) de la base de datos de personal.",
            person.display_name()
        );
        self.record(session, message);
        Ok(person)
    }

    /// Sets the internal number of the record with the given `lp`.
    ///
    /// # Errors
    ///
    /// Fails if the session may not manage internos or no record has the
    /// `lp`.
    #[instrument(skip(self, session))]
    pub fn set_personnel_interno(
        &mut self,
        session: &Session,
        lp: &str,
        interno: Option<String>,
    ) -> Result<(), StoreError> {
        session.require(Permission::ManageInternos)?;
        let index = self.personnel_index(lp)?;

        let person = &mut self.state.personnel[index];
        person.interno = interno.filter(|interno| !interno.trim().is_empty());
        let message = format!(
            "Cambió el interno de {} a {}.",
            person.display_name(),
            person.interno.as_deref().unwrap_or("-")
        );
        self.record(session, message);
        Ok(())
    }

    fn personnel_index(&self, lp: &str) -> Result<usize, StoreError> {
        self.state
            .personnel
            .iter()
            .position(|person| person.lp == lp)
            .ok_or_else(|| StoreError::PersonnelNotFound(lp.to_string()))
    }

    /// Checks required fields and uniqueness, ignoring the record at `skip`.
    fn validate_personnel(
        &self,
        person: &Personnel,
        skip: Option<usize>,
    ) -> Result<(), ValidationError> {
        let missing = person.missing_fields();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        let others = self
            .state
            .personnel
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != skip)
            .map(|(_, other)| other);
        for other in others {
            if other.lp == person.lp {
                return Err(ValidationError::DuplicateLp(person.lp.clone()));
            }
            if other.dni == person.dni {
                return Err(ValidationError::DuplicateDni(person.dni.clone()));
            }
        }
        Ok(())
    }
}
