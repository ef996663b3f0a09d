use std::fmt;

use serde::{Deserialize, Serialize};

/// Rank given to status values that are not one of the six known values.
pub const UNKNOWN_STATUS_RANK: u8 = 99;

/// Operational state of a truck.
///
/// The six known values carry a fixed rank used for ordering. Any other
/// value read from storage is kept verbatim as [`Status::Other`] and ranks
/// after all of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    /// `Unidad Integrando Fuerza o Servicio`
    IntegratingForce,
    /// `Para Servicio`
    InService,
    /// `Reserva`
    Reserve,
    /// `Alternativa`
    Alternate,
    /// `A Préstamo`
    OnLoan,
    /// `Fuera de Servicio`
    OutOfService,
    /// Any value outside the known set.
    Other(String),
}

impl Status {
    /// The known statuses, in rank order.
    pub const ALL: [Self; 6] = [
        Self::IntegratingForce,
        Self::InService,
        Self::Reserve,
        Self::Alternate,
        Self::OnLoan,
        Self::OutOfService,
    ];

    /// Sort rank; lower sorts earlier.
    #[must_use]
    pub const fn rank(&self) -> u8 {
        match self {
            Self::IntegratingForce => 0,
            Self::InService => 1,
            Self::Reserve => 2,
            Self::Alternate => 3,
            Self::OnLoan => 4,
            Self::OutOfService => 5,
            Self::Other(_) => UNKNOWN_STATUS_RANK,
        }
    }

    /// The label stored and displayed for this status.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::IntegratingForce => "Unidad Integrando Fuerza o Servicio",
            Self::InService => "Para Servicio",
            Self::Reserve => "Reserva",
            Self::Alternate => "Alternativa",
            Self::OnLoan => "A Préstamo",
            Self::OutOfService => "Fuera de Servicio",
            Self::Other(label) => label,
        }
    }

    /// Short title used in summaries.
    #[must_use]
    pub fn short_label(&self) -> &str {
        match self {
            Self::IntegratingForce => "U.I.F.S.",
            other => other.label(),
        }
    }

    /// Whether a status reason is recorded for this status.
    #[must_use]
    pub const fn takes_reason(&self) -> bool {
        matches!(self, Self::Reserve | Self::OutOfService)
    }

    /// Whether the truck counts as an operational unit.
    #[must_use]
    pub const fn is_operational(&self) -> bool {
        matches!(self, Self::InService | Self::Reserve)
    }

    /// Parses one of the six known statuses.
    ///
    /// Accepts the full label (case-insensitive) or a short alias such as
    /// `uifs`, `servicio`, `reserva`, `alternativa`, `prestamo` or `fuera`.
    /// Returns `None` for anything else.
    #[must_use]
    pub fn parse_known(value: &str) -> Option<Self> {
        let lowered = value.trim().to_lowercase();
        let status = match lowered.as_str() {
            "uifs" | "u.i.f.s." | "unidad integrando fuerza o servicio" => Self::IntegratingForce,
            "servicio" | "para servicio" => Self::InService,
            "reserva" => Self::Reserve,
            "alternativa" => Self::Alternate,
            "prestamo" | "préstamo" | "a prestamo" | "a préstamo" => Self::OnLoan,
            "fuera" | "fuera de servicio" => Self::OutOfService,
            _ => return None,
        };
        Some(status)
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        Self::ALL
            .into_iter()
            .find(|status| status.label() == value)
            .unwrap_or(Self::Other(value))
    }
}

impl From<&str> for Status {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        match status {
            Status::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The officer in charge of a truck's crew for a shift.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Officer {
    /// Rank, e.g. `Oficial Principal`.
    pub hierarchy: String,
    /// Full display name.
    pub name: String,
    /// Given names.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Personnel number (`LP`).
    #[serde(default)]
    pub lp: String,
    /// Point of contact, usually a phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poc: Option<String>,
    /// The officer's internal number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interno: Option<String>,
}

impl Officer {
    /// Creates an officer, deriving first and last name from the full name.
    ///
    /// The last whitespace-separated word is the last name; the rest is the
    /// first name.
    #[must_use]
    pub fn new(hierarchy: String, name: String, lp: String) -> Self {
        let (first_name, last_name) = split_name(&name);
        Self {
            hierarchy,
            name,
            first_name,
            last_name,
            lp,
            poc: None,
            interno: None,
        }
    }

    /// Sets the officer's internal number; blank values are dropped.
    #[must_use]
    pub fn with_interno(mut self, interno: Option<String>) -> Self {
        self.interno = interno.filter(|interno| !interno.trim().is_empty());
        self
    }

    /// Whether this officer has a non-blank name.
    #[must_use]
    pub fn is_named(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

fn split_name(name: &str) -> (String, String) {
    let mut parts: Vec<&str> = name.split(' ').collect();
    let last = parts.pop().unwrap_or_default().to_string();
    (parts.join(" "), last)
}

/// A vehicle in the fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Truck {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Category, e.g. `Autobomba` or `Cisterna`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Zone the truck is recorded in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    /// Station or detachment the truck is based at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station: Option<String>,
    /// Operational status.
    pub status: Status,
    /// Free-text reason, only kept for `Reserva` and `Fuera de Servicio`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<String>,
    /// Assigned officer, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub officer: Option<Officer>,
    /// Number of assigned crew.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personnel: Option<u32>,
    /// Names of the assigned crew, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub personnel_list: Vec<String>,
    /// Internal fleet number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interno: Option<String>,
}

impl Truck {
    /// Creates an unassigned truck with no zone, station or type.
    #[must_use]
    pub const fn new(id: String, name: String, status: Status) -> Self {
        Self {
            id,
            name,
            kind: None,
            zone: None,
            station: None,
            status,
            status_reason: None,
            officer: None,
            personnel: None,
            personnel_list: Vec::new(),
            interno: None,
        }
    }

    /// Whether an officer with a non-blank name is assigned.
    #[must_use]
    pub fn has_assignment(&self) -> bool {
        self.officer.as_ref().is_some_and(Officer::is_named)
    }

    /// The truck type, or `Sin Tipo` when none is recorded.
    #[must_use]
    pub fn kind_or_default(&self) -> &str {
        self.kind
            .as_deref()
            .filter(|kind| !kind.is_empty())
            .unwrap_or("Sin Tipo")
    }

    /// Status text for reports, including the reason where one applies.
    #[must_use]
    pub fn status_text(&self) -> String {
        match &self.status_reason {
            Some(reason) if self.status.takes_reason() && !reason.is_empty() => {
                format!("{} - {reason}", self.status)
            }
            _ => self.status.to_string(),
        }
    }

    /// Officer text for reports: `hierarchy name`, or `Sin Asignación`.
    #[must_use]
    pub fn officer_text(&self) -> String {
        self.officer.as_ref().map_or_else(
            || "Sin Asignación".to_string(),
            |officer| format!("{} {}", officer.hierarchy, officer.name),
        )
    }

    /// Crew count for reports, or `-`.
    #[must_use]
    pub fn personnel_text(&self) -> String {
        match self.personnel {
            Some(count) if count > 0 => count.to_string(),
            _ => "-".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("Unidad Integrando Fuerza o Servicio", 0; "integrating force")]
    #[test_case("Para Servicio", 1; "in service")]
    #[test_case("Reserva", 2; "reserve")]
    #[test_case("Alternativa", 3; "alternate")]
    #[test_case("A Préstamo", 4; "on loan")]
    #[test_case("Fuera de Servicio", 5; "out of service")]
    #[test_case("En Taller", 99; "unknown value")]
    fn status_rank_follows_table(label: &str, rank: u8) {
        assert_eq!(Status::from(label).rank(), rank);
    }

    #[test]
    fn unknown_status_survives_serde() {
        let json = r#"{"id":"1","name":"Unidad 1","status":"En Taller"}"#;
        let truck: Truck = serde_json::from_str(json).unwrap();
        assert_eq!(truck.status, Status::Other("En Taller".to_string()));

        let back = serde_json::to_string(&truck).unwrap();
        assert!(back.contains(r#""status":"En Taller""#));
    }

    #[test]
    fn truck_reads_camel_case_fields() {
        let json = r#"{
            "id": "AB-1",
            "name": "Autobomba 1",
            "type": "Autobomba",
            "zone": "Zona 1",
            "station": "CENTRAL",
            "status": "Reserva",
            "statusReason": "Sin chofer",
            "officer": {"hierarchy": "Oficial", "name": "Juan Perez", "firstName": "Juan", "lastName": "Perez", "lp": "123"},
            "personnel": 4,
            "personnelList": ["A", "B"]
        }"#;
        let truck: Truck = serde_json::from_str(json).unwrap();

        assert_eq!(truck.kind.as_deref(), Some("Autobomba"));
        assert_eq!(truck.status, Status::Reserve);
        assert_eq!(truck.status_reason.as_deref(), Some("Sin chofer"));
        assert_eq!(truck.personnel_list, vec!["A", "B"]);
        assert!(truck.has_assignment());
    }

    #[test]
    fn blank_officer_name_is_not_an_assignment() {
        let mut truck = Truck::new("1".into(), "U1".into(), Status::InService);
        truck.officer = Some(Officer::new("Bombero".into(), "   ".into(), "1".into()));
        assert!(!truck.has_assignment());
    }

    #[test]
    fn officer_name_split_uses_last_word() {
        let officer = Officer::new("Oficial".into(), "Juan Carlos Perez".into(), "7".into());
        assert_eq!(officer.first_name, "Juan Carlos");
        assert_eq!(officer.last_name, "Perez");
    }

    #[test]
    fn status_text_includes_reason_only_where_it_applies() {
        let mut truck = Truck::new("1".into(), "U1".into(), Status::OutOfService);
        truck.status_reason = Some("Motor".into());
        assert_eq!(truck.status_text(), "Fuera de Servicio - Motor");

        truck.status = Status::Alternate;
        assert_eq!(truck.status_text(), "Alternativa");
    }

    #[test_case("fuera", Some(Status::OutOfService); "alias")]
    #[test_case("PARA SERVICIO", Some(Status::InService); "label any case")]
    #[test_case("taller", None; "unknown")]
    fn parse_known_status(input: &str, expected: Option<Status>) {
        assert_eq!(Status::parse_known(input), expected);
    }
}
