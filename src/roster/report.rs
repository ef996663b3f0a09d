//! Flattening of an ordered hierarchy into report rows.

use serde::Serialize;

use super::hierarchy::GroupedHierarchy;
use crate::domain::Truck;

/// Level of a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderLevel {
    /// Starts a zone.
    Zone,
    /// Starts a station or a detachment.
    Station,
}

/// A full-width header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    /// Zone, station or detachment name.
    pub title: String,
    /// Which kind of group the header starts.
    pub level: HeaderLevel,
}

/// One row of the report: a header or a truck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "row", rename_all = "snake_case")]
pub enum ReportRow<'a> {
    /// A zone or station header.
    Header(Header),
    /// A truck.
    Truck(&'a Truck),
}

impl<'a> ReportRow<'a> {
    fn zone(title: &str) -> Self {
        Self::Header(Header {
            title: title.to_string(),
            level: HeaderLevel::Zone,
        })
    }

    fn station(title: &str) -> Self {
        Self::Header(Header {
            title: title.to_string(),
            level: HeaderLevel::Station,
        })
    }

    /// The truck, if this is a truck row.
    #[must_use]
    pub const fn as_truck(&self) -> Option<&'a Truck> {
        match self {
            Self::Truck(truck) => Some(truck),
            Self::Header(_) => None,
        }
    }
}

/// Flattens an ordered hierarchy into rows.
///
/// Each zone emits a zone header. Each station with direct trucks emits a
/// station header followed by its trucks; then each detachment with trucks
/// emits a station-level header followed by its trucks. Stations and
/// detachments without trucks emit nothing.
///
/// The hierarchy is iterated in the order it holds, so it should have been
/// ordered first.
#[must_use]
pub fn project_to_rows<'a>(hierarchy: &GroupedHierarchy<'a>) -> Vec<ReportRow<'a>> {
    let mut rows = Vec::new();

    for zone in hierarchy.zones() {
        rows.push(ReportRow::zone(&zone.name));

        for station in &zone.stations {
            if !station.trucks.is_empty() {
                rows.push(ReportRow::station(&station.name));
                rows.extend(station.trucks.iter().copied().map(ReportRow::Truck));
            }

            for detachment in &station.detachments {
                if detachment.trucks.is_empty() {
                    continue;
                }
                rows.push(ReportRow::station(&detachment.name));
                rows.extend(detachment.trucks.iter().copied().map(ReportRow::Truck));
            }
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Officer, StationParents, Status, ZoneOrder},
        roster::{
            compute_grouped_hierarchy,
            hierarchy::{StationGroup, ZoneGroup},
        },
    };

    fn truck(id: &str, zone: &str, station: &str, status: Status) -> Truck {
        let mut truck = Truck::new(id.to_string(), format!("Unidad {id}"), status);
        truck.zone = Some(zone.to_string());
        truck.station = Some(station.to_string());
        truck
    }

    fn titles(rows: &[ReportRow<'_>]) -> Vec<String> {
        rows.iter()
            .map(|row| match row {
                ReportRow::Header(header) => format!("# {}", header.title),
                ReportRow::Truck(truck) => truck.id.clone(),
            })
            .collect()
    }

    #[test]
    fn projects_zone_station_and_detachment_headers() {
        let parents: StationParents = [
            ("DESTACAMENTO SAAVEDRA", "CENTRAL"),
            ("DESTACAMENTO ALVAREZ", "CENTRAL"),
            ("DESTACAMENTO URQUIZA", "CENTRAL"),
        ]
        .into_iter()
        .collect();
        let trucks = vec![
            truck("s", "Zona 1", "DESTACAMENTO SAAVEDRA", Status::InService),
            truck("a", "Zona 1", "DESTACAMENTO ALVAREZ", Status::InService),
            truck("u", "Zona 1", "DESTACAMENTO URQUIZA", Status::InService),
            truck("c", "Zona 1", "CENTRAL", Status::InService),
        ];

        let hierarchy = compute_grouped_hierarchy(&trucks, &parents, &ZoneOrder::default());
        let rows = project_to_rows(&hierarchy);

        assert_eq!(
            titles(&rows),
            vec![
                "# Zona 1",
                "# CENTRAL",
                "c",
                "# DESTACAMENTO ALVAREZ",
                "a",
                "# DESTACAMENTO URQUIZA",
                "u",
                "# DESTACAMENTO SAAVEDRA",
                "s",
            ]
        );
        assert!(matches!(&rows[0], ReportRow::Header(header) if header.level == HeaderLevel::Zone));
        assert!(
            matches!(&rows[3], ReportRow::Header(header) if header.level == HeaderLevel::Station)
        );
    }

    #[test]
    fn station_without_direct_trucks_emits_no_header() {
        let parents: StationParents = [("DESTACAMENTO NORTE", "CENTRAL")].into_iter().collect();
        let trucks = vec![truck("n", "Zona 1", "DESTACAMENTO NORTE", Status::Reserve)];

        let hierarchy = compute_grouped_hierarchy(&trucks, &parents, &ZoneOrder::default());

        assert_eq!(
            titles(&project_to_rows(&hierarchy)),
            vec!["# Zona 1", "# DESTACAMENTO NORTE", "n"]
        );
    }

    #[test]
    fn empty_containers_are_skipped() {
        let hierarchy = GroupedHierarchy {
            zones: vec![{
                let mut zone = ZoneGroup::new("Zona 1".into());
                zone.stations.push(StationGroup::new("VACIA".into()));
                zone
            }],
        };

        assert_eq!(titles(&project_to_rows(&hierarchy)), vec!["# Zona 1"]);
    }

    #[test]
    fn every_truck_appears_exactly_once() {
        let parents: StationParents = [("DESTACAMENTO SUR", "CENTRAL")].into_iter().collect();
        let mut trucks = vec![
            truck("1", "Zona 2", "OESTE", Status::OutOfService),
            truck("2", "Zona 1", "DESTACAMENTO SUR", Status::InService),
            truck("3", "Zona 1", "CENTRAL", Status::from("Desconocido")),
            truck("4", "", "", Status::Alternate),
            truck("5", "Zona 5", "DIV. B.E.FE.R.", Status::OnLoan),
        ];
        trucks[0].officer = Some(Officer::new("Oficial".into(), "Juan Perez".into(), "1".into()));
        trucks[3].zone = None;

        let hierarchy = compute_grouped_hierarchy(&trucks, &parents, &ZoneOrder::default());
        let rows = project_to_rows(&hierarchy);

        let mut seen: Vec<&str> = rows
            .iter()
            .filter_map(ReportRow::as_truck)
            .map(|truck| truck.id.as_str())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn empty_hierarchy_has_no_rows() {
        let hierarchy = GroupedHierarchy::default();
        assert!(project_to_rows(&hierarchy).is_empty());
    }

    #[test]
    fn rows_serialize_with_tag() {
        let trucks = vec![truck("1", "Zona 1", "CENTRAL", Status::InService)];
        let hierarchy =
            compute_grouped_hierarchy(&trucks, &StationParents::default(), &ZoneOrder::default());

        let json = serde_json::to_value(project_to_rows(&hierarchy)).unwrap();

        assert_eq!(json[0]["row"], "header");
        assert_eq!(json[0]["level"], "zone");
        assert_eq!(json[2]["row"], "truck");
        assert_eq!(json[2]["id"], "1");
    }
}
