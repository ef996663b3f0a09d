//! Partitioning of a truck snapshot into zones, stations and detachments.

use std::collections::HashMap;

use super::hierarchy::{Detachment, GroupedHierarchy, StationGroup, ZoneGroup};
use crate::domain::{BEFER_STATION, BEFER_ZONE, NO_STATION, NO_ZONE, StationParents, Truck};

/// The zone a truck is grouped under.
///
/// A missing or empty zone becomes [`NO_ZONE`]. Trucks at [`BEFER_STATION`]
/// are always grouped under [`BEFER_ZONE`], whatever zone they record.
#[must_use]
pub fn effective_zone(truck: &Truck) -> &str {
    if effective_station(truck) == BEFER_STATION {
        return BEFER_ZONE;
    }
    non_empty(truck.zone.as_deref()).unwrap_or(NO_ZONE)
}

/// The station a truck is grouped under; [`NO_STATION`] when missing or
/// empty.
#[must_use]
pub fn effective_station(truck: &Truck) -> &str {
    non_empty(truck.station.as_deref()).unwrap_or(NO_STATION)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

/// Groups trucks by zone and station.
///
/// Trucks at a detachment are placed under their parent station's
/// `detachments`; all others under their own station's `trucks`. Zones,
/// stations and detachments appear in the order they are first seen. A
/// detachment's parent station is recorded as discovered when the detachment
/// is first seen, even if no truck is based at the parent itself.
#[must_use]
pub fn group<'a>(trucks: &'a [Truck], parents: &StationParents) -> GroupedHierarchy<'a> {
    let mut builder = Builder::default();

    for truck in trucks {
        let zone = effective_zone(truck);
        let station = effective_station(truck);

        if let Some(parent) = parents.parent_of(station) {
            builder
                .station(zone, parent)
                .detachment_mut(station)
                .trucks
                .push(truck);
        } else {
            builder.station(zone, station).trucks.push(truck);
        }
    }

    builder.finish()
}

/// Tracks positions of zones and stations while grouping.
#[derive(Default)]
struct Builder<'a> {
    hierarchy: GroupedHierarchy<'a>,
    zone_index: HashMap<String, usize>,
    station_index: HashMap<(usize, String), usize>,
}

impl<'a> Builder<'a> {
    fn station(&mut self, zone: &str, station: &str) -> &mut StationGroup<'a> {
        let zones = &mut self.hierarchy.zones;
        let zone_idx = *self.zone_index.entry(zone.to_string()).or_insert_with(|| {
            zones.push(ZoneGroup::new(zone.to_string()));
            zones.len() - 1
        });

        let stations = &mut zones[zone_idx].stations;
        let station_idx = *self
            .station_index
            .entry((zone_idx, station.to_string()))
            .or_insert_with(|| {
                stations.push(StationGroup::new(station.to_string()));
                stations.len() - 1
            });

        &mut stations[station_idx]
    }

    fn finish(self) -> GroupedHierarchy<'a> {
        self.hierarchy
    }
}

impl<'a> StationGroup<'a> {
    fn detachment_mut(&mut self, name: &str) -> &mut Detachment<'a> {
        let idx = self
            .detachments
            .iter()
            .position(|detachment| detachment.name == name)
            .unwrap_or_else(|| {
                self.detachments.push(Detachment {
                    name: name.to_string(),
                    trucks: Vec::new(),
                });
                self.detachments.len() - 1
            });
        &mut self.detachments[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Status;

    fn truck(id: &str, zone: Option<&str>, station: Option<&str>) -> Truck {
        let mut truck = Truck::new(id.to_string(), format!("Unidad {id}"), Status::InService);
        truck.zone = zone.map(String::from);
        truck.station = station.map(String::from);
        truck
    }

    fn parents() -> StationParents {
        [
            ("DESTACAMENTO NORTE", "CENTRAL"),
            ("DESTACAMENTO SUR", "CENTRAL"),
        ]
        .into_iter()
        .collect()
    }

    fn ids(trucks: &[&Truck]) -> Vec<String> {
        trucks.iter().map(|truck| truck.id.clone()).collect()
    }

    #[test]
    fn detachment_trucks_nest_under_parent() {
        let trucks = vec![
            truck("1", Some("Zona 1"), Some("DESTACAMENTO NORTE")),
            truck("2", Some("Zona 1"), Some("CENTRAL")),
        ];

        let hierarchy = group(&trucks, &parents());
        let central = hierarchy.zone("Zona 1").unwrap().station("CENTRAL").unwrap();

        assert_eq!(ids(&central.trucks), vec!["2"]);
        assert_eq!(
            ids(&central.detachment("DESTACAMENTO NORTE").unwrap().trucks),
            vec!["1"]
        );
        assert!(
            hierarchy
                .zone("Zona 1")
                .unwrap()
                .station("DESTACAMENTO NORTE")
                .is_none()
        );
    }

    #[test]
    fn discovery_order_records_parent_not_detachment() {
        let trucks = vec![
            truck("1", Some("Zona 1"), Some("OESTE")),
            truck("2", Some("Zona 1"), Some("DESTACAMENTO SUR")),
            truck("3", Some("Zona 1"), Some("ESTE")),
            truck("4", Some("Zona 1"), Some("CENTRAL")),
        ];

        let hierarchy = group(&trucks, &parents());
        let zone = hierarchy.zone("Zona 1").unwrap();
        let names: Vec<_> = zone.stations.iter().map(|station| station.name.as_str()).collect();

        assert_eq!(names, vec!["OESTE", "CENTRAL", "ESTE"]);
    }

    #[test]
    fn parent_created_by_detachment_has_no_direct_trucks() {
        let trucks = vec![truck("1", Some("Zona 1"), Some("DESTACAMENTO SUR"))];

        let hierarchy = group(&trucks, &parents());
        let central = hierarchy.zone("Zona 1").unwrap().station("CENTRAL").unwrap();

        assert!(central.trucks.is_empty());
        assert_eq!(central.truck_count(), 1);
    }

    #[test]
    fn missing_zone_and_station_use_sentinels() {
        let trucks = vec![
            truck("1", None, None),
            truck("2", Some(""), Some("")),
        ];

        let hierarchy = group(&trucks, &parents());
        let station = hierarchy.zone(NO_ZONE).unwrap().station(NO_STATION).unwrap();

        assert_eq!(ids(&station.trucks), vec!["1", "2"]);
    }

    #[test]
    fn befer_station_overrides_zone() {
        let trucks = vec![truck("1", Some("Zona 5"), Some(BEFER_STATION))];

        let hierarchy = group(&trucks, &parents());

        assert!(hierarchy.zone("Zona 5").is_none());
        assert!(hierarchy.zone(BEFER_ZONE).unwrap().station(BEFER_STATION).is_some());
        assert_eq!(trucks[0].zone.as_deref(), Some("Zona 5"));
    }

    #[test]
    fn same_station_in_two_zones_is_two_entries() {
        let trucks = vec![
            truck("1", Some("Zona 1"), Some("CENTRAL")),
            truck("2", Some("Zona 2"), Some("CENTRAL")),
        ];

        let hierarchy = group(&trucks, &parents());

        assert_eq!(hierarchy.zones().len(), 2);
        assert_eq!(hierarchy.truck_count(), 2);
    }

    #[test]
    fn empty_input_gives_empty_hierarchy() {
        let hierarchy = group(&[], &parents());
        assert!(hierarchy.is_empty());
    }
}
