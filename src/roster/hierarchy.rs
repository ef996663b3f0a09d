//! The grouped view of a truck snapshot.

use serde::Serialize;

use crate::domain::Truck;

/// Trucks grouped by zone, station and detachment.
///
/// Zones, stations and detachments are held in iteration order. Straight out
/// of [`group`](super::grouping::group) that is discovery order; after
/// [`order`](super::ordering::order) it is display order.
///
/// Trucks are borrowed from the snapshot the hierarchy was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupedHierarchy<'a> {
    pub(crate) zones: Vec<ZoneGroup<'a>>,
}

/// The stations of one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneGroup<'a> {
    /// Zone name.
    pub name: String,
    /// Stations in iteration order.
    pub stations: Vec<StationGroup<'a>>,
}

/// A main station: its own trucks and those of its detachments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationGroup<'a> {
    /// Station name.
    pub name: String,
    /// Trucks based directly at the station.
    pub trucks: Vec<&'a Truck>,
    /// Detachments of the station.
    pub detachments: Vec<Detachment<'a>>,
}

/// A detachment and its trucks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detachment<'a> {
    /// Detachment name.
    pub name: String,
    /// Trucks based at the detachment.
    pub trucks: Vec<&'a Truck>,
}

impl<'a> GroupedHierarchy<'a> {
    /// Zones in iteration order.
    #[must_use]
    pub fn zones(&self) -> &[ZoneGroup<'a>] {
        &self.zones
    }

    /// Looks up a zone by name.
    #[must_use]
    pub fn zone(&self, name: &str) -> Option<&ZoneGroup<'a>> {
        self.zones.iter().find(|zone| zone.name == name)
    }

    /// Whether no trucks were grouped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Keeps only the trucks for which `keep` returns `true`.
    ///
    /// Detachments, stations and zones left without trucks are dropped.
    /// Iteration order is preserved.
    pub fn retain(&mut self, keep: impl Fn(&Truck) -> bool) {
        for zone in &mut self.zones {
            for station in &mut zone.stations {
                station.trucks.retain(|truck| keep(*truck));
                for detachment in &mut station.detachments {
                    detachment.trucks.retain(|truck| keep(*truck));
                }
                station
                    .detachments
                    .retain(|detachment| !detachment.trucks.is_empty());
            }
            zone.stations.retain(|station| station.truck_count() > 0);
        }
        self.zones.retain(|zone| !zone.stations.is_empty());
    }

    /// Total number of trucks in the hierarchy.
    #[must_use]
    pub fn truck_count(&self) -> usize {
        self.zones
            .iter()
            .flat_map(|zone| &zone.stations)
            .map(StationGroup::truck_count)
            .sum()
    }
}

impl<'a> ZoneGroup<'a> {
    pub(crate) const fn new(name: String) -> Self {
        Self {
            name,
            stations: Vec::new(),
        }
    }

    /// Looks up a station by name.
    #[must_use]
    pub fn station(&self, name: &str) -> Option<&StationGroup<'a>> {
        self.stations.iter().find(|station| station.name == name)
    }
}

impl<'a> StationGroup<'a> {
    pub(crate) const fn new(name: String) -> Self {
        Self {
            name,
            trucks: Vec::new(),
            detachments: Vec::new(),
        }
    }

    /// Looks up a detachment by name.
    #[must_use]
    pub fn detachment(&self, name: &str) -> Option<&Detachment<'a>> {
        self.detachments
            .iter()
            .find(|detachment| detachment.name == name)
    }

    /// Number of trucks at the station and all its detachments.
    #[must_use]
    pub fn truck_count(&self) -> usize {
        self.trucks.len()
            + self
                .detachments
                .iter()
                .map(|detachment| detachment.trucks.len())
                .sum::<usize>()
    }
}
