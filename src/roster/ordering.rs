//! Deterministic ordering of a grouped hierarchy.

use std::cmp::Ordering;

use super::{
    collate::locale_cmp,
    hierarchy::{Detachment, GroupedHierarchy},
};
use crate::domain::{BEFER_STATION, SAAVEDRA_DETACHMENT, Truck, URQUIZA_DETACHMENT, ZoneOrder};

/// Orders a grouped hierarchy in place.
///
/// - trucks in every station and detachment list by [`compare_trucks`];
/// - stations within each zone by [`compare_stations`];
/// - detachments within each station by [`order_detachments`];
/// - zones by [`compare_zones`].
pub fn order(hierarchy: &mut GroupedHierarchy<'_>, zone_order: &ZoneOrder) {
    for zone in &mut hierarchy.zones {
        for station in &mut zone.stations {
            station.trucks.sort_by(|a, b| compare_trucks(a, b));
            for detachment in &mut station.detachments {
                detachment.trucks.sort_by(|a, b| compare_trucks(a, b));
            }
            order_detachments(&mut station.detachments);
        }
        zone.stations
            .sort_by(|a, b| compare_stations(&a.name, &b.name));
    }

    hierarchy
        .zones
        .sort_by(|a, b| compare_zones(&a.name, &b.name, zone_order));
}

/// Trucks with a named officer first, then by status rank.
///
/// There is no further key; callers use a stable sort so ties keep their
/// input order.
#[must_use]
pub fn compare_trucks(a: &Truck, b: &Truck) -> Ordering {
    b.has_assignment()
        .cmp(&a.has_assignment())
        .then_with(|| a.status.rank().cmp(&b.status.rank()))
}

/// Lexical order, except [`BEFER_STATION`] always sorts last.
#[must_use]
pub fn compare_stations(a: &str, b: &str) -> Ordering {
    (a == BEFER_STATION)
        .cmp(&(b == BEFER_STATION))
        .then_with(|| locale_cmp(a, b))
}

/// Zones listed in `zone_order` first, by position; the rest lexically.
#[must_use]
pub fn compare_zones(a: &str, b: &str, zone_order: &ZoneOrder) -> Ordering {
    match (zone_order.position(a), zone_order.position(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => locale_cmp(a, b),
    }
}

/// Sorts detachments lexically, then moves [`SAAVEDRA_DETACHMENT`] to
/// directly after [`URQUIZA_DETACHMENT`] when both are present.
pub fn order_detachments(detachments: &mut Vec<Detachment<'_>>) {
    detachments.sort_by(|a, b| locale_cmp(&a.name, &b.name));

    if let (Some(_), Some(saavedra)) = (
        position_of(detachments, URQUIZA_DETACHMENT),
        position_of(detachments, SAAVEDRA_DETACHMENT),
    ) {
        let moved = detachments.remove(saavedra);
        if let Some(urquiza) = position_of(detachments, URQUIZA_DETACHMENT) {
            detachments.insert(urquiza + 1, moved);
        }
    }
}

fn position_of(detachments: &[Detachment<'_>], name: &str) -> Option<usize> {
    detachments.iter().position(|detachment| detachment.name == name)
}
