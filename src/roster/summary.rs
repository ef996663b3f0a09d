//! Fleet counts and listings by status and by type.

use serde::Serialize;

use super::collate::locale_cmp;
use crate::domain::{Status, Truck};

const AUTOBOMBA: &str = "Autobomba";
const CISTERNA: &str = "Cisterna";

/// Counts of heavy units among a set of trucks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    /// Trucks counted.
    pub total: usize,
    /// Trucks of type `Autobomba`.
    pub autobombas: usize,
    /// Trucks of type `Cisterna`.
    pub cisternas: usize,
}

impl Breakdown {
    fn count<'a>(trucks: impl IntoIterator<Item = &'a Truck>) -> Self {
        trucks.into_iter().fold(Self::default(), |mut acc, truck| {
            acc.total += 1;
            match truck.kind.as_deref() {
                Some(AUTOBOMBA) => acc.autobombas += 1,
                Some(CISTERNA) => acc.cisternas += 1,
                _ => {}
            }
            acc
        })
    }

    /// `Autobomba` plus `Cisterna`.
    #[must_use]
    pub const fn heavy(&self) -> usize {
        self.autobombas + self.cisternas
    }
}

/// Operational units: trucks that are `Para Servicio` or `Reserva`.
#[must_use]
pub fn operational_breakdown(trucks: &[Truck]) -> Breakdown {
    Breakdown::count(trucks.iter().filter(|truck| truck.status.is_operational()))
}

/// Trucks that are `Para Servicio`.
#[must_use]
pub fn in_service_breakdown(trucks: &[Truck]) -> Breakdown {
    Breakdown::count(
        trucks
            .iter()
            .filter(|truck| truck.status == Status::InService),
    )
}

/// The trucks with one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBucket<'a> {
    /// The status.
    pub status: Status,
    /// Trucks with the status, by name.
    pub trucks: Vec<&'a Truck>,
    /// `(type, count)` pairs, by type. Only filled for `Para Servicio` and
    /// `Fuera de Servicio`.
    pub by_type: Vec<(String, usize)>,
}

/// One bucket per known status, in rank order.
///
/// Trucks with a status outside the known set are left out.
#[must_use]
pub fn status_summary(trucks: &[Truck]) -> Vec<StatusBucket<'_>> {
    Status::ALL
        .into_iter()
        .map(|status| {
            let mut bucket: Vec<&Truck> =
                trucks.iter().filter(|truck| truck.status == status).collect();
            bucket.sort_by(|a, b| locale_cmp(&a.name, &b.name));

            let by_type = if matches!(status, Status::InService | Status::OutOfService) {
                count_by_type(&bucket)
            } else {
                Vec::new()
            };

            StatusBucket {
                status,
                trucks: bucket,
                by_type,
            }
        })
        .collect()
}

fn count_by_type(trucks: &[&Truck]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for truck in trucks {
        let kind = truck.kind_or_default();
        match counts.iter_mut().find(|(name, _)| name == kind) {
            Some((_, count)) => *count += 1,
            None => counts.push((kind.to_string(), 1)),
        }
    }
    counts.sort_by(|(a, _), (b, _)| locale_cmp(a, b));
    counts
}

/// The trucks of one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeBucket<'a> {
    /// Truck type, or `Sin Tipo`.
    pub kind: String,
    /// Trucks of the type, by name.
    pub trucks: Vec<&'a Truck>,
}

/// Trucks grouped by type.
///
/// Types named in `type_order` come first, in that order; the rest follow
/// lexically.
#[must_use]
pub fn type_summary<'a>(trucks: &'a [Truck], type_order: &[String]) -> Vec<TypeBucket<'a>> {
    let mut buckets: Vec<TypeBucket<'a>> = Vec::new();
    for truck in trucks {
        let kind = truck.kind_or_default();
        match buckets.iter_mut().find(|bucket| bucket.kind == kind) {
            Some(bucket) => bucket.trucks.push(truck),
            None => buckets.push(TypeBucket {
                kind: kind.to_string(),
                trucks: vec![truck],
            }),
        }
    }

    let position = |kind: &str| type_order.iter().position(|listed| listed == kind);
    buckets.sort_by(|a, b| match (position(&a.kind), position(&b.kind)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => locale_cmp(&a.kind, &b.kind),
    });
    for bucket in &mut buckets {
        bucket.trucks.sort_by(|a, b| locale_cmp(&a.name, &b.name));
    }
    buckets
}

/// Stations a truck can be moved to, grouped by zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Destinations {
    /// Zone name.
    pub zone: String,
    /// Stations seen in the zone, first-seen order.
    pub stations: Vec<String>,
}

/// Every zone and station a truck is currently recorded at, in first-seen
/// order.
///
/// Trucks with no zone or no station are not destinations.
#[must_use]
pub fn move_destinations(trucks: &[Truck]) -> Vec<Destinations> {
    let mut destinations: Vec<Destinations> = Vec::new();
    for truck in trucks {
        let (Some(zone), Some(station)) = (truck.zone.as_deref(), truck.station.as_deref()) else {
            continue;
        };
        if zone.is_empty() || station.is_empty() {
            continue;
        }

        let entry = match destinations.iter().position(|d| d.zone == zone) {
            Some(idx) => &mut destinations[idx],
            None => {
                destinations.push(Destinations {
                    zone: zone.to_string(),
                    stations: Vec::new(),
                });
                let last = destinations.len() - 1;
                &mut destinations[last]
            }
        };
        if !entry.stations.iter().any(|known| known == station) {
            entry.stations.push(station.to_string());
        }
    }
    destinations
}
