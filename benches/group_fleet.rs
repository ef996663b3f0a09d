//! This bench test groups, orders and projects a large fleet spread over many
//! zones, stations and detachments.

#![allow(missing_docs)]

use criterion::{Criterion, criterion_group, criterion_main};
use roster::{StationParents, Status, Truck, ZoneOrder, compute_grouped_hierarchy, project_to_rows};

const ZONES: usize = 8;
const STATIONS_PER_ZONE: usize = 12;
const TRUCKS_PER_STATION: usize = 20;

/// Generates a fleet with every status, some detachments and some trucks
/// missing their zone or station.
fn fleet() -> (Vec<Truck>, StationParents, ZoneOrder) {
    let mut trucks = Vec::new();
    let mut parents = Vec::new();
    for zone in 0..ZONES {
        for station in 0..STATIONS_PER_ZONE {
            let station_name = format!("ESTACIÓN {zone}-{station}");
            if station % 4 == 3 {
                parents.push((
                    format!("DESTACAMENTO {zone}-{station}"),
                    station_name.clone(),
                ));
            }
            for n in 0..TRUCKS_PER_STATION {
                let id = format!("{zone}-{station}-{n}");
                let status = Status::ALL[n % Status::ALL.len()].clone();
                let mut truck = Truck::new(id.clone(), format!("Unidad {id}"), status);
                truck.kind = Some(if n % 3 == 0 { "Cisterna" } else { "Autobomba" }.to_string());
                truck.zone = (n != 7).then(|| format!("Zona {zone}"));
                truck.station = match n {
                    11 => None,
                    5 if station % 4 == 3 => Some(format!("DESTACAMENTO {zone}-{station}")),
                    _ => Some(station_name.clone()),
                };
                trucks.push(truck);
            }
        }
    }
    let zone_order = (0..ZONES).rev().step_by(2).map(|zone| format!("Zona {zone}")).collect();
    (trucks, parents.into_iter().collect(), zone_order)
}

fn group_fleet(c: &mut Criterion) {
    let (trucks, parents, zone_order) = fleet();

    c.bench_function("group fleet", |b| {
        b.iter(|| {
            let hierarchy = compute_grouped_hierarchy(&trucks, &parents, &zone_order);
            std::hint::black_box(project_to_rows(&hierarchy).len())
        });
    });
}

criterion_group!(benches, group_fleet);
criterion_main!(benches);
