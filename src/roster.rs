//! The roster pipeline.
//!
//! A truck snapshot flows one way through three stages:
//!
//! 1. [`grouping::group`] partitions it into zones, stations and detachments;
//! 2. [`ordering::order`] sorts every level of the result;
//! 3. [`project_to_rows`] flattens it into report rows.
//!
//! No stage mutates the snapshot. The hierarchy borrows the trucks, so it is
//! rebuilt from scratch whenever the snapshot changes.

use tracing::instrument;

use crate::domain::{StationParents, Truck, ZoneOrder};

mod collate;
pub use collate::locale_cmp;

pub mod grouping;

mod hierarchy;
pub use hierarchy::{Detachment, GroupedHierarchy, StationGroup, ZoneGroup};

pub mod ordering;

mod report;
pub use report::{Header, HeaderLevel, ReportRow, project_to_rows};

/// Breakdowns and per-status, per-type listings of a snapshot.
pub mod summary;

/// Groups and orders a truck snapshot.
#[must_use]
#[instrument(level = "debug", skip_all, fields(trucks = trucks.len()))]
pub fn compute_grouped_hierarchy<'a>(
    trucks: &'a [Truck],
    parents: &StationParents,
    zone_order: &ZoneOrder,
) -> GroupedHierarchy<'a> {
    let mut hierarchy = grouping::group(trucks, parents);
    ordering::order(&mut hierarchy, zone_order);
    tracing::trace!(zones = hierarchy.zones().len(), "grouped hierarchy");
    hierarchy
}
