//! Fire-department Fleet Roster
//!
//! Trucks are grouped by zone, station and detachment, ordered
//! deterministically, and flattened into report rows for display or export.

pub mod domain;
pub use domain::{
    Config, CrewMember, LogEntry, Officer, Permission, Permissions, Personnel, Role, Session,
    StationParents, Status, Truck, User, ZoneOrder,
};

/// Grouping, ordering and projection of a truck snapshot.
pub mod roster;
pub use roster::{GroupedHierarchy, ReportRow, compute_grouped_hierarchy, project_to_rows};

/// Filesystem persistence for the roster state.
pub mod storage;
pub use storage::{Store, StoreError};
