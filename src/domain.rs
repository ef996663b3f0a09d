//! Domain models for the fleet roster.
//!
//! This module contains the core domain types: trucks and their officers,
//! personnel records, station metadata, access control and configuration.

/// Trucks, their status and their assigned officer.
pub mod truck;
pub use truck::{Officer, Status, Truck};

/// Personnel records and station crews.
pub mod personnel;
pub use personnel::{CrewMember, Personnel};

mod station;
pub use station::{
    BEFER_STATION, BEFER_ZONE, NO_STATION, NO_ZONE, SAAVEDRA_DETACHMENT, StationParents,
    URQUIZA_DETACHMENT, ZoneOrder,
};

mod config;
pub use config::Config;

/// Roles, permissions and station-scoped sessions.
pub mod access;
pub use access::{AccessError, Permission, Permissions, Role, Session, User};

mod activity;
pub use activity::LogEntry;
