//! Persistence of the roster state in a directory.

/// The roster store: trucks, crews, personnel, codes and the activity log.
pub mod store;

pub use store::{Store, StoreError, TruckPatch};
