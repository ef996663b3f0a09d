use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Zone used for trucks with no recorded zone.
pub const NO_ZONE: &str = "SIN ZONA";

/// Station used for trucks with no recorded station.
pub const NO_STATION: &str = "SIN ESTACIÓN";

/// The B.E.FE.R. division station. Always grouped under [`BEFER_ZONE`] and
/// listed last within its zone.
pub const BEFER_STATION: &str = "DIV. B.E.FE.R.";

/// Zone that [`BEFER_STATION`] trucks are grouped under.
pub const BEFER_ZONE: &str = "DIVISIÓN B.E.FE.R.";

/// Detachment that is always listed directly before [`SAAVEDRA_DETACHMENT`].
pub const URQUIZA_DETACHMENT: &str = "DESTACAMENTO URQUIZA";

/// Detachment that is always listed directly after [`URQUIZA_DETACHMENT`].
pub const SAAVEDRA_DETACHMENT: &str = "DESTACAMENTO SAAVEDRA";

/// Maps each detachment to the main station it belongs to.
///
/// A station that is not a key is a main station.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationParents(BTreeMap<String, String>);

impl StationParents {
    /// The parent station of `station`, if it is a detachment.
    #[must_use]
    pub fn parent_of(&self, station: &str) -> Option<&str> {
        self.0.get(station).map(String::as_str)
    }
}

impl<D, P> FromIterator<(D, P)> for StationParents
where
    D: Into<String>,
    P: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (D, P)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(detachment, parent)| (detachment.into(), parent.into()))
                .collect(),
        )
    }
}

/// The preferred display order of zones.
///
/// Zones not listed here sort lexically after every listed zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneOrder(Vec<String>);

impl ZoneOrder {
    /// Creates a zone order from canonical zone names.
    #[must_use]
    pub const fn new(zones: Vec<String>) -> Self {
        Self(zones)
    }

    /// Index of `zone` in the order, if listed.
    #[must_use]
    pub fn position(&self, zone: &str) -> Option<usize> {
        self.0.iter().position(|listed| listed == zone)
    }

    /// The listed zones.
    #[must_use]
    pub fn zones(&self) -> &[String] {
        &self.0
    }
}

impl<Z: Into<String>> FromIterator<Z> for ZoneOrder {
    fn from_iter<I: IntoIterator<Item = Z>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
