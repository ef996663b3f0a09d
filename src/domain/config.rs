use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{StationParents, ZoneOrder};

/// Configuration for the roster.
///
/// This struct holds the static station and zone metadata the grouping
/// engine reads, plus the settings used by the summaries and login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Preferred display order of zones.
    ///
    /// Zones not listed sort alphabetically after the listed ones.
    zone_order: ZoneOrder,

    /// Detachment → parent station.
    ///
    /// Trucks based at a detachment are listed under the parent station.
    detachments: StationParents,

    /// Preferred order of truck types in the type summary.
    type_order: Vec<String>,

    /// The station whose access code admits administrators.
    pub admin_station: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            zone_order: ZoneOrder::default(),
            detachments: StationParents::default(),
            type_order: default_type_order(),
            admin_station: default_admin_station(),
        }
    }
}

impl Config {
    /// Creates a configuration with the given zone order and detachments.
    #[must_use]
    pub fn new(zone_order: ZoneOrder, detachments: StationParents) -> Self {
        Self {
            zone_order,
            detachments,
            ..Self::default()
        }
    }

    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the preferred zone order.
    #[must_use]
    pub const fn zone_order(&self) -> &ZoneOrder {
        &self.zone_order
    }

    /// Returns the detachment → parent station map.
    #[must_use]
    pub const fn detachments(&self) -> &StationParents {
        &self.detachments
    }

    /// Returns the preferred truck type order.
    #[must_use]
    pub fn type_order(&self) -> &[String] {
        &self.type_order
    }
}

fn default_type_order() -> Vec<String> {
    ["Autobomba", "Cisterna", "Unidad Liviana"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_admin_station() -> String {
    "O.C.O.B.".to_string()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        zone_order: ZoneOrder,

        /// Keyed by detachment name, valued by parent station name.
        #[serde(default)]
        detachments: StationParents,

        #[serde(default = "default_type_order")]
        type_order: Vec<String>,

        #[serde(default = "default_admin_station")]
        admin_station: String,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                zone_order,
                detachments,
                type_order,
                admin_station,
            } => Self {
                zone_order,
                detachments,
                type_order,
                admin_station,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            zone_order: config.zone_order,
            detachments: config.detachments,
            type_order: config.type_order,
            admin_station: config.admin_station,
        }
    }
}
