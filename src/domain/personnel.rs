use serde::{Deserialize, Serialize};

/// A record in the personnel database.
///
/// Records are keyed by `lp`; `dni` is also unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Personnel {
    /// Rank.
    pub rank: String,
    /// Personnel number.
    pub lp: String,
    /// National identity document number.
    pub dni: String,
    /// Family name.
    pub last_name: String,
    /// Given names.
    pub first_name: String,
    /// Internal number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interno: Option<String>,
}

impl Personnel {
    /// `Rank Last, First`, as used in activity log lines.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}, {}", self.rank, self.last_name, self.first_name)
    }

    /// Names of required fields that are blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("lp", &self.lp),
            ("dni", &self.dni),
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("rank", &self.rank),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }
}

/// A firefighter in a station's standing crew.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    /// Full name; unique within a station.
    pub name: String,
    /// Internal number.
    pub interno: String,
}
