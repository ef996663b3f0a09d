//! Role-based access.
//!
//! Access codes are plaintext and compared locally. This gates what a user
//! can do from the roster tools; it is not a security boundary.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::StationParents;

/// A user's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Headquarters; global access.
    Admin,
    /// A station operator; access scoped to one station and its detachments.
    Operador,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Admin => "Admin",
            Self::Operador => "Operador",
        })
    }
}

/// A logged-in (or logging-in) user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Display name, usually the station name.
    pub name: String,
    /// Role.
    pub role: Role,
    /// The station the user is logged into.
    pub station_scope: String,
}

impl User {
    /// An operator logged into `station`.
    #[must_use]
    pub fn operator(station: &str) -> Self {
        Self {
            name: station.to_string(),
            role: Role::Operador,
            station_scope: station.to_string(),
        }
    }

    /// An administrator logged in at `station`.
    #[must_use]
    pub fn admin(station: &str) -> Self {
        Self {
            name: station.to_string(),
            role: Role::Admin,
            station_scope: station.to_string(),
        }
    }
}

/// An action gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Assign or clear a truck's officer and crew.
    EditAssignment,
    /// Move a truck to another station.
    MoveTruck,
    /// Change a truck's status.
    ChangeStatus,
    /// Manage a station's standing crew.
    ManageCrew,
    /// Produce the printable report.
    GenerateReport,
    /// Add, edit or remove trucks and manage access codes.
    ManageNomenclador,
    /// Read the activity log.
    ViewLogs,
    /// Clear the activity log.
    ClearLogs,
    /// Manage the personnel database.
    ManagePersonnel,
    /// Edit internal numbers of trucks and personnel.
    ManageInternos,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::EditAssignment => "edit assignments",
            Self::MoveTruck => "move trucks",
            Self::ChangeStatus => "change status",
            Self::ManageCrew => "manage crews",
            Self::GenerateReport => "generate reports",
            Self::ManageNomenclador => "manage the nomenclador",
            Self::ViewLogs => "view logs",
            Self::ClearLogs => "clear logs",
            Self::ManagePersonnel => "manage personnel",
            Self::ManageInternos => "manage internal numbers",
        })
    }
}

/// The set of actions a role may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Permissions {
    /// See [`Permission::EditAssignment`].
    pub can_edit_assignment: bool,
    /// See [`Permission::MoveTruck`].
    pub can_move_truck: bool,
    /// See [`Permission::ChangeStatus`].
    pub can_change_status: bool,
    /// See [`Permission::ManageCrew`].
    pub can_manage_crew: bool,
    /// See [`Permission::GenerateReport`].
    pub can_generate_report: bool,
    /// See [`Permission::ManageNomenclador`].
    pub can_manage_nomenclador: bool,
    /// See [`Permission::ViewLogs`].
    pub can_view_logs: bool,
    /// See [`Permission::ClearLogs`].
    pub can_clear_logs: bool,
    /// See [`Permission::ManagePersonnel`].
    pub can_manage_personnel: bool,
    /// See [`Permission::ManageInternos`].
    pub can_manage_internos: bool,
}

impl Permissions {
    /// The fixed permission table for `role`.
    #[must_use]
    pub const fn for_role(role: Role) -> Self {
        let admin = matches!(role, Role::Admin);
        Self {
            can_edit_assignment: true,
            can_move_truck: true,
            can_change_status: true,
            can_manage_crew: true,
            can_generate_report: true,
            can_manage_nomenclador: admin,
            can_view_logs: admin,
            can_clear_logs: admin,
            can_manage_personnel: admin,
            can_manage_internos: admin,
        }
    }

    /// Whether `permission` is granted.
    #[must_use]
    pub const fn allows(&self, permission: Permission) -> bool {
        match permission {
            Permission::EditAssignment => self.can_edit_assignment,
            Permission::MoveTruck => self.can_move_truck,
            Permission::ChangeStatus => self.can_change_status,
            Permission::ManageCrew => self.can_manage_crew,
            Permission::GenerateReport => self.can_generate_report,
            Permission::ManageNomenclador => self.can_manage_nomenclador,
            Permission::ViewLogs => self.can_view_logs,
            Permission::ClearLogs => self.can_clear_logs,
            Permission::ManagePersonnel => self.can_manage_personnel,
            Permission::ManageInternos => self.can_manage_internos,
        }
    }
}

/// Errors raised when a session may not perform an action.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    /// The access code did not match.
    #[error("invalid access code for {0}")]
    InvalidCode(String),
    /// The user's role lacks the permission.
    #[error("{user} ({role}) may not {permission}")]
    Forbidden {
        /// The acting user.
        user: String,
        /// Their role.
        role: Role,
        /// The missing permission.
        permission: Permission,
    },
    /// The station is outside the user's scope.
    #[error("{user} is not authorized for station {station}")]
    OutOfScope {
        /// The acting user.
        user: String,
        /// The station acted upon.
        station: String,
    },
}

/// An authenticated user together with their permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user: User,
    permissions: Permissions,
}

impl Session {
    /// Checks `code` against the station codes and opens a session.
    ///
    /// Administrators are checked against the code of `admin_station`;
    /// operators against the code of their own station.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::InvalidCode`] if the code does not match or no
    /// code is recorded.
    pub fn login(
        user: User,
        code: &str,
        codes: &BTreeMap<String, String>,
        admin_station: &str,
    ) -> Result<Self, AccessError> {
        let station = match user.role {
            Role::Admin => admin_station,
            Role::Operador => user.name.as_str(),
        };

        match codes.get(station) {
            Some(expected) if expected == code => {
                tracing::debug!(user = %user.name, role = %user.role, "login accepted");
                Ok(Self::new(user))
            }
            _ => Err(AccessError::InvalidCode(user.name)),
        }
    }

    /// Opens a session without checking a code.
    #[must_use]
    pub const fn new(user: User) -> Self {
        let permissions = Permissions::for_role(user.role);
        Self { user, permissions }
    }

    /// The session's user.
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    /// The session's permissions.
    #[must_use]
    pub const fn permissions(&self) -> Permissions {
        self.permissions
    }

    /// Whether the user may act on `station`.
    ///
    /// Admins may act anywhere. Operators may act on their own station and
    /// on detachments whose parent is their station.
    #[must_use]
    pub fn is_authorized(&self, station: &str, parents: &StationParents) -> bool {
        match self.user.role {
            Role::Admin => true,
            Role::Operador => {
                self.user.station_scope == station
                    || parents.parent_of(station) == Some(self.user.station_scope.as_str())
            }
        }
    }

    /// Fails unless the role grants `permission`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Forbidden`] when the permission is missing.
    pub fn require(&self, permission: Permission) -> Result<(), AccessError> {
        if self.permissions.allows(permission) {
            Ok(())
        } else {
            Err(AccessError::Forbidden {
                user: self.user.name.clone(),
                role: self.user.role,
                permission,
            })
        }
    }

    /// Fails unless the role grants `permission` and `station` is in scope.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Forbidden`] or [`AccessError::OutOfScope`].
    pub fn require_at(
        &self,
        permission: Permission,
        station: &str,
        parents: &StationParents,
    ) -> Result<(), AccessError> {
        self.require(permission)?;
        if self.is_authorized(station, parents) {
            Ok(())
        } else {
            Err(AccessError::OutOfScope {
                user: self.user.name.clone(),
                station: station.to_string(),
            })
        }
    }
}
