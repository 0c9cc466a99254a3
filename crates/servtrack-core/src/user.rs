//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ServtrackError;

/// Access role assigned to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Technician,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Technician => "technician",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ServtrackError;

    /// Parses a role string as submitted by a registration form.
    ///
    /// Rejection happens here, before any network call is made.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "technician" => Ok(Role::Technician),
            "user" => Ok(Role::User),
            other => Err(ServtrackError::validation(format!(
                "invalid role: '{other}' (expected admin, manager, technician or user)"
            ))),
        }
    }
}

/// A user account as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Admin, Role::Manager, Role::Technician, Role::User] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_role_rejects_unknown_value() {
        let err = "superuser".parse::<Role>().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_user_deserializes_wire_shape() {
        let user: User = serde_json::from_str(
            r#"{
                "id": "u1",
                "name": "Dana",
                "email": "dana@example.com",
                "role": "technician",
                "createdAt": "2024-03-01T10:00:00.000Z",
                "updatedAt": "2024-03-02T11:30:00.000Z"
            }"#,
        )
        .unwrap();
        assert_eq!(user.role, Role::Technician);
        assert_eq!(user.email, "dana@example.com");
    }
}
