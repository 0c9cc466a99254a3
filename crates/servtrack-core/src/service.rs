//! Service ticket domain models.
//!
//! A "service" is a trackable ticket with status/priority/assignee metadata.
//! Field names follow the API wire shape (camelCase; the `category` field is
//! transmitted as `type`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ServtrackError};
use crate::user::User;

/// Lifecycle state of a service ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl std::str::FromStr for ServiceStatus {
    type Err = ServtrackError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(ServiceStatus::Pending),
            "in-progress" => Ok(ServiceStatus::InProgress),
            "completed" => Ok(ServiceStatus::Completed),
            "cancelled" => Ok(ServiceStatus::Cancelled),
            other => Err(ServtrackError::validation(format!(
                "invalid status: '{other}' (expected pending, in-progress, completed or cancelled)"
            ))),
        }
    }
}

/// Urgency of a service ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl std::str::FromStr for Priority {
    type Err = ServtrackError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            other => Err(ServtrackError::validation(format!(
                "invalid priority: '{other}' (expected low, medium, high or critical)"
            ))),
        }
    }
}

/// A comment attached to a service ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub created_by: User,
    pub created_at: DateTime<Utc>,
}

/// A service ticket as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub category: String,
    pub status: ServiceStatus,
    pub priority: Priority,
    pub deadline: DateTime<Utc>,
    pub created_by: User,
    #[serde(default)]
    pub assignees: Vec<User>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Server-computed aggregate counts by service status.
///
/// Never recomputed client-side; the server snapshot is taken verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStats {
    pub total: u64,
    pub pending: u64,
    pub in_progress: u64,
    pub completed: u64,
    pub cancelled: u64,
}

/// Partial service payload for create and update requests.
///
/// Absent fields are omitted from the request body; assignees are referenced
/// by user id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ServiceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,
}

impl ServicePatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: ServiceStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the deadline.
    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Replaces the assignee set with the given user ids.
    pub fn with_assignees(mut self, assignees: Vec<String>) -> Self {
        self.assignees = Some(assignees);
        self
    }

    /// Client-side precondition for create requests.
    ///
    /// A create without a non-empty title is rejected before any network
    /// call.
    pub fn validate_for_create(&self) -> Result<()> {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => Ok(()),
            _ => Err(ServtrackError::validation(
                "a service requires a non-empty title",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&ServiceStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(
            serde_json::from_str::<ServiceStatus>("\"cancelled\"").unwrap(),
            ServiceStatus::Cancelled
        );
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let patch = ServicePatch::new()
            .with_title("Replace pump")
            .with_priority(Priority::High);
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["title"], "Replace pump");
        assert_eq!(json["priority"], "high");
        assert!(json.get("description").is_none());
        assert!(json.get("status").is_none());
    }

    #[test]
    fn test_patch_category_uses_wire_name() {
        let patch = ServicePatch::new().with_category("maintenance");
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["type"], "maintenance");
        assert!(json.get("category").is_none());
    }

    #[test]
    fn test_validate_for_create_requires_title() {
        assert!(ServicePatch::new().validate_for_create().is_err());
        assert!(ServicePatch::new()
            .with_title("   ")
            .validate_for_create()
            .is_err());
        assert!(ServicePatch::new()
            .with_title("Inspect boiler")
            .validate_for_create()
            .is_ok());
    }

    #[test]
    fn test_status_and_priority_parse() {
        assert_eq!(
            "in-progress".parse::<ServiceStatus>().unwrap(),
            ServiceStatus::InProgress
        );
        assert_eq!("critical".parse::<Priority>().unwrap(), Priority::Critical);
        assert!("urgent".parse::<Priority>().unwrap_err().is_validation());
    }

    #[test]
    fn test_stats_wire_shape() {
        let stats: ServiceStats = serde_json::from_str(
            r#"{"total":10,"pending":4,"inProgress":3,"completed":2,"cancelled":1}"#,
        )
        .unwrap();
        assert_eq!(stats.in_progress, 3);
        assert_eq!(stats.total, 10);
    }
}
