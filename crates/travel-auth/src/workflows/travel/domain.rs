use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::duration;

/// One dated leg of a travel log. Times are stored as entered (`HH:MM`, 24-hour clock).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelEntry {
    pub date: String,
    pub origin_location: String,
    pub destination_location: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub purpose: String,
}

impl TravelEntry {
    /// Whole hours between departure and arrival, wrapping past midnight.
    pub fn elapsed_hours(&self) -> u32 {
        duration::elapsed_hours(&self.departure_time, &self.arrival_time)
    }
}

/// Row of the team activity block filed by a supervisor against a travel log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamActivityEntry {
    pub employee_name: String,
    pub designation: String,
    pub assigned_task: String,
    pub time_duration: String,
    pub remarks: String,
}

/// Queue a report was filed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginChannel {
    Employee,
    Supervisor,
}

impl OriginChannel {
    pub const fn ordered() -> [OriginChannel; 2] {
        [OriginChannel::Employee, OriginChannel::Supervisor]
    }

    pub const fn label(self) -> &'static str {
        match self {
            OriginChannel::Employee => "employee",
            OriginChannel::Supervisor => "supervisor",
        }
    }
}

impl fmt::Display for OriginChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown origin channel '{0}'")]
pub struct UnknownChannel(pub String);

impl FromStr for OriginChannel {
    type Err = UnknownChannel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "employee" => Ok(OriginChannel::Employee),
            "supervisor" => Ok(OriginChannel::Supervisor),
            _ => Err(UnknownChannel(value.to_string())),
        }
    }
}

/// Portal role of the acting user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Employee,
    Supervisor,
    Admin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Supervisor => "supervisor",
            Role::Admin => "admin",
        }
    }

    /// Channel a report filed by this role lands in. Admins review, they do not file.
    pub const fn origin_channel(self) -> Option<OriginChannel> {
        match self {
            Role::Employee => Some(OriginChannel::Employee),
            Role::Supervisor => Some(OriginChannel::Supervisor),
            Role::Admin => None,
        }
    }

    pub const fn can_review(self) -> bool {
        matches!(self, Role::Admin)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "employee" => Ok(Role::Employee),
            "supervisor" => Ok(Role::Supervisor),
            "admin" => Ok(Role::Admin),
            _ => Err(UnknownRole(value.to_string())),
        }
    }
}

/// Identity of whoever files a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submitter {
    pub user_id: String,
    pub name: String,
    pub position: String,
    pub role: Role,
}

/// Explicit reviewer context handed to every workflow operation that needs identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewerSession {
    pub reviewer_id: String,
    pub name: String,
    pub role: Role,
}

/// A travel log as handed to the collaborator API after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelLogSubmission {
    pub submitter: Submitter,
    pub submitted_on: NaiveDate,
    pub entries: Vec<TravelEntry>,
}

/// Stored file referenced by an attachment report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReference {
    pub name: String,
    pub storage_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// A free-form report with a single file, as handed to the collaborator API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentSubmission {
    pub submitter: Submitter,
    pub submitted_on: NaiveDate,
    pub title: String,
    pub description: String,
    pub file: FileReference,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_parses_case_insensitively() {
        assert_eq!(
            "Supervisor".parse::<OriginChannel>(),
            Ok(OriginChannel::Supervisor)
        );
        assert_eq!(
            " employee ".parse::<OriginChannel>(),
            Ok(OriginChannel::Employee)
        );
        assert!("admin".parse::<OriginChannel>().is_err());
    }

    #[test]
    fn only_filing_roles_map_to_channels() {
        assert_eq!(Role::Employee.origin_channel(), Some(OriginChannel::Employee));
        assert_eq!(
            Role::Supervisor.origin_channel(),
            Some(OriginChannel::Supervisor)
        );
        assert_eq!(Role::Admin.origin_channel(), None);
        assert!(Role::Admin.can_review());
        assert!(!Role::Supervisor.can_review());
        assert_eq!("ADMIN".parse::<Role>(), Ok(Role::Admin));
        assert!("auditor".parse::<Role>().is_err());
    }
}
