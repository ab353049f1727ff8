//! Resources an actor can act upon, as immutable snapshots.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clubhub_core::{ClubId, Entity, EventId, ReportId, UserId, ValueObject};

use crate::roles::normalize_name;
use crate::{AuthzError, Role};

/// Kinds of report the system can produce.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportType {
    MemberStatistics,
    EventOutcomes,
    ActivityTracking,
    SemesterSummary,
}

impl ReportType {
    pub const ALL: [ReportType; 4] = [
        ReportType::MemberStatistics,
        ReportType::EventOutcomes,
        ReportType::ActivityTracking,
        ReportType::SemesterSummary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::MemberStatistics => "MemberStatistics",
            ReportType::EventOutcomes => "EventOutcomes",
            ReportType::ActivityTracking => "ActivityTracking",
            ReportType::SemesterSummary => "SemesterSummary",
        }
    }
}

impl core::fmt::Display for ReportType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_name(s);

        ReportType::ALL
            .into_iter()
            .find(|t| t.as_str().to_lowercase() == normalized)
            .ok_or_else(|| AuthzError::MalformedRequest(format!("unknown report type '{s}'")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub role: Role,
    pub club_id: Option<ClubId>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubRecord {
    pub id: ClubId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: EventId,
    pub club_id: Option<ClubId>,
    pub event_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub id: ReportId,
    pub club_id: Option<ClubId>,
    pub report_type: ReportType,
}

impl ValueObject for UserRecord {}
impl ValueObject for ClubRecord {}
impl ValueObject for EventRecord {}
impl ValueObject for ReportRecord {}

impl Entity for UserRecord {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}

/// Discriminant of [`ResourceRef`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    User,
    Club,
    Event,
    Report,
}

impl core::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            ResourceKind::User => "user",
            ResourceKind::Club => "club",
            ResourceKind::Event => "event",
            ResourceKind::Report => "report",
        })
    }
}

/// A target of an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceRef {
    User(UserRecord),
    Club(ClubRecord),
    Event(EventRecord),
    Report(ReportRecord),
}

impl ResourceRef {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceRef::User(_) => ResourceKind::User,
            ResourceRef::Club(_) => ResourceKind::Club,
            ResourceRef::Event(_) => ResourceKind::Event,
            ResourceRef::Report(_) => ResourceKind::Report,
        }
    }

    /// Club the resource belongs to. A club belongs to itself.
    pub fn club_id(&self) -> Option<ClubId> {
        match self {
            ResourceRef::User(u) => u.club_id,
            ResourceRef::Club(c) => Some(c.id),
            ResourceRef::Event(e) => e.club_id,
            ResourceRef::Report(r) => r.club_id,
        }
    }
}

impl ValueObject for ResourceRef {}
