//! Decision boundary: raw request in, allow/deny out.
//!
//! Callers that already hold typed values use [`crate::rules`] and
//! [`crate::policy`] directly. This module serves callers that only have
//! loosely-typed data (JSON from a view model, a CLI, a command handler):
//! every field is optional and every parse failure denies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use clubhub_core::{ClubId, EventId, ReportId, UserId};

use crate::policy;
use crate::resource::{
    ClubRecord, EventRecord, ReportRecord, ReportType, ResourceKind, ResourceRef, UserRecord,
};
use crate::rules::{self, Denial, RuleResult};
use crate::{Action, Actor, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("unknown role '{0}'")]
    UnknownRole(String),

    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("denied: {action} on {resource}: {reason}")]
    Denied {
        action: Action,
        resource: ResourceKind,
        reason: Denial,
    },
}

/// Actor as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorInput {
    pub id: Option<i64>,
    pub role: Option<String>,
    pub club_id: Option<i64>,
    pub is_active: Option<bool>,
}

/// Resource as supplied by the caller. Which fields are required depends on
/// `kind`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceInput {
    pub kind: Option<String>,
    pub id: Option<i64>,
    pub club_id: Option<i64>,
    /// User resources only.
    pub role: Option<String>,
    /// User resources only; absent means active.
    pub is_active: Option<bool>,
    /// Event resources only, RFC 3339.
    pub event_date: Option<String>,
    /// Report resources only.
    pub report_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub actor: Option<ActorInput>,
    pub resource: Option<ResourceInput>,
    pub action: Option<String>,
    /// Role being granted, for `AssignRole`.
    pub new_role: Option<String>,
}

/// Outcome of [`evaluate`], with enough detail to audit it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub allowed: bool,
    pub action: Option<Action>,
    pub resource: Option<ResourceKind>,
    pub denial: Option<Denial>,
    pub reason: String,
}

impl Decision {
    fn allow(action: Action, resource: ResourceKind) -> Self {
        Self {
            allowed: true,
            action: Some(action),
            resource: Some(resource),
            denial: None,
            reason: format!("{action} on {resource} permitted"),
        }
    }

    /// Denial for input that could not even be read as a request.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::deny(None, None, Denial::Malformed, reason.into())
    }

    fn deny(
        action: Option<Action>,
        resource: Option<ResourceKind>,
        denial: Denial,
        reason: String,
    ) -> Self {
        Self {
            allowed: false,
            action,
            resource,
            denial: Some(denial),
            reason,
        }
    }
}

/// A request whose fields all parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    pub actor: Actor,
    pub resource: ResourceRef,
    pub action: Action,
    pub new_role: Option<Role>,
}

impl DecisionRequest {
    pub fn parse(&self) -> Result<ParsedRequest, AuthzError> {
        let actor = self
            .actor
            .as_ref()
            .ok_or_else(|| AuthzError::MalformedRequest("missing actor".into()))?;
        let resource = self
            .resource
            .as_ref()
            .ok_or_else(|| AuthzError::MalformedRequest("missing resource".into()))?;
        let action = required(&self.action, "action")?.parse::<Action>()?;
        let new_role = self
            .new_role
            .as_deref()
            .map(str::parse::<Role>)
            .transpose()?;

        Ok(ParsedRequest {
            actor: parse_actor(actor)?,
            resource: parse_resource(resource)?,
            action,
            new_role,
        })
    }
}

fn required<'a>(field: &'a Option<String>, name: &str) -> Result<&'a str, AuthzError> {
    field
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AuthzError::MalformedRequest(format!("missing {name}")))
}

fn required_id(field: Option<i64>, name: &str) -> Result<i64, AuthzError> {
    field.ok_or_else(|| AuthzError::MalformedRequest(format!("missing {name}")))
}

fn parse_actor(input: &ActorInput) -> Result<Actor, AuthzError> {
    Ok(Actor {
        id: UserId::new(required_id(input.id, "actor id")?),
        role: required(&input.role, "actor role")?.parse()?,
        club_id: input.club_id.map(ClubId::new),
        is_active: input.is_active.unwrap_or(true),
    })
}

fn parse_resource(input: &ResourceInput) -> Result<ResourceRef, AuthzError> {
    let kind = required(&input.kind, "resource kind")?;
    let club_id = input.club_id.map(ClubId::new);

    match kind.trim().to_lowercase().as_str() {
        "user" => Ok(ResourceRef::User(UserRecord {
            id: UserId::new(required_id(input.id, "user id")?),
            role: required(&input.role, "user role")?.parse()?,
            club_id,
            is_active: input.is_active.unwrap_or(true),
        })),
        "club" => {
            // A club is identified by its own id; `club_id` is accepted as an alias.
            let id = input.id.or(input.club_id);
            Ok(ResourceRef::Club(ClubRecord {
                id: ClubId::new(required_id(id, "club id")?),
            }))
        }
        "event" => {
            let raw = required(&input.event_date, "event date")?;
            let event_date = DateTime::parse_from_rfc3339(raw.trim())
                .map_err(|e| AuthzError::MalformedRequest(format!("event date: {e}")))?
                .with_timezone(&Utc);
            Ok(ResourceRef::Event(EventRecord {
                id: EventId::new(input.id.unwrap_or_default()),
                club_id,
                event_date,
            }))
        }
        "report" => Ok(ResourceRef::Report(ReportRecord {
            id: ReportId::new(input.id.unwrap_or_default()),
            club_id,
            report_type: required(&input.report_type, "report type")?.parse::<ReportType>()?,
        })),
        other => Err(AuthzError::MalformedRequest(format!(
            "unknown resource kind '{other}'"
        ))),
    }
}

/// Decide a parsed request.
pub fn decide(request: &ParsedRequest, now: DateTime<Utc>) -> RuleResult {
    let ParsedRequest {
        actor,
        resource,
        action,
        new_role,
    } = request;

    if !action.applies_to(resource.kind()) {
        return Err(Denial::Malformed);
    }
    if action.is_mutating() && !actor.is_active {
        return Err(Denial::InactiveActor);
    }

    match (action, resource) {
        (Action::Delete, ResourceRef::User(target)) => rules::check_delete_user(target, actor),
        (Action::Edit, ResourceRef::User(target)) => rules::check_edit_user(target, actor),
        (Action::AssignRole, ResourceRef::User(target)) => {
            let new_role = new_role.ok_or(Denial::Malformed)?;
            rules::check_promote_user(target, actor, new_role)
        }
        (Action::Create, ResourceRef::Event(event)) => {
            rules::check_create_event_at(event, actor, now)
        }
        (Action::Delete, ResourceRef::Event(event)) => {
            rules::check_delete_event_at(event, actor, now)
        }
        (Action::Edit, ResourceRef::Event(event)) => rules::check_edit_event_at(event, actor, now),
        (Action::Register, ResourceRef::Event(event)) => {
            rules::check_register_for_event_at(event, actor, now)
        }
        (Action::MarkAttendance, ResourceRef::Event(event)) => {
            rules::check_mark_attendance_at(event, actor, now)
        }
        (Action::Generate, ResourceRef::Report(report)) => {
            rules::check_generate_report(report.report_type, actor)?;
            check_policy(actor, resource, *action)
        }
        _ => check_policy(actor, resource, *action),
    }
}

fn check_policy(actor: &Actor, resource: &ResourceRef, action: Action) -> RuleResult {
    if policy::permits_resource(actor, resource, action) {
        Ok(())
    } else {
        Err(rules::policy_denial(actor, resource.club_id()))
    }
}

/// Evaluate a raw request. Never fails: malformed input is a denial.
pub fn evaluate(request: &DecisionRequest, now: DateTime<Utc>) -> Decision {
    let parsed = match request.parse() {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::debug!(error = %err, "denying malformed decision request");
            return Decision::malformed(err.to_string());
        }
    };

    let kind = parsed.resource.kind();
    let decision = match decide(&parsed, now) {
        Ok(()) => Decision::allow(parsed.action, kind),
        Err(denial) => Decision::deny(
            Some(parsed.action),
            Some(kind),
            denial,
            format!(
                "{} may not {} this {}: {}",
                parsed.actor.role, parsed.action, kind, denial
            ),
        ),
    };

    tracing::debug!(
        actor_id = %parsed.actor.id,
        actor_role = %parsed.actor.role,
        action = %parsed.action,
        resource = %kind,
        allowed = decision.allowed,
        "authorization decision"
    );

    decision
}

/// Authorize a raw request against the system clock.
pub fn authorize(request: &DecisionRequest) -> Result<(), AuthzError> {
    authorize_at(request, Utc::now())
}

pub fn authorize_at(request: &DecisionRequest, now: DateTime<Utc>) -> Result<(), AuthzError> {
    let parsed = request.parse()?;
    decide(&parsed, now).map_err(|reason| AuthzError::Denied {
        action: parsed.action,
        resource: parsed.resource.kind(),
        reason,
    })
}

/// Whether a raw request is allowed at `now`.
pub fn is_allowed(request: &DecisionRequest, now: DateTime<Utc>) -> bool {
    evaluate(request, now).allowed
}
