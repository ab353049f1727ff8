//! Role-based eligibility, independent of resource state.
//!
//! Answers "may a role (with this club affiliation) perform this verb on this
//! kind of target?" and nothing else: dates, activity flags and identity are
//! the business-rule layer's job.
//!
//! - No IO
//! - No panics
//! - Every unlisted (kind, action) pair denies

use clubhub_core::ClubId;

use crate::resource::{ReportType, ResourceKind, ResourceRef};
use crate::roles::{can_assign_role, outranks};
use crate::{Action, Actor, Role};

/// The part of a resource the policy looks at.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PolicyTarget {
    User {
        role: Role,
        club_id: Option<ClubId>,
    },
    Club {
        club_id: ClubId,
    },
    Event {
        club_id: Option<ClubId>,
    },
    Report {
        report_type: ReportType,
        club_id: Option<ClubId>,
    },
}

impl PolicyTarget {
    pub fn kind(&self) -> ResourceKind {
        match self {
            PolicyTarget::User { .. } => ResourceKind::User,
            PolicyTarget::Club { .. } => ResourceKind::Club,
            PolicyTarget::Event { .. } => ResourceKind::Event,
            PolicyTarget::Report { .. } => ResourceKind::Report,
        }
    }

    pub fn club_id(&self) -> Option<ClubId> {
        match self {
            PolicyTarget::User { club_id, .. }
            | PolicyTarget::Event { club_id }
            | PolicyTarget::Report { club_id, .. } => *club_id,
            PolicyTarget::Club { club_id } => Some(*club_id),
        }
    }
}

impl From<&ResourceRef> for PolicyTarget {
    fn from(resource: &ResourceRef) -> Self {
        match resource {
            ResourceRef::User(u) => PolicyTarget::User {
                role: u.role,
                club_id: u.club_id,
            },
            ResourceRef::Club(c) => PolicyTarget::Club { club_id: c.id },
            ResourceRef::Event(e) => PolicyTarget::Event { club_id: e.club_id },
            ResourceRef::Report(r) => PolicyTarget::Report {
                report_type: r.report_type,
                club_id: r.club_id,
            },
        }
    }
}

/// Whether `actor_role` (affiliated with `actor_club`) may perform `action`
/// against `target`.
pub fn permits(
    actor_role: Role,
    actor_club: Option<ClubId>,
    target: PolicyTarget,
    action: Action,
) -> bool {
    let same_club = matches!(
        (actor_club, target.club_id()),
        (Some(mine), Some(theirs)) if mine == theirs
    );

    match target {
        PolicyTarget::User { role, .. } => user_policy(actor_role, same_club, role, action),
        PolicyTarget::Club { .. } => club_policy(actor_role, same_club, action),
        PolicyTarget::Event { .. } => event_policy(actor_role, same_club, action),
        PolicyTarget::Report {
            report_type,
            club_id,
        } => report_policy(actor_role, same_club || club_id.is_none(), report_type, action),
    }
}

/// Convenience wrapper over [`permits`] for a resolved actor and resource.
pub fn permits_resource(actor: &Actor, resource: &ResourceRef, action: Action) -> bool {
    permits(actor.role, actor.club_id, PolicyTarget::from(resource), action)
}

/// Unscoped roles act anywhere; club-scoped roles only inside their club.
fn within_scope(actor_role: Role, same_club: bool) -> bool {
    actor_role.is_unscoped() || (actor_role.is_club_scoped() && same_club)
}

fn user_policy(actor_role: Role, same_club: bool, target_role: Role, action: Action) -> bool {
    match action {
        Action::Create | Action::Edit | Action::AssignRole => {
            within_scope(actor_role, same_club) && can_assign_role(actor_role, target_role)
        }
        Action::Delete => outranks(actor_role, target_role),
        Action::ViewDetails => actor_role.is_unscoped() || same_club,
        Action::Generate | Action::Export | Action::Register | Action::MarkAttendance => false,
    }
}

fn club_policy(actor_role: Role, same_club: bool, action: Action) -> bool {
    match action {
        Action::Create | Action::Delete => matches!(actor_role, Role::SystemAdmin | Role::Admin),
        Action::Edit => {
            actor_role.is_unscoped() || (actor_role == Role::ViceChairman && same_club)
        }
        Action::ViewDetails => true,
        Action::AssignRole
        | Action::Generate
        | Action::Export
        | Action::Register
        | Action::MarkAttendance => false,
    }
}

fn event_policy(actor_role: Role, same_club: bool, action: Action) -> bool {
    match action {
        Action::Create
        | Action::Edit
        | Action::Delete
        | Action::MarkAttendance
        | Action::Export => within_scope(actor_role, same_club),
        Action::Register | Action::ViewDetails => true,
        Action::AssignRole | Action::Generate => false,
    }
}

fn report_policy(actor_role: Role, in_club: bool, report_type: ReportType, action: Action) -> bool {
    match action {
        Action::Generate | Action::Export | Action::ViewDetails => {
            report_allowed(actor_role, report_type)
                && (actor_role.is_unscoped() || in_club)
        }
        Action::Create
        | Action::Edit
        | Action::Delete
        | Action::AssignRole
        | Action::Register
        | Action::MarkAttendance => false,
    }
}

/// Report types each role may produce.
///
/// | role                                           | report types                        |
/// |------------------------------------------------|-------------------------------------|
/// | SystemAdmin, Admin, ClubPresident, Chairman    | all                                 |
/// | ViceChairman                                   | all except SemesterSummary          |
/// | ClubOfficer, TeamLeader                        | EventOutcomes, ActivityTracking     |
/// | Member                                         | none                                |
pub fn report_allowed(role: Role, report_type: ReportType) -> bool {
    use crate::resource::ReportType::*;

    match role {
        Role::SystemAdmin | Role::Admin | Role::ClubPresident | Role::Chairman => true,
        Role::ViceChairman => !matches!(report_type, SemesterSummary),
        Role::ClubOfficer | Role::TeamLeader => {
            matches!(report_type, EventOutcomes | ActivityTracking)
        }
        Role::Member => false,
    }
}
