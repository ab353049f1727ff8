//! Business rules: role policy combined with resource state.
//!
//! Each operation exists twice: `check_*` explains a denial, `can_*` is the
//! boolean the application layer consumes. Operations that depend on the
//! current time take it explicitly in their `*_at` form; the plain form reads
//! the system clock.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use clubhub_core::{ClubId, Entity};

use crate::policy::{self, PolicyTarget};
use crate::resource::{EventRecord, ReportType, UserRecord};
use crate::{Action, Actor, Role};

/// Why a business rule said no.
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Denial {
    #[error("an actor cannot target itself")]
    SelfTarget,

    #[error("the acting account is inactive")]
    InactiveActor,

    #[error("the target account is inactive")]
    InactiveTarget,

    #[error("the event has already started")]
    PastEvent,

    #[error("outside the allowed time window")]
    OutsideTimeWindow,

    #[error("the resource belongs to a different club")]
    ClubMismatch,

    #[error("the actor's role does not allow this")]
    InsufficientRole,

    #[error("the request is incomplete or malformed")]
    Malformed,
}

pub type RuleResult = Result<(), Denial>;

fn ensure(condition: bool, denial: Denial) -> RuleResult {
    if condition { Ok(()) } else { Err(denial) }
}

/// Pick the denial that best explains a failed policy check.
pub(crate) fn policy_denial(actor: &Actor, target_club: Option<ClubId>) -> Denial {
    if actor.role.is_club_scoped() && !actor.belongs_to(target_club) {
        Denial::ClubMismatch
    } else {
        Denial::InsufficientRole
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

/// Self-deletion is never allowed. Otherwise each unscoped tier may delete
/// anyone strictly below it; nobody else may delete users.
pub fn check_delete_user(target: &UserRecord, actor: &Actor) -> RuleResult {
    use crate::Role::*;

    ensure(!actor.same_entity(target), Denial::SelfTarget)?;

    let allowed = match actor.role {
        SystemAdmin => target.role != SystemAdmin,
        Admin => !matches!(target.role, SystemAdmin | Admin),
        ClubPresident => !matches!(target.role, SystemAdmin | Admin | ClubPresident),
        Chairman => !matches!(target.role, SystemAdmin | Admin | ClubPresident | Chairman),
        ViceChairman | ClubOfficer | TeamLeader | Member => false,
    };
    ensure(allowed, Denial::InsufficientRole)
}

pub fn can_delete_user(target: &UserRecord, actor: &Actor) -> bool {
    check_delete_user(target, actor).is_ok()
}

/// Change `target`'s role to `new_role`.
///
/// The actor must be allowed to hand out both the role the target holds now
/// and the one being granted, so nobody can demote someone they could not
/// have appointed.
pub fn check_promote_user(target: &UserRecord, actor: &Actor, new_role: Role) -> RuleResult {
    ensure(!actor.same_entity(target), Denial::SelfTarget)?;
    ensure(actor.is_active, Denial::InactiveActor)?;
    ensure(target.is_active, Denial::InactiveTarget)?;

    if actor.role.is_club_scoped() {
        ensure(actor.belongs_to(target.club_id), Denial::ClubMismatch)?;
    }

    ensure(
        crate::can_assign_role(actor.role, target.role)
            && crate::can_assign_role(actor.role, new_role),
        Denial::InsufficientRole,
    )
}

pub fn can_promote_user(target: &UserRecord, actor: &Actor, new_role: Role) -> bool {
    check_promote_user(target, actor, new_role).is_ok()
}

/// Anyone active may edit their own profile; editing others follows the
/// role policy.
pub fn check_edit_user(target: &UserRecord, actor: &Actor) -> RuleResult {
    ensure(actor.is_active, Denial::InactiveActor)?;
    if actor.same_entity(target) {
        return Ok(());
    }

    let target_policy = PolicyTarget::User {
        role: target.role,
        club_id: target.club_id,
    };
    ensure(
        policy::permits(actor.role, actor.club_id, target_policy, Action::Edit),
        policy_denial(actor, target.club_id),
    )
}

pub fn can_edit_user(target: &UserRecord, actor: &Actor) -> bool {
    check_edit_user(target, actor).is_ok()
}

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

/// Unscoped roles may manage any event, club-scoped roles only their club's.
fn check_event_manager(event: &EventRecord, actor: &Actor) -> RuleResult {
    use crate::Role::*;

    match actor.role {
        SystemAdmin | Admin | ClubPresident | Chairman => Ok(()),
        ViceChairman | ClubOfficer | TeamLeader => {
            ensure(actor.belongs_to(event.club_id), Denial::ClubMismatch)
        }
        Member => Err(Denial::InsufficientRole),
    }
}

/// Past events are immutable. An event starting exactly at `now` already
/// counts as past.
pub fn check_delete_event_at(
    event: &EventRecord,
    actor: &Actor,
    now: DateTime<Utc>,
) -> RuleResult {
    ensure(event.event_date > now, Denial::PastEvent)?;
    check_event_manager(event, actor)
}

pub fn can_delete_event_at(event: &EventRecord, actor: &Actor, now: DateTime<Utc>) -> bool {
    check_delete_event_at(event, actor, now).is_ok()
}

pub fn can_delete_event(event: &EventRecord, actor: &Actor) -> bool {
    can_delete_event_at(event, actor, Utc::now())
}

/// New events must start at least the configured lead time after `now`.
pub fn check_create_event_at(
    event: &EventRecord,
    actor: &Actor,
    now: DateTime<Utc>,
) -> RuleResult {
    ensure(actor.is_active, Denial::InactiveActor)?;
    check_event_manager(event, actor)?;
    ensure(
        clubhub_validation::is_valid_event_date_at(event.event_date, now),
        Denial::OutsideTimeWindow,
    )
}

pub fn can_create_event_at(event: &EventRecord, actor: &Actor, now: DateTime<Utc>) -> bool {
    check_create_event_at(event, actor, now).is_ok()
}

pub fn check_edit_event_at(event: &EventRecord, actor: &Actor, now: DateTime<Utc>) -> RuleResult {
    ensure(actor.is_active, Denial::InactiveActor)?;
    ensure(event.event_date > now, Denial::PastEvent)?;
    check_event_manager(event, actor)
}

pub fn can_edit_event_at(event: &EventRecord, actor: &Actor, now: DateTime<Utc>) -> bool {
    check_edit_event_at(event, actor, now).is_ok()
}

/// Registration closes one hour (by default) before the event starts.
pub fn check_register_for_event_at(
    event: &EventRecord,
    actor: &Actor,
    now: DateTime<Utc>,
) -> RuleResult {
    ensure(actor.is_active, Denial::InactiveActor)?;
    ensure(
        clubhub_validation::can_register_for_event(event.event_date, now),
        Denial::OutsideTimeWindow,
    )
}

pub fn can_register_for_event_at(event: &EventRecord, actor: &Actor, now: DateTime<Utc>) -> bool {
    check_register_for_event_at(event, actor, now).is_ok()
}

/// Attendance is taken by event managers inside the attendance window.
pub fn check_mark_attendance_at(
    event: &EventRecord,
    actor: &Actor,
    now: DateTime<Utc>,
) -> RuleResult {
    ensure(actor.is_active, Denial::InactiveActor)?;
    check_event_manager(event, actor)?;
    ensure(
        clubhub_validation::can_mark_attendance(event.event_date, now),
        Denial::OutsideTimeWindow,
    )
}

pub fn can_mark_attendance_at(event: &EventRecord, actor: &Actor, now: DateTime<Utc>) -> bool {
    check_mark_attendance_at(event, actor, now).is_ok()
}

// ─────────────────────────────────────────────────────────────────────────────
// Reports
// ─────────────────────────────────────────────────────────────────────────────

pub fn check_generate_report(report_type: ReportType, actor: &Actor) -> RuleResult {
    ensure(
        policy::report_allowed(actor.role, report_type),
        Denial::InsufficientRole,
    )
}

pub fn can_generate_report(report_type: ReportType, actor: &Actor) -> bool {
    check_generate_report(report_type, actor).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use clubhub_core::{ClubId, EventId, UserId};
    use crate::Role::*;

    fn now() -> DateTime<Utc> {
        "2026-03-10T12:00:00Z".parse().unwrap()
    }

    fn user(id: i64, role: Role, club: Option<i64>) -> UserRecord {
        UserRecord {
            id: UserId::new(id),
            role,
            club_id: club.map(ClubId::new),
            is_active: true,
        }
    }

    fn actor(id: i64, role: Role, club: Option<i64>) -> Actor {
        Actor::from(&user(id, role, club))
    }

    fn event(club: i64, starts_in: Duration) -> EventRecord {
        EventRecord {
            id: EventId::new(1),
            club_id: Some(ClubId::new(club)),
            event_date: now() + starts_in,
        }
    }

    #[test]
    fn self_deletion_denied_even_for_system_admin() {
        let target = user(5, Admin, None);
        let me = actor(5, SystemAdmin, None);
        assert_eq!(check_delete_user(&target, &me), Err(Denial::SelfTarget));
    }

    #[test]
    fn delete_user_ladder() {
        assert!(can_delete_user(&user(2, Admin, None), &actor(1, SystemAdmin, None)));
        assert!(!can_delete_user(&user(2, SystemAdmin, None), &actor(1, SystemAdmin, None)));
        assert!(!can_delete_user(&user(2, Admin, None), &actor(1, Admin, None)));
        assert!(can_delete_user(&user(2, Chairman, Some(1)), &actor(1, ClubPresident, None)));
        assert!(!can_delete_user(&user(2, ClubPresident, None), &actor(1, Chairman, None)));
        assert!(can_delete_user(&user(2, ViceChairman, Some(3)), &actor(1, Chairman, Some(1))));
        assert!(!can_delete_user(&user(2, Member, Some(1)), &actor(1, ViceChairman, Some(1))));
    }

    #[test]
    fn past_event_cannot_be_deleted() {
        let e = event(2, -Duration::days(1));
        assert_eq!(
            check_delete_event_at(&e, &actor(1, TeamLeader, Some(2)), now()),
            Err(Denial::PastEvent)
        );
        assert!(!can_delete_event_at(&e, &actor(1, SystemAdmin, None), now()));
    }

    #[test]
    fn event_starting_now_counts_as_past() {
        let e = event(2, Duration::zero());
        assert!(!can_delete_event_at(&e, &actor(1, Admin, None), now()));
        let e = event(2, Duration::seconds(1));
        assert!(can_delete_event_at(&e, &actor(1, Admin, None), now()));
    }

    #[test]
    fn scoped_event_deletion_requires_same_club() {
        let e = event(2, Duration::days(3));
        assert_eq!(
            check_delete_event_at(&e, &actor(1, TeamLeader, Some(5)), now()),
            Err(Denial::ClubMismatch)
        );
        assert!(can_delete_event_at(&e, &actor(1, TeamLeader, Some(2)), now()));
        assert!(can_delete_event_at(&e, &actor(1, Chairman, Some(9)), now()));
        assert_eq!(
            check_delete_event_at(&e, &actor(1, Member, Some(2)), now()),
            Err(Denial::InsufficientRole)
        );
    }

    #[test]
    fn vice_chairman_reports() {
        let vc = actor(1, ViceChairman, Some(1));
        assert!(!can_generate_report(ReportType::SemesterSummary, &vc));
        assert!(can_generate_report(ReportType::EventOutcomes, &vc));
    }

    #[test]
    fn promotion_rules() {
        let vc = actor(1, ViceChairman, Some(1));
        let member = user(2, Member, Some(1));
        assert!(can_promote_user(&member, &vc, ClubOfficer));
        assert_eq!(
            check_promote_user(&member, &vc, Chairman),
            Err(Denial::InsufficientRole)
        );

        let elsewhere = user(3, Member, Some(2));
        assert_eq!(
            check_promote_user(&elsewhere, &vc, TeamLeader),
            Err(Denial::ClubMismatch)
        );

        let mut inactive = user(4, Member, Some(1));
        inactive.is_active = false;
        assert_eq!(
            check_promote_user(&inactive, &vc, TeamLeader),
            Err(Denial::InactiveTarget)
        );

        let officer = user(5, ClubOfficer, Some(1));
        assert_eq!(
            check_promote_user(&officer, &actor(6, TeamLeader, Some(1)), Member),
            Err(Denial::InsufficientRole)
        );
    }

    #[test]
    fn cannot_promote_self() {
        let me = user(1, Admin, None);
        assert_eq!(
            check_promote_user(&me, &Actor::from(&me), SystemAdmin),
            Err(Denial::SelfTarget)
        );
    }

    #[test]
    fn self_edit_allowed_for_members() {
        let me = user(1, Member, Some(1));
        assert!(can_edit_user(&me, &Actor::from(&me)));
        assert!(!can_edit_user(&user(2, Member, Some(1)), &Actor::from(&me)));
    }

    #[test]
    fn inactive_actor_cannot_edit() {
        let me = user(1, Admin, None);
        let ghost = Actor::from(&me).inactive();
        assert_eq!(
            check_edit_user(&user(2, Member, None), &ghost),
            Err(Denial::InactiveActor)
        );
    }

    #[test]
    fn edit_event_follows_delete_scoping() {
        let e = event(2, Duration::hours(5));
        assert!(can_edit_event_at(&e, &actor(1, ClubOfficer, Some(2)), now()));
        assert!(!can_edit_event_at(&e, &actor(1, ClubOfficer, Some(3)), now()));
        let past = event(2, -Duration::hours(1));
        assert!(!can_edit_event_at(&past, &actor(1, Admin, None), now()));
    }

    #[test]
    fn new_events_need_an_hour_of_lead_time() {
        let leader = actor(1, TeamLeader, Some(2));
        assert!(can_create_event_at(&event(2, Duration::minutes(90)), &leader, now()));
        assert!(can_create_event_at(&event(2, Duration::hours(1)), &leader, now()));
        assert_eq!(
            check_create_event_at(&event(2, Duration::minutes(30)), &leader, now()),
            Err(Denial::OutsideTimeWindow)
        );
        assert_eq!(
            check_create_event_at(&event(2, -Duration::days(3)), &actor(1, Chairman, None), now()),
            Err(Denial::OutsideTimeWindow)
        );
        assert_eq!(
            check_create_event_at(&event(3, Duration::days(3)), &leader, now()),
            Err(Denial::ClubMismatch)
        );
    }

    #[test]
    fn registration_closes_an_hour_before() {
        let member = actor(1, Member, Some(2));
        assert!(can_register_for_event_at(&event(2, Duration::hours(2)), &member, now()));
        assert!(can_register_for_event_at(&event(2, Duration::hours(1)), &member, now()));
        assert_eq!(
            check_register_for_event_at(&event(2, Duration::minutes(59)), &member, now()),
            Err(Denial::OutsideTimeWindow)
        );
    }

    #[test]
    fn attendance_window() {
        let leader = actor(1, TeamLeader, Some(2));
        assert!(can_mark_attendance_at(&event(2, Duration::minutes(30)), &leader, now()));
        assert!(can_mark_attendance_at(&event(2, -Duration::hours(24)), &leader, now()));
        assert_eq!(
            check_mark_attendance_at(&event(2, -Duration::hours(25)), &leader, now()),
            Err(Denial::OutsideTimeWindow)
        );
        assert_eq!(
            check_mark_attendance_at(&event(2, Duration::hours(2)), &leader, now()),
            Err(Denial::OutsideTimeWindow)
        );
        assert_eq!(
            check_mark_attendance_at(&event(3, Duration::zero()), &leader, now()),
            Err(Denial::ClubMismatch)
        );
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn any_role() -> impl Strategy<Value = Role> {
            prop::sample::select(Role::ALL.to_vec())
        }

        const LADDER: [Role; 4] = [SystemAdmin, Admin, ClubPresident, Chairman];

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            #[test]
            fn self_deletion_never_allowed(id in any::<i64>(), role in any_role(), club in proptest::option::of(1i64..10)) {
                let me = user(id, role, club);
                prop_assert!(!can_delete_user(&me, &Actor::from(&me)));
            }

            /// If a ladder tier may delete a target, every higher tier may too,
            /// unless the target sits at or above that higher tier.
            #[test]
            fn delete_privilege_is_monotone(target_role in any_role(), lower in 0usize..4, higher in 0usize..4) {
                prop_assume!(higher < lower);
                let target = user(2, target_role, Some(1));
                let low = actor(1, LADDER[lower], None);
                let high = actor(1, LADDER[higher], None);
                if can_delete_user(&target, &low) && !crate::roles::outranks(target_role, LADDER[higher]) && target_role != LADDER[higher] {
                    prop_assert!(can_delete_user(&target, &high));
                }
            }

            #[test]
            fn past_events_never_deletable(role in any_role(), minutes_ago in 0i64..100_000, club in 1i64..5) {
                let e = event(club, -Duration::minutes(minutes_ago));
                prop_assert!(!can_delete_event_at(&e, &actor(1, role, Some(club)), now()));
            }
        }
    }
}
