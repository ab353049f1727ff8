//! End-to-end decision scenarios through the JSON boundary and the typed API.

use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use clubhub_auth::authorize::{authorize_at, is_allowed};
use clubhub_auth::{
    Actor, AuthzError, DecisionRequest, Denial, EventRecord, ReportType, Role, UserRecord,
    can_assign_role, can_delete_event, can_delete_event_at, can_delete_user, can_generate_report,
    evaluate,
};
use clubhub_core::{ClubId, EventId, UserId};

fn now() -> DateTime<Utc> {
    "2026-09-01T09:00:00Z".parse().unwrap()
}

fn request(value: serde_json::Value) -> DecisionRequest {
    serde_json::from_value(value).expect("test request must deserialize")
}

fn user(id: i64, role: Role, club: Option<i64>) -> UserRecord {
    UserRecord {
        id: UserId::new(id),
        role,
        club_id: club.map(ClubId::new),
        is_active: true,
    }
}

fn event(club: i64, date: DateTime<Utc>) -> EventRecord {
    EventRecord {
        id: EventId::new(10),
        club_id: Some(ClubId::new(club)),
        event_date: date,
    }
}

#[test]
fn vice_chairman_assignment() {
    assert!(can_assign_role(Role::ViceChairman, Role::ClubOfficer));
    assert!(!can_assign_role(Role::ViceChairman, Role::Chairman));
}

#[test]
fn self_deletion_is_denied_regardless_of_role() {
    let target = user(5, Role::Admin, None);
    let actor = Actor::from(&user(5, Role::SystemAdmin, None));
    assert!(!can_delete_user(&target, &actor));
}

#[test]
fn past_event_is_not_deletable_by_its_own_club() {
    let e = event(2, Utc::now() - Duration::days(1));
    let leader = Actor::from(&user(1, Role::TeamLeader, Some(2)));
    assert!(!can_delete_event(&e, &leader));
}

#[test]
fn future_event_is_not_deletable_from_another_club() {
    let e = event(2, now() + Duration::days(3));
    let leader = Actor::from(&user(1, Role::TeamLeader, Some(5)));
    assert!(!can_delete_event_at(&e, &leader, now()));
}

#[test]
fn vice_chairman_reports() {
    let vc = Actor::from(&user(1, Role::ViceChairman, Some(1)));
    assert!(!can_generate_report(ReportType::SemesterSummary, &vc));
    assert!(can_generate_report(ReportType::EventOutcomes, &vc));
}

#[test]
fn json_delete_event_scenarios() {
    let past = request(json!({
        "actor": {"id": 1, "role": "TeamLeader", "club_id": 2},
        "resource": {"kind": "event", "id": 3, "club_id": 2, "event_date": "2026-08-31T09:00:00Z"},
        "action": "Delete"
    }));
    let decision = evaluate(&past, now());
    assert!(!decision.allowed);
    assert_eq!(decision.denial, Some(Denial::PastEvent));

    let other_club = request(json!({
        "actor": {"id": 1, "role": "TeamLeader", "club_id": 5},
        "resource": {"kind": "event", "id": 3, "club_id": 2, "event_date": "2026-09-04T09:00:00Z"},
        "action": "Delete"
    }));
    assert_eq!(evaluate(&other_club, now()).denial, Some(Denial::ClubMismatch));

    let own_club = request(json!({
        "actor": {"id": 1, "role": "TeamLeader", "club_id": 2},
        "resource": {"kind": "event", "id": 3, "club_id": 2, "event_date": "2026-09-04T09:00:00Z"},
        "action": "Delete"
    }));
    assert!(is_allowed(&own_club, now()));
}

#[test]
fn json_self_delete_is_denied() {
    let req = request(json!({
        "actor": {"id": 5, "role": "SystemAdmin"},
        "resource": {"kind": "user", "id": 5, "role": "Admin"},
        "action": "Delete"
    }));
    assert_eq!(
        authorize_at(&req, now()),
        Err(AuthzError::Denied {
            action: clubhub_auth::Action::Delete,
            resource: clubhub_auth::ResourceKind::User,
            reason: Denial::SelfTarget,
        })
    );
}

#[test]
fn empty_request_fails_closed() {
    let decision = evaluate(&DecisionRequest::default(), now());
    assert!(!decision.allowed);
    assert_eq!(decision.denial, Some(Denial::Malformed));
}

#[test]
fn unknown_enum_values_fail_closed() {
    for (field, value) in [
        ("action", json!("Obliterate")),
        ("new_role", json!("Emperor")),
    ] {
        let mut raw = json!({
            "actor": {"id": 1, "role": "SystemAdmin"},
            "resource": {"kind": "user", "id": 2, "role": "Member"},
            "action": "AssignRole",
            "new_role": "TeamLeader"
        });
        raw[field] = value;
        assert!(!is_allowed(&request(raw), now()), "{field} should deny");
    }

    let unknown_kind = request(json!({
        "actor": {"id": 1, "role": "SystemAdmin"},
        "resource": {"kind": "spaceship", "id": 2},
        "action": "ViewDetails"
    }));
    assert!(!is_allowed(&unknown_kind, now()));

    let unknown_report = request(json!({
        "actor": {"id": 1, "role": "SystemAdmin"},
        "resource": {"kind": "report", "report_type": "Payroll"},
        "action": "Generate"
    }));
    assert!(!is_allowed(&unknown_report, now()));
}

#[test]
fn registration_and_attendance_through_boundary() {
    let register = request(json!({
        "actor": {"id": 7, "role": "Member", "club_id": 9},
        "resource": {"kind": "event", "club_id": 2, "event_date": "2026-09-01T12:00:00Z"},
        "action": "Register"
    }));
    assert!(is_allowed(&register, now()));
    assert!(!is_allowed(&register, now() + Duration::hours(2) + Duration::minutes(1)));

    let attendance = request(json!({
        "actor": {"id": 7, "role": "ClubOfficer", "club_id": 2},
        "resource": {"kind": "event", "club_id": 2, "event_date": "2026-09-01T09:30:00Z"},
        "action": "MarkAttendance"
    }));
    assert!(is_allowed(&attendance, now()));
    assert!(!is_allowed(&attendance, now() + Duration::days(2)));
}

#[test]
fn creating_events_needs_an_hour_of_notice() {
    let create = |date: &str| {
        request(json!({
            "actor": {"id": 3, "role": "TeamLeader", "club_id": 2},
            "resource": {"kind": "event", "club_id": 2, "event_date": date},
            "action": "Create"
        }))
    };

    assert!(!is_allowed(&create("2026-08-01T09:00:00Z"), now()));
    assert!(!is_allowed(&create("2026-09-01T09:30:00Z"), now()));
    assert!(is_allowed(&create("2026-09-01T10:30:00Z"), now()));
    assert_eq!(
        authorize_at(&create("2026-09-01T09:10:00Z"), now()),
        Err(AuthzError::Denied {
            action: clubhub_auth::Action::Create,
            resource: clubhub_auth::ResourceKind::Event,
            reason: Denial::OutsideTimeWindow,
        })
    );
}

#[test]
fn decision_serializes_for_audit() {
    let req = request(json!({
        "actor": {"id": 1, "role": "Member", "club_id": 1},
        "resource": {"kind": "club", "id": 1},
        "action": "Delete"
    }));
    let decision = evaluate(&req, now());
    let value = serde_json::to_value(&decision).unwrap();
    assert_eq!(value["allowed"], false);
    assert_eq!(value["action"], "Delete");
    assert_eq!(value["resource"], "club");
    assert_eq!(value["denial"], "insufficient_role");
}

#[test]
fn decisions_are_thread_safe() {
    let req = std::sync::Arc::new(request(json!({
        "actor": {"id": 1, "role": "Chairman"},
        "resource": {"kind": "user", "id": 2, "role": "ViceChairman", "club_id": 3},
        "action": "Delete"
    })));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let req = std::sync::Arc::clone(&req);
            std::thread::spawn(move || is_allowed(&req, now()))
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
