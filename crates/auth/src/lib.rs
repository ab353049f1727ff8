//! `clubhub-auth` — the club-administration decision engine.
//!
//! Pure functions only: no IO, no shared state, safe to call from any thread.
//! Layers, leaf first:
//!
//! - [`roles`]: the eight-role hierarchy and role-assignment eligibility
//! - [`policy`]: role + club-scope eligibility per (resource kind, action)
//! - [`rules`]: policy combined with resource state (dates, identity, activity)
//! - [`authorize`]: fail-closed boundary for loosely-typed requests

pub mod action;
pub mod authorize;
pub mod policy;
pub mod principal;
pub mod resource;
pub mod roles;
pub mod rules;

pub use action::Action;
pub use authorize::{AuthzError, Decision, DecisionRequest, authorize, evaluate};
pub use principal::Actor;
pub use resource::{
    ClubRecord, EventRecord, ReportRecord, ReportType, ResourceKind, ResourceRef, UserRecord,
};
pub use roles::{Role, RoleTier, can_assign_role};
pub use rules::{
    Denial, can_delete_event, can_delete_event_at, can_delete_user, can_generate_report,
    can_promote_user,
};
