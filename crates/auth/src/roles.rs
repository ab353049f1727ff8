//! Role hierarchy: the eight privilege levels and who may hand out which.
//!
//! The hierarchy is a *partial* order. The four unscoped tiers form a strict
//! ladder, but the club-scoped roles do not nest cleanly under one another,
//! so assignment eligibility is spelled out as an explicit table instead of
//! being derived from a rank.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AuthzError;

/// Privilege level assigned to a user.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    SystemAdmin,
    Admin,
    ClubPresident,
    Chairman,
    ViceChairman,
    ClubOfficer,
    TeamLeader,
    Member,
}

/// Where a role sits in the hierarchy.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleTier {
    /// Not bound to a club. Rank 0 is the most privileged.
    Unscoped(u8),
    /// Authority limited to the actor's own club.
    ClubScoped,
    /// No administrative authority.
    Member,
}

impl Role {
    /// All roles, most privileged first.
    pub const ALL: [Role; 8] = [
        Role::SystemAdmin,
        Role::Admin,
        Role::ClubPresident,
        Role::Chairman,
        Role::ViceChairman,
        Role::ClubOfficer,
        Role::TeamLeader,
        Role::Member,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SystemAdmin => "SystemAdmin",
            Role::Admin => "Admin",
            Role::ClubPresident => "ClubPresident",
            Role::Chairman => "Chairman",
            Role::ViceChairman => "ViceChairman",
            Role::ClubOfficer => "ClubOfficer",
            Role::TeamLeader => "TeamLeader",
            Role::Member => "Member",
        }
    }

    pub fn tier(&self) -> RoleTier {
        match self {
            Role::SystemAdmin => RoleTier::Unscoped(0),
            Role::Admin => RoleTier::Unscoped(1),
            Role::ClubPresident => RoleTier::Unscoped(2),
            Role::Chairman => RoleTier::Unscoped(3),
            Role::ViceChairman | Role::ClubOfficer | Role::TeamLeader => RoleTier::ClubScoped,
            Role::Member => RoleTier::Member,
        }
    }

    /// SystemAdmin, Admin, ClubPresident and Chairman.
    pub fn is_unscoped(&self) -> bool {
        matches!(self.tier(), RoleTier::Unscoped(_))
    }

    /// ViceChairman, ClubOfficer and TeamLeader.
    pub fn is_club_scoped(&self) -> bool {
        self.tier() == RoleTier::ClubScoped
    }

    /// Ladder rank for the unscoped tiers (`None` for everyone else).
    pub fn unscoped_rank(&self) -> Option<u8> {
        match self.tier() {
            RoleTier::Unscoped(rank) => Some(rank),
            RoleTier::ClubScoped | RoleTier::Member => None,
        }
    }

    /// Roles this role may assign to another user.
    pub fn assignable_roles(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|target| can_assign_role(*self, *target))
            .collect()
    }
}

/// Whether a user holding `current` may assign `target` to someone.
///
/// | current        | may assign                                   |
/// |----------------|----------------------------------------------|
/// | SystemAdmin    | any                                          |
/// | Admin          | any except SystemAdmin                       |
/// | ClubPresident  | any except SystemAdmin, Admin                |
/// | Chairman       | any except SystemAdmin, Admin, ClubPresident |
/// | ViceChairman   | Member, TeamLeader, ClubOfficer              |
/// | ClubOfficer    | Member, TeamLeader                           |
/// | TeamLeader     | Member                                       |
/// | Member         | nothing                                      |
pub fn can_assign_role(current: Role, target: Role) -> bool {
    use crate::Role::*;

    match current {
        SystemAdmin => true,
        Admin => !matches!(target, SystemAdmin),
        ClubPresident => !matches!(target, SystemAdmin | Admin),
        Chairman => !matches!(target, SystemAdmin | Admin | ClubPresident),
        ViceChairman => matches!(target, Member | TeamLeader | ClubOfficer),
        ClubOfficer => matches!(target, Member | TeamLeader),
        TeamLeader => matches!(target, Member),
        Member => false,
    }
}

/// Whether `actor` sits strictly above `target` on the unscoped ladder.
///
/// Any non-ladder target counts as below every ladder role. A non-ladder
/// actor is never above anything.
pub fn outranks(actor: Role, target: Role) -> bool {
    match (actor.unscoped_rank(), target.unscoped_rank()) {
        (Some(a), Some(t)) => a < t,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Lowercases and strips `_`, `-` and spaces so `club_president` matches
/// `ClubPresident`.
pub(crate) fn normalize_name(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| *c != '_' && *c != '-' && *c != ' ')
        .flat_map(char::to_lowercase)
        .collect()
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthzError;

    /// Accepts `ClubPresident`, `club_president` or `club-president`, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_name(s);

        Role::ALL
            .into_iter()
            .find(|role| role.as_str().to_lowercase() == normalized)
            .ok_or_else(|| AuthzError::UnknownRole(s.to_string()))
    }
}
