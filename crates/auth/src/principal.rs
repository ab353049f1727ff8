use serde::{Deserialize, Serialize};

use clubhub_core::{ClubId, Entity, UserId, ValueObject};

use crate::Role;
use crate::resource::UserRecord;

/// The user performing an action, as seen by the decision engine.
///
/// Built by the caller from the current session's user record right before a
/// decision and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
    pub club_id: Option<ClubId>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Actor {
    pub fn new(id: UserId, role: Role, club_id: Option<ClubId>) -> Self {
        Self {
            id,
            role,
            club_id,
            is_active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// True when the actor is affiliated with `club`.
    ///
    /// An actor without a club, or a resource without a club, never matches.
    pub fn belongs_to(&self, club: Option<ClubId>) -> bool {
        matches!((self.club_id, club), (Some(mine), Some(theirs)) if mine == theirs)
    }
}

impl ValueObject for Actor {}

impl Entity for Actor {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}

impl From<&UserRecord> for Actor {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            role: user.role,
            club_id: user.club_id,
            is_active: user.is_active,
        }
    }
}
