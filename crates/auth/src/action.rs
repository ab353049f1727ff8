use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AuthzError;
use crate::roles::normalize_name;
use crate::resource::ResourceKind;

/// Verb requested against a resource.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Create,
    Edit,
    Delete,
    AssignRole,
    Generate,
    Export,
    Register,
    MarkAttendance,
    ViewDetails,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::Create,
        Action::Edit,
        Action::Delete,
        Action::AssignRole,
        Action::Generate,
        Action::Export,
        Action::Register,
        Action::MarkAttendance,
        Action::ViewDetails,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "Create",
            Action::Edit => "Edit",
            Action::Delete => "Delete",
            Action::AssignRole => "AssignRole",
            Action::Generate => "Generate",
            Action::Export => "Export",
            Action::Register => "Register",
            Action::MarkAttendance => "MarkAttendance",
            Action::ViewDetails => "ViewDetails",
        }
    }

    /// Whether the verb is meaningful for the given resource kind.
    pub fn applies_to(&self, kind: ResourceKind) -> bool {
        use Action::*;

        match kind {
            ResourceKind::User => matches!(self, Create | Edit | Delete | AssignRole | ViewDetails),
            ResourceKind::Club => matches!(self, Create | Edit | Delete | ViewDetails),
            ResourceKind::Event => matches!(
                self,
                Create | Edit | Delete | Export | Register | MarkAttendance | ViewDetails
            ),
            ResourceKind::Report => matches!(self, Generate | Export | ViewDetails),
        }
    }

    /// Everything except `ViewDetails` changes or produces something.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Action::ViewDetails)
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_name(s);

        Action::ALL
            .into_iter()
            .find(|a| a.as_str().to_lowercase() == normalized)
            .ok_or_else(|| AuthzError::MalformedRequest(format!("unknown action '{s}'")))
    }
}
