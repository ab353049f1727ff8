//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Everything the decision engine consumes is a value object: the caller
/// builds it from persisted data immediately before a decision and drops it
/// afterwards. Two snapshots with the same fields yield the same decision.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Actor { role: Role, club_id: Option<ClubId> }
///
/// impl ValueObject for Actor {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug + Send + Sync {}
