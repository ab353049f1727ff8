//! Entity trait: records identified by id rather than by value.

/// Entity marker + minimal interface.
///
/// Implemented by the record snapshots the persistence layer hands to the
/// decision engine, so rules can compare identities (e.g. self-targeting).
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;

    /// Whether `other` refers to the same record.
    fn same_entity<E: Entity<Id = Self::Id>>(&self, other: &E) -> bool {
        self.id() == other.id()
    }
}
