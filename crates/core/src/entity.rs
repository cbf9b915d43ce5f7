//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Records are created and mutated by the storage layer, so the identifier may
/// be absent from a snapshot row.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + Into<i64>;

    /// Returns the entity identifier, if the row carried one.
    fn id(&self) -> Option<Self::Id>;
}
