//! Entity trait: identity assigned by the gateway.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the identifier, or `None` for a record not yet created upstream.
    fn id(&self) -> Option<&Self::Id>;
}
