//! Entity trait: identity that survives state changes.

/// Something with a stable identity.
///
/// An item keeps its code while its stock changes; a movement keeps its id
/// forever. Two entities with equal ids are the same thing, whatever their
/// other fields say.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}
