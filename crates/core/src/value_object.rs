//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity and are never mutated after construction.
/// The inventory uses them for every read-side view (item and movement
/// snapshots, reports): callers get a copy, never a handle into ledger state.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Snapshot {
///     code: String,
///     quantity: f64,
/// }
///
/// impl ValueObject for Snapshot {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
