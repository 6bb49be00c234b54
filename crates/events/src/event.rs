use chrono::{DateTime, Utc};

/// A fact the ledger has accepted.
///
/// Events are only ever appended, never edited. `event_type` is a stable,
/// dotted name (e.g. "inventory.stock.exit_recorded") and `version` its schema
/// revision, so consumers can match on both.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    fn event_type(&self) -> &'static str;

    fn version(&self) -> u32;

    /// Business time of the change.
    fn occurred_at(&self) -> DateTime<Utc>;
}
