use stockledger_core::ItemCode;

/// A command targets one item of the ledger.
///
/// Commands represent **intent** ("take 3 units of A1 out of stock"). They are
/// either rejected with a domain error or turned into events, which are the
/// facts that actually change state.
///
/// Commands must own their data (`'static`) and cross thread boundaries, since
/// hosts such as the HTTP service build them on request tasks and hand them to
/// a shared, locked ledger.
pub trait Command: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Code of the item the command acts on.
    fn target_item(&self) -> &ItemCode;
}
