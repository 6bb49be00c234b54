use stockledger_inventory::SharedLedger;

/// Everything request handlers need.
#[derive(Debug, Clone)]
pub struct AppServices {
    ledger: SharedLedger,
    default_actor: Option<String>,
}

impl AppServices {
    pub fn new(ledger: SharedLedger, default_actor: Option<String>) -> Self {
        Self {
            ledger,
            default_actor,
        }
    }

    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    /// The request's actor, else the configured default.
    pub fn actor_or_default(&self, actor: Option<String>) -> Option<String> {
        actor
            .filter(|a| !a.trim().is_empty())
            .or_else(|| self.default_actor.clone())
    }
}
