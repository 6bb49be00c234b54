use std::io;

use stockledger_console::{Console, ConsoleConfig};
use stockledger_inventory::SharedLedger;
use stockledger_observability::LogFormat;

fn main() -> anyhow::Result<()> {
    stockledger_observability::init(LogFormat::Pretty);

    let config = ConsoleConfig::from_env()?;
    tracing::debug!(actor = %config.actor, "console starting");

    let stdin = io::stdin();
    let mut console = Console::new(SharedLedger::new(), config, stdin.lock(), io::stdout());
    console.run()?;
    Ok(())
}
