//! Interactive console front end for the inventory ledger.
//!
//! Collects and shape-checks operator input, calls into the ledger, and
//! renders plain-text tables and reports, optionally written to files. Holds
//! no domain rules of its own.

pub mod config;
pub mod export;
pub mod menu;
pub mod render;

pub use config::ConsoleConfig;
pub use menu::{Console, ConsoleError, MenuOption};
