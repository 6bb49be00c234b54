//! Event and command abstractions for the inventory ledger.

pub mod command;
pub mod event;

pub use command::Command;
pub use event::Event;
