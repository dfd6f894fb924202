//! CLI subcommand implementations.

pub mod add;
pub mod open;
pub mod prune;
pub mod purge;
pub mod search;
pub mod status;
