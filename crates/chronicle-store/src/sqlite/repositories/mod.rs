//! Stateless per-table data access. Every method takes a `&Connection`;
//! transaction scope is owned by the caller.

pub mod audit;
pub mod content;
pub mod event;
pub mod exclusion;
pub mod search;
