//! High-level store API.

pub mod event_store;
