//! SQLite plumbing: connection pool, migrations, row mapping, repositories.

pub mod connection;
pub mod migrations;
pub mod repositories;
pub mod row;
