pub mod database;
pub mod repositories;
pub mod security;

#[cfg(test)]
mod testing;

pub use database::{Database, SqlitePool};
pub use repositories::*;
pub use security::*;
