use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use domain::DomainError;
use std::fmt::Display;
use tracing::{error, info};

pub mod schema;
pub use schema::*;

pub type SqlitePool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const IN_MEMORY: &str = ":memory:";

/// Per-connection settings SQLite does not persist in the file.
#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(r2d2::Error::QueryError)
    }
}

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (or creates) the database at `database_path` and brings the
    /// schema up to date.
    pub fn new(database_path: &str, pool_size: u32) -> Result<Self, DomainError> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_path);
        let builder = r2d2::Pool::builder().connection_customizer(Box::new(SqlitePragmas));

        // Every in-memory connection is its own database, so keep exactly one alive.
        let builder = if database_path == IN_MEMORY {
            builder.max_size(1).idle_timeout(None).max_lifetime(None)
        } else {
            builder.max_size(pool_size.max(1))
        };

        let pool = builder
            .build(manager)
            .map_err(|e| storage_failure("open database", e))?;

        let database = Database { pool };
        database.run_migrations()?;
        info!(path = database_path, "database ready");
        Ok(database)
    }

    pub fn in_memory() -> Result<Self, DomainError> {
        Self::new(IN_MEMORY, 1)
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn run_migrations(&self) -> Result<(), DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| storage_failure("run migrations", e))?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| storage_failure("run migrations", e))?;
        if !applied.is_empty() {
            info!(count = applied.len(), "applied migrations");
        }
        Ok(())
    }
}

/// Logs the underlying failure and turns it into a repository error.
pub(crate) fn storage_failure(operation: &str, err: impl Display) -> DomainError {
    error!(operation, error = %err, "storage operation failed");
    DomainError::repository(format!("{operation}: {err}"))
}

/// Runs `work` on a pooled connection off the async executor and hands back
/// the raw query result, so callers can react to specific database errors.
pub(crate) async fn with_connection<T, F>(
    pool: &SqlitePool,
    operation: &'static str,
    work: F,
) -> Result<QueryResult<T>, DomainError>
where
    F: FnOnce(&mut SqliteConnection) -> QueryResult<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get().map_err(|e| storage_failure(operation, e))?;
        Ok(work(&mut conn))
    })
    .await
    .map_err(|e| storage_failure(operation, e))?
}

/// [`with_connection`] with every query error mapped to a repository error.
pub(crate) async fn run_blocking<T, F>(
    pool: &SqlitePool,
    operation: &'static str,
    work: F,
) -> Result<T, DomainError>
where
    F: FnOnce(&mut SqliteConnection) -> QueryResult<T> + Send + 'static,
    T: Send + 'static,
{
    with_connection(pool, operation, work)
        .await?
        .map_err(|e| storage_failure(operation, e))
}

/// `LIKE` pattern matching `needle` anywhere, with wildcards in it escaped by `\`.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("oak", "%oak%")]
    #[case("50%", "%50\\%%")]
    #[case("a_b", "%a\\_b%")]
    #[case("c:\\", "%c:\\\\%")]
    fn wildcards_are_escaped(#[case] needle: &str, #[case] expected: &str) {
        assert_eq!(contains_pattern(needle), expected);
    }

    #[test]
    fn in_memory_database_is_migrated() {
        let db = Database::in_memory().expect("database");
        let mut conn = db.get_pool().get().expect("connection");
        let count: i64 = products::table.count().get_result(&mut conn).expect("count");
        assert_eq!(count, 0);
    }
}
