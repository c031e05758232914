pub mod posts;
pub mod profiles;
pub mod users;

#[cfg(test)]
pub mod memory;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// SQL of the embedded migrations, printed by `api schema`.
pub const SCHEMA_SQL: &str = include_str!("../../migrations/0001_init.sql");

pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Run the migrations embedded from ./migrations/
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Store failures, with the constraint violations callers care about split out.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate key value violates unique constraint")]
    DuplicateKey,
    #[error("foreign key violation")]
    ForeignKeyViolation,
    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let code = match &err {
            sqlx::Error::Database(db_err) => db_err.code().map(|c| c.into_owned()),
            _ => None,
        };
        match code.as_deref() {
            Some("23505") => StoreError::DuplicateKey,
            Some("23503") => StoreError::ForeignKeyViolation,
            _ => StoreError::Database(err),
        }
    }
}
