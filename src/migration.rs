//! Schema synchronisation: create the `owners` and `pets` tables if they do not exist.
//! Statement order follows foreign key dependencies.

use crate::error::AppError;
use sqlx::PgPool;

const DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS "owners" (
        "id" SERIAL PRIMARY KEY,
        "name" TEXT NOT NULL,
        "email" TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "pets" (
        "id" SERIAL PRIMARY KEY,
        "name" TEXT NOT NULL,
        "species" TEXT NOT NULL,
        "age" INTEGER,
        "description" TEXT,
        "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        "owner_id" INTEGER REFERENCES "owners" ("id") ON DELETE SET NULL
    )
    "#,
    r#"CREATE INDEX IF NOT EXISTS "pets_owner_id_idx" ON "pets" ("owner_id")"#,
];

/// Idempotent; safe to run on every start.
pub async fn ensure_tables(pool: &PgPool) -> Result<(), AppError> {
    for ddl in DDL {
        tracing::debug!(sql = %ddl.trim(), "ddl");
        sqlx::query(ddl).execute(pool).await?;
    }
    tracing::info!("tables ready");
    Ok(())
}
