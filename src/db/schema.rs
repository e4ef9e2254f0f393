//! Schema creation for the `pdfs` and `summaries` tables.

use sqlx::PgPool;
use tracing::info;

use super::RepoError;

const SCHEMA_SQL: &[&str] = &[
    r#"
CREATE TABLE IF NOT EXISTS pdfs (
    id BIGSERIAL PRIMARY KEY,
    filename TEXT NOT NULL,
    title TEXT NOT NULL,
    file_size BIGINT NOT NULL,
    page_count INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#,
    "CREATE INDEX IF NOT EXISTS idx_pdfs_created_at ON pdfs(created_at)",
    "CREATE INDEX IF NOT EXISTS idx_pdfs_title ON pdfs(title)",
    r#"
CREATE TABLE IF NOT EXISTS summaries (
    id BIGSERIAL PRIMARY KEY,
    pdf_id BIGINT NOT NULL,
    style TEXT NOT NULL CHECK (style IN ('short', 'general', 'detailed')),
    content TEXT NOT NULL,
    language TEXT NOT NULL CHECK (language IN ('english', 'indonesian')),
    summary_time DOUBLE PRECISION NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#,
    "CREATE INDEX IF NOT EXISTS idx_summaries_pdf_id ON summaries(pdf_id)",
    "CREATE INDEX IF NOT EXISTS idx_summaries_created_at ON summaries(created_at)",
    // Recreated on every run so older databases pick up the cascade rules.
    "ALTER TABLE summaries DROP CONSTRAINT IF EXISTS fk_summaries_pdf",
    r#"
ALTER TABLE summaries
    ADD CONSTRAINT fk_summaries_pdf
    FOREIGN KEY (pdf_id) REFERENCES pdfs(id)
    ON UPDATE CASCADE ON DELETE CASCADE
"#,
];

const DROP_SQL: &[&str] = &[
    "DROP TABLE IF EXISTS summaries",
    "DROP TABLE IF EXISTS pdfs",
];

/// Creates tables, indexes and the cascading foreign key. Safe to run on
/// every startup.
pub async fn migrate(pool: &PgPool) -> Result<(), RepoError> {
    let mut tx = pool.begin().await?;
    for statement in SCHEMA_SQL {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    info!("Database schema is up to date");
    Ok(())
}

/// Drops both tables (children first) and recreates them empty.
pub async fn reset(pool: &PgPool) -> Result<(), RepoError> {
    let mut tx = pool.begin().await?;
    for statement in DROP_SQL {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    info!("Dropped pdfs and summaries tables");

    migrate(pool).await
}
