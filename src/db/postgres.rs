use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder};
use tracing::{debug, info};

use super::{Page, RepoError, Repository};
use crate::models::{NewPdf, NewSummary, PdfRecord, SummaryRecord};
use crate::validation::{like_pattern, ListParams};

const PDF_COLUMNS: &str = "id, filename, title, file_size, page_count, created_at, updated_at";
const SUMMARY_COLUMNS: &str =
    "id, pdf_id, style, content, language, summary_time, created_at, updated_at";

/// Opens a connection pool against `database_url`.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, RepoError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    info!(max_connections, "Connected to database");
    Ok(pool)
}

#[derive(Debug, Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_search(builder: &mut QueryBuilder<'_, Postgres>, column: &str, params: &ListParams) {
    if let Some(search) = &params.search {
        builder
            .push(" WHERE ")
            .push(column)
            .push(" ILIKE ")
            .push_bind(like_pattern(search))
            .push(r" ESCAPE '\'");
    }
}

fn push_order_and_page(builder: &mut QueryBuilder<'_, Postgres>, params: &ListParams) {
    let order = params.order.as_sql();
    // sort_field comes from a fixed allow-list
    builder
        .push(format!(" ORDER BY {} {}, id {}", params.sort_field, order, order))
        .push(" LIMIT ")
        .push_bind(params.limit())
        .push(" OFFSET ")
        .push_bind(params.offset());
}

fn map_summary_insert_error(err: sqlx::Error, pdf_id: i64) -> RepoError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            RepoError::MissingParent(pdf_id)
        }
        _ => RepoError::Db(err),
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn list_pdfs(&self, params: &ListParams) -> Result<Page<PdfRecord>, RepoError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM pdfs");
        push_search(&mut count, "title", params);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM pdfs", PDF_COLUMNS));
        push_search(&mut query, "title", params);
        push_order_and_page(&mut query, params);
        let items = query
            .build_query_as::<PdfRecord>()
            .fetch_all(&self.pool)
            .await?;

        debug!(total, returned = items.len(), "Listed pdfs");
        Ok(Page { items, total })
    }

    async fn create_pdf(&self, pdf: NewPdf) -> Result<PdfRecord, RepoError> {
        let record = sqlx::query_as::<_, PdfRecord>(&format!(
            "INSERT INTO pdfs (filename, title, file_size, page_count) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            PDF_COLUMNS
        ))
        .bind(&pdf.filename)
        .bind(&pdf.title)
        .bind(pdf.file_size)
        .bind(pdf.page_count)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn get_pdf(&self, id: i64) -> Result<Option<PdfRecord>, RepoError> {
        let record = sqlx::query_as::<_, PdfRecord>(&format!(
            "SELECT {} FROM pdfs WHERE id = $1",
            PDF_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete_pdf(&self, id: i64) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM pdfs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn summaries_for_pdf(&self, pdf_id: i64) -> Result<Vec<SummaryRecord>, RepoError> {
        let records = sqlx::query_as::<_, SummaryRecord>(&format!(
            "SELECT {} FROM summaries WHERE pdf_id = $1 ORDER BY created_at DESC, id DESC",
            SUMMARY_COLUMNS
        ))
        .bind(pdf_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn create_summary(&self, summary: NewSummary) -> Result<SummaryRecord, RepoError> {
        sqlx::query_as::<_, SummaryRecord>(&format!(
            "INSERT INTO summaries (pdf_id, style, content, language, summary_time) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            SUMMARY_COLUMNS
        ))
        .bind(summary.pdf_id)
        .bind(summary.style.as_str())
        .bind(&summary.content)
        .bind(summary.language.as_str())
        .bind(summary.summary_time)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| map_summary_insert_error(err, summary.pdf_id))
    }

    async fn list_summaries(&self, params: &ListParams) -> Result<Page<SummaryRecord>, RepoError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM summaries");
        push_search(&mut count, "content", params);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut query =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM summaries", SUMMARY_COLUMNS));
        push_search(&mut query, "content", params);
        push_order_and_page(&mut query, params);
        let items = query
            .build_query_as::<SummaryRecord>()
            .fetch_all(&self.pool)
            .await?;

        debug!(total, returned = items.len(), "Listed summaries");
        Ok(Page { items, total })
    }

    async fn get_summary(&self, id: i64) -> Result<Option<SummaryRecord>, RepoError> {
        let record = sqlx::query_as::<_, SummaryRecord>(&format!(
            "SELECT {} FROM summaries WHERE id = $1",
            SUMMARY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete_summary(&self, id: i64) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM summaries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), RepoError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
