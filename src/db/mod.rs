//! Persistence layer.
//!
//! Handlers only see the [`Repository`] trait. [`PgRepository`] backs the
//! running service; [`MemoryRepository`] keeps the same semantics in process
//! for tests.

mod memory;
mod postgres;
pub mod schema;

pub use memory::MemoryRepository;
pub use postgres::{connect, PgRepository};

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewPdf, NewSummary, PdfRecord, SummaryRecord};
use crate::validation::ListParams;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Db(#[from] sqlx::Error),

    #[error("pdf {0} does not exist")]
    MissingParent(i64),
}

/// One page of records plus the total count matching the filter.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

#[async_trait]
pub trait Repository: Send + Sync {
    async fn list_pdfs(&self, params: &ListParams) -> Result<Page<PdfRecord>, RepoError>;

    async fn create_pdf(&self, pdf: NewPdf) -> Result<PdfRecord, RepoError>;

    async fn get_pdf(&self, id: i64) -> Result<Option<PdfRecord>, RepoError>;

    /// Deletes the PDF and, through the cascade, all of its summaries.
    /// Returns `false` if no row matched.
    async fn delete_pdf(&self, id: i64) -> Result<bool, RepoError>;

    /// Summaries of one PDF, newest first.
    async fn summaries_for_pdf(&self, pdf_id: i64) -> Result<Vec<SummaryRecord>, RepoError>;

    /// Fails with [`RepoError::MissingParent`] when `summary.pdf_id` is unknown.
    async fn create_summary(&self, summary: NewSummary) -> Result<SummaryRecord, RepoError>;

    async fn list_summaries(&self, params: &ListParams) -> Result<Page<SummaryRecord>, RepoError>;

    async fn get_summary(&self, id: i64) -> Result<Option<SummaryRecord>, RepoError>;

    async fn delete_summary(&self, id: i64) -> Result<bool, RepoError>;

    async fn ping(&self) -> Result<(), RepoError>;
}
