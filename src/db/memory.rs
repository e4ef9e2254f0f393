use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{Page, RepoError, Repository};
use crate::models::{NewPdf, NewSummary, PdfRecord, SummaryRecord};
use crate::validation::{ListParams, SortOrder};

/// In-process repository with the same cascade and paging behavior as the
/// Postgres one.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    inner: RwLock<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    pdfs: BTreeMap<i64, PdfRecord>,
    summaries: BTreeMap<i64, SummaryRecord>,
    next_pdf_id: i64,
    next_summary_id: i64,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn summary_count(&self) -> usize {
        self.inner.read().await.summaries.len()
    }
}

fn compare_pdfs(field: &str, a: &PdfRecord, b: &PdfRecord) -> Ordering {
    match field {
        "title" => a.title.cmp(&b.title),
        "file_size" => a.file_size.cmp(&b.file_size),
        "page_count" => a.page_count.cmp(&b.page_count),
        "updated_at" => a.updated_at.cmp(&b.updated_at),
        "created_at" => a.created_at.cmp(&b.created_at),
        _ => Ordering::Equal,
    }
    .then(a.id.cmp(&b.id))
}

fn compare_summaries(field: &str, a: &SummaryRecord, b: &SummaryRecord) -> Ordering {
    match field {
        "pdf_id" => a.pdf_id.cmp(&b.pdf_id),
        "style" => a.style.as_str().cmp(b.style.as_str()),
        "language" => a.language.as_str().cmp(b.language.as_str()),
        "summary_time" => a.summary_time.total_cmp(&b.summary_time),
        "updated_at" => a.updated_at.cmp(&b.updated_at),
        "created_at" => a.created_at.cmp(&b.created_at),
        _ => Ordering::Equal,
    }
    .then(a.id.cmp(&b.id))
}

fn paginate<T: Clone>(
    mut rows: Vec<T>,
    params: &ListParams,
    compare: impl Fn(&T, &T) -> Ordering,
) -> Page<T> {
    rows.sort_by(|a, b| match params.order {
        SortOrder::Asc => compare(a, b),
        SortOrder::Desc => compare(b, a),
    });

    let total = rows.len() as i64;
    let items = rows
        .into_iter()
        .skip(params.offset().max(0) as usize)
        .take(params.limit().max(0) as usize)
        .collect();

    Page { items, total }
}

fn matches_search(haystack: &str, params: &ListParams) -> bool {
    match &params.search {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn list_pdfs(&self, params: &ListParams) -> Result<Page<PdfRecord>, RepoError> {
        let tables = self.inner.read().await;
        let rows = tables
            .pdfs
            .values()
            .filter(|pdf| matches_search(&pdf.title, params))
            .cloned()
            .collect();

        Ok(paginate(rows, params, |a, b| {
            compare_pdfs(params.sort_field, a, b)
        }))
    }

    async fn create_pdf(&self, pdf: NewPdf) -> Result<PdfRecord, RepoError> {
        let mut tables = self.inner.write().await;
        tables.next_pdf_id += 1;
        let now = Utc::now();
        let record = PdfRecord {
            id: tables.next_pdf_id,
            filename: pdf.filename,
            title: pdf.title,
            file_size: pdf.file_size,
            page_count: pdf.page_count,
            created_at: now,
            updated_at: now,
        };
        tables.pdfs.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_pdf(&self, id: i64) -> Result<Option<PdfRecord>, RepoError> {
        Ok(self.inner.read().await.pdfs.get(&id).cloned())
    }

    async fn delete_pdf(&self, id: i64) -> Result<bool, RepoError> {
        let mut tables = self.inner.write().await;
        if tables.pdfs.remove(&id).is_none() {
            return Ok(false);
        }
        tables.summaries.retain(|_, summary| summary.pdf_id != id);
        Ok(true)
    }

    async fn summaries_for_pdf(&self, pdf_id: i64) -> Result<Vec<SummaryRecord>, RepoError> {
        let tables = self.inner.read().await;
        let mut summaries: Vec<SummaryRecord> = tables
            .summaries
            .values()
            .filter(|summary| summary.pdf_id == pdf_id)
            .cloned()
            .collect();
        summaries.sort_by(|a, b| compare_summaries("created_at", b, a));
        Ok(summaries)
    }

    async fn create_summary(&self, summary: NewSummary) -> Result<SummaryRecord, RepoError> {
        let mut tables = self.inner.write().await;
        if !tables.pdfs.contains_key(&summary.pdf_id) {
            return Err(RepoError::MissingParent(summary.pdf_id));
        }

        tables.next_summary_id += 1;
        let now = Utc::now();
        let record = SummaryRecord {
            id: tables.next_summary_id,
            pdf_id: summary.pdf_id,
            style: summary.style,
            content: summary.content,
            language: summary.language,
            summary_time: summary.summary_time,
            created_at: now,
            updated_at: now,
        };
        tables.summaries.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list_summaries(&self, params: &ListParams) -> Result<Page<SummaryRecord>, RepoError> {
        let tables = self.inner.read().await;
        let rows = tables
            .summaries
            .values()
            .filter(|summary| matches_search(&summary.content, params))
            .cloned()
            .collect();

        Ok(paginate(rows, params, |a, b| {
            compare_summaries(params.sort_field, a, b)
        }))
    }

    async fn get_summary(&self, id: i64) -> Result<Option<SummaryRecord>, RepoError> {
        Ok(self.inner.read().await.summaries.get(&id).cloned())
    }

    async fn delete_summary(&self, id: i64) -> Result<bool, RepoError> {
        Ok(self.inner.write().await.summaries.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), RepoError> {
        Ok(())
    }
}
