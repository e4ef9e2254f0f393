use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::{Language, PdfRecord, SummaryRecord, SummaryStyle};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfResponse {
    pub id: i64,
    pub filename: String,
    pub file_size: i64,
    pub title: String,
    pub page_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfDetailResponse {
    #[serde(flatten)]
    pub pdf: PdfResponse,
    pub summaries: Vec<SummaryResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub id: i64,
    pub style: SummaryStyle,
    pub content: String,
    pub pdf_id: i64,
    pub language: Language,
    pub summary_time: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Envelope for every list endpoint.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub page: i64,
    pub items_per_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<PdfRecord> for PdfResponse {
    fn from(pdf: PdfRecord) -> Self {
        Self {
            id: pdf.id,
            filename: pdf.filename,
            file_size: pdf.file_size,
            title: pdf.title,
            page_count: pdf.page_count,
            created_at: pdf.created_at,
            updated_at: pdf.updated_at,
        }
    }
}

impl From<SummaryRecord> for SummaryResponse {
    fn from(summary: SummaryRecord) -> Self {
        Self {
            id: summary.id,
            style: summary.style,
            content: summary.content,
            pdf_id: summary.pdf_id,
            language: summary.language,
            summary_time: summary.summary_time,
            created_at: summary.created_at,
            updated_at: summary.updated_at,
        }
    }
}

impl PdfDetailResponse {
    pub fn new(pdf: PdfRecord, summaries: Vec<SummaryRecord>) -> Self {
        Self {
            pdf: pdf.into(),
            summaries: summaries.into_iter().map(SummaryResponse::from).collect(),
        }
    }
}

impl<T> ListResponse<T> {
    /// Builds the envelope from already-normalized paging values.
    pub fn new<R>(records: Vec<R>, page: i64, items_per_page: i64, total_items: i64) -> Self
    where
        R: Into<T>,
    {
        let total_pages = if items_per_page > 0 {
            (total_items + items_per_page - 1) / items_per_page
        } else {
            0
        };

        Self {
            data: records.into_iter().map(Into::into).collect(),
            page,
            items_per_page,
            total_pages,
            total_items,
        }
    }
}
