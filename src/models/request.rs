use serde::{Deserialize, Serialize};

use super::record::{Language, SummaryStyle};

/// Body of `POST /pdf`, registering metadata for a file stored elsewhere.
#[derive(Debug, Deserialize, Serialize)]
pub struct CreatePdfRequest {
    pub filename: String,
    pub file_size: i64,
    pub title: String,
    pub page_count: i32,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub style: SummaryStyle,
    #[serde(default)]
    pub language: Language,
}

/// Raw list query. Every field stays a string so malformed numbers fall
/// back to defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub itemsperpage: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub search: Option<String>,
}

/// An uploaded file pulled out of a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub content: bytes::Bytes,
}

impl UploadedFile {
    pub fn new(name: String, content: bytes::Bytes) -> Self {
        Self { name, content }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}
