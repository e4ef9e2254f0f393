use bytes::Bytes;
use lopdf::Document;

/// Reads document structure from uploaded PDFs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfProcessor;

impl PdfProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Number of pages in the document, or 0 when it cannot be parsed.
    ///
    /// Parsing runs on the blocking pool since large documents take a while.
    pub async fn page_count(&self, content: Bytes) -> i32 {
        let size = content.len();
        match tokio::task::spawn_blocking(move || count_pages(&content)).await {
            Ok(Some(pages)) => {
                tracing::debug!(file_size = size, pages, "Counted PDF pages");
                pages
            }
            Ok(None) => {
                tracing::warn!(file_size = size, "Could not parse PDF structure, recording 0 pages");
                0
            }
            Err(e) => {
                tracing::error!(error = %e, "Page counting task failed");
                0
            }
        }
    }
}

fn count_pages(content: &[u8]) -> Option<i32> {
    let document = Document::load_mem(content).ok()?;
    i32::try_from(document.get_pages().len()).ok()
}
