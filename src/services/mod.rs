pub mod file_store;
pub mod pdf_processor;
pub mod summarizer;

pub use file_store::FileStore;
pub use pdf_processor::PdfProcessor;
pub use summarizer::{
    ExternalSummary, HttpSummarizer, SummarizeJob, Summarizer, SummaryPayload,
};
