//! Application state shared by every handler

use std::sync::Arc;

use crate::config::Config;
use crate::db::Repository;
use crate::middleware::RateLimiter;
use crate::services::{FileStore, PdfProcessor, Summarizer};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    repository: Arc<dyn Repository>,
    summarizer: Arc<dyn Summarizer>,
    files: FileStore,
    pdf_processor: PdfProcessor,
    rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Builds the state; the upload directory and rate limits come from `config`.
    pub fn new(
        config: Config,
        repository: Arc<dyn Repository>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        let files = FileStore::new(config.upload_dir.clone());
        let rate_limiter = Arc::new(RateLimiter::new(
            config.rate_limit_requests,
            config.rate_limit_window(),
        ));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                repository,
                summarizer,
                files,
                pdf_processor: PdfProcessor::new(),
                rate_limiter,
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn repository(&self) -> &dyn Repository {
        self.inner.repository.as_ref()
    }

    pub fn summarizer(&self) -> &dyn Summarizer {
        self.inner.summarizer.as_ref()
    }

    pub fn files(&self) -> &FileStore {
        &self.inner.files
    }

    pub fn pdf_processor(&self) -> &PdfProcessor {
        &self.inner.pdf_processor
    }

    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.inner.rate_limiter
    }
}
