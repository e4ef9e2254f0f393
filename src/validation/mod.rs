//! Input normalization for list queries and upload validation.
//!
//! Paging and sorting inputs are corrected, never rejected. File and title
//! checks return [`AppError`] so handlers can bail out before touching disk
//! or the database.

use std::path::Path;

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::ListQuery;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_ITEMS_PER_PAGE: i64 = 10;
pub const MAX_ITEMS_PER_PAGE: i64 = 100;
pub const MAX_SEARCH_CHARS: usize = 100;
pub const MAX_TITLE_CHARS: usize = 255;
pub const DEFAULT_SORT_FIELD: &str = "created_at";
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf"];

pub const PDF_SORT_FIELDS: &[&str] = &[
    "id",
    "title",
    "file_size",
    "page_count",
    "created_at",
    "updated_at",
];

pub const SUMMARY_SORT_FIELDS: &[&str] = &[
    "id",
    "pdf_id",
    "style",
    "language",
    "summary_time",
    "created_at",
    "updated_at",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// A fully normalized list request. `sort_field` always comes from an
/// allow-list, so it is safe to splice into an ORDER BY clause.
#[derive(Debug, Clone, PartialEq)]
pub struct ListParams {
    pub page: i64,
    pub items_per_page: i64,
    pub sort_field: &'static str,
    pub order: SortOrder,
    pub search: Option<String>,
}

impl ListParams {
    pub fn from_query(query: &ListQuery, allowed_fields: &'static [&'static str]) -> Self {
        let (page, items_per_page) = validate_pagination(
            parse_number(query.page.as_deref()),
            parse_number(query.itemsperpage.as_deref()),
        );
        let (sort_field, order) = validate_sort(
            query.sort.as_deref(),
            query.order.as_deref(),
            allowed_fields,
            DEFAULT_SORT_FIELD,
        );
        let search = query
            .search
            .as_deref()
            .map(sanitize_search)
            .filter(|s| !s.is_empty());

        Self {
            page,
            items_per_page,
            sort_field,
            order,
            search,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.items_per_page)
    }

    pub fn limit(&self) -> i64 {
        self.items_per_page
    }
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            sort_field: DEFAULT_SORT_FIELD,
            order: SortOrder::Desc,
            search: None,
        }
    }
}

fn parse_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse().ok())
}

/// Clamps the page to at least 1 and resets out-of-range page sizes to 10.
pub fn validate_pagination(page: Option<i64>, items_per_page: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(DEFAULT_PAGE).max(1);
    let items_per_page = match items_per_page.unwrap_or(DEFAULT_ITEMS_PER_PAGE) {
        n if (1..=MAX_ITEMS_PER_PAGE).contains(&n) => n,
        _ => DEFAULT_ITEMS_PER_PAGE,
    };
    (page, items_per_page)
}

pub fn validate_sort(
    sort: Option<&str>,
    order: Option<&str>,
    allowed_fields: &'static [&'static str],
    default_field: &'static str,
) -> (&'static str, SortOrder) {
    let requested = sort.map(|s| s.trim().to_lowercase()).unwrap_or_default();
    let field = allowed_fields
        .iter()
        .copied()
        .find(|candidate| *candidate == requested)
        .unwrap_or(default_field);

    let order = match order.map(|o| o.trim().to_lowercase()).as_deref() {
        Some("asc") => SortOrder::Asc,
        _ => SortOrder::Desc,
    };

    (field, order)
}

/// Strips quotes, semicolons and `--` from free-text search input.
///
/// Queries are still bound as parameters; this only keeps obviously hostile
/// input out of the logs and the LIKE pattern.
pub fn sanitize_search(input: &str) -> String {
    let cleaned = input
        .replace(['\'', '"', ';'], "")
        .replace("--", "");
    cleaned.trim().chars().take(MAX_SEARCH_CHARS).collect()
}

/// Substring pattern for `ILIKE ... ESCAPE '\'` that matches `search` literally.
pub fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub fn validate_file_size(size: u64, max_size: u64) -> AppResult<()> {
    if size == 0 {
        return Err(AppError::invalid_file("file size must be greater than 0"));
    }
    if size > max_size {
        return Err(AppError::FileTooLarge {
            size,
            limit: max_size,
        });
    }
    Ok(())
}

pub fn validate_file_extension(filename: &str) -> AppResult<()> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    match extension {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        Some(ext) => Err(AppError::invalid_file(format!(
            "file extension .{} is not allowed",
            ext
        ))),
        None => Err(AppError::invalid_file("file has no extension")),
    }
}

/// Returns the trimmed title, or an error if it is empty or too long.
pub fn validate_title(title: &str) -> AppResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::validation("title cannot be empty"));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(AppError::validation(format!(
            "title cannot exceed {} characters",
            MAX_TITLE_CHARS
        )));
    }
    Ok(title.to_string())
}

/// Default title for an upload: the client filename without its extension.
/// Cut to [`MAX_TITLE_CHARS`].
pub fn title_from_filename(filename: &str) -> String {
    let path = Path::new(filename);
    let title = match path.file_stem().and_then(|stem| stem.to_str()) {
        Some(stem) if !stem.trim().is_empty() => stem,
        _ => filename,
    };
    title.chars().take(MAX_TITLE_CHARS).collect()
}

/// Drops any directory components a client may have sent.
pub fn client_file_name(raw: &str) -> String {
    let normalized = raw.replace('\\', "/");
    normalized
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

pub fn generate_stored_filename() -> String {
    format!("{}.pdf", Uuid::new_v4())
}
