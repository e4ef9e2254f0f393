use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Multipart, Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{
    CreatePdfRequest, ListQuery, ListResponse, MessageResponse, NewPdf, NewSummary,
    PdfDetailResponse, PdfResponse, SummarizeRequest, UploadedFile,
};
use crate::services::SummarizeJob;
use crate::state::AppState;
use crate::validation::{self, ListParams, PDF_SORT_FIELDS};

pub async fn list_pdfs_handler(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> AppResult<Json<ListResponse<PdfResponse>>> {
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let params = ListParams::from_query(&query, PDF_SORT_FIELDS);

    debug!(
        page = params.page,
        items_per_page = params.items_per_page,
        sort = params.sort_field,
        order = params.order.as_sql(),
        search = ?params.search,
        "Listing PDFs"
    );

    let page = state.repository().list_pdfs(&params).await?;

    Ok(Json(ListResponse::new(
        page.items,
        params.page,
        params.items_per_page,
        page.total,
    )))
}

pub async fn create_pdf_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreatePdfRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<PdfResponse>)> {
    let Json(request) = payload?;

    let title = validation::validate_title(&request.title)?;
    let filename = request.filename.trim();
    if filename.is_empty() {
        return Err(AppError::validation("filename cannot be empty"));
    }
    let file_size = u64::try_from(request.file_size)
        .map_err(|_| AppError::validation("file_size must be greater than 0"))?;
    validation::validate_file_size(file_size, state.config().max_upload_bytes())?;
    if request.page_count < 0 {
        return Err(AppError::validation("page_count cannot be negative"));
    }

    let record = state
        .repository()
        .create_pdf(NewPdf {
            filename: filename.to_string(),
            title,
            file_size: request.file_size,
            page_count: request.page_count,
        })
        .await?;

    info!(pdf_id = record.id, title = %record.title, "Created PDF record");
    Ok((StatusCode::CREATED, Json(record.into())))
}

pub async fn get_pdf_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<PdfDetailResponse>> {
    let Path(id) = id?;

    let pdf = state
        .repository()
        .get_pdf(id)
        .await?
        .ok_or(AppError::not_found("PDF"))?;
    let summaries = state.repository().summaries_for_pdf(pdf.id).await?;

    Ok(Json(PdfDetailResponse::new(pdf, summaries)))
}

pub async fn delete_pdf_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Path(id) = id?;

    let pdf = state
        .repository()
        .get_pdf(id)
        .await?
        .ok_or(AppError::not_found("PDF"))?;

    let removed_file = state.files().remove(&pdf.filename).await?;
    if !state.repository().delete_pdf(pdf.id).await? {
        return Err(AppError::not_found("PDF"));
    }

    info!(pdf_id = pdf.id, removed_file, "Deleted PDF");
    Ok(Json(MessageResponse::new("PDF deleted successfully")))
}

pub async fn upload_pdf_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<(StatusCode, Json<PdfResponse>)> {
    let mut multipart = multipart
        .map_err(|e| AppError::invalid_file(format!("Expected multipart form data: {}", e.body_text())))?;

    let (file, title) = read_upload_form(&mut multipart).await?;
    let file = file.ok_or(AppError::MissingFile)?;

    // Reject before anything touches disk or the database.
    validation::validate_file_extension(&file.name)?;
    validation::validate_file_size(file.size(), state.config().max_upload_bytes())?;

    let title = match title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => validation::validate_title(title)?,
        None => validation::title_from_filename(&file.name),
    };

    let stored_name = validation::generate_stored_filename();
    state.files().save(&stored_name, &file.content).await?;
    let page_count = state.pdf_processor().page_count(file.content.clone()).await;

    let file_size = i64::try_from(file.size())
        .map_err(|_| AppError::validation("file size out of range"))?;
    let created = state
        .repository()
        .create_pdf(NewPdf {
            filename: stored_name.clone(),
            title,
            file_size,
            page_count,
        })
        .await;

    let record = match created {
        Ok(record) => record,
        Err(e) => {
            error!(error = %e, stored_name = %stored_name, "Failed to create PDF, removing stored file");
            if let Err(cleanup) = state.files().remove(&stored_name).await {
                warn!(error = %cleanup, "Failed to remove orphaned upload");
            }
            return Err(e.into());
        }
    };

    info!(
        pdf_id = record.id,
        original_name = %file.name,
        stored_name = %record.filename,
        file_size = record.file_size,
        page_count = record.page_count,
        "Uploaded PDF"
    );

    Ok((StatusCode::CREATED, Json(record.into())))
}

async fn read_upload_form(
    multipart: &mut Multipart,
) -> AppResult<(Option<UploadedFile>, Option<String>)> {
    let mut file = None;
    let mut title = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "file" => {
                let name = validation::client_file_name(field.file_name().unwrap_or(""));
                let content = field.bytes().await?;
                debug!(file_name = %name, file_size = content.len(), "Read uploaded file");
                file = Some(UploadedFile::new(name, content));
            }
            "title" => {
                title = Some(field.text().await?);
            }
            other => {
                debug!(field = other, "Ignoring unexpected multipart field");
            }
        }
    }

    Ok((file, title))
}

pub async fn summarize_pdf_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<SummarizeRequest>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Path(id) = id?;
    let Json(request) = payload?;
    let start = Instant::now();

    let pdf = state
        .repository()
        .get_pdf(id)
        .await?
        .ok_or(AppError::not_found("PDF"))?;

    let content = state.files().read(&pdf.filename).await?;

    info!(
        pdf_id = pdf.id,
        style = %request.style,
        language = %request.language,
        "Starting summarization"
    );

    let payload = state
        .summarizer()
        .summarize(SummarizeJob {
            file_name: pdf.filename.clone(),
            content,
            style: request.style,
            language: request.language,
        })
        .await?;

    let summary = NewSummary {
        pdf_id: pdf.id,
        style: payload.style_or(request.style),
        content: payload.parsed.summary.main_summary.clone(),
        language: payload.language_or(request.language),
        summary_time: payload.parsed.process_info.processing_time_seconds,
    };

    // The caller gets the service's answer even if we fail to keep a copy.
    match state.repository().create_summary(summary).await {
        Ok(saved) => info!(
            pdf_id = pdf.id,
            summary_id = saved.id,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Summary saved"
        ),
        Err(e) => error!(pdf_id = pdf.id, error = %e, "Failed to save summary"),
    }

    Ok(Json(payload.raw))
}
