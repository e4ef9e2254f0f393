use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::Json,
};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::{ListQuery, ListResponse, MessageResponse, SummaryResponse};
use crate::state::AppState;
use crate::validation::{ListParams, SUMMARY_SORT_FIELDS};

pub async fn list_summaries_handler(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> AppResult<Json<ListResponse<SummaryResponse>>> {
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let params = ListParams::from_query(&query, SUMMARY_SORT_FIELDS);

    debug!(
        page = params.page,
        items_per_page = params.items_per_page,
        sort = params.sort_field,
        order = params.order.as_sql(),
        search = ?params.search,
        "Listing summaries"
    );

    let page = state.repository().list_summaries(&params).await?;

    Ok(Json(ListResponse::new(
        page.items,
        params.page,
        params.items_per_page,
        page.total,
    )))
}

pub async fn get_summary_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<SummaryResponse>> {
    let Path(id) = id?;

    let summary = state
        .repository()
        .get_summary(id)
        .await?
        .ok_or(AppError::not_found("Summary"))?;

    Ok(Json(summary.into()))
}

pub async fn delete_summary_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Path(id) = id?;

    if !state.repository().delete_summary(id).await? {
        return Err(AppError::not_found("Summary"));
    }

    info!(summary_id = id, "Deleted summary");
    Ok(Json(MessageResponse::new("Summary deleted successfully")))
}
