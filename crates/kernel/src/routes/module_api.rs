//! Module registry endpoints.
//!
//! - `GET /api/modules` lists every registered module, enabled or not,
//!   one page at a time.
//! - `GET /api/modules/{id}` returns a single descriptor.

use std::cmp::Ordering;

use autotemu_sdk::api::{
    ApiResponse, FieldError, PaginatedData, PaginatedResponse, PaginationMeta, PaginationParams,
    SortOrder,
};
use autotemu_sdk::types::ModuleDescriptor;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Serialize;

use crate::error::{AppError, AppResult, ErrorResponse};
use crate::middleware::RequestId;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

/// Columns the module list can be sorted by.
const SORTABLE: &[&str] = &["id", "name", "order"];

/// One row of the module list.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleSummary {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub enabled: bool,
    /// "item" or "group".
    pub menu_kind: &'static str,
    pub menu_id: String,
    pub order: i32,
}

impl From<&ModuleDescriptor> for ModuleSummary {
    fn from(module: &ModuleDescriptor) -> Self {
        Self {
            id: module.id.clone(),
            name: module.name.clone(),
            description: module.description.clone(),
            version: module.version.clone(),
            owner: module.owner.clone(),
            enabled: module.enabled,
            menu_kind: module.menu.kind(),
            menu_id: module.menu.id().to_string(),
            order: module.menu.order(),
        }
    }
}

/// Validated paging window.
struct Page {
    page: u32,
    page_size: u32,
}

fn validate_params(params: &PaginationParams) -> AppResult<Page> {
    let mut errors = Vec::new();

    let page = params.page.unwrap_or(1);
    if page == 0 {
        errors.push(FieldError::new("page", "must be at least 1").kind("value_error"));
    }

    let page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        errors.push(
            FieldError::new("page_size", format!("must be between 1 and {MAX_PAGE_SIZE}"))
                .kind("value_error"),
        );
    }

    if let Some(sort_by) = &params.sort_by
        && !SORTABLE.contains(&sort_by.as_str())
    {
        errors.push(
            FieldError::new("sort_by", format!("must be one of: {}", SORTABLE.join(", ")))
                .kind("value_error"),
        );
    }

    if errors.is_empty() {
        Ok(Page { page, page_size })
    } else {
        Err(AppError::validation(errors))
    }
}

/// Compare two rows on `sort_by` in the requested direction.
///
/// Ties compare equal in both directions so a stable sort keeps
/// registration order.
fn compare(a: &ModuleSummary, b: &ModuleSummary, sort_by: &str, order: SortOrder) -> Ordering {
    let ordering = match sort_by {
        "id" => a.id.cmp(&b.id),
        "name" => a.name.cmp(&b.name),
        "order" => a.order.cmp(&b.order),
        _ => Ordering::Equal,
    };
    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

/// List module summaries.
///
/// Without `sort_by` rows keep registration order whatever `sort_order` says.
async fn list_modules(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<PaginatedResponse<ModuleSummary>>, ErrorResponse> {
    let fail = |e: AppError| {
        e.exposing_detail(state.expose_error_detail())
            .request_id(request_id.0.clone())
    };

    let Query(params) = query.map_err(|rejection| {
        fail(AppError::validation(vec![
            FieldError::new("query", rejection.body_text()).kind("query_invalid"),
        ]))
    })?;
    let window = validate_params(&params).map_err(fail)?;

    let mut rows: Vec<ModuleSummary> = state.registry().iter().map(ModuleSummary::from).collect();

    if let Some(sort_by) = params.sort_by.as_deref() {
        let order = params.sort_order.unwrap_or_default();
        rows.sort_by(|a, b| compare(a, b, sort_by, order));
    }

    let total = rows.len() as u64;
    let skip = (window.page as usize - 1).saturating_mul(window.page_size as usize);
    let items = rows
        .into_iter()
        .skip(skip)
        .take(window.page_size as usize)
        .collect();

    let data = PaginatedData {
        items,
        pagination: PaginationMeta::new(window.page, window.page_size, total),
    };

    Ok(Json(ApiResponse::ok(data).request_id(request_id.0)))
}

/// Fetch a single module descriptor.
async fn get_module(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ModuleDescriptor>>, ErrorResponse> {
    let Some(module) = state.registry().find_by_id(&id).cloned() else {
        return Err(AppError::not_found(format!("module '{id}'"))
            .exposing_detail(state.expose_error_detail())
            .request_id(request_id.0));
    };

    Ok(Json(ApiResponse::ok(module).request_id(request_id.0)))
}

/// Create the module API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/modules", get(list_modules))
        .route("/api/modules/{id}", get(get_module))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn default_window() {
        let page = validate_params(&PaginationParams::default()).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn invalid_params_report_every_field() {
        let params = PaginationParams {
            page: Some(0),
            page_size: Some(500),
            sort_by: Some("owner".to_string()),
            sort_order: None,
        };

        match validate_params(&params) {
            Err(AppError::Validation { errors, .. }) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["page", "page_size", "sort_by"]);
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected validation failure"),
        }
    }

    fn row(id: &str, order: i32) -> ModuleSummary {
        ModuleSummary {
            id: id.to_string(),
            name: id.to_string(),
            description: None,
            version: None,
            owner: None,
            enabled: true,
            menu_kind: "item",
            menu_id: format!("menu-{id}"),
            order,
        }
    }

    #[test]
    fn descending_sort_keeps_ties_in_registration_order() {
        let mut rows = vec![row("b", 10), row("a", 50), row("c", 10), row("d", 50)];
        rows.sort_by(|x, y| compare(x, y, "order", SortOrder::Desc));

        let ids: Vec<_> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "d", "b", "c"]);
    }

    #[test]
    fn unknown_column_leaves_rows_in_place() {
        let mut rows = vec![row("b", 1), row("a", 2)];
        rows.sort_by(|x, y| compare(x, y, "owner", SortOrder::Desc));

        let ids: Vec<_> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
