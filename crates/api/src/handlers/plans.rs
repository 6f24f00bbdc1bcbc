//! Handlers for `/plans`. Reads are public; writes need the admin role.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use flixhub_core::pagination::PageWindow;
use flixhub_core::types::DbId;
use flixhub_db::models::plan::SubscriptionPlan;

use crate::error::AppResult;
use crate::mediator;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PlanListParams;
use crate::response::Page;
use crate::state::AppState;
use crate::usecases::plans::{
    CreatePlanRequest, DeletePlanRequest, GetPlanRequest, ListPlansRequest, UpdatePlanRequest,
};

/// GET /api/v1/plans
pub async fn list_plans(
    State(state): State<AppState>,
    Query(params): Query<PlanListParams>,
) -> AppResult<Json<Page<SubscriptionPlan>>> {
    let request = ListPlansRequest {
        include_inactive: params.include_inactive,
        window: PageWindow::new(params.limit, params.offset),
    };
    Ok(Json(mediator::send(&state, request).await?))
}

/// GET /api/v1/plans/{id}
pub async fn get_plan(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<SubscriptionPlan>> {
    Ok(Json(mediator::send(&state, GetPlanRequest { id }).await?))
}

/// POST /api/v1/plans
pub async fn create_plan(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreatePlanRequest>,
) -> AppResult<(StatusCode, Json<SubscriptionPlan>)> {
    let plan = mediator::send(&state, input).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

/// PUT /api/v1/plans/{id}
pub async fn update_plan(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePlanRequest>,
) -> AppResult<Json<SubscriptionPlan>> {
    let request = UpdatePlanRequest { id, ..input };
    Ok(Json(mediator::send(&state, request).await?))
}

/// DELETE /api/v1/plans/{id}
pub async fn delete_plan(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    mediator::send(&state, DeletePlanRequest { id }).await?;
    Ok(StatusCode::NO_CONTENT)
}
