//! Handlers for `/subscriptions` (caller) and `/admin/subscriptions`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use flixhub_core::pagination::PageWindow;
use flixhub_core::types::DbId;
use flixhub_db::models::subscription::SubscriptionDetails;

use crate::error::AppResult;
use crate::mediator;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::SubscriptionListParams;
use crate::response::Page;
use crate::state::AppState;
use crate::usecases::subscriptions::{
    CancelSubscriptionRequest, CurrentSubscriptionRequest, DeleteSubscriptionRequest,
    GetSubscriptionRequest, ListSubscriptionsRequest, MySubscriptionsRequest, SubscribeRequest,
};

/// POST /api/v1/subscriptions
pub async fn subscribe(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<SubscribeRequest>,
) -> AppResult<(StatusCode, Json<SubscriptionDetails>)> {
    let request = SubscribeRequest {
        user_id: auth.user_id,
        ..input
    };
    let subscription = mediator::send(&state, request).await?;
    Ok((StatusCode::CREATED, Json(subscription)))
}

/// GET /api/v1/subscriptions/me
pub async fn my_subscriptions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<SubscriptionDetails>>> {
    let request = MySubscriptionsRequest {
        user_id: auth.user_id,
    };
    Ok(Json(mediator::send(&state, request).await?))
}

/// GET /api/v1/subscriptions/me/current
pub async fn current_subscription(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<SubscriptionDetails>> {
    let request = CurrentSubscriptionRequest {
        user_id: auth.user_id,
    };
    Ok(Json(mediator::send(&state, request).await?))
}

/// POST /api/v1/subscriptions/{id}/cancel
pub async fn cancel_subscription(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<SubscriptionDetails>> {
    let request = CancelSubscriptionRequest { id, caller: auth };
    Ok(Json(mediator::send(&state, request).await?))
}

/// GET /api/v1/admin/subscriptions
pub async fn list_subscriptions(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<SubscriptionListParams>,
) -> AppResult<Json<Page<SubscriptionDetails>>> {
    let request = ListSubscriptionsRequest {
        user_id: params.user_id,
        active_only: params.active_only,
        window: PageWindow::new(params.limit, params.offset),
    };
    Ok(Json(mediator::send(&state, request).await?))
}

/// GET /api/v1/admin/subscriptions/{id}
pub async fn get_subscription(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<SubscriptionDetails>> {
    Ok(Json(mediator::send(&state, GetSubscriptionRequest { id }).await?))
}

/// DELETE /api/v1/admin/subscriptions/{id}
pub async fn delete_subscription(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    mediator::send(&state, DeleteSubscriptionRequest { id }).await?;
    Ok(StatusCode::NO_CONTENT)
}
