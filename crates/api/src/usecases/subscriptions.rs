//! User subscriptions: subscribe, history, cancel and admin oversight.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use flixhub_core::error::CoreError;
use flixhub_core::pagination::PageWindow;
use flixhub_core::types::DbId;
use flixhub_core::validation::FieldErrors;
use flixhub_db::models::subscription::{
    CreateSubscription, SubscriptionDetails, SubscriptionFilter,
};
use flixhub_db::repositories::{PlanRepo, SubscriptionRepo};
use serde::Deserialize;
use validator::Validate;

use super::not_found;
use crate::error::{AppError, AppResult};
use crate::mediator::Request;
use crate::middleware::auth::AuthUser;
use crate::response::Page;
use crate::state::AppState;

async fn details(state: &AppState, id: DbId) -> AppResult<SubscriptionDetails> {
    SubscriptionRepo::find_details(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Subscription", id))
}

/// Subscribe the caller to a plan, ending any current subscription.
#[derive(Debug, Deserialize, Validate)]
pub struct SubscribeRequest {
    #[serde(skip)]
    pub user_id: DbId,
    #[validate(range(min = 1, message = "Plan id must be positive"))]
    pub plan_id: DbId,
}

#[async_trait]
impl Request for SubscribeRequest {
    type Response = SubscriptionDetails;

    async fn validate_with_store(&self, state: &AppState) -> AppResult<FieldErrors> {
        let mut errors = FieldErrors::new();
        match PlanRepo::find_by_id(&state.pool, self.plan_id).await? {
            None => errors.add("plan_id", "Plan does not exist"),
            Some(plan) if !plan.is_active => {
                errors.add("plan_id", "Plan is not open for new subscriptions")
            }
            Some(_) => {}
        }
        Ok(errors)
    }

    async fn handle(self, state: &AppState) -> AppResult<SubscriptionDetails> {
        let plan = PlanRepo::find_by_id(&state.pool, self.plan_id)
            .await?
            .ok_or_else(|| FieldErrors::single("plan_id", "Plan does not exist"))?;

        let starts_at = Utc::now();
        let subscription = SubscriptionRepo::start(
            &state.pool,
            &CreateSubscription {
                user_id: self.user_id,
                plan_id: plan.id,
                starts_at,
                ends_at: starts_at + Duration::days(i64::from(plan.duration_days)),
            },
        )
        .await?;

        tracing::info!(
            user_id = self.user_id,
            plan_id = plan.id,
            subscription_id = subscription.id,
            "Subscription started"
        );
        details(state, subscription.id).await
    }
}

/// Subscription history of the caller, newest first.
#[derive(Debug, Validate)]
pub struct MySubscriptionsRequest {
    pub user_id: DbId,
}

#[async_trait]
impl Request for MySubscriptionsRequest {
    type Response = Vec<SubscriptionDetails>;

    async fn handle(self, state: &AppState) -> AppResult<Vec<SubscriptionDetails>> {
        Ok(SubscriptionRepo::list_for_user(&state.pool, self.user_id).await?)
    }
}

/// The caller's active, unexpired subscription.
#[derive(Debug, Validate)]
pub struct CurrentSubscriptionRequest {
    pub user_id: DbId,
}

#[async_trait]
impl Request for CurrentSubscriptionRequest {
    type Response = SubscriptionDetails;

    async fn handle(self, state: &AppState) -> AppResult<SubscriptionDetails> {
        SubscriptionRepo::find_current_for_user(&state.pool, self.user_id)
            .await?
            .ok_or_else(|| not_found("Current subscription for user", self.user_id))
    }
}

/// Cancel a subscription. Owners cancel their own; admins cancel any.
#[derive(Debug, Validate)]
pub struct CancelSubscriptionRequest {
    pub id: DbId,
    pub caller: AuthUser,
}

#[async_trait]
impl Request for CancelSubscriptionRequest {
    type Response = SubscriptionDetails;

    async fn handle(self, state: &AppState) -> AppResult<SubscriptionDetails> {
        let subscription = SubscriptionRepo::find_by_id(&state.pool, self.id)
            .await?
            .ok_or_else(|| not_found("Subscription", self.id))?;

        if subscription.user_id != self.caller.user_id && !self.caller.is_admin() {
            return Err(AppError::Core(CoreError::Forbidden(
                "You can only cancel your own subscriptions".into(),
            )));
        }

        if !subscription.is_active || !SubscriptionRepo::cancel(&state.pool, self.id).await? {
            return Err(AppError::Core(CoreError::Conflict(
                "Subscription is already inactive".into(),
            )));
        }

        tracing::info!(
            subscription_id = self.id,
            cancelled_by = self.caller.user_id,
            "Subscription cancelled"
        );
        details(state, self.id).await
    }
}

#[derive(Debug, Validate)]
pub struct ListSubscriptionsRequest {
    pub user_id: Option<DbId>,
    pub active_only: bool,
    pub window: PageWindow,
}

#[async_trait]
impl Request for ListSubscriptionsRequest {
    type Response = Page<SubscriptionDetails>;

    async fn handle(self, state: &AppState) -> AppResult<Page<SubscriptionDetails>> {
        let filter = SubscriptionFilter {
            user_id: self.user_id,
            active_only: self.active_only,
        };
        let items =
            SubscriptionRepo::list(&state.pool, &filter, self.window.limit, self.window.offset)
                .await?;
        let total = SubscriptionRepo::count(&state.pool, &filter).await?;
        Ok(Page::new(items, total, self.window))
    }
}

#[derive(Debug, Validate)]
pub struct GetSubscriptionRequest {
    pub id: DbId,
}

#[async_trait]
impl Request for GetSubscriptionRequest {
    type Response = SubscriptionDetails;

    async fn handle(self, state: &AppState) -> AppResult<SubscriptionDetails> {
        details(state, self.id).await
    }
}

#[derive(Debug, Validate)]
pub struct DeleteSubscriptionRequest {
    pub id: DbId,
}

#[async_trait]
impl Request for DeleteSubscriptionRequest {
    type Response = ();

    async fn handle(self, state: &AppState) -> AppResult<()> {
        if !SubscriptionRepo::delete(&state.pool, self.id).await? {
            return Err(not_found("Subscription", self.id));
        }
        tracing::info!(subscription_id = self.id, "Subscription deleted");
        Ok(())
    }
}
