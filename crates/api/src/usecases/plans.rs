//! Subscription plans.

use async_trait::async_trait;
use flixhub_core::catalog::{validate_currency, validate_video_quality};
use flixhub_core::error::CoreError;
use flixhub_core::pagination::PageWindow;
use flixhub_core::types::DbId;
use flixhub_core::validation::{validate_not_blank, FieldErrors};
use flixhub_db::models::plan::{CreatePlan, SubscriptionPlan, UpdatePlan};
use flixhub_db::repositories::PlanRepo;
use serde::Deserialize;
use validator::Validate;

use super::not_found;
use crate::error::{AppError, AppResult};
use crate::mediator::Request;
use crate::response::Page;
use crate::state::AppState;

const NAME_TAKEN: &str = "A plan with this name already exists";

#[derive(Debug, Validate)]
pub struct ListPlansRequest {
    pub include_inactive: bool,
    pub window: PageWindow,
}

#[async_trait]
impl Request for ListPlansRequest {
    type Response = Page<SubscriptionPlan>;

    async fn handle(self, state: &AppState) -> AppResult<Page<SubscriptionPlan>> {
        let items = PlanRepo::list(
            &state.pool,
            self.include_inactive,
            self.window.limit,
            self.window.offset,
        )
        .await?;
        let total = PlanRepo::count(&state.pool, self.include_inactive).await?;
        Ok(Page::new(items, total, self.window))
    }
}

#[derive(Debug, Validate)]
pub struct GetPlanRequest {
    pub id: DbId,
}

#[async_trait]
impl Request for GetPlanRequest {
    type Response = SubscriptionPlan;

    async fn handle(self, state: &AppState) -> AppResult<SubscriptionPlan> {
        PlanRepo::find_by_id(&state.pool, self.id)
            .await?
            .ok_or_else(|| not_found("SubscriptionPlan", self.id))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlanRequest {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 100, message = "Must be at most 100 characters long")
    )]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price_cents: i64,
    #[validate(custom(function = "validate_currency"))]
    pub currency: Option<String>,
    #[validate(custom(function = "validate_video_quality"))]
    pub video_quality: String,
    #[validate(range(min = 1, max = 10))]
    pub max_devices: i32,
    #[validate(range(min = 1, max = 366))]
    pub duration_days: Option<i32>,
    pub is_active: Option<bool>,
}

#[async_trait]
impl Request for CreatePlanRequest {
    type Response = SubscriptionPlan;

    async fn validate_with_store(&self, state: &AppState) -> AppResult<FieldErrors> {
        let mut errors = FieldErrors::new();
        if PlanRepo::name_taken(&state.pool, &self.name, None).await? {
            errors.add("name", NAME_TAKEN);
        }
        Ok(errors)
    }

    async fn handle(self, state: &AppState) -> AppResult<SubscriptionPlan> {
        let plan = PlanRepo::create(
            &state.pool,
            &CreatePlan {
                name: self.name.trim().to_string(),
                description: self.description,
                price_cents: self.price_cents,
                currency: self.currency,
                video_quality: self.video_quality,
                max_devices: self.max_devices,
                duration_days: self.duration_days,
                is_active: self.is_active,
            },
        )
        .await?;
        tracing::info!(plan_id = plan.id, name = %plan.name, "Plan created");
        Ok(plan)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePlanRequest {
    #[serde(skip)]
    pub id: DbId,
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 100, message = "Must be at most 100 characters long")
    )]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price_cents: Option<i64>,
    #[validate(custom(function = "validate_currency"))]
    pub currency: Option<String>,
    #[validate(custom(function = "validate_video_quality"))]
    pub video_quality: Option<String>,
    #[validate(range(min = 1, max = 10))]
    pub max_devices: Option<i32>,
    #[validate(range(min = 1, max = 366))]
    pub duration_days: Option<i32>,
    pub is_active: Option<bool>,
}

#[async_trait]
impl Request for UpdatePlanRequest {
    type Response = SubscriptionPlan;

    async fn validate_with_store(&self, state: &AppState) -> AppResult<FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Some(name) = &self.name {
            if PlanRepo::name_taken(&state.pool, name, Some(self.id)).await? {
                errors.add("name", NAME_TAKEN);
            }
        }
        Ok(errors)
    }

    async fn handle(self, state: &AppState) -> AppResult<SubscriptionPlan> {
        let input = UpdatePlan {
            name: self.name.map(|n| n.trim().to_string()),
            description: self.description,
            price_cents: self.price_cents,
            currency: self.currency,
            video_quality: self.video_quality,
            max_devices: self.max_devices,
            duration_days: self.duration_days,
            is_active: self.is_active,
        };
        PlanRepo::update(&state.pool, self.id, &input)
            .await?
            .ok_or_else(|| not_found("SubscriptionPlan", self.id))
    }
}

/// Remove a plan that no subscription has ever used.
#[derive(Debug, Validate)]
pub struct DeletePlanRequest {
    pub id: DbId,
}

#[async_trait]
impl Request for DeletePlanRequest {
    type Response = ();

    async fn handle(self, state: &AppState) -> AppResult<()> {
        if PlanRepo::find_by_id(&state.pool, self.id).await?.is_none() {
            return Err(not_found("SubscriptionPlan", self.id));
        }
        if PlanRepo::has_subscriptions(&state.pool, self.id).await? {
            return Err(AppError::Core(CoreError::Conflict(
                "Plan has subscriptions; deactivate it instead".into(),
            )));
        }
        if !PlanRepo::delete(&state.pool, self.id).await? {
            return Err(not_found("SubscriptionPlan", self.id));
        }
        tracing::info!(plan_id = self.id, "Plan deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn basic() -> CreatePlanRequest {
        CreatePlanRequest {
            name: "Premium".into(),
            description: None,
            price_cents: 1999,
            currency: Some("USD".into()),
            video_quality: "ultra_hd".into(),
            max_devices: 4,
            duration_days: Some(30),
            is_active: None,
        }
    }

    #[test]
    fn valid_plan_passes() {
        assert_matches!(basic().validate_fields(), Ok(()));
    }

    #[test]
    fn plan_bounds_are_enforced() {
        let request = CreatePlanRequest {
            name: "  ".into(),
            price_cents: -1,
            currency: Some("usd".into()),
            video_quality: "8k".into(),
            max_devices: 11,
            duration_days: Some(0),
            ..basic()
        };
        let errors = request.validate_fields().unwrap_err();
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec![
                "currency",
                "duration_days",
                "max_devices",
                "name",
                "price_cents",
                "video_quality"
            ]
        );
        assert_eq!(
            errors.get("price_cents"),
            Some(&["Price cannot be negative".to_string()][..])
        );
    }
}
