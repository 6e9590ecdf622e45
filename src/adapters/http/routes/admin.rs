//! Back-office endpoints. Every handler requires an admin token.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde::Serialize;

use crate::{
    adapters::http::{app_state::AppState, auth::current_admin},
    app_error::AppResult,
    application::use_cases::{
        plan_pricing::{PlanPriceProfile, UpdatePlanPricesInput},
        subscription::GrantSubscriptionInput,
    },
    domain::entities::subscription::Subscription,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/{user_id}/grant-subscription", post(grant_subscription))
        .route("/subscription-plans", get(list_subscription_plans))
        .route("/subscription-plans/{plan_id}", put(update_subscription_plan))
}

#[derive(Serialize)]
struct GrantResponse {
    message: String,
    subscription: Subscription,
}

/// POST /api/admin/users/{user_id}/grant-subscription
async fn grant_subscription(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<i64>,
    Json(payload): Json<GrantSubscriptionInput>,
) -> AppResult<impl IntoResponse> {
    let admin = current_admin(&headers, &app_state)?;

    let subscription = app_state
        .subscription_use_cases
        .grant(user_id, &payload)
        .await?;

    tracing::info!(
        admin_id = admin.user_id,
        user_id,
        plan = %subscription.plan,
        "Admin granted subscription"
    );

    Ok(Json(GrantResponse {
        message: format!(
            "Subscription {} granted to user {} until {}",
            subscription.plan,
            user_id,
            subscription.period_end.format("%Y-%m-%d")
        ),
        subscription,
    }))
}

#[derive(Serialize)]
struct PlansResponse {
    plans: Vec<PlanPriceProfile>,
}

/// GET /api/admin/subscription-plans
async fn list_subscription_plans(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    current_admin(&headers, &app_state)?;

    let plans = app_state.plan_pricing_use_cases.list_plans().await?;

    Ok(Json(PlansResponse { plans }))
}

/// PUT /api/admin/subscription-plans/{plan_id}
async fn update_subscription_plan(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Path(plan_id): Path<i64>,
    Json(payload): Json<UpdatePlanPricesInput>,
) -> AppResult<impl IntoResponse> {
    let admin = current_admin(&headers, &app_state)?;

    let plan = app_state
        .plan_pricing_use_cases
        .update_plan_prices(plan_id, &payload)
        .await?;

    tracing::info!(admin_id = admin.user_id, plan_id, "Admin updated plan prices");

    Ok(Json(plan))
}
