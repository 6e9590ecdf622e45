use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;

use crate::{
    adapters::http::{app_state::AppState, auth::current_user},
    app_error::AppResult,
    domain::entities::subscription::Subscription,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/subscription-status", get(subscription_status))
}

#[derive(Serialize)]
struct SubscriptionStatusResponse {
    subscription: Option<Subscription>,
}

/// GET /api/users/subscription-status
async fn subscription_status(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let user = current_user(&headers, &app_state)?;

    let subscription = app_state
        .subscription_use_cases
        .get_status(user.user_id)
        .await?;

    Ok(Json(SubscriptionStatusResponse { subscription }))
}
