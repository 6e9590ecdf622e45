//! Checkout, capture and Mercado Pago notification endpoints.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    adapters::http::{app_state::AppState, auth::current_user},
    app_error::{AppError, AppResult},
    application::{
        use_cases::{checkout::CheckoutInput, reconciliation::ReconciliationOutcome},
        validators::is_valid_provider_id,
    },
    infra::mercadopago_client::MercadoPagoClient,
};

const PAYMENT_TOPIC: &str = "payment";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-preference-mp", post(create_preference_mp))
        .route("/webhook-mp", post(webhook_mp))
        .route("/create-paypal-order", post(create_paypal_order))
        .route("/capture-paypal-order", post(capture_paypal_order))
}

// ============================================================================
// Checkout
// ============================================================================

#[derive(Serialize)]
struct PreferenceResponse {
    init_point: String,
    preference_id: String,
}

/// POST /api/payments/create-preference-mp
async fn create_preference_mp(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CheckoutInput>,
) -> AppResult<impl IntoResponse> {
    let user = current_user(&headers, &app_state)?;

    let checkout = app_state
        .checkout_use_cases
        .start_checkout(app_state.mercadopago.as_ref(), user.user_id, &payload)
        .await?;

    Ok(Json(PreferenceResponse {
        init_point: checkout.redirect_url,
        preference_id: checkout.session_id,
    }))
}

#[derive(Serialize)]
struct PayPalOrderResponse {
    order_id: String,
    approval_url: String,
}

/// POST /api/payments/create-paypal-order
async fn create_paypal_order(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CheckoutInput>,
) -> AppResult<impl IntoResponse> {
    let user = current_user(&headers, &app_state)?;

    let checkout = app_state
        .checkout_use_cases
        .start_checkout(app_state.paypal.as_ref(), user.user_id, &payload)
        .await?;

    Ok(Json(PayPalOrderResponse {
        order_id: checkout.session_id,
        approval_url: checkout.redirect_url,
    }))
}

#[derive(Deserialize)]
struct CapturePayload {
    #[serde(rename = "orderID", alias = "order_id")]
    order_id: String,
}

#[derive(Serialize)]
struct CaptureResponse {
    success: bool,
    outcome: ReconciliationOutcome,
}

/// POST /api/payments/capture-paypal-order
async fn capture_paypal_order(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CapturePayload>,
) -> AppResult<impl IntoResponse> {
    let user = current_user(&headers, &app_state)?;

    let order_id = payload.order_id.trim();
    if order_id.is_empty() {
        return Err(AppError::InvalidInput("orderID is required".into()));
    }
    if !is_valid_provider_id(order_id) {
        tracing::warn!(user_id = user.user_id, order_id, "Rejected malformed PayPal order id");
        return Err(AppError::InvalidInput("orderID is malformed".into()));
    }

    let outcome = app_state
        .reconciliation_use_cases
        .capture_order(order_id, user.user_id)
        .await?;

    Ok(Json(CaptureResponse {
        success: true,
        outcome,
    }))
}

// ============================================================================
// Webhook
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct WebhookQuery {
    topic: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(rename = "data.id")]
    data_id: Option<String>,
    id: Option<String>,
}

/// Notification id, as a string whether it arrived as a number or not.
fn body_data_id(body: &Value) -> Option<String> {
    match &body["data"]["id"] {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn notification_topic(query: &WebhookQuery, body: &Value) -> Option<String> {
    query
        .topic
        .clone()
        .or_else(|| query.kind.clone())
        .or_else(|| body["type"].as_str().map(str::to_owned))
        .or_else(|| body["topic"].as_str().map(str::to_owned))
}

/// Returns 500 so Mercado Pago redelivers the notification.
fn webhook_retryable_error(error: &AppError, payment_id: &str) -> StatusCode {
    tracing::error!(
        error = %error,
        payment_id,
        retryable = true,
        "Webhook processing failed, returning 500 for redelivery"
    );
    StatusCode::INTERNAL_SERVER_ERROR
}

fn acknowledged(outcome: Option<&ReconciliationOutcome>) -> Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "received": true, "outcome": outcome })),
    )
        .into_response()
}

/// POST /api/payments/webhook-mp
///
/// Everything that can never become actionable is acknowledged with 200.
/// Only retryable failures answer 500.
async fn webhook_mp(
    State(app_state): State<AppState>,
    Query(query): Query<WebhookQuery>,
    headers: HeaderMap,
    body: String,
) -> AppResult<Response> {
    // Empty or non-JSON bodies still carry their ids in the query string
    let payload: Value = serde_json::from_str(&body).unwrap_or(Value::Null);

    let topic = notification_topic(&query, &payload);
    if topic.as_deref() != Some(PAYMENT_TOPIC) {
        tracing::debug!(topic = ?topic, "Ignoring non-payment notification");
        return Ok(acknowledged(None));
    }

    let Some(payment_id) = body_data_id(&payload)
        .or(query.data_id)
        .or(query.id)
        .filter(|id| !id.trim().is_empty())
    else {
        tracing::warn!("Payment notification without an id");
        return Ok(acknowledged(None));
    };

    // Never becomes a valid payment id, so there is nothing to redeliver
    if !is_valid_provider_id(&payment_id) {
        tracing::warn!(payment_id = %payment_id, "Ignoring notification with malformed payment id");
        return Ok(acknowledged(None));
    }

    if let Some(secret) = &app_state.config.mercadopago.webhook_secret {
        let signature = headers
            .get("x-signature")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::InvalidInput("Missing x-signature header".into()))?;
        let request_id = headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        MercadoPagoClient::verify_webhook_signature(
            &payment_id,
            request_id,
            signature,
            secret.expose_secret(),
        )
        .inspect_err(|_| {
            tracing::warn!(payment_id = %payment_id, "Rejected webhook with bad signature");
        })?;
    }

    tracing::info!(payment_id = %payment_id, "Payment notification received");

    match app_state
        .reconciliation_use_cases
        .handle_payment_notification(&payment_id)
        .await
    {
        Ok(outcome) => Ok(acknowledged(Some(&outcome))),
        Err(e) if e.is_retryable() => {
            Ok(webhook_retryable_error(&e, &payment_id).into_response())
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                payment_id = %payment_id,
                retryable = false,
                "Webhook processing failed, acknowledging"
            );
            Ok(acknowledged(None))
        }
    }
}
