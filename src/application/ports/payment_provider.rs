use async_trait::async_trait;
use serde::Serialize;

use crate::{
    app_error::AppResult,
    domain::entities::{
        payment_intent::PaymentIntent, payment_mode::PaymentMode,
        payment_provider::PaymentProvider,
    },
};

// ============================================================================
// Port Types - Provider-agnostic domain types
// ============================================================================

/// Which price column a provider charges in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingCurrency {
    /// `price_usd_cents`, always "USD"
    Usd,
    /// `price_local_cents`, in the configured local currency
    Local,
}

/// An amount in minor units with its ISO currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Money {
    pub amount_cents: i64,
    pub currency: String,
}

impl Money {
    pub fn new(amount_cents: i64, currency: impl Into<String>) -> Self {
        Self {
            amount_cents,
            currency: currency.into(),
        }
    }

    /// Amount in major units, e.g. 1234 -> 12.34
    pub fn as_major_units(&self) -> f64 {
        self.amount_cents as f64 / 100.0
    }

    /// Two-decimal string, e.g. 1234 -> "12.34"
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        let abs = self.amount_cents.unsigned_abs();
        format!("{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// Where the provider sends the buyer after checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutUrls {
    pub success_url: String,
    pub failure_url: String,
    pub pending_url: String,
}

/// Everything a provider needs to open a checkout
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub intent: PaymentIntent,
    pub title: String,
    pub description: String,
    pub amount: Money,
    pub urls: CheckoutUrls,
}

impl CheckoutRequest {
    /// Opaque reference the provider echoes back on completion
    pub fn reference(&self) -> String {
        self.intent.to_reference()
    }
}

/// Result of creating a checkout session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutResult {
    /// URL to redirect the buyer to
    pub redirect_url: String,
    /// Provider session id (preference id or order id)
    pub session_id: String,
}

/// A payment as reported by a preference/webhook style provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentInfo {
    pub id: String,
    pub status: String,
    pub description: Option<String>,
    pub external_reference: Option<String>,
}

impl PaymentInfo {
    pub fn is_approved(&self) -> bool {
        self.status == "approved"
    }
}

/// Result of capturing an approved order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureResult {
    pub order_id: String,
    pub status: String,
    pub custom_id: Option<String>,
    pub provider_payment_id: String,
}

impl CaptureResult {
    pub fn is_completed(&self) -> bool {
        self.status == "COMPLETED"
    }
}

// ============================================================================
// Payment Provider Ports
// ============================================================================

/// Opening a checkout with an external processor.
#[async_trait]
pub trait PaymentProviderPort: Send + Sync {
    fn provider(&self) -> PaymentProvider;

    fn mode(&self) -> PaymentMode;

    /// Price column this provider charges in
    fn pricing_currency(&self) -> PricingCurrency;

    async fn create_checkout(&self, request: &CheckoutRequest) -> AppResult<CheckoutResult>;
}

/// Re-fetching a payment announced by a webhook.
#[async_trait]
pub trait PaymentLookupPort: Send + Sync {
    /// `None` when the provider does not know the payment
    async fn get_payment(&self, payment_id: &str) -> AppResult<Option<PaymentInfo>>;
}

/// Capturing an order the buyer approved client-side.
#[async_trait]
pub trait OrderCapturePort: Send + Sync {
    async fn capture_order(&self, order_id: &str) -> AppResult<CaptureResult>;
}
