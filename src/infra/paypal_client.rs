use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use url::Url;

use crate::{
    app_error::{AppError, AppResult},
    application::validators::is_valid_provider_id,
};

/// Refresh the access token this long before PayPal expires it
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

pub struct PayPalClient {
    client: Client,
    client_id: String,
    client_secret: SecretString,
    base_url: String,
    token: Mutex<Option<CachedToken>>,
}

impl PayPalClient {
    pub fn new(client: Client, client_id: String, client_secret: SecretString, base_url: &str) -> Self {
        Self {
            client,
            client_id,
            client_secret,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: Mutex::new(None),
        }
    }

    // ========================================================================
    // OAuth
    // ========================================================================

    async fn access_token(&self) -> AppResult<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached
            .as_ref()
            .filter(|t| t.expires_at > Instant::now() + TOKEN_REFRESH_MARGIN)
        {
            return Ok(token.access_token.clone());
        }

        let response = self
            .client
            .post(self.endpoint(&["v1", "oauth2", "token"])?)
            .basic_auth(&self.client_id, Some(self.client_secret.expose_secret()))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("PayPal request failed: {}", e)))?;

        let token: PayPalToken = self.handle_response(response).await?;
        tracing::debug!(expires_in = token.expires_in, "Obtained PayPal access token");

        let access_token = token.access_token.clone();
        *cached = Some(CachedToken {
            access_token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        });
        Ok(access_token)
    }

    // ========================================================================
    // Orders
    // ========================================================================

    pub async fn create_order(&self, order: &PayPalCreateOrder) -> AppResult<PayPalOrder> {
        let token = self.access_token().await?;
        let response = self
            .client
            .post(self.endpoint(&["v2", "checkout", "orders"])?)
            .bearer_auth(token)
            .header("Prefer", "return=representation")
            .json(order)
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("PayPal request failed: {}", e)))?;

        self.handle_response(response).await
    }

    pub async fn capture_order(&self, order_id: &str) -> AppResult<PayPalOrder> {
        if !is_valid_provider_id(order_id) {
            return Err(AppError::InvalidInput(format!(
                "Invalid PayPal order id: {:?}",
                order_id
            )));
        }

        let token = self.access_token().await?;
        let response = self
            .client
            .post(self.endpoint(&["v2", "checkout", "orders", order_id, "capture"])?)
            .bearer_auth(token)
            .header("Prefer", "return=representation")
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("PayPal request failed: {}", e)))?;

        self.handle_response(response).await
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// API url with each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| AppError::Internal(format!("Invalid PayPal base url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("PayPal base url cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> AppResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Provider(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            tracing::error!(status = %status, body = %body, "PayPal API error");

            if let Ok(error) = serde_json::from_str::<PayPalErrorResponse>(&body) {
                return Err(AppError::Provider(format!(
                    "PayPal error: {}",
                    error.message.unwrap_or(error.name)
                )));
            }

            return Err(AppError::Provider(format!("PayPal API error: {}", status)));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(body = %body, error = %e, "Failed to parse PayPal response");
            AppError::Provider(format!("Failed to parse PayPal response: {}", e))
        })
    }
}

// ============================================================================
// PayPal Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct PayPalToken {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct PayPalErrorResponse {
    name: String,
    message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PayPalCreateOrder {
    pub intent: String,
    pub purchase_units: Vec<PayPalPurchaseUnitRequest>,
    pub application_context: PayPalApplicationContext,
}

#[derive(Debug, Clone, Serialize)]
pub struct PayPalPurchaseUnitRequest {
    pub amount: PayPalAmount,
    pub description: String,
    pub custom_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayPalAmount {
    pub currency_code: String,
    /// Decimal string, e.g. "12.34"
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PayPalApplicationContext {
    pub return_url: String,
    pub cancel_url: String,
}

#[derive(Debug, Deserialize)]
pub struct PayPalOrder {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub links: Vec<PayPalLink>,
    #[serde(default)]
    pub purchase_units: Vec<PayPalPurchaseUnit>,
}

impl PayPalOrder {
    /// Where the buyer approves the order
    pub fn approval_url(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|l| l.rel == "approve" || l.rel == "payer-action")
            .map(|l| l.href.as_str())
    }

    fn first_capture(&self) -> Option<&PayPalCapture> {
        self.purchase_units
            .iter()
            .filter_map(|u| u.payments.as_ref())
            .flat_map(|p| p.captures.iter())
            .next()
    }

    /// Custom id from the purchase unit, or from its first capture
    pub fn custom_id(&self) -> Option<&str> {
        self.purchase_units
            .iter()
            .find_map(|u| u.custom_id.as_deref())
            .or_else(|| self.first_capture().and_then(|c| c.custom_id.as_deref()))
    }

    /// First capture id, falling back to the order id
    pub fn payment_id(&self) -> &str {
        self.first_capture()
            .map(|c| c.id.as_str())
            .unwrap_or(&self.id)
    }
}

#[derive(Debug, Deserialize)]
pub struct PayPalLink {
    pub href: String,
    pub rel: String,
}

#[derive(Debug, Deserialize)]
pub struct PayPalPurchaseUnit {
    pub custom_id: Option<String>,
    pub payments: Option<PayPalPayments>,
}

#[derive(Debug, Deserialize)]
pub struct PayPalPayments {
    #[serde(default)]
    pub captures: Vec<PayPalCapture>,
}

#[derive(Debug, Deserialize)]
pub struct PayPalCapture {
    pub id: String,
    pub status: String,
    pub custom_id: Option<String>,
}
