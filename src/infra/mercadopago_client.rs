use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    app_error::{AppError, AppResult},
    application::validators::is_valid_provider_id,
};

#[derive(Clone)]
pub struct MercadoPagoClient {
    client: Client,
    access_token: SecretString,
    base_url: String,
}

impl MercadoPagoClient {
    pub fn new(client: Client, access_token: SecretString, base_url: &str) -> Self {
        Self {
            client,
            access_token,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    // ========================================================================
    // Preferences
    // ========================================================================

    pub async fn create_preference(
        &self,
        preference: &MpPreferenceRequest,
    ) -> AppResult<MpPreference> {
        let response = self
            .client
            .post(self.endpoint(&["checkout", "preferences"])?)
            .bearer_auth(self.access_token.expose_secret())
            .json(preference)
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("Mercado Pago request failed: {}", e)))?;

        self.handle_response(response).await
    }

    // ========================================================================
    // Payments
    // ========================================================================

    /// `None` when Mercado Pago does not know the payment
    pub async fn get_payment(&self, payment_id: &str) -> AppResult<Option<MpPayment>> {
        if !is_valid_provider_id(payment_id) {
            return Err(AppError::InvalidInput(format!(
                "Invalid payment id: {:?}",
                payment_id
            )));
        }

        let response = self
            .client
            .get(self.endpoint(&["v1", "payments", payment_id])?)
            .bearer_auth(self.access_token.expose_secret())
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("Mercado Pago request failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        self.handle_response(response).await.map(Some)
    }

    // ========================================================================
    // Webhooks
    // ========================================================================

    /// Verify the `x-signature` header of a webhook notification.
    ///
    /// The header looks like `ts=1704908010,v1=<hex>`; the signed manifest is
    /// `id:{data_id};request-id:{request_id};ts:{ts};`.
    pub fn verify_webhook_signature(
        data_id: &str,
        request_id: &str,
        signature_header: &str,
        webhook_secret: &str,
    ) -> AppResult<()> {
        use hmac::{Hmac, Mac};
        use sha2::Sha256;

        let mut timestamp: Option<&str> = None;
        let mut signature: Option<&str> = None;

        for part in signature_header.split(',') {
            let Some((key, value)) = part.trim().split_once('=') else {
                continue;
            };
            match key {
                "ts" => timestamp = Some(value),
                "v1" => signature = Some(value),
                _ => {}
            }
        }

        let timestamp = timestamp
            .ok_or_else(|| AppError::InvalidInput("Missing timestamp in signature".into()))?;
        let signature =
            signature.ok_or_else(|| AppError::InvalidInput("Missing signature".into()))?;

        // Alphanumeric ids are signed in lowercase
        let manifest = format!(
            "id:{};request-id:{};ts:{};",
            data_id.to_lowercase(),
            request_id,
            timestamp
        );
        let mut mac = Hmac::<Sha256>::new_from_slice(webhook_secret.as_bytes())
            .map_err(|_| AppError::Internal("HMAC error".into()))?;
        mac.update(manifest.as_bytes());
        let expected = hex::encode(mac.finalize().into_bytes());

        if constant_time_compare(signature, &expected) {
            Ok(())
        } else {
            Err(AppError::InvalidInput("Invalid signature".into()))
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// API url with each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| AppError::Internal(format!("Invalid Mercado Pago base url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("Mercado Pago base url cannot carry a path".into()))?
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
            tracing::error!(status = %status, body = %body, "Mercado Pago API error");

            if let Ok(error) = serde_json::from_str::<MpErrorResponse>(&body) {
                return Err(AppError::Provider(format!(
                    "Mercado Pago error: {}",
                    error.message.or(error.error).unwrap_or_default()
                )));
            }

            return Err(AppError::Provider(format!(
                "Mercado Pago API error: {}",
                status
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(body = %body, error = %e, "Failed to parse Mercado Pago response");
            AppError::Provider(format!("Failed to parse Mercado Pago response: {}", e))
        })
    }
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

// ============================================================================
// Mercado Pago Types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct MpPreferenceRequest {
    pub items: Vec<MpItem>,
    pub external_reference: String,
    pub back_urls: MpBackUrls,
    pub auto_return: String,
    pub notification_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MpItem {
    pub title: String,
    pub description: String,
    pub quantity: u32,
    pub currency_id: String,
    /// Major units, e.g. 1000.5
    pub unit_price: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MpBackUrls {
    pub success: String,
    pub failure: String,
    pub pending: String,
}

#[derive(Debug, Deserialize)]
pub struct MpPreference {
    pub id: String,
    pub init_point: String,
    pub sandbox_init_point: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MpPayment {
    pub id: i64,
    pub status: String,
    pub description: Option<String>,
    pub external_reference: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MpErrorResponse {
    message: Option<String>,
    error: Option<String>,
}
