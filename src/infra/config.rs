use std::net::SocketAddr;

use axum::http::HeaderValue;
use env_helpers::{get_env, get_env_default};
use secrecy::SecretString;
use url::Url;

use crate::domain::entities::payment_mode::PaymentMode;

pub struct AppConfig {
    pub jwt_secret: SecretString,
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub cors_origin: HeaderValue,
    /// Where checkout back/return URLs point (e.g., "https://fichajes.example")
    pub frontend_url: Url,
    /// Public base URL of this API, used for provider notification URLs
    pub backend_url: Url,
    pub mercadopago: MercadoPagoConfig,
    pub paypal: PayPalConfig,
    /// ISO code of the local price column (e.g., "ARS")
    pub local_currency: String,
    pub featured_offer_price_local_cents: i64,
    pub featured_offer_price_usd_cents: i64,
}

/// Credentials and endpoints for the preference/webhook provider.
#[derive(Clone)]
pub struct MercadoPagoConfig {
    pub access_token: SecretString,
    /// When set, webhook `x-signature` headers are verified against it
    pub webhook_secret: Option<SecretString>,
    pub api_base_url: Url,
    pub notification_url: String,
}

/// Credentials and endpoints for the order/capture provider.
#[derive(Clone)]
pub struct PayPalConfig {
    pub client_id: String,
    pub client_secret: SecretString,
    pub mode: PaymentMode,
}

impl PayPalConfig {
    pub fn api_base_url(&self) -> &'static str {
        match self.mode {
            PaymentMode::Live => "https://api-m.paypal.com",
            PaymentMode::Sandbox => "https://api-m.sandbox.paypal.com",
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret: SecretString = SecretString::new(get_env::<String>("JWT_SECRET").into());

        let bind_addr: SocketAddr = get_env_default("BIND_ADDR", "127.0.0.1:3001".parse().unwrap());
        let database_url: String = get_env("DATABASE_URL");
        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:5173"))
                .parse()
                .expect("CORS_ORIGIN must be a valid header value");
        let frontend_url: Url = get_env("FRONTEND_URL");
        let backend_url: Url = get_env("BACKEND_URL");
        let local_currency: String = get_env_default("LOCAL_CURRENCY", "ARS".to_string());

        let mercadopago = MercadoPagoConfig {
            access_token: SecretString::new(get_env::<String>("MERCADOPAGO_ACCESS_TOKEN").into()),
            webhook_secret: std::env::var("MERCADOPAGO_WEBHOOK_SECRET")
                .ok()
                .filter(|s| !s.is_empty())
                .map(|s| SecretString::new(s.into())),
            api_base_url: get_env_default(
                "MERCADOPAGO_API_URL",
                "https://api.mercadopago.com".parse().unwrap(),
            ),
            notification_url: format!(
                "{}/api/payments/webhook-mp",
                backend_url.as_str().trim_end_matches('/')
            ),
        };

        let paypal_mode: PaymentMode = get_env_default("PAYPAL_MODE", "sandbox".to_string())
            .parse()
            .expect("PAYPAL_MODE must be 'sandbox' or 'live'");
        let paypal = PayPalConfig {
            client_id: get_env("PAYPAL_CLIENT_ID"),
            client_secret: SecretString::new(get_env::<String>("PAYPAL_CLIENT_SECRET").into()),
            mode: paypal_mode,
        };

        let featured_offer_price_local_cents: i64 = non_negative_cents(get_env_default(
            "FEATURED_OFFER_PRICE_LOCAL_CENTS",
            100_000,
        ))
        .expect("FEATURED_OFFER_PRICE_LOCAL_CENTS must not be negative");
        let featured_offer_price_usd_cents: i64 =
            non_negative_cents(get_env_default("FEATURED_OFFER_PRICE_USD_CENTS", 1_000))
                .expect("FEATURED_OFFER_PRICE_USD_CENTS must not be negative");

        Self {
            jwt_secret,
            bind_addr,
            database_url,
            cors_origin,
            frontend_url,
            backend_url,
            mercadopago,
            paypal,
            local_currency,
            featured_offer_price_local_cents,
            featured_offer_price_usd_cents,
        }
    }
}

fn non_negative_cents(cents: i64) -> Option<i64> {
    (cents >= 0).then_some(cents)
}
