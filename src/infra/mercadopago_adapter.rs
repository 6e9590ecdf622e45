use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;

use crate::{
    app_error::AppResult,
    application::ports::payment_provider::{
        CheckoutRequest, CheckoutResult, PaymentInfo, PaymentLookupPort, PaymentProviderPort,
        PricingCurrency,
    },
    domain::entities::{payment_mode::PaymentMode, payment_provider::PaymentProvider},
    infra::{
        config::MercadoPagoConfig,
        mercadopago_client::{MercadoPagoClient, MpBackUrls, MpItem, MpPreferenceRequest},
    },
};

/// Test credentials are issued with this prefix
const TEST_TOKEN_PREFIX: &str = "TEST-";

/// Adapter that wraps MercadoPagoClient to implement the checkout and
/// payment lookup ports.
#[derive(Clone)]
pub struct MercadoPagoPaymentAdapter {
    client: MercadoPagoClient,
    config: MercadoPagoConfig,
    mode: PaymentMode,
}

impl MercadoPagoPaymentAdapter {
    pub fn new(http: Client, config: MercadoPagoConfig) -> Self {
        let mode = if config
            .access_token
            .expose_secret()
            .starts_with(TEST_TOKEN_PREFIX)
        {
            PaymentMode::Sandbox
        } else {
            PaymentMode::Live
        };
        Self {
            client: MercadoPagoClient::new(
                http,
                config.access_token.clone(),
                config.api_base_url.as_str(),
            ),
            config,
            mode,
        }
    }

    fn preference_for(&self, request: &CheckoutRequest) -> MpPreferenceRequest {
        MpPreferenceRequest {
            items: vec![MpItem {
                title: request.title.clone(),
                description: request.description.clone(),
                quantity: 1,
                currency_id: request.amount.currency.clone(),
                unit_price: request.amount.as_major_units(),
            }],
            external_reference: request.reference(),
            back_urls: MpBackUrls {
                success: request.urls.success_url.clone(),
                failure: request.urls.failure_url.clone(),
                pending: request.urls.pending_url.clone(),
            },
            auto_return: "approved".to_string(),
            notification_url: self.config.notification_url.clone(),
        }
    }
}

#[async_trait]
impl PaymentProviderPort for MercadoPagoPaymentAdapter {
    fn provider(&self) -> PaymentProvider {
        PaymentProvider::MercadoPago
    }

    fn mode(&self) -> PaymentMode {
        self.mode
    }

    fn pricing_currency(&self) -> PricingCurrency {
        PricingCurrency::Local
    }

    async fn create_checkout(&self, request: &CheckoutRequest) -> AppResult<CheckoutResult> {
        let preference = self
            .client
            .create_preference(&self.preference_for(request))
            .await?;

        // Sandbox credentials redirect to the sandbox checkout
        let redirect_url = match preference.sandbox_init_point {
            Some(sandbox_url) if !self.mode.is_production() => sandbox_url,
            _ => preference.init_point,
        };

        Ok(CheckoutResult {
            redirect_url,
            session_id: preference.id,
        })
    }
}

#[async_trait]
impl PaymentLookupPort for MercadoPagoPaymentAdapter {
    async fn get_payment(&self, payment_id: &str) -> AppResult<Option<PaymentInfo>> {
        let payment = self.client.get_payment(payment_id).await?;
        Ok(payment.map(|p| PaymentInfo {
            id: p.id.to_string(),
            status: p.status,
            description: p.description,
            external_reference: p.external_reference,
        }))
    }
}
