use async_trait::async_trait;
use reqwest::Client;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::payment_provider::{
        CaptureResult, CheckoutRequest, CheckoutResult, OrderCapturePort, PaymentProviderPort,
        PricingCurrency,
    },
    domain::entities::{payment_mode::PaymentMode, payment_provider::PaymentProvider},
    infra::{
        config::PayPalConfig,
        paypal_client::{
            PayPalAmount, PayPalApplicationContext, PayPalClient, PayPalCreateOrder,
            PayPalOrder, PayPalPurchaseUnitRequest,
        },
    },
};

/// Adapter that wraps PayPalClient to implement the checkout and order
/// capture ports.
pub struct PayPalPaymentAdapter {
    client: PayPalClient,
    mode: PaymentMode,
}

impl PayPalPaymentAdapter {
    pub fn new(http: Client, config: &PayPalConfig) -> Self {
        Self {
            client: PayPalClient::new(
                http,
                config.client_id.clone(),
                config.client_secret.clone(),
                config.api_base_url(),
            ),
            mode: config.mode,
        }
    }

    fn order_for(request: &CheckoutRequest) -> PayPalCreateOrder {
        PayPalCreateOrder {
            intent: "CAPTURE".to_string(),
            purchase_units: vec![PayPalPurchaseUnitRequest {
                amount: PayPalAmount {
                    currency_code: request.amount.currency.clone(),
                    value: request.amount.to_decimal_string(),
                },
                description: request.description.clone(),
                custom_id: request.reference(),
            }],
            application_context: PayPalApplicationContext {
                return_url: request.urls.success_url.clone(),
                cancel_url: request.urls.failure_url.clone(),
            },
        }
    }

    fn capture_result(order: PayPalOrder) -> CaptureResult {
        CaptureResult {
            custom_id: order.custom_id().map(str::to_owned),
            provider_payment_id: order.payment_id().to_owned(),
            order_id: order.id,
            status: order.status,
        }
    }
}

#[async_trait]
impl PaymentProviderPort for PayPalPaymentAdapter {
    fn provider(&self) -> PaymentProvider {
        PaymentProvider::PayPal
    }

    fn mode(&self) -> PaymentMode {
        self.mode
    }

    fn pricing_currency(&self) -> PricingCurrency {
        PricingCurrency::Usd
    }

    async fn create_checkout(&self, request: &CheckoutRequest) -> AppResult<CheckoutResult> {
        let order = self.client.create_order(&Self::order_for(request)).await?;

        let redirect_url = order
            .approval_url()
            .ok_or_else(|| AppError::Provider(format!("PayPal order {} has no approval link", order.id)))?
            .to_string();

        Ok(CheckoutResult {
            redirect_url,
            session_id: order.id,
        })
    }
}

#[async_trait]
impl OrderCapturePort for PayPalPaymentAdapter {
    async fn capture_order(&self, order_id: &str) -> AppResult<CaptureResult> {
        let order = self.client.capture_order(order_id).await?;
        Ok(Self::capture_result(order))
    }
}
