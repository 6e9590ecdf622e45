//! Test app state builder for HTTP-level integration testing.
//!
//! `TestAppStateBuilder` wires every use case to in-memory repositories,
//! mock payment providers and a fixed clock.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use url::Url;

use crate::{
    adapters::http::app_state::AppState,
    application::{
        jwt,
        ports::payment_provider::{CaptureResult, PaymentInfo},
        use_cases::{
            checkout::{CheckoutUseCases, FeaturedOfferPricing},
            offers::OfferUseCases,
            plan_pricing::{PlanPriceProfile, PlanPricingUseCases},
            reconciliation::ReconciliationUseCases,
            subscription::SubscriptionUseCases,
        },
    },
    domain::entities::{
        billing_cycle::BillingCycle, offer::OfferSummary, payment_mode::PaymentMode,
        subscription::Subscription,
    },
    infra::config::{AppConfig, MercadoPagoConfig, PayPalConfig},
    test_utils::{
        FixedClock, InMemoryOfferRepo, InMemoryPlanPriceRepo, InMemorySubscriptionRepo,
        MockOrderCapture, MockPaymentLookup, MockPaymentProvider, create_test_plan_price,
        test_datetime,
    },
};

pub const TEST_JWT_SECRET: &str = "test_jwt_secret";
pub const TEST_FRONTEND_URL: &str = "http://localhost:5173";
pub const TEST_FEATURED_PRICE_LOCAL_CENTS: i64 = 100_000;
pub const TEST_FEATURED_PRICE_USD_CENTS: i64 = 1_000;

/// Handles on the doubles behind a built `AppState`.
pub struct TestMocks {
    pub clock: Arc<FixedClock>,
    pub offers: Arc<InMemoryOfferRepo>,
    pub subscriptions: Arc<InMemorySubscriptionRepo>,
    pub prices: Arc<InMemoryPlanPriceRepo>,
    pub mercadopago: Arc<MockPaymentProvider>,
    pub paypal: Arc<MockPaymentProvider>,
    pub payments: Arc<MockPaymentLookup>,
    pub orders: Arc<MockOrderCapture>,
}

pub struct TestAppStateBuilder {
    now: DateTime<Utc>,
    offers: Vec<OfferSummary>,
    subscriptions: Vec<Subscription>,
    prices: Vec<PlanPriceProfile>,
    payments: Vec<PaymentInfo>,
    captures: Vec<CaptureResult>,
    webhook_secret: Option<String>,
}

impl TestAppStateBuilder {
    /// Starts with the seeded monthly and annual price rows.
    pub fn new() -> Self {
        Self {
            now: test_datetime(),
            offers: Vec::new(),
            subscriptions: Vec::new(),
            prices: vec![
                create_test_plan_price(|_| {}),
                create_test_plan_price(|p| {
                    p.id = 2;
                    p.billing_cycle = BillingCycle::Annual;
                    p.price_usd_cents = 10_000;
                    p.price_local_cents = 10_000_000;
                }),
            ],
            payments: Vec::new(),
            captures: Vec::new(),
            webhook_secret: None,
        }
    }

    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn with_offer(mut self, offer: OfferSummary) -> Self {
        self.offers.push(offer);
        self
    }

    pub fn with_subscription(mut self, subscription: Subscription) -> Self {
        self.subscriptions.push(subscription);
        self
    }

    pub fn with_payment(mut self, payment: PaymentInfo) -> Self {
        self.payments.push(payment);
        self
    }

    pub fn with_capture(mut self, capture: CaptureResult) -> Self {
        self.captures.push(capture);
        self
    }

    pub fn with_webhook_secret(mut self, secret: &str) -> Self {
        self.webhook_secret = Some(secret.to_string());
        self
    }

    /// Build the AppState with all configured mocks.
    pub fn build(self) -> AppState {
        self.build_with_mocks().0
    }

    pub fn build_with_mocks(self) -> (AppState, TestMocks) {
        let clock = Arc::new(FixedClock::new(self.now));
        let offers = Arc::new(InMemoryOfferRepo::with_offers(self.offers));
        let subscriptions = Arc::new(InMemorySubscriptionRepo::with_subscriptions(
            self.subscriptions,
        ));
        let prices = Arc::new(InMemoryPlanPriceRepo::with_prices(self.prices));
        let mercadopago = Arc::new(MockPaymentProvider::mercadopago());
        let paypal = Arc::new(MockPaymentProvider::paypal());

        let payments = Arc::new(MockPaymentLookup::new());
        for payment in self.payments {
            payments.insert(payment);
        }
        let orders = Arc::new(MockOrderCapture::new());
        for capture in self.captures {
            orders.insert(capture);
        }

        let config = Arc::new(AppConfig {
            jwt_secret: SecretString::new(TEST_JWT_SECRET.into()),
            bind_addr: "127.0.0.1:3001".parse::<SocketAddr>().unwrap(),
            database_url: String::new(),
            cors_origin: HeaderValue::from_static(TEST_FRONTEND_URL),
            frontend_url: Url::parse(TEST_FRONTEND_URL).unwrap(),
            backend_url: Url::parse("http://localhost:3001").unwrap(),
            mercadopago: MercadoPagoConfig {
                access_token: SecretString::new("TEST-access-token".into()),
                webhook_secret: self.webhook_secret.map(|s| SecretString::new(s.into())),
                api_base_url: Url::parse("http://mercadopago.test").unwrap(),
                notification_url: "http://localhost:3001/api/payments/webhook-mp".to_string(),
            },
            paypal: PayPalConfig {
                client_id: "test_client_id".to_string(),
                client_secret: SecretString::new("test_client_secret".into()),
                mode: PaymentMode::Sandbox,
            },
            local_currency: "ARS".to_string(),
            featured_offer_price_local_cents: TEST_FEATURED_PRICE_LOCAL_CENTS,
            featured_offer_price_usd_cents: TEST_FEATURED_PRICE_USD_CENTS,
        });

        let plan_pricing_use_cases =
            PlanPricingUseCases::new(prices.clone(), config.local_currency.clone());

        let checkout_use_cases = CheckoutUseCases::new(
            plan_pricing_use_cases.clone(),
            offers.clone(),
            FeaturedOfferPricing {
                price_local_cents: config.featured_offer_price_local_cents,
                price_usd_cents: config.featured_offer_price_usd_cents,
            },
            TEST_FRONTEND_URL,
        );

        let reconciliation_use_cases = ReconciliationUseCases::new(
            subscriptions.clone(),
            offers.clone(),
            payments.clone(),
            orders.clone(),
            clock.clone(),
        );

        let app_state = AppState {
            config,
            checkout_use_cases: Arc::new(checkout_use_cases),
            reconciliation_use_cases: Arc::new(reconciliation_use_cases),
            offer_use_cases: Arc::new(OfferUseCases::new(offers.clone(), clock.clone())),
            subscription_use_cases: Arc::new(SubscriptionUseCases::new(
                subscriptions.clone(),
                clock.clone(),
            )),
            plan_pricing_use_cases: Arc::new(plan_pricing_use_cases),
            mercadopago: mercadopago.clone(),
            paypal: paypal.clone(),
        };

        let mocks = TestMocks {
            clock,
            offers,
            subscriptions,
            prices,
            mercadopago,
            paypal,
            payments,
            orders,
        };

        (app_state, mocks)
    }
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Bearer header value for a regular user.
pub fn user_bearer(user_id: i64) -> String {
    bearer(user_id, false)
}

/// Bearer header value for an administrator.
pub fn admin_bearer(user_id: i64) -> String {
    bearer(user_id, true)
}

fn bearer(user_id: i64, is_admin: bool) -> String {
    let token = jwt::issue(
        user_id,
        Some("ofertante"),
        is_admin,
        &SecretString::new(TEST_JWT_SECRET.into()),
        time::Duration::hours(1),
    )
    .unwrap();
    format!("Bearer {}", token)
}
