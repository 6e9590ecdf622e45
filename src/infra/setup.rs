use crate::{
    adapters::http::app_state::AppState,
    application::{
        ports::{
            clock::ClockPort,
            payment_provider::{OrderCapturePort, PaymentLookupPort, PaymentProviderPort},
        },
        use_cases::{
            checkout::{CheckoutUseCases, FeaturedOfferPricing},
            offers::{OfferRepoTrait, OfferUseCases},
            plan_pricing::{PlanPriceRepoTrait, PlanPricingUseCases},
            reconciliation::ReconciliationUseCases,
            subscription::{SubscriptionRepoTrait, SubscriptionUseCases},
        },
    },
    infra::{
        clock::SystemClock, config::AppConfig, http_client::build_client,
        mercadopago_adapter::MercadoPagoPaymentAdapter, paypal_adapter::PayPalPaymentAdapter,
        postgres_persistence,
    },
};
use std::fs::File;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE: &str = "app.log";

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env();

    let postgres_arc = Arc::new(postgres_persistence(&config.database_url).await?);
    let http = build_client()?;
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);

    let mercadopago = Arc::new(MercadoPagoPaymentAdapter::new(
        http.clone(),
        config.mercadopago.clone(),
    ));
    let paypal = Arc::new(PayPalPaymentAdapter::new(http, &config.paypal));

    tracing::info!(
        mercadopago_mode = %mercadopago.mode(),
        paypal_mode = %paypal.mode(),
        local_currency = %config.local_currency,
        "Payment providers configured"
    );

    let offer_repo = postgres_arc.clone() as Arc<dyn OfferRepoTrait>;
    let subscription_repo = postgres_arc.clone() as Arc<dyn SubscriptionRepoTrait>;

    let plan_pricing_use_cases = PlanPricingUseCases::new(
        postgres_arc.clone() as Arc<dyn PlanPriceRepoTrait>,
        config.local_currency.clone(),
    );

    let checkout_use_cases = CheckoutUseCases::new(
        plan_pricing_use_cases.clone(),
        offer_repo.clone(),
        FeaturedOfferPricing {
            price_local_cents: config.featured_offer_price_local_cents,
            price_usd_cents: config.featured_offer_price_usd_cents,
        },
        config.frontend_url.as_str(),
    );

    let reconciliation_use_cases = ReconciliationUseCases::new(
        subscription_repo.clone(),
        offer_repo.clone(),
        mercadopago.clone() as Arc<dyn PaymentLookupPort>,
        paypal.clone() as Arc<dyn OrderCapturePort>,
        clock.clone(),
    );

    let offer_use_cases = OfferUseCases::new(offer_repo, clock.clone());
    let subscription_use_cases = SubscriptionUseCases::new(subscription_repo, clock);

    Ok(AppState {
        config: Arc::new(config),
        checkout_use_cases: Arc::new(checkout_use_cases),
        reconciliation_use_cases: Arc::new(reconciliation_use_cases),
        offer_use_cases: Arc::new(offer_use_cases),
        subscription_use_cases: Arc::new(subscription_use_cases),
        plan_pricing_use_cases: Arc::new(plan_pricing_use_cases),
        mercadopago: mercadopago as Arc<dyn PaymentProviderPort>,
        paypal: paypal as Arc<dyn PaymentProviderPort>,
    })
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fichajes_api=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer().with_target(false).with_level(true).pretty();

    // File (structured JSON logs), skipped when the file cannot be created
    let json_layer = match File::create(LOG_FILE) {
        Ok(file) => Some(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(true)
                .with_span_list(true),
        ),
        Err(e) => {
            eprintln!("cannot create {}: {}", LOG_FILE, e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
