use std::sync::Arc;

use crate::{
    application::{
        ports::payment_provider::PaymentProviderPort,
        use_cases::{
            checkout::CheckoutUseCases, offers::OfferUseCases, plan_pricing::PlanPricingUseCases,
            reconciliation::ReconciliationUseCases, subscription::SubscriptionUseCases,
        },
    },
    infra::config::AppConfig,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub checkout_use_cases: Arc<CheckoutUseCases>,
    pub reconciliation_use_cases: Arc<ReconciliationUseCases>,
    pub offer_use_cases: Arc<OfferUseCases>,
    pub subscription_use_cases: Arc<SubscriptionUseCases>,
    pub plan_pricing_use_cases: Arc<PlanPricingUseCases>,
    pub mercadopago: Arc<dyn PaymentProviderPort>,
    pub paypal: Arc<dyn PaymentProviderPort>,
}
