use serde::Deserialize;
use std::sync::Arc;

use crate::{
    app_error::{AppError, AppResult},
    application::{
        ports::payment_provider::{
            CheckoutRequest, CheckoutResult, CheckoutUrls, Money, PaymentProviderPort,
            PricingCurrency,
        },
        use_cases::{offers::OfferRepoTrait, plan_pricing::PlanPricingUseCases},
    },
    domain::entities::{
        billing_cycle::BillingCycle,
        offer::FEATURE_WINDOW_DAYS,
        payment_intent::PaymentIntent,
        payment_provider::PaymentProvider,
        plan_key::PlanKey,
    },
};

/// Plan type sent by the client for a featured-offer purchase
pub const FEATURE_PLAN_TYPE: &str = "destacar_oferta";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutInput {
    pub plan_type: String,
    pub billing_cycle: Option<String>,
    pub offer_id: Option<i64>,
}

/// Flat price of featuring an offer, per price column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeaturedOfferPricing {
    pub price_local_cents: i64,
    pub price_usd_cents: i64,
}

impl FeaturedOfferPricing {
    fn price_cents(&self, currency: PricingCurrency) -> i64 {
        match currency {
            PricingCurrency::Usd => self.price_usd_cents,
            PricingCurrency::Local => self.price_local_cents,
        }
    }
}

#[derive(Clone)]
pub struct CheckoutUseCases {
    pricing: PlanPricingUseCases,
    offers: Arc<dyn OfferRepoTrait>,
    featured_price: FeaturedOfferPricing,
    frontend_url: String,
}

impl CheckoutUseCases {
    pub fn new(
        pricing: PlanPricingUseCases,
        offers: Arc<dyn OfferRepoTrait>,
        featured_price: FeaturedOfferPricing,
        frontend_url: impl Into<String>,
    ) -> Self {
        Self {
            pricing,
            offers,
            featured_price,
            frontend_url: frontend_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Validate the purchase, price it, then open a checkout with `provider`.
    /// Nothing reaches the provider unless pricing succeeded.
    pub async fn start_checkout(
        &self,
        provider: &dyn PaymentProviderPort,
        user_id: i64,
        input: &CheckoutInput,
    ) -> AppResult<CheckoutResult> {
        let currency = provider.pricing_currency();
        let (intent, amount) = self.price_intent(user_id, input, currency).await?;
        let (title, description) = describe(&intent);

        let request = CheckoutRequest {
            intent,
            title,
            description,
            amount,
            urls: self.checkout_urls(provider.provider()),
        };

        let result = provider.create_checkout(&request).await.inspect_err(|e| {
            tracing::error!(
                provider = %provider.provider(),
                user_id,
                error = %e,
                "Checkout creation failed"
            );
        })?;

        tracing::info!(
            provider = %provider.provider(),
            user_id,
            reference = %request.reference(),
            session_id = %result.session_id,
            amount_cents = request.amount.amount_cents,
            currency = %request.amount.currency,
            "Checkout created"
        );
        Ok(result)
    }

    async fn price_intent(
        &self,
        user_id: i64,
        input: &CheckoutInput,
        currency: PricingCurrency,
    ) -> AppResult<(PaymentIntent, Money)> {
        if input.plan_type == FEATURE_PLAN_TYPE {
            let offer_id = input
                .offer_id
                .ok_or_else(|| AppError::InvalidInput("offerId is required".into()))?;

            let owner = self
                .offers
                .get_owner(offer_id)
                .await?
                .ok_or(AppError::NotFound)?;
            if owner != user_id {
                tracing::warn!(user_id, offer_id, owner, "Feature purchase for foreign offer");
                return Err(AppError::Forbidden);
            }

            let amount = Money::new(
                self.featured_price.price_cents(currency),
                self.pricing.currency_code(currency),
            );
            return Ok((PaymentIntent::FeaturedOffer { user_id, offer_id }, amount));
        }

        let plan: PlanKey = input.plan_type.parse().map_err(|_| {
            AppError::InvalidInput(format!("Invalid plan type: {}", input.plan_type))
        })?;
        let billing_cycle = input.billing_cycle.as_deref().unwrap_or_default();
        let cycle: BillingCycle = billing_cycle
            .parse()
            .map_err(|_| AppError::InvalidBillingCycle(billing_cycle.to_string()))?;

        let amount = self.pricing.get_price(plan, cycle.as_str(), currency).await?;
        Ok((
            PaymentIntent::Subscription {
                user_id,
                plan,
                cycle,
            },
            amount,
        ))
    }

    fn checkout_urls(&self, provider: PaymentProvider) -> CheckoutUrls {
        let suffix = match provider {
            PaymentProvider::MercadoPago => "mp",
            PaymentProvider::PayPal => "paypal",
        };
        CheckoutUrls {
            success_url: format!("{}/pago-exitoso-{}", self.frontend_url, suffix),
            failure_url: format!("{}/pago-cancelado-{}", self.frontend_url, suffix),
            pending_url: format!("{}/pago-pendiente-{}", self.frontend_url, suffix),
        }
    }
}

fn describe(intent: &PaymentIntent) -> (String, String) {
    match intent {
        PaymentIntent::Subscription { plan, cycle, .. } => (
            format!("Suscripción {} - {}", plan.display_name(), cycle),
            format!("Plan {} ({})", plan, cycle),
        ),
        PaymentIntent::FeaturedOffer { offer_id, .. } => (
            "Destacar oferta".to_string(),
            format!(
                "Oferta #{} destacada durante {} días",
                offer_id, FEATURE_WINDOW_DAYS
            ),
        ),
    }
}
