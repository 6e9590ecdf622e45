use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::payment_provider::{Money, PricingCurrency},
    domain::entities::{billing_cycle::BillingCycle, plan_key::PlanKey},
};

const USD: &str = "USD";

// ============================================================================
// Profile Types
// ============================================================================

/// One row of the price table. Both plan keys share the price of a cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanPriceProfile {
    pub id: i64,
    pub billing_cycle: BillingCycle,
    pub price_usd_cents: i64,
    pub price_local_cents: i64,
    pub updated_at: Option<DateTime<Utc>>,
}

impl PlanPriceProfile {
    pub fn price_cents(&self, currency: PricingCurrency) -> i64 {
        match currency {
            PricingCurrency::Usd => self.price_usd_cents,
            PricingCurrency::Local => self.price_local_cents,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePlanPricesInput {
    pub price_usd_cents: i64,
    pub price_local_cents: i64,
}

// ============================================================================
// Repository Trait
// ============================================================================

#[async_trait]
pub trait PlanPriceRepoTrait: Send + Sync {
    async fn get_by_cycle(&self, cycle: BillingCycle) -> AppResult<Option<PlanPriceProfile>>;
    async fn list(&self) -> AppResult<Vec<PlanPriceProfile>>;
    /// `None` when no row has this id
    async fn update_prices(
        &self,
        id: i64,
        price_usd_cents: i64,
        price_local_cents: i64,
    ) -> AppResult<Option<PlanPriceProfile>>;
}

// ============================================================================
// Use Cases
// ============================================================================

#[derive(Clone)]
pub struct PlanPricingUseCases {
    repo: Arc<dyn PlanPriceRepoTrait>,
    local_currency: String,
}

impl PlanPricingUseCases {
    pub fn new(repo: Arc<dyn PlanPriceRepoTrait>, local_currency: impl Into<String>) -> Self {
        Self {
            repo,
            local_currency: local_currency.into(),
        }
    }

    /// ISO code charged for a price column
    pub fn currency_code(&self, currency: PricingCurrency) -> &str {
        match currency {
            PricingCurrency::Usd => USD,
            PricingCurrency::Local => &self.local_currency,
        }
    }

    /// Current price of a plan for a billing cycle. Read fresh on every call.
    pub async fn get_price(
        &self,
        plan: PlanKey,
        billing_cycle: &str,
        currency: PricingCurrency,
    ) -> AppResult<Money> {
        let cycle: BillingCycle = billing_cycle
            .parse()
            .map_err(|_| AppError::InvalidBillingCycle(billing_cycle.to_string()))?;

        let row = self
            .repo
            .get_by_cycle(cycle)
            .await?
            .ok_or_else(|| AppError::InvalidBillingCycle(billing_cycle.to_string()))?;

        let price = Money::new(row.price_cents(currency), self.currency_code(currency));
        tracing::debug!(
            plan = %plan,
            billing_cycle = %cycle,
            amount_cents = price.amount_cents,
            currency = %price.currency,
            "Resolved plan price"
        );
        Ok(price)
    }

    pub async fn list_plans(&self) -> AppResult<Vec<PlanPriceProfile>> {
        self.repo.list().await
    }

    pub async fn update_plan_prices(
        &self,
        id: i64,
        input: &UpdatePlanPricesInput,
    ) -> AppResult<PlanPriceProfile> {
        if input.price_usd_cents < 0 || input.price_local_cents < 0 {
            return Err(AppError::InvalidInput("Prices cannot be negative".into()));
        }

        let updated = self
            .repo
            .update_prices(id, input.price_usd_cents, input.price_local_cents)
            .await?
            .ok_or(AppError::NotFound)?;

        tracing::info!(
            plan_price_id = id,
            billing_cycle = %updated.billing_cycle,
            price_usd_cents = updated.price_usd_cents,
            price_local_cents = updated.price_local_cents,
            "Updated plan prices"
        );
        Ok(updated)
    }
}
