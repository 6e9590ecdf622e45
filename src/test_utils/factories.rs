//! Test data factories for creating valid test fixtures.
//!
//! Each factory function creates a complete, valid object with sensible defaults.
//! Use the closure parameter to override specific fields as needed.

use chrono::{DateTime, TimeZone, Utc};

use crate::{
    application::use_cases::plan_pricing::PlanPriceProfile,
    domain::entities::{
        billing_cycle::BillingCycle,
        offer::OfferSummary,
        payment_method::PaymentMethod,
        subscription::{Subscription, SubscriptionStatus},
    },
};

/// Create a monthly price row with sensible defaults.
pub fn create_test_plan_price(overrides: impl FnOnce(&mut PlanPriceProfile)) -> PlanPriceProfile {
    let mut price = PlanPriceProfile {
        id: 1,
        billing_cycle: BillingCycle::Monthly,
        price_usd_cents: 1000,
        price_local_cents: 1_000_000,
        updated_at: Some(test_datetime()),
    };
    overrides(&mut price);
    price
}

/// Create an open, non-featured offer with sensible defaults.
pub fn create_test_offer(overrides: impl FnOnce(&mut OfferSummary)) -> OfferSummary {
    let mut offer = OfferSummary {
        id: 1,
        title: "Delantero para primera división".to_string(),
        description: Some("Buscamos delantero con experiencia".to_string()),
        location: Some("Córdoba".to_string()),
        position: Some("Delantero".to_string()),
        level: Some("profesional".to_string()),
        owner_user_id: 1,
        published_at: test_datetime(),
        is_featured: false,
        featured_until: None,
    };
    overrides(&mut offer);
    offer
}

/// Create an active subscription for `user_id` with sensible defaults.
pub fn create_test_subscription(
    user_id: i64,
    overrides: impl FnOnce(&mut Subscription),
) -> Subscription {
    let mut subscription = Subscription {
        user_id,
        plan: "ofertante".to_string(),
        period_end: test_datetime() + chrono::Duration::days(30),
        status: SubscriptionStatus::Active,
        payment_method: PaymentMethod::MercadoPago,
        external_payment_id: Some("1234567890".to_string()),
        created_at: test_datetime(),
        updated_at: test_datetime(),
    };
    overrides(&mut subscription);
    subscription
}

/// Fixed instant used by factories.
pub fn test_datetime() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}
