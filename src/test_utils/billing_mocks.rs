//! In-memory mock implementations for repository traits and payment ports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::{
    app_error::{AppError, AppResult},
    application::{
        ports::{
            clock::ClockPort,
            payment_provider::{
                CaptureResult, CheckoutRequest, CheckoutResult, OrderCapturePort,
                PaymentInfo, PaymentLookupPort, PaymentProviderPort, PricingCurrency,
            },
        },
        use_cases::{
            offers::{OfferRepoTrait, SortDirection},
            plan_pricing::{PlanPriceProfile, PlanPriceRepoTrait},
            subscription::SubscriptionRepoTrait,
        },
    },
    domain::entities::{
        billing_cycle::BillingCycle,
        offer::{OfferFilters, OfferSummary},
        payment_mode::PaymentMode,
        payment_provider::PaymentProvider,
        subscription::{Subscription, SubscriptionUpsert},
    },
};

// ============================================================================
// FixedClock
// ============================================================================

pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }
}

impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

// ============================================================================
// InMemoryPlanPriceRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryPlanPriceRepo {
    pub prices: Mutex<HashMap<i64, PlanPriceProfile>>,
}

impl InMemoryPlanPriceRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prices(prices: Vec<PlanPriceProfile>) -> Self {
        Self {
            prices: Mutex::new(prices.into_iter().map(|p| (p.id, p)).collect()),
        }
    }
}

#[async_trait]
impl PlanPriceRepoTrait for InMemoryPlanPriceRepo {
    async fn get_by_cycle(&self, cycle: BillingCycle) -> AppResult<Option<PlanPriceProfile>> {
        Ok(self
            .prices
            .lock()
            .unwrap()
            .values()
            .find(|p| p.billing_cycle == cycle)
            .cloned())
    }

    async fn list(&self) -> AppResult<Vec<PlanPriceProfile>> {
        let mut prices: Vec<PlanPriceProfile> =
            self.prices.lock().unwrap().values().cloned().collect();
        prices.sort_by_key(|p| p.id);
        Ok(prices)
    }

    async fn update_prices(
        &self,
        id: i64,
        price_usd_cents: i64,
        price_local_cents: i64,
    ) -> AppResult<Option<PlanPriceProfile>> {
        let mut prices = self.prices.lock().unwrap();
        Ok(prices.get_mut(&id).map(|p| {
            p.price_usd_cents = price_usd_cents;
            p.price_local_cents = price_local_cents;
            p.updated_at = Some(Utc::now());
            p.clone()
        }))
    }
}

// ============================================================================
// InMemoryOfferRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryOfferRepo {
    pub offers: Mutex<HashMap<i64, OfferSummary>>,
}

impl InMemoryOfferRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offers(offers: Vec<OfferSummary>) -> Self {
        Self {
            offers: Mutex::new(offers.into_iter().map(|o| (o.id, o)).collect()),
        }
    }

    pub fn get(&self, id: i64) -> Option<OfferSummary> {
        self.offers.lock().unwrap().get(&id).cloned()
    }

    fn matches(offer: &OfferSummary, filters: &OfferFilters) -> bool {
        fn contains_ci(value: &Option<String>, needle: &Option<String>) -> bool {
            match needle {
                None => true,
                Some(needle) => value
                    .as_deref()
                    .is_some_and(|v| v.to_lowercase().contains(&needle.to_lowercase())),
            }
        }

        !offer.is_featured
            && contains_ci(&offer.position, &filters.position)
            && contains_ci(&offer.location, &filters.location)
            && filters
                .level
                .as_ref()
                .is_none_or(|level| offer.level.as_ref() == Some(level))
    }
}

#[async_trait]
impl OfferRepoTrait for InMemoryOfferRepo {
    async fn set_featured(&self, offer_id: i64, until: DateTime<Utc>) -> AppResult<bool> {
        let mut offers = self.offers.lock().unwrap();
        Ok(match offers.get_mut(&offer_id) {
            Some(offer) => {
                offer.is_featured = true;
                offer.featured_until = Some(until);
                true
            }
            None => false,
        })
    }

    async fn clear_expired_featured(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut cleared = 0;
        for offer in self.offers.lock().unwrap().values_mut() {
            if offer.is_featured && offer.featured_until.is_some_and(|until| until <= now) {
                offer.is_featured = false;
                cleared += 1;
            }
        }
        Ok(cleared)
    }

    async fn get_owner(&self, offer_id: i64) -> AppResult<Option<i64>> {
        Ok(self
            .offers
            .lock()
            .unwrap()
            .get(&offer_id)
            .map(|o| o.owner_user_id))
    }

    async fn list_featured(&self, now: DateTime<Utc>, limit: i64) -> AppResult<Vec<OfferSummary>> {
        let mut featured: Vec<OfferSummary> = self
            .offers
            .lock()
            .unwrap()
            .values()
            .filter(|o| o.is_currently_featured(now))
            .cloned()
            .collect();
        featured.sort_by(|a, b| b.featured_until.cmp(&a.featured_until));
        featured.truncate(limit.max(0) as usize);
        Ok(featured)
    }

    async fn list_open(
        &self,
        filters: &OfferFilters,
        sort: SortDirection,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<OfferSummary>> {
        let mut offers: Vec<OfferSummary> = self
            .offers
            .lock()
            .unwrap()
            .values()
            .filter(|o| Self::matches(o, filters))
            .cloned()
            .collect();
        offers.sort_by(|a, b| match sort {
            SortDirection::Asc => a.published_at.cmp(&b.published_at).then(a.id.cmp(&b.id)),
            SortDirection::Desc => b.published_at.cmp(&a.published_at).then(b.id.cmp(&a.id)),
        });
        Ok(offers
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count_open(&self, filters: &OfferFilters) -> AppResult<i64> {
        Ok(self
            .offers
            .lock()
            .unwrap()
            .values()
            .filter(|o| Self::matches(o, filters))
            .count() as i64)
    }
}

// ============================================================================
// InMemorySubscriptionRepo
// ============================================================================

#[derive(Default)]
pub struct InMemorySubscriptionRepo {
    pub subscriptions: Mutex<HashMap<i64, Subscription>>,
    fail_writes: AtomicBool,
}

impl InMemorySubscriptionRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subscriptions(subscriptions: Vec<Subscription>) -> Self {
        Self {
            subscriptions: Mutex::new(subscriptions.into_iter().map(|s| (s.user_id, s)).collect()),
            ..Default::default()
        }
    }

    pub fn get(&self, user_id: i64) -> Option<Subscription> {
        self.subscriptions.lock().unwrap().get(&user_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.subscriptions.lock().unwrap().len()
    }

    /// Make every subsequent upsert fail with a database error
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl SubscriptionRepoTrait for InMemorySubscriptionRepo {
    async fn upsert(&self, input: &SubscriptionUpsert) -> AppResult<Subscription> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Database("Database operation failed".into()));
        }

        let mut subscriptions = self.subscriptions.lock().unwrap();
        let now = Utc::now();
        let subscription = Subscription {
            user_id: input.user_id,
            plan: input.plan.as_str().to_string(),
            period_end: input.period_end,
            status: input.status,
            payment_method: input.payment_method,
            external_payment_id: input.external_payment_id.clone(),
            created_at: subscriptions
                .get(&input.user_id)
                .map(|s| s.created_at)
                .unwrap_or(now),
            updated_at: now,
        };
        subscriptions.insert(input.user_id, subscription.clone());
        Ok(subscription)
    }

    async fn get_by_user(&self, user_id: i64) -> AppResult<Option<Subscription>> {
        Ok(self.get(user_id))
    }
}

// ============================================================================
// MockPaymentProvider
// ============================================================================

/// Records checkout requests and answers with numbered sessions.
pub struct MockPaymentProvider {
    provider: PaymentProvider,
    requests: Mutex<Vec<CheckoutRequest>>,
    failure: Mutex<Option<String>>,
}

impl MockPaymentProvider {
    pub fn new(provider: PaymentProvider) -> Self {
        Self {
            provider,
            requests: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
        }
    }

    pub fn mercadopago() -> Self {
        Self::new(PaymentProvider::MercadoPago)
    }

    pub fn paypal() -> Self {
        Self::new(PaymentProvider::PayPal)
    }

    pub fn fail_checkout(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn checkout_calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<CheckoutRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl PaymentProviderPort for MockPaymentProvider {
    fn provider(&self) -> PaymentProvider {
        self.provider
    }

    fn mode(&self) -> PaymentMode {
        PaymentMode::Sandbox
    }

    fn pricing_currency(&self) -> PricingCurrency {
        match self.provider {
            PaymentProvider::MercadoPago => PricingCurrency::Local,
            PaymentProvider::PayPal => PricingCurrency::Usd,
        }
    }

    async fn create_checkout(&self, request: &CheckoutRequest) -> AppResult<CheckoutResult> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(request.clone());

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(AppError::Provider(message));
        }

        let session_id = format!("session-{}", requests.len());
        Ok(CheckoutResult {
            redirect_url: format!("https://checkout.test/{}", session_id),
            session_id,
        })
    }
}

// ============================================================================
// MockPaymentLookup
// ============================================================================

#[derive(Default)]
pub struct MockPaymentLookup {
    payments: Mutex<HashMap<String, PaymentInfo>>,
    fail: AtomicBool,
    lookups: AtomicUsize,
}

impl MockPaymentLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, payment: PaymentInfo) {
        self.payments
            .lock()
            .unwrap()
            .insert(payment.id.clone(), payment);
    }

    pub fn fail_lookups(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentLookupPort for MockPaymentLookup {
    async fn get_payment(&self, payment_id: &str) -> AppResult<Option<PaymentInfo>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Provider("lookup unavailable".into()));
        }
        Ok(self.payments.lock().unwrap().get(payment_id).cloned())
    }
}

// ============================================================================
// MockOrderCapture
// ============================================================================

/// Unknown order ids fail the way a provider rejection would.
#[derive(Default)]
pub struct MockOrderCapture {
    orders: Mutex<HashMap<String, CaptureResult>>,
    captures: AtomicUsize,
}

impl MockOrderCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, capture: CaptureResult) {
        self.orders
            .lock()
            .unwrap()
            .insert(capture.order_id.clone(), capture);
    }

    pub fn captures(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderCapturePort for MockOrderCapture {
    async fn capture_order(&self, order_id: &str) -> AppResult<CaptureResult> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        self.orders
            .lock()
            .unwrap()
            .get(order_id)
            .cloned()
            .ok_or_else(|| AppError::Provider(format!("order {} not found", order_id)))
    }
}
