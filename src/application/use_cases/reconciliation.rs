use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    app_error::{AppError, AppResult},
    application::{
        ports::{
            clock::ClockPort,
            payment_provider::{OrderCapturePort, PaymentLookupPort},
        },
        use_cases::{offers::OfferRepoTrait, subscription::SubscriptionRepoTrait},
    },
    domain::entities::{
        offer::featured_until,
        payment_intent::PaymentIntent,
        payment_method::PaymentMethod,
        payment_provider::PaymentProvider,
        plan_key::PlanKey,
        subscription::{SubscriptionStatus, SubscriptionUpsert},
    },
};

/// A payment the provider has confirmed as completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedPayment {
    pub provider: PaymentProvider,
    pub provider_payment_id: String,
    pub external_reference: Option<String>,
    /// Payment description or custom id
    pub descriptor: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardReason {
    UnrecognizedReference,
    UnknownOffer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    PaymentNotFound,
    LookupFailed,
    NotApproved,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReconciliationOutcome {
    SubscriptionActivated {
        user_id: i64,
        plan: PlanKey,
        period_end: DateTime<Utc>,
    },
    OfferFeatured {
        offer_id: i64,
        featured_until: DateTime<Utc>,
    },
    /// Completed payment that maps to nothing we can act on
    Discarded { reason: DiscardReason },
    /// Notification that does not describe a completed payment
    Ignored { reason: IgnoreReason },
}

#[derive(Clone)]
pub struct ReconciliationUseCases {
    subscriptions: Arc<dyn SubscriptionRepoTrait>,
    offers: Arc<dyn OfferRepoTrait>,
    payments: Arc<dyn PaymentLookupPort>,
    orders: Arc<dyn OrderCapturePort>,
    clock: Arc<dyn ClockPort>,
}

impl ReconciliationUseCases {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepoTrait>,
        offers: Arc<dyn OfferRepoTrait>,
        payments: Arc<dyn PaymentLookupPort>,
        orders: Arc<dyn OrderCapturePort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            subscriptions,
            offers,
            payments,
            orders,
            clock,
        }
    }

    /// Apply a completed payment to the state store.
    ///
    /// Both branches are upserts, so replaying the same payment leaves the
    /// same end state for the same clock reading.
    pub async fn reconcile(&self, payment: &CompletedPayment) -> AppResult<ReconciliationOutcome> {
        let Some(intent) = PaymentIntent::resolve(
            payment.external_reference.as_deref(),
            payment.descriptor.as_deref(),
        ) else {
            tracing::warn!(
                provider = %payment.provider,
                provider_payment_id = %payment.provider_payment_id,
                external_reference = ?payment.external_reference,
                descriptor = ?payment.descriptor,
                "Discarding payment with unrecognized reference"
            );
            return Ok(ReconciliationOutcome::Discarded {
                reason: DiscardReason::UnrecognizedReference,
            });
        };

        let now = self.clock.now();
        match intent {
            PaymentIntent::FeaturedOffer { user_id, offer_id } => {
                let until = featured_until(now);
                if !self.offers.set_featured(offer_id, until).await? {
                    tracing::warn!(
                        provider = %payment.provider,
                        provider_payment_id = %payment.provider_payment_id,
                        user_id,
                        offer_id,
                        "Discarding feature payment for unknown offer"
                    );
                    return Ok(ReconciliationOutcome::Discarded {
                        reason: DiscardReason::UnknownOffer,
                    });
                }

                tracing::info!(
                    provider = %payment.provider,
                    provider_payment_id = %payment.provider_payment_id,
                    user_id,
                    offer_id,
                    featured_until = %until,
                    "Offer featured"
                );
                Ok(ReconciliationOutcome::OfferFeatured {
                    offer_id,
                    featured_until: until,
                })
            }
            PaymentIntent::Subscription {
                user_id,
                plan,
                cycle,
            } => {
                let period_end = cycle.period_end(now);
                self.subscriptions
                    .upsert(&SubscriptionUpsert {
                        user_id,
                        plan,
                        period_end,
                        status: SubscriptionStatus::Active,
                        payment_method: PaymentMethod::from(payment.provider),
                        external_payment_id: Some(payment.provider_payment_id.clone()),
                    })
                    .await?;

                tracing::info!(
                    provider = %payment.provider,
                    provider_payment_id = %payment.provider_payment_id,
                    user_id,
                    plan = %plan,
                    billing_cycle = %cycle,
                    period_end = %period_end,
                    "Subscription activated"
                );
                Ok(ReconciliationOutcome::SubscriptionActivated {
                    user_id,
                    plan,
                    period_end,
                })
            }
        }
    }

    /// Webhook path: the notification only carries an id, so the payment is
    /// fetched again and acted on only if the provider reports it approved.
    pub async fn handle_payment_notification(
        &self,
        payment_id: &str,
    ) -> AppResult<ReconciliationOutcome> {
        let payment = match self.payments.get_payment(payment_id).await {
            Ok(Some(payment)) => payment,
            Ok(None) => {
                tracing::warn!(payment_id, "Notified payment not found at provider");
                return Ok(ReconciliationOutcome::Ignored {
                    reason: IgnoreReason::PaymentNotFound,
                });
            }
            Err(e) => {
                tracing::warn!(payment_id, error = %e, "Failed to fetch notified payment");
                return Ok(ReconciliationOutcome::Ignored {
                    reason: IgnoreReason::LookupFailed,
                });
            }
        };

        if !payment.is_approved() {
            tracing::debug!(payment_id, status = %payment.status, "Payment not approved yet");
            return Ok(ReconciliationOutcome::Ignored {
                reason: IgnoreReason::NotApproved,
            });
        }

        self.reconcile(&CompletedPayment {
            provider: PaymentProvider::MercadoPago,
            provider_payment_id: payment.id,
            external_reference: payment.external_reference,
            descriptor: payment.description,
        })
        .await
    }

    /// Capture path: the buyer approved the order client-side and the
    /// authenticated user becomes the external reference.
    pub async fn capture_order(
        &self,
        order_id: &str,
        user_id: i64,
    ) -> AppResult<ReconciliationOutcome> {
        let capture = self.orders.capture_order(order_id).await?;

        if !capture.is_completed() {
            tracing::warn!(
                order_id,
                user_id,
                status = %capture.status,
                "Captured order is not completed"
            );
            return Err(AppError::PaymentNotCompleted(capture.status));
        }

        self.reconcile(&CompletedPayment {
            provider: PaymentProvider::PayPal,
            provider_payment_id: capture.provider_payment_id,
            external_reference: Some(user_id.to_string()),
            descriptor: capture.custom_id,
        })
        .await
    }
}
