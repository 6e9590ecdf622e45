use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::clock::ClockPort,
    domain::entities::{
        billing_cycle::BillingCycle,
        payment_method::PaymentMethod,
        plan_key::PlanKey,
        subscription::{Subscription, SubscriptionStatus, SubscriptionUpsert},
    },
};

#[async_trait]
pub trait SubscriptionRepoTrait: Send + Sync {
    /// Insert or fully overwrite the row keyed by `user_id`
    async fn upsert(&self, input: &SubscriptionUpsert) -> AppResult<Subscription>;
    async fn get_by_user(&self, user_id: i64) -> AppResult<Option<Subscription>>;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantSubscriptionInput {
    pub plan_type: String,
    /// "1-month" or "1-year"
    pub duration: String,
}

#[derive(Clone)]
pub struct SubscriptionUseCases {
    repo: Arc<dyn SubscriptionRepoTrait>,
    clock: Arc<dyn ClockPort>,
}

impl SubscriptionUseCases {
    pub fn new(repo: Arc<dyn SubscriptionRepoTrait>, clock: Arc<dyn ClockPort>) -> Self {
        Self { repo, clock }
    }

    pub async fn get_status(&self, user_id: i64) -> AppResult<Option<Subscription>> {
        self.repo.get_by_user(user_id).await
    }

    /// Back-office grant. Replaces whatever the user had, paid or not.
    pub async fn grant(
        &self,
        user_id: i64,
        input: &GrantSubscriptionInput,
    ) -> AppResult<Subscription> {
        let plan: PlanKey = input
            .plan_type
            .parse()
            .map_err(|_| AppError::InvalidInput(format!("Invalid plan type: {}", input.plan_type)))?;
        let cycle = BillingCycle::from_grant_duration(&input.duration)
            .ok_or_else(|| AppError::InvalidInput(format!("Invalid duration: {}", input.duration)))?;

        let subscription = self
            .repo
            .upsert(&SubscriptionUpsert {
                user_id,
                plan,
                period_end: cycle.period_end(self.clock.now()),
                status: SubscriptionStatus::Active,
                payment_method: PaymentMethod::AdminGrant,
                external_payment_id: None,
            })
            .await?;

        tracing::info!(
            user_id,
            plan = %plan,
            period_end = %subscription.period_end,
            "Granted subscription"
        );
        Ok(subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FixedClock, InMemorySubscriptionRepo, create_test_subscription};
    use chrono::{DateTime, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 31, 9, 0, 0).unwrap()
    }

    fn use_cases(repo: Arc<InMemorySubscriptionRepo>) -> SubscriptionUseCases {
        SubscriptionUseCases::new(repo, Arc::new(FixedClock::new(now())))
    }

    fn grant_input(plan_type: &str, duration: &str) -> GrantSubscriptionInput {
        GrantSubscriptionInput {
            plan_type: plan_type.into(),
            duration: duration.into(),
        }
    }

    #[tokio::test]
    async fn test_grant_one_month_uses_calendar_arithmetic() {
        let repo = Arc::new(InMemorySubscriptionRepo::new());
        let subscription = use_cases(repo)
            .grant(5, &grant_input("postulante", "1-month"))
            .await
            .unwrap();

        assert_eq!(subscription.plan, "postulante");
        assert_eq!(
            subscription.period_end,
            Utc.with_ymd_and_hms(2025, 2, 28, 9, 0, 0).unwrap()
        );
        assert_eq!(subscription.payment_method, PaymentMethod::AdminGrant);
        assert_eq!(subscription.external_payment_id, None);
    }

    #[tokio::test]
    async fn test_grant_overwrites_paid_subscription() {
        let repo = Arc::new(InMemorySubscriptionRepo::with_subscriptions(vec![
            create_test_subscription(5, |s| {
                s.payment_method = PaymentMethod::PayPal;
                s.external_payment_id = Some("CAP-9".into());
            }),
        ]));
        let subscriptions = use_cases(repo.clone());

        subscriptions
            .grant(5, &grant_input("ofertante", "1-year"))
            .await
            .unwrap();

        let stored = subscriptions.get_status(5).await.unwrap().unwrap();
        assert_eq!(stored.payment_method, PaymentMethod::AdminGrant);
        assert_eq!(stored.external_payment_id, None);
        assert_eq!(
            stored.period_end,
            Utc.with_ymd_and_hms(2026, 1, 31, 9, 0, 0).unwrap()
        );
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_grant_rejects_unknown_duration_and_plan() {
        let subscriptions = use_cases(Arc::new(InMemorySubscriptionRepo::new()));

        let err = subscriptions
            .grant(5, &grant_input("ofertante", "2-weeks"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        let err = subscriptions
            .grant(5, &grant_input("vip", "1-month"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_status_of_user_without_subscription_is_none() {
        let subscriptions = use_cases(Arc::new(InMemorySubscriptionRepo::new()));
        assert!(subscriptions.get_status(42).await.unwrap().is_none());
    }
}
