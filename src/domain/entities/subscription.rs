use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{payment_method::PaymentMethod, plan_key::PlanKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "subscription_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
        }
    }
}

/// The single subscription row a user may hold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subscription {
    pub user_id: i64,
    pub plan: String,
    pub period_end: DateTime<Utc>,
    pub status: SubscriptionStatus,
    pub payment_method: PaymentMethod,
    pub external_payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Active and not yet past its period end.
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.status == SubscriptionStatus::Active && self.period_end > now
    }
}

/// Full replacement of a user's subscription row.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionUpsert {
    pub user_id: i64,
    pub plan: PlanKey,
    pub period_end: DateTime<Utc>,
    pub status: SubscriptionStatus,
    pub payment_method: PaymentMethod,
    pub external_payment_id: Option<String>,
}
