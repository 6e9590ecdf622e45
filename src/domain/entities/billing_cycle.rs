use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Billing cycle of a paid subscription.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BillingCycle {
    Monthly,
    Annual,
}

impl BillingCycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "monthly",
            BillingCycle::Annual => "annual",
        }
    }

    fn months(&self) -> u32 {
        match self {
            BillingCycle::Monthly => 1,
            BillingCycle::Annual => 12,
        }
    }

    /// End of a period starting at `from`, in calendar months.
    ///
    /// Days past the end of the target month are clamped to its last day
    /// (Jan 31 + 1 month = Feb 28/29).
    pub fn period_end(&self, from: DateTime<Utc>) -> DateTime<Utc> {
        from.checked_add_months(Months::new(self.months()))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Map an admin grant duration ("1-month" / "1-year") onto a cycle.
    pub fn from_grant_duration(duration: &str) -> Option<Self> {
        match duration {
            "1-month" => Some(BillingCycle::Monthly),
            "1-year" => Some(BillingCycle::Annual),
            _ => None,
        }
    }
}
