use super::{billing_cycle::BillingCycle, plan_key::PlanKey};

const SUBSCRIPTION_TAG: &str = "sub";
const FEATURED_OFFER_TAG: &str = "feat";

/// What a payment buys. Carried through the provider as an opaque reference
/// string and decoded again once the payment is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentIntent {
    Subscription {
        user_id: i64,
        plan: PlanKey,
        cycle: BillingCycle,
    },
    FeaturedOffer {
        user_id: i64,
        offer_id: i64,
    },
}

impl PaymentIntent {
    pub fn user_id(&self) -> i64 {
        match self {
            PaymentIntent::Subscription { user_id, .. } => *user_id,
            PaymentIntent::FeaturedOffer { user_id, .. } => *user_id,
        }
    }

    /// Encode into the provider reference field.
    pub fn to_reference(&self) -> String {
        match self {
            PaymentIntent::Subscription {
                user_id,
                plan,
                cycle,
            } => format!(
                "{}:{}:{}:{}",
                SUBSCRIPTION_TAG,
                user_id,
                plan.as_str(),
                cycle.as_str()
            ),
            PaymentIntent::FeaturedOffer { user_id, offer_id } => {
                format!("{}:{}:{}", FEATURED_OFFER_TAG, user_id, offer_id)
            }
        }
    }

    /// Decode a reference produced by [`PaymentIntent::to_reference`].
    pub fn from_reference(reference: &str) -> Option<Self> {
        let parts: Vec<&str> = reference.trim().split(':').collect();
        match parts.as_slice() {
            [SUBSCRIPTION_TAG, user_id, plan, cycle] => Some(PaymentIntent::Subscription {
                user_id: user_id.parse().ok()?,
                plan: plan.parse().ok()?,
                cycle: cycle.parse().ok()?,
            }),
            [FEATURED_OFFER_TAG, user_id, offer_id] => Some(PaymentIntent::FeaturedOffer {
                user_id: user_id.parse().ok()?,
                offer_id: offer_id.parse().ok()?,
            }),
            _ => None,
        }
    }

    /// Resolve a confirmed payment back into an intent.
    ///
    /// `external_ref` is the provider's external reference (or the capturing
    /// user's id for order/capture providers), `descriptor` is the payment
    /// description or custom id. Tagged references win. Otherwise the legacy
    /// shapes are tried in order: `{user}_{offer}` in the descriptor, the same
    /// shape in the external reference, then `{plan}-{cycle}` in the descriptor
    /// with the user id in the external reference.
    pub fn resolve(external_ref: Option<&str>, descriptor: Option<&str>) -> Option<Self> {
        let external_ref = external_ref.map(str::trim).filter(|s| !s.is_empty());
        let descriptor = descriptor.map(str::trim).filter(|s| !s.is_empty());

        if let Some(intent) = descriptor
            .and_then(Self::from_reference)
            .or_else(|| external_ref.and_then(Self::from_reference))
        {
            return Some(intent);
        }

        if let Some((user_id, offer_id)) = descriptor.and_then(parse_legacy_feature) {
            return Some(PaymentIntent::FeaturedOffer { user_id, offer_id });
        }

        if let Some((user_id, offer_id)) = external_ref.and_then(parse_legacy_feature) {
            return Some(PaymentIntent::FeaturedOffer { user_id, offer_id });
        }

        let (plan, cycle) = descriptor.and_then(parse_legacy_plan)?;
        let user_id = external_ref?.parse().ok()?;
        Some(PaymentIntent::Subscription {
            user_id,
            plan,
            cycle,
        })
    }
}

fn split_once_exact(value: &str, sep: char) -> Option<(&str, &str)> {
    if value.matches(sep).count() != 1 {
        return None;
    }
    value.split_once(sep)
}

fn parse_legacy_feature(value: &str) -> Option<(i64, i64)> {
    let (user, offer) = split_once_exact(value, '_')?;
    Some((user.parse().ok()?, offer.parse().ok()?))
}

fn parse_legacy_plan(value: &str) -> Option<(PlanKey, BillingCycle)> {
    let (plan, cycle) = split_once_exact(value, '-')?;
    Some((plan.parse().ok()?, cycle.parse().ok()?))
}
