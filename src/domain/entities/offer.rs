use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// How long a paid feature keeps an offer at the top of the listing.
pub const FEATURE_WINDOW_DAYS: i64 = 7;

/// Expiry of a feature purchased at `now`.
pub fn featured_until(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(FEATURE_WINDOW_DAYS)
}

/// Listing projection of a `job_offers` row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferSummary {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub position: Option<String>,
    pub level: Option<String>,
    pub owner_user_id: i64,
    pub published_at: DateTime<Utc>,
    pub is_featured: bool,
    pub featured_until: Option<DateTime<Utc>>,
}

impl OfferSummary {
    /// The flag alone may be stale until the next sweep; the expiry decides.
    pub fn is_currently_featured(&self, now: DateTime<Utc>) -> bool {
        self.is_featured && self.featured_until.is_some_and(|until| until > now)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferFilters {
    pub position: Option<String>,
    pub location: Option<String>,
    pub level: Option<String>,
}
