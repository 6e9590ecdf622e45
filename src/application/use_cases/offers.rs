use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::clock::ClockPort,
    domain::entities::offer::{OfferFilters, OfferSummary},
};

/// Featured offers shown above the regular listing
pub const FEATURED_LISTING_LIMIT: i64 = 6;
pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListOffersInput {
    pub filters: OfferFilters,
    pub sort: SortDirection,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OfferListing {
    pub featured_offers: Vec<OfferSummary>,
    pub offers: Vec<OfferSummary>,
    pub total_pages: i64,
    pub current_page: i64,
}

// ============================================================================
// Repository Trait
// ============================================================================

/// Access to the externally owned `job_offers` table. Only the featured
/// columns are ever written.
#[async_trait]
pub trait OfferRepoTrait: Send + Sync {
    /// Returns false when no offer has this id
    async fn set_featured(&self, offer_id: i64, until: DateTime<Utc>) -> AppResult<bool>;
    /// Clears the flag on every offer whose window ended at or before `now`
    async fn clear_expired_featured(&self, now: DateTime<Utc>) -> AppResult<u64>;
    async fn get_owner(&self, offer_id: i64) -> AppResult<Option<i64>>;
    async fn list_featured(&self, now: DateTime<Utc>, limit: i64) -> AppResult<Vec<OfferSummary>>;
    async fn list_open(
        &self,
        filters: &OfferFilters,
        sort: SortDirection,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<OfferSummary>>;
    async fn count_open(&self, filters: &OfferFilters) -> AppResult<i64>;
}

// ============================================================================
// Use Cases
// ============================================================================

#[derive(Clone)]
pub struct OfferUseCases {
    repo: Arc<dyn OfferRepoTrait>,
    clock: Arc<dyn ClockPort>,
}

impl OfferUseCases {
    pub fn new(repo: Arc<dyn OfferRepoTrait>, clock: Arc<dyn ClockPort>) -> Self {
        Self { repo, clock }
    }

    /// Expire stale featured flags. Runs before every listing read.
    pub async fn sweep_expired_features(&self) -> AppResult<u64> {
        let cleared = self.repo.clear_expired_featured(self.clock.now()).await?;
        tracing::debug!(cleared, "Swept expired featured offers");
        Ok(cleared)
    }

    pub async fn list_offers(&self, input: &ListOffersInput) -> AppResult<OfferListing> {
        let page = input.page.unwrap_or(1);
        if page < 1 {
            return Err(AppError::InvalidInput("page must be at least 1".into()));
        }
        let limit = input.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(AppError::InvalidInput(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        self.sweep_expired_features().await?;

        let now = self.clock.now();
        let featured_offers = self.repo.list_featured(now, FEATURED_LISTING_LIMIT).await?;

        let total = self.repo.count_open(&input.filters).await?;
        let offset = (page - 1).saturating_mul(limit);
        let offers = self
            .repo
            .list_open(&input.filters, input.sort, limit, offset)
            .await?;

        Ok(OfferListing {
            featured_offers,
            offers,
            total_pages: (total + limit - 1) / limit,
            current_page: page,
        })
    }
}
