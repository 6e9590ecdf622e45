use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder, Row};

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::offers::{OfferRepoTrait, SortDirection},
    domain::entities::offer::{OfferFilters, OfferSummary},
};

fn row_to_summary(row: sqlx::postgres::PgRow) -> OfferSummary {
    OfferSummary {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        location: row.get("location"),
        position: row.get("position"),
        level: row.get("level"),
        owner_user_id: row.get("owner_user_id"),
        published_at: row.get("published_at"),
        is_featured: row.get("is_featured"),
        featured_until: row.get("featured_until"),
    }
}

const SELECT_COLS: &str = r#"
    id, title, description, location, "position", level, owner_user_id,
    published_at, is_featured, featured_until
"#;

/// `%value%` with LIKE wildcards in the user input escaped
fn contains_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// WHERE clause for open, non-featured offers matching `filters`
fn push_open_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &OfferFilters) {
    qb.push(" WHERE status = 'open' AND is_featured = FALSE");
    if let Some(position) = &filters.position {
        qb.push(r#" AND "position" ILIKE "#)
            .push_bind(contains_pattern(position));
    }
    if let Some(location) = &filters.location {
        qb.push(" AND location ILIKE ")
            .push_bind(contains_pattern(location));
    }
    if let Some(level) = &filters.level {
        qb.push(" AND level = ").push_bind(level.clone());
    }
}

#[async_trait]
impl OfferRepoTrait for PostgresPersistence {
    async fn set_featured(&self, offer_id: i64, until: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE job_offers SET is_featured = TRUE, featured_until = $2 WHERE id = $1",
        )
        .bind(offer_id)
        .bind(until)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear_expired_featured(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE job_offers SET is_featured = FALSE WHERE is_featured = TRUE AND featured_until <= $1",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(result.rows_affected())
    }

    async fn get_owner(&self, offer_id: i64) -> AppResult<Option<i64>> {
        let owner: Option<i64> =
            sqlx::query_scalar("SELECT owner_user_id FROM job_offers WHERE id = $1")
                .bind(offer_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(AppError::from)?;
        Ok(owner)
    }

    async fn list_featured(&self, now: DateTime<Utc>, limit: i64) -> AppResult<Vec<OfferSummary>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM job_offers
            WHERE status = 'open' AND is_featured = TRUE AND featured_until > $1
            ORDER BY featured_until DESC
            LIMIT $2
            "#,
            SELECT_COLS
        ))
        .bind(now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rows.into_iter().map(row_to_summary).collect())
    }

    async fn list_open(
        &self,
        filters: &OfferFilters,
        sort: SortDirection,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<OfferSummary>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM job_offers", SELECT_COLS));
        push_open_filters(&mut qb, filters);
        qb.push(format!(" ORDER BY published_at {}, id {}", sort.as_sql(), sort.as_sql()));
        qb.push(" LIMIT ").push_bind(limit);
        qb.push(" OFFSET ").push_bind(offset);

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(rows.into_iter().map(row_to_summary).collect())
    }

    async fn count_open(&self, filters: &OfferFilters) -> AppResult<i64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM job_offers");
        push_open_filters(&mut qb, filters);

        let total: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(total)
    }
}
