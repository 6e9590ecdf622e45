use async_trait::async_trait;
use sqlx::Row;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::plan_pricing::{PlanPriceProfile, PlanPriceRepoTrait},
    domain::entities::billing_cycle::BillingCycle,
};

fn row_to_profile(row: sqlx::postgres::PgRow) -> AppResult<PlanPriceProfile> {
    let cycle: String = row.get("billing_cycle");
    let billing_cycle: BillingCycle = cycle.parse().map_err(|_| {
        tracing::error!(billing_cycle = %cycle, "Unknown billing cycle in subscription_plans");
        AppError::Internal(format!("Unknown billing cycle: {}", cycle))
    })?;

    Ok(PlanPriceProfile {
        id: row.get("id"),
        billing_cycle,
        price_usd_cents: row.get("price_usd_cents"),
        price_local_cents: row.get("price_local_cents"),
        updated_at: row.get("updated_at"),
    })
}

const SELECT_COLS: &str = "id, billing_cycle, price_usd_cents, price_local_cents, updated_at";

#[async_trait]
impl PlanPriceRepoTrait for PostgresPersistence {
    async fn get_by_cycle(&self, cycle: BillingCycle) -> AppResult<Option<PlanPriceProfile>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM subscription_plans WHERE billing_cycle = $1",
            SELECT_COLS
        ))
        .bind(cycle.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        row.map(row_to_profile).transpose()
    }

    async fn list(&self) -> AppResult<Vec<PlanPriceProfile>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM subscription_plans ORDER BY id",
            SELECT_COLS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;
        rows.into_iter().map(row_to_profile).collect()
    }

    async fn update_prices(
        &self,
        id: i64,
        price_usd_cents: i64,
        price_local_cents: i64,
    ) -> AppResult<Option<PlanPriceProfile>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE subscription_plans SET
                price_usd_cents = $2,
                price_local_cents = $3,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING {}
            "#,
            SELECT_COLS
        ))
        .bind(id)
        .bind(price_usd_cents)
        .bind(price_local_cents)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        row.map(row_to_profile).transpose()
    }
}
