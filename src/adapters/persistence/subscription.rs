use async_trait::async_trait;
use sqlx::Row;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::subscription::SubscriptionRepoTrait,
    domain::entities::subscription::{Subscription, SubscriptionUpsert},
};

fn row_to_subscription(row: sqlx::postgres::PgRow) -> Subscription {
    Subscription {
        user_id: row.get("user_id"),
        plan: row.get("plan"),
        period_end: row.get("period_end"),
        status: row.get("status"),
        payment_method: row.get("payment_method"),
        external_payment_id: row.get("external_payment_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const SELECT_COLS: &str = r#"
    user_id, plan, period_end, status, payment_method, external_payment_id,
    created_at, updated_at
"#;

#[async_trait]
impl SubscriptionRepoTrait for PostgresPersistence {
    async fn upsert(&self, input: &SubscriptionUpsert) -> AppResult<Subscription> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO subscriptions
                (user_id, plan, period_end, status, payment_method, external_payment_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id) DO UPDATE SET
                plan = EXCLUDED.plan,
                period_end = EXCLUDED.period_end,
                status = EXCLUDED.status,
                payment_method = EXCLUDED.payment_method,
                external_payment_id = EXCLUDED.external_payment_id,
                updated_at = CURRENT_TIMESTAMP
            RETURNING {}
            "#,
            SELECT_COLS
        ))
        .bind(input.user_id)
        .bind(input.plan.as_str())
        .bind(input.period_end)
        .bind(input.status)
        .bind(input.payment_method)
        .bind(&input.external_payment_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row_to_subscription(row))
    }

    async fn get_by_user(&self, user_id: i64) -> AppResult<Option<Subscription>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM subscriptions WHERE user_id = $1",
            SELECT_COLS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.map(row_to_subscription))
    }
}
