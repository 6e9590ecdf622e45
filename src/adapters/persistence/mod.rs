use sqlx::PgPool;

use crate::app_error::AppError;

pub mod offer;
pub mod plan_price;
pub mod subscription;

#[derive(Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    pub fn new(pool: PgPool) -> Self {
        PostgresPersistence { pool }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::NotFound,
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                // PostgreSQL check constraint violation (e.g., negative price)
                if msg.contains("violates check constraint") {
                    AppError::InvalidInput("Value out of allowed range".into())
                }
                // PostgreSQL not-null violation
                else if msg.contains("null value") && msg.contains("violates not-null") {
                    AppError::InvalidInput("Required field is missing".into())
                } else {
                    // Log the actual error for debugging, but don't expose details
                    tracing::error!(error = ?err, "Database error");
                    AppError::Database("Database operation failed".into())
                }
            }
            _ => {
                tracing::error!(error = ?err, "Database error");
                AppError::Database("Database operation failed".into())
            }
        }
    }
}
