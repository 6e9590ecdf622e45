use crate::{adapters::persistence::PostgresPersistence, infra::db::init_db};

pub mod app;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod http_client;
pub mod mercadopago_adapter;
pub mod mercadopago_client;
pub mod paypal_adapter;
pub mod paypal_client;
pub mod setup;

pub use error::InfraError;

pub async fn postgres_persistence(database_url: &str) -> anyhow::Result<PostgresPersistence> {
    let pool = init_db(database_url).await?;
    let persistence = PostgresPersistence::new(pool);
    Ok(persistence)
}
