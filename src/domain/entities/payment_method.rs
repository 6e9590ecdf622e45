use serde::{Deserialize, Serialize};

use super::payment_provider::PaymentProvider;

/// How a subscription row was last paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_method")]
pub enum PaymentMethod {
    #[sqlx(rename = "mercadopago")]
    #[serde(rename = "mercadopago")]
    MercadoPago,
    #[sqlx(rename = "paypal")]
    #[serde(rename = "paypal")]
    PayPal,
    #[sqlx(rename = "admin_grant")]
    #[serde(rename = "admin_grant")]
    AdminGrant,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::MercadoPago => "mercadopago",
            PaymentMethod::PayPal => "paypal",
            PaymentMethod::AdminGrant => "admin_grant",
        }
    }
}

impl From<PaymentProvider> for PaymentMethod {
    fn from(provider: PaymentProvider) -> Self {
        match provider {
            PaymentProvider::MercadoPago => PaymentMethod::MercadoPago,
            PaymentProvider::PayPal => PaymentMethod::PayPal,
        }
    }
}
