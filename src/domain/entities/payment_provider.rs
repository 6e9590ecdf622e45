use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// External payment processor used for a checkout.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum PaymentProvider {
    /// Preference/webhook style provider, charges in the local currency
    #[serde(rename = "mercadopago")]
    #[strum(serialize = "mercadopago")]
    MercadoPago,
    /// Order/capture style provider, charges in USD
    #[serde(rename = "paypal")]
    #[strum(serialize = "paypal")]
    PayPal,
}
