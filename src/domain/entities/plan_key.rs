use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Subscription plan sold to each side of the marketplace.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PlanKey {
    /// Clubs and agencies publishing job offers
    Ofertante,
    /// Players applying to offers
    Postulante,
}

impl PlanKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanKey::Ofertante => "ofertante",
            PlanKey::Postulante => "postulante",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PlanKey::Ofertante => "Ofertante",
            PlanKey::Postulante => "Postulante",
        }
    }
}
