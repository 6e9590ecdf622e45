pub mod billing_cycle;
pub mod offer;
pub mod payment_intent;
pub mod payment_method;
pub mod payment_mode;
pub mod payment_provider;
pub mod plan_key;
pub mod subscription;
