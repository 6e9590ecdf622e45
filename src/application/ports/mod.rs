pub mod clock;
pub mod payment_provider;
