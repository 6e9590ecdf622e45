pub mod checkout;
pub mod offers;
pub mod plan_pricing;
pub mod reconciliation;
pub mod subscription;
