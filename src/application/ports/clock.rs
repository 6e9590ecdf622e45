use chrono::{DateTime, Utc};

/// Source of "now" for anything that computes expiries.
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
