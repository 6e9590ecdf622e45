//! Test utilities shared by use case and HTTP tests.
//!
//! This module provides:
//! - Test data factories for creating valid test fixtures
//! - In-memory repository implementations for mocking persistence
//! - Mock payment providers that record their calls
//! - A builder for an `AppState` wired entirely to the above

mod app_state_builder;
mod billing_mocks;
mod factories;

pub use app_state_builder::*;
pub use billing_mocks::*;
pub use factories::*;
