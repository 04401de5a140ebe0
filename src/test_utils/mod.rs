//! Test utilities shared by the unit and HTTP tests.
//!
//! - In-memory persistence implementing every repository trait
//! - A scripted key generator for forcing collisions
//! - `TestAppStateBuilder` for driving routes through `axum-test`

mod app_state_builder;
mod persistence_mocks;

pub use app_state_builder::*;
pub use persistence_mocks::*;
