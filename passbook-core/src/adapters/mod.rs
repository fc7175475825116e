//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - HTTP client for a remote balance service
//! - Demo provider simulating an unreliable service
//! - Fixed provider with scripted answers (offline runs and tests)

pub mod demo;
pub mod fixed;
pub mod http;

#[cfg(test)]
pub mod http_mock;

pub use demo::DemoBalanceProvider;
pub use fixed::FixedBalanceProvider;
pub use http::HttpBalanceProvider;
