//! HTTP inbound adapter exposing REST endpoints.

pub mod analytics;
pub mod error;
pub mod form;
pub mod health;
pub mod state;

pub use error::ApiResult;
