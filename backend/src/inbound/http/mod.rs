//! HTTP inbound adapter exposing the hiring REST endpoints.

pub mod applications;
pub mod error;
pub mod health;
pub mod organisation;
pub mod policies;
pub mod requisitions;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
