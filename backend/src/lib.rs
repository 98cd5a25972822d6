//! Multi-tenant HR hiring workflow backend.
//!
//! Hexagonal layout: [`domain`] holds the workflow rules and ports,
//! [`inbound`] the HTTP adapter, and [`outbound`] the PostgreSQL and
//! credential adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
