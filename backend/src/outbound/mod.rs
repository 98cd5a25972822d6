//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **credentials**: credential material for newly onboarded users
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no workflow rules.

pub mod credentials;
pub mod persistence;
