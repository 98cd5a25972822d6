//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain's driven ports, backed by
//! PostgreSQL via `diesel-async` and `bb8` pooling.
//!
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//!   private to this module.
//! - Sparse reads and updates of requisitions and applications go through
//!   the tenant-scoped query builder (`query_builder.rs`).
//! - Store errors become domain [`Error`](crate::domain::Error) values in
//!   `constraint_errors.rs`, which turns named constraint violations into
//!   the user-facing messages clients see.
//!
//! # Example
//!
//! ```no_run
//! use hr_backend::outbound::persistence::{DbPool, DieselJobRequisitionRepository, PoolConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/hr")).await?;
//! let requisitions = DieselJobRequisitionRepository::new(pool);
//! # let _ = requisitions;
//! # Ok(())
//! # }
//! ```

mod constraint_errors;
mod diesel_job_application_repository;
mod diesel_job_requisition_repository;
mod diesel_organisation_repository;
mod diesel_policy_repository;
mod migrations;
mod models;
mod pool;
mod query_builder;
mod schema;

pub use diesel_job_application_repository::DieselJobApplicationRepository;
pub use diesel_job_requisition_repository::DieselJobRequisitionRepository;
pub use diesel_organisation_repository::DieselOrganisationRepository;
pub use diesel_policy_repository::DieselPolicyRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
