//! Per-test databases on the embedded cluster.
//!
//! Each test gets its own database so suites can run in parallel without
//! sharing rows. Schema setup goes through the crate's embedded migrations,
//! the same path the server takes at startup.

use hr_backend::outbound::persistence::run_migrations;
use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use uuid::Uuid;

use super::format_postgres_error;

const ADMIN_DATABASE: &str = "postgres";

/// Create an empty database, migrate it, and return its URL.
pub fn migrated_database(cluster: &TestCluster) -> Result<String, String> {
    let connection = cluster.connection();
    let name = format!("hr_test_{}", Uuid::new_v4().simple());

    let mut admin = Client::connect(&connection.database_url(ADMIN_DATABASE), NoTls)
        .map_err(|err| format_postgres_error(&err))?;
    admin
        .batch_execute(&format!("CREATE DATABASE {name}"))
        .map_err(|err| format_postgres_error(&err))?;

    let url = connection.database_url(&name);
    run_migrations(&url).map_err(|err| format!("migration: {err}"))?;
    Ok(url)
}
