//! Fixture rows for hiring workflow suites.
//!
//! Seeds one tenant with an organisation chart, a position to hire into,
//! and the staff who move a requisition through the workflow. The recruiter
//! is seeded without a role: it is granted when HR assigns them.

use postgres::{Client, NoTls};
use uuid::Uuid;

use super::format_postgres_error;

/// Title of the seeded position every requisition is raised for.
pub const POSITION_TITLE: &str = "Platform Engineer";

/// Identifiers of a seeded tenant.
#[derive(Debug, Clone)]
pub struct SeededTenant {
    pub tenant_id: Uuid,
    pub department_id: Uuid,
    pub position_id: Uuid,
    pub hiring_manager: Uuid,
    pub supervisor: Uuid,
    pub hr_approver: Uuid,
    pub recruiter: Uuid,
}

fn insert_user(client: &mut Client, tenant_id: Uuid, email: &str) -> Result<Uuid, String> {
    let id = Uuid::new_v4();
    client
        .execute(
            "INSERT INTO user_account (id, tenant_id, email, password, totp_secret_key) \
             VALUES ($1, $2, $3, 'seeded', 'seeded')",
            &[&id, &tenant_id, &email],
        )
        .map_err(|err| format_postgres_error(&err))?;
    Ok(id)
}

fn grant(client: &mut Client, user: Uuid, role: &str, tenant_id: Uuid) -> Result<(), String> {
    client
        .execute(
            "INSERT INTO casbin_rule (ptype, v0, v1, v2) VALUES ('g', $1, $2, $3)",
            &[&user.to_string(), &role, &tenant_id.to_string()],
        )
        .map(|_| ())
        .map_err(|err| format_postgres_error(&err))
}

/// Seed a tenant called `name` with its organisation and staff.
pub fn seed_tenant(url: &str, name: &str) -> Result<SeededTenant, String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    let tenant_id = Uuid::new_v4();
    let division_id = Uuid::new_v4();
    let department_id = Uuid::new_v4();
    let position_id = Uuid::new_v4();

    client
        .execute(
            "INSERT INTO tenant (id, name) VALUES ($1, $2)",
            &[&tenant_id, &name],
        )
        .map_err(|err| format_postgres_error(&err))?;
    client
        .execute(
            "INSERT INTO division (id, tenant_id, name) VALUES ($1, $2, 'Engineering')",
            &[&division_id, &tenant_id],
        )
        .map_err(|err| format_postgres_error(&err))?;
    client
        .execute(
            "INSERT INTO department (id, tenant_id, division_id, name) \
             VALUES ($1, $2, $3, 'Platform')",
            &[&department_id, &tenant_id, &division_id],
        )
        .map_err(|err| format_postgres_error(&err))?;
    client
        .execute(
            "INSERT INTO position (id, tenant_id, title, department_id) VALUES ($1, $2, $3, $4)",
            &[&position_id, &tenant_id, &POSITION_TITLE, &department_id],
        )
        .map_err(|err| format_postgres_error(&err))?;

    let hiring_manager = insert_user(&mut client, tenant_id, &format!("manager@{name}.test"))?;
    let supervisor = insert_user(&mut client, tenant_id, &format!("supervisor@{name}.test"))?;
    let hr_approver = insert_user(&mut client, tenant_id, &format!("hr@{name}.test"))?;
    let recruiter = insert_user(&mut client, tenant_id, &format!("recruiter@{name}.test"))?;

    grant(&mut client, hiring_manager, "HIRING_MANAGER", tenant_id)?;
    grant(&mut client, supervisor, "SUPERVISOR", tenant_id)?;
    grant(&mut client, hr_approver, "HR_APPROVER", tenant_id)?;

    Ok(SeededTenant {
        tenant_id,
        department_id,
        position_id,
        hiring_manager,
        supervisor,
        hr_approver,
        recruiter,
    })
}

/// Run a `SELECT count(*)` style query and return the count.
pub fn count(
    url: &str,
    query: &str,
    params: &[&(dyn postgres::types::ToSql + Sync)],
) -> Result<i64, String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .query_one(query, params)
        .map(|row| row.get::<_, i64>(0))
        .map_err(|err| format_postgres_error(&err))
}

/// Fetch a single text column.
pub fn text(
    url: &str,
    query: &str,
    params: &[&(dyn postgres::types::ToSql + Sync)],
) -> Result<Option<String>, String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .query_opt(query, params)
        .map(|row| row.map(|r| r.get::<_, String>(0)))
        .map_err(|err| format_postgres_error(&err))
}
