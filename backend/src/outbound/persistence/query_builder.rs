//! Parameterised statements over tenant-scoped tables.
//!
//! Repositories turn sparse domain filters and updates into [`Condition`] and
//! [`Assignment`] lists; this module renders them into positional SQL. A
//! statement that does not constrain the table's tenant column is refused
//! with an internal error before any SQL is produced, so an omitted tenant
//! can never widen a read or write across tenants.
//!
//! Placeholders are numbered in encounter order from `$1`. For `UPDATE`, the
//! `SET` values take `$1..$N` and the `WHERE` values continue from `$N+1`,
//! giving one flat parameter list.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::pg::Pg;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::sql_types;
use uuid::Uuid;

use crate::domain::Error;

/// A bindable parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SqlValue {
    Uuid(Uuid),
    Text(String),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
}

impl From<Uuid> for SqlValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Predicate {
    Equals(SqlValue),
    IsNull,
}

/// One `WHERE` term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Condition {
    column: &'static str,
    predicate: Predicate,
}

impl Condition {
    pub(crate) fn equals(column: &'static str, value: impl Into<SqlValue>) -> Self {
        Self {
            column,
            predicate: Predicate::Equals(value.into()),
        }
    }

    pub(crate) fn is_null(column: &'static str) -> Self {
        Self {
            column,
            predicate: Predicate::IsNull,
        }
    }
}

/// One `SET` term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Assignment {
    column: &'static str,
    value: SqlValue,
}

impl Assignment {
    pub(crate) fn new(column: &'static str, value: impl Into<SqlValue>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }
}

/// Shape of a table the builder may address.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TenantScopedTable {
    pub name: &'static str,
    pub tenant_column: &'static str,
    /// Every selectable column, in the order rows are returned.
    pub columns: &'static [&'static str],
}

impl TenantScopedTable {
    fn ensure_column(&self, column: &str) -> Result<(), Error> {
        if self.columns.contains(&column) {
            Ok(())
        } else {
            Err(Error::internal(format!(
                "column {column} is not part of {}",
                self.name
            )))
        }
    }

    fn ensure_tenant_scoped(&self, conditions: &[Condition]) -> Result<(), Error> {
        let scoped = conditions.iter().any(|condition| {
            condition.column == self.tenant_column
                && matches!(condition.predicate, Predicate::Equals(_))
        });
        if scoped {
            Ok(())
        } else {
            Err(Error::internal(format!(
                "statement against {} is missing its {} condition",
                self.name, self.tenant_column
            )))
        }
    }
}

/// Rendered SQL plus its positional parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Statement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl Statement {
    /// Bind every parameter in order onto a raw Diesel query.
    pub(crate) fn into_query(self) -> BoxedSqlQuery<'static, Pg, SqlQuery> {
        self.params.into_iter().fold(
            diesel::sql_query(self.sql).into_boxed::<Pg>(),
            |query, value| match value {
                SqlValue::Uuid(v) => query.bind::<sql_types::Uuid, _>(v),
                SqlValue::Text(v) => query.bind::<sql_types::Text, _>(v),
                SqlValue::Date(v) => query.bind::<sql_types::Date, _>(v),
                SqlValue::Timestamp(v) => query.bind::<sql_types::Timestamptz, _>(v),
            },
        )
    }
}

/// `column = $n`.
fn placeholder(column: &str, position: usize) -> String {
    format!("{column} = ${position}")
}

fn push_where(
    table: &TenantScopedTable,
    sql: &mut String,
    params: &mut Vec<SqlValue>,
    conditions: &[Condition],
) -> Result<(), Error> {
    for (index, condition) in conditions.iter().enumerate() {
        table.ensure_column(condition.column)?;
        sql.push_str(if index == 0 { " WHERE " } else { " AND " });
        match &condition.predicate {
            Predicate::Equals(value) => {
                params.push(value.clone());
                sql.push_str(&placeholder(condition.column, params.len()));
            }
            Predicate::IsNull => {
                sql.push_str(condition.column);
                sql.push_str(" IS NULL");
            }
        }
    }
    Ok(())
}

/// `SELECT` every column of `table` matching all `conditions`.
pub(crate) fn select(
    table: &TenantScopedTable,
    conditions: &[Condition],
) -> Result<Statement, Error> {
    table.ensure_tenant_scoped(conditions)?;
    let mut sql = format!("SELECT {} FROM {}", table.columns.join(", "), table.name);
    let mut params = Vec::new();
    push_where(table, &mut sql, &mut params, conditions)?;
    Ok(Statement { sql, params })
}

/// `UPDATE` rows of `table` matching all `conditions`, returning the updated
/// rows.
pub(crate) fn update(
    table: &TenantScopedTable,
    assignments: &[Assignment],
    conditions: &[Condition],
) -> Result<Statement, Error> {
    table.ensure_tenant_scoped(conditions)?;
    if assignments.is_empty() {
        return Err(Error::internal(format!(
            "update of {} has no assignments",
            table.name
        )));
    }

    let mut sql = format!("UPDATE {} SET ", table.name);
    let mut params = Vec::with_capacity(assignments.len() + conditions.len());
    for (index, assignment) in assignments.iter().enumerate() {
        table.ensure_column(assignment.column)?;
        if index > 0 {
            sql.push_str(", ");
        }
        params.push(assignment.value.clone());
        sql.push_str(&placeholder(assignment.column, params.len()));
    }
    push_where(table, &mut sql, &mut params, conditions)?;
    sql.push_str(" RETURNING ");
    sql.push_str(&table.columns.join(", "));
    Ok(Statement { sql, params })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::{fixture, rstest};

    #[fixture]
    fn table() -> TenantScopedTable {
        TenantScopedTable {
            name: "job_requisition",
            tenant_column: "tenant_id",
            columns: &["id", "tenant_id", "supervisor", "supervisor_decision", "filled_by"],
        }
    }

    #[rstest]
    fn select_numbers_placeholders_in_encounter_order(table: TenantScopedTable) {
        let tenant = Uuid::new_v4();
        let supervisor = Uuid::new_v4();
        let statement = select(
            &table,
            &[
                Condition::equals("tenant_id", tenant),
                Condition::equals("supervisor", supervisor),
            ],
        )
        .expect("statement");

        assert_eq!(
            statement.sql,
            "SELECT id, tenant_id, supervisor, supervisor_decision, filled_by \
             FROM job_requisition WHERE tenant_id = $1 AND supervisor = $2"
        );
        assert_eq!(
            statement.params,
            vec![SqlValue::Uuid(tenant), SqlValue::Uuid(supervisor)]
        );
    }

    #[rstest]
    fn update_numbers_set_before_where(table: TenantScopedTable) {
        let tenant = Uuid::new_v4();
        let id = Uuid::new_v4();
        let statement = update(
            &table,
            &[Assignment::new("supervisor_decision", "APPROVED")],
            &[
                Condition::equals("tenant_id", tenant),
                Condition::equals("id", id),
                Condition::is_null("filled_by"),
            ],
        )
        .expect("statement");

        assert_eq!(
            statement.sql,
            "UPDATE job_requisition SET supervisor_decision = $1 \
             WHERE tenant_id = $2 AND id = $3 AND filled_by IS NULL \
             RETURNING id, tenant_id, supervisor, supervisor_decision, filled_by"
        );
        assert_eq!(
            statement.params,
            vec![
                SqlValue::Text("APPROVED".to_owned()),
                SqlValue::Uuid(tenant),
                SqlValue::Uuid(id),
            ]
        );
    }

    #[rstest]
    fn missing_tenant_condition_is_refused(table: TenantScopedTable) {
        let err = select(&table, &[Condition::equals("id", Uuid::new_v4())])
            .expect_err("unscoped select");
        assert_eq!(err.code(), ErrorCode::InternalError);

        let err = update(
            &table,
            &[Assignment::new("supervisor_decision", "REJECTED")],
            &[],
        )
        .expect_err("unscoped update");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[rstest]
    fn tenant_is_null_does_not_count_as_scoping(table: TenantScopedTable) {
        let err = select(&table, &[Condition::is_null("tenant_id")]).expect_err("unscoped");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[rstest]
    fn empty_update_is_refused(table: TenantScopedTable) {
        let err = update(&table, &[], &[Condition::equals("tenant_id", Uuid::new_v4())])
            .expect_err("nothing to set");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[rstest]
    fn unknown_column_is_refused(table: TenantScopedTable) {
        let err = select(
            &table,
            &[
                Condition::equals("tenant_id", Uuid::new_v4()),
                Condition::equals("salary", "1"),
            ],
        )
        .expect_err("unknown column");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
