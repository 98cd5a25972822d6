//! PostgreSQL-backed `OrganisationRepository` implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use uuid::Uuid;

use super::models::{DepartmentRow, DivisionRow, PositionRow, SupervisorEdgeRow};
use super::pool::DbPool;
use super::schema::{department, division, position, subordinate_supervisor_relationship};
use crate::domain::ports::OrganisationRepository;
use crate::domain::{
    Department, DepartmentId, Division, Error, NewPosition, Position, PositionId, TenantId,
};

/// Diesel-backed implementation of the organisation port.
#[derive(Clone)]
pub struct DieselOrganisationRepository {
    pool: DbPool,
}

impl DieselOrganisationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn supervisor_edges(position: &NewPosition) -> Vec<SupervisorEdgeRow> {
    position
        .supervisor_position_ids
        .iter()
        .map(|supervisor| SupervisorEdgeRow {
            tenant_id: position.tenant_id.into(),
            subordinate_position_id: position.id.into(),
            supervisor_position_id: (*supervisor).into(),
        })
        .collect()
}

fn group_edges(edges: Vec<SupervisorEdgeRow>) -> HashMap<Uuid, Vec<PositionId>> {
    let mut grouped: HashMap<Uuid, Vec<PositionId>> = HashMap::new();
    for edge in edges {
        grouped
            .entry(edge.subordinate_position_id)
            .or_default()
            .push(edge.supervisor_position_id.into());
    }
    grouped
}

#[async_trait]
impl OrganisationRepository for DieselOrganisationRepository {
    async fn create_division(&self, new: &Division) -> Result<Division, Error> {
        self.pool
            .within_deadline("division.create", async {
                let mut conn = self.pool.get().await?;
                let row = diesel::insert_into(division::table)
                    .values(DivisionRow::from(new))
                    .returning(DivisionRow::as_returning())
                    .get_result(&mut conn)
                    .await?;
                Ok(Division::from(row))
            })
            .await
    }

    async fn create_department(&self, new: &Department) -> Result<Department, Error> {
        self.pool
            .within_deadline("department.create", async {
                let mut conn = self.pool.get().await?;
                let row = diesel::insert_into(department::table)
                    .values(DepartmentRow::from(new))
                    .returning(DepartmentRow::as_returning())
                    .get_result(&mut conn)
                    .await?;
                Ok(Department::from(row))
            })
            .await
    }

    async fn create_position(&self, new: &NewPosition) -> Result<Position, Error> {
        let edges = supervisor_edges(new);
        self.pool
            .within_deadline("position.create", async {
                let mut conn = self.pool.get().await?;
                conn.transaction::<_, Error, _>(|conn| {
                    async move {
                        let row = diesel::insert_into(position::table)
                            .values(PositionRow::from(new))
                            .returning(PositionRow::as_returning())
                            .get_result(conn)
                            .await?;
                        if !edges.is_empty() {
                            diesel::insert_into(subordinate_supervisor_relationship::table)
                                .values(&edges)
                                .execute(conn)
                                .await?;
                        }
                        Ok(row.into_position(new.supervisor_position_ids.clone()))
                    }
                    .scope_boxed()
                })
                .await
            })
            .await
    }

    async fn list_positions(
        &self,
        tenant_id: TenantId,
        department_id: Option<DepartmentId>,
    ) -> Result<Vec<Position>, Error> {
        let tenant = Uuid::from(tenant_id);
        self.pool
            .within_deadline("position.list", async {
                let mut conn = self.pool.get().await?;
                let mut query = position::table
                    .filter(position::tenant_id.eq(tenant))
                    .select(PositionRow::as_select())
                    .order_by(position::title.asc())
                    .into_boxed();
                if let Some(department_id) = department_id {
                    query = query.filter(position::department_id.eq(Uuid::from(department_id)));
                }
                let rows: Vec<PositionRow> = query.load(&mut conn).await?;

                let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
                let edges: Vec<SupervisorEdgeRow> = subordinate_supervisor_relationship::table
                    .filter(subordinate_supervisor_relationship::tenant_id.eq(tenant))
                    .filter(subordinate_supervisor_relationship::subordinate_position_id.eq_any(&ids))
                    .select(SupervisorEdgeRow::as_select())
                    .load(&mut conn)
                    .await?;
                let mut grouped = group_edges(edges);

                Ok(rows
                    .into_iter()
                    .map(|row| {
                        let supervisors = grouped.remove(&row.id).unwrap_or_default();
                        row.into_position(supervisors)
                    })
                    .collect())
            })
            .await
    }
}
