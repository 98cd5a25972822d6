//! Driven port for organisational unit persistence.

use async_trait::async_trait;

use crate::domain::{
    Department, DepartmentId, Division, Error, NewPosition, Position, TenantId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganisationRepository: Send + Sync {
    async fn create_division(&self, division: &Division) -> Result<Division, Error>;

    async fn create_department(&self, department: &Department) -> Result<Department, Error>;

    /// Insert a position and its supervisor edges atomically.
    async fn create_position(&self, position: &NewPosition) -> Result<Position, Error>;

    /// Positions in a tenant, optionally restricted to one department.
    async fn list_positions(
        &self,
        tenant_id: TenantId,
        department_id: Option<DepartmentId>,
    ) -> Result<Vec<Position>, Error>;
}
