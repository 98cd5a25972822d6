//! Driving ports for organisation management.

use async_trait::async_trait;

use crate::domain::{
    Actor, Department, DepartmentId, Division, DivisionId, Error, Position, PositionId,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePositionRequest {
    pub actor: Actor,
    pub department_id: DepartmentId,
    pub title: String,
    pub supervisor_position_ids: Vec<PositionId>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganisationCommand: Send + Sync {
    async fn create_division(&self, actor: Actor, name: String) -> Result<Division, Error>;

    async fn create_department(
        &self,
        actor: Actor,
        division_id: DivisionId,
        name: String,
    ) -> Result<Department, Error>;

    async fn create_position(&self, request: CreatePositionRequest) -> Result<Position, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganisationQuery: Send + Sync {
    async fn list_positions(
        &self,
        actor: Actor,
        department_id: Option<DepartmentId>,
    ) -> Result<Vec<Position>, Error>;
}
