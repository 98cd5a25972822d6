//! Organisation service implementing the organisation driving ports.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::ports::{
    AuthorizationOracle, CreatePositionRequest, OrganisationCommand, OrganisationQuery,
    OrganisationRepository,
};
use super::{
    Actor, Department, DepartmentId, Division, DivisionId, Error, NewPosition, Permission,
    Position, PositionId, validate_distinct, validate_name,
};

/// Service backing [`OrganisationCommand`] and [`OrganisationQuery`].
pub struct OrganisationService<R> {
    repository: Arc<R>,
    oracle: Arc<dyn AuthorizationOracle>,
}

impl<R> OrganisationService<R> {
    pub fn new(repository: Arc<R>, oracle: Arc<dyn AuthorizationOracle>) -> Self {
        Self { repository, oracle }
    }
}

#[async_trait]
impl<R> OrganisationCommand for OrganisationService<R>
where
    R: OrganisationRepository,
{
    async fn create_division(&self, actor: Actor, name: String) -> Result<Division, Error> {
        self.oracle
            .authorize(&actor, Permission::MANAGE_ORGANISATION)
            .await?;
        validate_name("name", &name)?;
        let division = self
            .repository
            .create_division(&Division {
                id: DivisionId::random(),
                tenant_id: actor.tenant_id,
                name,
            })
            .await?;
        info!(division_id = %division.id, "division created");
        Ok(division)
    }

    async fn create_department(
        &self,
        actor: Actor,
        division_id: DivisionId,
        name: String,
    ) -> Result<Department, Error> {
        self.oracle
            .authorize(&actor, Permission::MANAGE_ORGANISATION)
            .await?;
        validate_name("name", &name)?;
        let department = self
            .repository
            .create_department(&Department {
                id: DepartmentId::random(),
                tenant_id: actor.tenant_id,
                division_id,
                name,
            })
            .await?;
        info!(department_id = %department.id, "department created");
        Ok(department)
    }

    async fn create_position(&self, request: CreatePositionRequest) -> Result<Position, Error> {
        let actor = request.actor;
        self.oracle
            .authorize(&actor, Permission::MANAGE_ORGANISATION)
            .await?;
        validate_name("title", &request.title)?;
        validate_distinct("supervisorPositionIds", &request.supervisor_position_ids)?;
        let position = self
            .repository
            .create_position(&NewPosition {
                id: PositionId::random(),
                tenant_id: actor.tenant_id,
                department_id: request.department_id,
                title: request.title,
                supervisor_position_ids: request.supervisor_position_ids,
            })
            .await?;
        info!(
            position_id = %position.id,
            supervisors = position.supervisor_position_ids.len(),
            "position created"
        );
        Ok(position)
    }
}

#[async_trait]
impl<R> OrganisationQuery for OrganisationService<R>
where
    R: OrganisationRepository,
{
    async fn list_positions(
        &self,
        actor: Actor,
        department_id: Option<DepartmentId>,
    ) -> Result<Vec<Position>, Error> {
        self.oracle
            .authorize(&actor, Permission::READ_ORGANISATION)
            .await?;
        self.repository
            .list_positions(actor.tenant_id, department_id)
            .await
    }
}
