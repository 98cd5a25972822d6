//! Driven port for job requisition persistence.
//!
//! Filters and updates are sparse: only `Some` fields take part. Adapters
//! translate store constraint violations into domain errors before returning.

use async_trait::async_trait;

use crate::domain::{
    Error, JobRequisition, JobRequisitionFilter, JobRequisitionUpdate, NewJobRequisition,
    PolicyRule,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobRequisitionRepository: Send + Sync {
    /// Insert a requisition with both decisions pending.
    async fn create(&self, requisition: &NewJobRequisition) -> Result<JobRequisition, Error>;

    /// Requisitions matching `filter`. An empty result is not an error.
    async fn find(&self, filter: &JobRequisitionFilter) -> Result<Vec<JobRequisition>, Error>;

    /// Apply `update` to the requisition matching `filter`.
    ///
    /// Returns `None` when the filter matched nothing.
    async fn update(
        &self,
        filter: &JobRequisitionFilter,
        update: &JobRequisitionUpdate,
    ) -> Result<Option<JobRequisition>, Error>;

    /// Apply an update that sets the recruiter and store `role_grant` in the
    /// same transaction. Nothing is written when the filter matches nothing
    /// or a constraint rejects the update.
    async fn update_with_role_grant(
        &self,
        filter: &JobRequisitionFilter,
        update: &JobRequisitionUpdate,
        role_grant: &PolicyRule,
    ) -> Result<Option<JobRequisition>, Error>;
}
