//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` so they depend only on driving
//! ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    JobApplicationCommand, JobApplicationQuery, JobRequisitionCommand, JobRequisitionQuery,
    OrganisationCommand, OrganisationQuery, PolicyAdministration,
};

/// Port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub requisitions: Arc<dyn JobRequisitionCommand>,
    pub requisitions_query: Arc<dyn JobRequisitionQuery>,
    pub applications: Arc<dyn JobApplicationCommand>,
    pub applications_query: Arc<dyn JobApplicationQuery>,
    pub organisation: Arc<dyn OrganisationCommand>,
    pub organisation_query: Arc<dyn OrganisationQuery>,
    pub policies: Arc<dyn PolicyAdministration>,
}
