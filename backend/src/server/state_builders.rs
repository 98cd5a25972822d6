//! Wiring of repositories, services, and the policy cache into HTTP state.

use std::sync::Arc;

use mockable::DefaultClock;

use hr_backend::domain::{
    Error, HiringWorkflowService, OrganisationService, PolicyAdministrationService, PolicyCache,
};
use hr_backend::inbound::http::state::HttpState;
use hr_backend::outbound::credentials::RandomCredentialIssuer;
use hr_backend::outbound::persistence::{
    DbPool, DieselJobApplicationRepository, DieselJobRequisitionRepository,
    DieselOrganisationRepository, DieselPolicyRepository,
};

/// Build the HTTP state over Diesel repositories.
///
/// The policy cache is loaded before any port is handed out, so the first
/// request already sees the stored policy.
///
/// # Errors
///
/// Returns the store error when the initial policy load fails.
pub async fn build_http_state(pool: &DbPool) -> Result<HttpState, Error> {
    let policy_repository = Arc::new(DieselPolicyRepository::new(pool.clone()));
    let policy = Arc::new(PolicyCache::new(policy_repository.clone()));
    policy.reload().await?;

    let hiring = Arc::new(HiringWorkflowService::new(
        Arc::new(DieselJobRequisitionRepository::new(pool.clone())),
        Arc::new(DieselJobApplicationRepository::new(pool.clone())),
        policy.clone(),
        Arc::new(RandomCredentialIssuer::new()),
        Arc::new(DefaultClock),
    ));
    let organisation = Arc::new(OrganisationService::new(
        Arc::new(DieselOrganisationRepository::new(pool.clone())),
        policy.clone(),
    ));
    let policies = Arc::new(PolicyAdministrationService::new(policy_repository, policy));

    Ok(HttpState {
        requisitions: hiring.clone(),
        requisitions_query: hiring.clone(),
        applications: hiring.clone(),
        applications_query: hiring,
        organisation: organisation.clone(),
        organisation_query: organisation,
        policies,
    })
}
