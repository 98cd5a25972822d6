//! Domain ports defining the edges of the hexagon.
//!
//! Driving ports (`*Command`, `*Query`, [`PolicyAdministration`]) are what
//! inbound adapters call. Driven ports (`*Repository`, [`CredentialIssuer`],
//! [`AuthorizationOracle`]) are what the domain needs from the outside world.
//! Every port returns the domain [`Error`](crate::domain::Error); adapters
//! translate their own failures before returning.

mod authorization_oracle;
mod credential_issuer;
mod hiring_workflow;
mod job_application_repository;
mod job_requisition_repository;
mod organisation_command;
mod organisation_repository;
mod policy_administration;
mod policy_repository;

pub use authorization_oracle::AuthorizationOracle;
#[cfg(test)]
pub use authorization_oracle::MockAuthorizationOracle;
pub use credential_issuer::CredentialIssuer;
#[cfg(test)]
pub use credential_issuer::MockCredentialIssuer;
#[cfg(test)]
pub use hiring_workflow::{
    MockJobApplicationCommand, MockJobApplicationQuery, MockJobRequisitionCommand,
    MockJobRequisitionQuery,
};
pub use hiring_workflow::{
    ApplicantDecisionOutcome, ApplicantDecisionRequest, ApplicationRef, ApprovalRequest,
    AssignRecruiterRequest, CreateApplicationRequest, CreateRequisitionRequest,
    HiringManagerDecisionRequest, JobApplicationCommand, JobApplicationQuery,
    JobRequisitionCommand, JobRequisitionQuery, RecruiterDecisionRequest,
    ScheduleInterviewRequest,
};
pub use job_application_repository::JobApplicationRepository;
#[cfg(test)]
pub use job_application_repository::MockJobApplicationRepository;
pub use job_requisition_repository::JobRequisitionRepository;
#[cfg(test)]
pub use job_requisition_repository::MockJobRequisitionRepository;
#[cfg(test)]
pub use organisation_command::{MockOrganisationCommand, MockOrganisationQuery};
pub use organisation_command::{CreatePositionRequest, OrganisationCommand, OrganisationQuery};
#[cfg(test)]
pub use organisation_repository::MockOrganisationRepository;
pub use organisation_repository::OrganisationRepository;
#[cfg(test)]
pub use policy_administration::MockPolicyAdministration;
pub use policy_administration::PolicyAdministration;
#[cfg(test)]
pub use policy_repository::MockPolicyRepository;
pub use policy_repository::PolicyRepository;
