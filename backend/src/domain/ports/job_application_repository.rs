//! Driven port for job application persistence, including onboarding.

use async_trait::async_trait;

use crate::domain::{
    Error, JobApplication, JobApplicationFilter, JobApplicationUpdate, NewJobApplication,
    OfferAcceptance, Onboarding,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobApplicationRepository: Send + Sync {
    /// Insert an application with no decisions recorded.
    async fn create(&self, application: &NewJobApplication) -> Result<JobApplication, Error>;

    /// Applications matching `filter`. An empty result is not an error.
    async fn find(&self, filter: &JobApplicationFilter) -> Result<Vec<JobApplication>, Error>;

    /// Apply `update` to the application matching `filter`.
    ///
    /// Returns `None` when the filter matched nothing.
    async fn update(
        &self,
        filter: &JobApplicationFilter,
        update: &JobApplicationUpdate,
    ) -> Result<Option<JobApplication>, Error>;

    /// Run the onboarding transaction for an accepted offer.
    ///
    /// Creates the user, assigns them to the requisition's position, marks the
    /// requisition filled, and records the acceptance. Either all of it
    /// commits or none of it does; a requisition that is already filled or an
    /// application that no longer matches yields `NOT-FOUND-ERROR`.
    async fn accept_offer(&self, acceptance: &OfferAcceptance) -> Result<Onboarding, Error>;
}
