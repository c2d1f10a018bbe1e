use thiserror::Error;

use crate::repository::errors::RepositoryError;

/// Fatal outcomes of a notifier invocation. Skips (missing organizer, club
/// not found) are successes, and delivery failures are recovered internally;
/// only these two paths propagate to the trigger runtime for redelivery.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("club lookup failed: {0}")]
    ClubLookup(#[source] RepositoryError),

    #[error("failed to persist notification record: {0}")]
    Persistence(#[source] RepositoryError),
}
