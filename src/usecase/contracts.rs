use crate::domain::club::Club;
use crate::domain::notification::{Notification, NotificationPayload};
use crate::repository::errors::RepositoryError;
use crate::usecase::fcm::DispatchError;

#[cfg_attr(test, mockall::automock)]
pub trait ClubRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Club>, RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait DeviceTokenRepository: Send + Sync {
    /// Push tokens registered for a user. A user with no registered devices
    /// resolves to an empty list, not an error.
    async fn find_push_tokens(&self, user_id: &str) -> Result<Vec<String>, RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait PushDispatcher: Send + Sync {
    async fn send_to_topic(
        &self,
        topic: &str,
        payload: &NotificationPayload,
    ) -> Result<(), DispatchError>;

    /// `tokens` must not exceed the multicast ceiling of 500 per call.
    async fn send_multicast(
        &self,
        tokens: &[String],
        payload: &NotificationPayload,
    ) -> Result<(), DispatchError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait NotificationRepository: Send + Sync {
    /// Keyed create-if-absent write; an existing record with the same id is
    /// left untouched so redelivered triggers stay idempotent.
    async fn create(&self, notification: &Notification) -> Result<(), RepositoryError>;
}
