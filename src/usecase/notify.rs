use futures::future::join_all;

use crate::domain::club::Club;
use crate::domain::event::EventFields;
use crate::domain::notification::{Notification, NotificationPayload};
use crate::usecase::contracts::{
    ClubRepository, DeviceTokenRepository, NotificationRepository, PushDispatcher,
};
use crate::usecase::error::NotifyError;

/// Multicast batch ceiling of the push platform.
pub const MAX_MULTICAST_TOKENS: usize = 500;

/// Reacts to a new event record: resolves the organizing club, composes the
/// push payload, attempts topic delivery with a per-token multicast fallback,
/// and persists one notification record with per-subscriber read state.
pub struct EventCreatedNotifier<C, T, P, N>
where
    C: ClubRepository,
    T: DeviceTokenRepository,
    P: PushDispatcher,
    N: NotificationRepository,
{
    club_repository: C,
    token_repository: T,
    push_dispatcher: P,
    notification_repository: N,
}

impl<C, T, P, N> EventCreatedNotifier<C, T, P, N>
where
    C: ClubRepository,
    T: DeviceTokenRepository,
    P: PushDispatcher,
    N: NotificationRepository,
{
    pub fn new(
        club_repository: C,
        token_repository: T,
        push_dispatcher: P,
        notification_repository: N,
    ) -> Self {
        Self {
            club_repository,
            token_repository,
            push_dispatcher,
            notification_repository,
        }
    }

    #[tracing::instrument(skip(self, event), fields(%event_id))]
    pub async fn handle_event_created(
        &self,
        event_id: &str,
        event: &EventFields,
    ) -> Result<(), NotifyError> {
        tracing::debug!("handling event-created trigger");

        let Some(club_id) = event.organizer_id.as_deref().filter(|id| !id.is_empty()) else {
            tracing::info!("event has no organizer id, skipping notification");
            return Ok(());
        };

        let club = match self
            .club_repository
            .find_by_id(club_id)
            .await
            .map_err(NotifyError::ClubLookup)?
        {
            Some(club) => club,
            None => {
                tracing::info!(%club_id, "organizing club not found, skipping notification");
                return Ok(());
            }
        };

        let payload = NotificationPayload::compose(event_id, &club, event);
        let topic = format!("club_{club_id}");

        match self.push_dispatcher.send_to_topic(&topic, &payload).await {
            Ok(()) => {
                tracing::info!(%topic, "topic push sent");
            }
            Err(e) => {
                tracing::warn!(%topic, error = %e, "topic push failed, falling back to multicast");
                self.multicast_fallback(&club, &payload).await;
            }
        }

        let notification = Notification::for_event(event_id, &club, &payload);
        self.notification_repository
            .create(&notification)
            .await
            .map_err(NotifyError::Persistence)?;

        tracing::info!(
            notification_id = %notification.id,
            subscribers = notification.read_status.len(),
            "notification record persisted"
        );
        Ok(())
    }

    /// Per-token delivery to every subscriber in the club snapshot. Token
    /// lookups run concurrently, as do the chunked multicast sends. Every
    /// failure here is logged and swallowed so the notification record is
    /// still written afterwards.
    async fn multicast_fallback(&self, club: &Club, payload: &NotificationPayload) {
        let lookups = club.subscribers.iter().map(|user_id| async move {
            match self.token_repository.find_push_tokens(user_id).await {
                Ok(tokens) => tokens,
                Err(e) => {
                    tracing::warn!(%user_id, error = %e, "token lookup failed");
                    Vec::new()
                }
            }
        });
        let tokens: Vec<String> = join_all(lookups).await.into_iter().flatten().collect();

        if tokens.is_empty() {
            tracing::info!(club_id = %club.id, "no device tokens resolved, skipping multicast");
            return;
        }

        let chunks = chunk_tokens(&tokens, MAX_MULTICAST_TOKENS);
        let sends = chunks
            .iter()
            .map(|chunk| self.push_dispatcher.send_multicast(chunk, payload));

        let mut sent = 0usize;
        for result in join_all(sends).await {
            match result {
                Ok(()) => sent += 1,
                Err(e) => tracing::warn!(error = %e, "multicast chunk send failed"),
            }
        }

        tracing::info!(
            club_id = %club.id,
            tokens = tokens.len(),
            chunks = chunks.len(),
            sent,
            "multicast fallback finished"
        );
    }
}

/// Splits `tokens` into consecutive chunks of at most `max_size` tokens,
/// preserving order.
pub fn chunk_tokens(tokens: &[String], max_size: usize) -> Vec<&[String]> {
    tokens.chunks(max_size).collect()
}
