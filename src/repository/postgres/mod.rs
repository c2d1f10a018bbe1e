use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    domain::club::Club,
    domain::notification::Notification,
    repository::errors::RepositoryError,
    usecase::contracts::{ClubRepository, DeviceTokenRepository, NotificationRepository},
};

pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

pub struct PostgresClubRepository {
    pool: PgPool,
}

impl PostgresClubRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ClubRepository for PostgresClubRepository {
    #[tracing::instrument(skip(self), fields(club_id = %id))]
    async fn find_by_id(&self, id: &str) -> Result<Option<Club>, RepositoryError> {
        tracing::debug!("finding club by id");

        let row: Option<(String, Option<String>, Option<String>)> = sqlx::query_as(
            r#"
            SELECT id, name, photo_url
            FROM clubs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let Some((club_id, name, photo_url)) = row else {
            return Ok(None);
        };

        let subscribers: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT user_id
            FROM club_subscribers
            WHERE club_id = $1
            ORDER BY subscribed_at
            "#,
        )
        .bind(&club_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(Some(Club {
            id: club_id,
            name,
            photo_url,
            subscribers,
        }))
    }
}

pub struct PostgresDeviceTokenRepository {
    pool: PgPool,
}

impl PostgresDeviceTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DeviceTokenRepository for PostgresDeviceTokenRepository {
    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    async fn find_push_tokens(&self, user_id: &str) -> Result<Vec<String>, RepositoryError> {
        tracing::debug!("finding push tokens");

        let tokens: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT token
            FROM device_tokens
            WHERE user_id = $1
            ORDER BY registered_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(tokens)
    }
}

pub struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl NotificationRepository for PostgresNotificationRepository {
    #[tracing::instrument(skip(self, notification), fields(notification_id = %notification.id, event_id = %notification.event_id))]
    async fn create(&self, notification: &Notification) -> Result<(), RepositoryError> {
        tracing::debug!("creating notification record");

        // Keyed by the event-derived id; a redelivered trigger hits the
        // conflict arm and leaves the existing record untouched.
        sqlx::query(
            r#"
            INSERT INTO notifications
                (id, title, body, event_id, club_id, photo_url, notification_type, read_status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(notification.id)
        .bind(&notification.title)
        .bind(&notification.body)
        .bind(&notification.event_id)
        .bind(&notification.club_id)
        .bind(&notification.photo_url)
        .bind(&notification.notification_type)
        .bind(serde_json::to_value(&notification.read_status).unwrap())
        .bind(notification.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!("notification record created");
        Ok(())
    }
}
