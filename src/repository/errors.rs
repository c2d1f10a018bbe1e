use thiserror::Error;

/// Infrastructure failures from the backing store. Expected absences
/// ("club not found", "user has no tokens") are not errors; they surface
/// as `None` or empty collections from the repository contracts.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}
