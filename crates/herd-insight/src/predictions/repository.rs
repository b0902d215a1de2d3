use super::domain::{NewPrediction, OwnerId, PredictionId, StoredPrediction};

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Implementations must treat `create` as an independent append: concurrent predictions
/// for the same owner never read-modify-write shared state.
pub trait PredictionRepository: Send + Sync {
    /// Persist a prediction for `owner`, assigning its id and timestamp.
    fn create(
        &self,
        owner: &OwnerId,
        prediction: NewPrediction,
    ) -> Result<StoredPrediction, RepositoryError>;

    /// Predictions owned by `owner`, most recent first.
    fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<StoredPrediction>, RepositoryError>;

    fn delete(&self, id: &PredictionId, owner: &OwnerId) -> Result<(), RepositoryError>;

    /// Remove every prediction owned by `owner`, returning how many were deleted.
    fn clear_all(&self, owner: &OwnerId) -> Result<usize, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("prediction not found or unauthorized")]
    NotFoundOrUnauthorized,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
