//! ConversationStore trait definition.

use switchboard_types::conversation::{ConversationState, ThreadId};
use switchboard_types::error::RepositoryError;
use switchboard_types::message::Message;

/// Keyed storage for per-thread conversation state.
///
/// Uses native async fn in traits so a persistent backend can slot in
/// without changing callers.
pub trait ConversationStore: Send + Sync {
    /// Load the thread, creating an empty one if it does not exist.
    fn get_or_create(
        &self,
        thread_id: &ThreadId,
    ) -> impl std::future::Future<Output = Result<ConversationState, RepositoryError>> + Send;

    /// Append a message to the thread (creating it if needed) and return the new state.
    fn append(
        &self,
        thread_id: &ThreadId,
        message: Message,
    ) -> impl std::future::Future<Output = Result<ConversationState, RepositoryError>> + Send;

    /// Replace the stored state for `state.thread_id`.
    fn save(
        &self,
        state: &ConversationState,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn get(
        &self,
        thread_id: &ThreadId,
    ) -> impl std::future::Future<Output = Result<Option<ConversationState>, RepositoryError>> + Send;

    /// Remove the thread. Returns whether it existed.
    fn delete(
        &self,
        thread_id: &ThreadId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
