//! Conversation persistence: the store port, the in-memory store, and
//! per-thread turn serialization.

pub mod locks;
pub mod memory;
pub mod store;

pub use self::locks::ThreadLocks;
pub use self::memory::InMemoryConversationStore;
pub use self::store::ConversationStore;
