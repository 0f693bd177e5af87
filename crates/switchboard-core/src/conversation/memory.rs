//! In-process conversation store with idle expiry and a thread cap.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

use switchboard_types::config::ConversationConfig;
use switchboard_types::conversation::{ConversationState, ThreadId};
use switchboard_types::error::RepositoryError;
use switchboard_types::message::Message;

use super::store::ConversationStore;

struct Entry {
    state: ConversationState,
    last_access: Instant,
}

/// `DashMap`-backed store.
///
/// Threads idle for longer than `idle_ttl` are dropped the next time they
/// are looked up, or when room is needed. At `max_threads`, inserting a new
/// thread evicts the least recently used one.
pub struct InMemoryConversationStore {
    threads: DashMap<ThreadId, Entry>,
    max_threads: usize,
    idle_ttl: Duration,
}

impl InMemoryConversationStore {
    pub fn new(max_threads: usize, idle_ttl: Duration) -> Self {
        Self {
            threads: DashMap::new(),
            max_threads: max_threads.max(1),
            idle_ttl,
        }
    }

    pub fn from_config(config: &ConversationConfig) -> Self {
        Self::new(config.max_threads, Duration::from_secs(config.idle_ttl_secs))
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    fn is_expired(&self, entry: &Entry) -> bool {
        entry.last_access.elapsed() > self.idle_ttl
    }

    /// Fetch a live thread, touching it. Expired threads are removed.
    fn load(&self, thread_id: &ThreadId) -> Option<ConversationState> {
        match self.threads.get_mut(thread_id) {
            None => return None,
            Some(mut entry) if !self.is_expired(&entry) => {
                entry.last_access = Instant::now();
                return Some(entry.state.clone());
            }
            Some(_) => {}
        }
        debug!(thread_id = %thread_id, "dropping idle conversation");
        self.threads
            .remove_if(thread_id, |_, entry| self.is_expired(entry));
        None
    }

    /// Insert or replace a thread, making room first if it is new.
    fn store(&self, state: ConversationState) {
        if !self.threads.contains_key(&state.thread_id) && self.threads.len() >= self.max_threads {
            self.make_room();
        }
        self.threads.insert(
            state.thread_id.clone(),
            Entry {
                state,
                last_access: Instant::now(),
            },
        );
    }

    fn make_room(&self) {
        self.threads.retain(|_, entry| !self.is_expired(entry));
        if self.threads.len() < self.max_threads {
            return;
        }
        let oldest = self
            .threads
            .iter()
            .min_by_key(|entry| entry.value().last_access)
            .map(|entry| entry.key().clone());
        if let Some(thread_id) = oldest {
            debug!(thread_id = %thread_id, "evicting least recently used conversation");
            self.threads.remove(&thread_id);
        }
    }
}

impl Default for InMemoryConversationStore {
    fn default() -> Self {
        Self::from_config(&ConversationConfig::default())
    }
}

impl ConversationStore for InMemoryConversationStore {
    async fn get_or_create(&self, thread_id: &ThreadId) -> Result<ConversationState, RepositoryError> {
        if let Some(state) = self.load(thread_id) {
            return Ok(state);
        }
        let state = ConversationState::new(thread_id.clone());
        self.store(state.clone());
        Ok(state)
    }

    async fn append(
        &self,
        thread_id: &ThreadId,
        message: Message,
    ) -> Result<ConversationState, RepositoryError> {
        let mut state = self
            .load(thread_id)
            .unwrap_or_else(|| ConversationState::new(thread_id.clone()));
        state.push(message);
        self.store(state.clone());
        Ok(state)
    }

    async fn save(&self, state: &ConversationState) -> Result<(), RepositoryError> {
        self.store(state.clone());
        Ok(())
    }

    async fn get(&self, thread_id: &ThreadId) -> Result<Option<ConversationState>, RepositoryError> {
        Ok(self.load(thread_id))
    }

    async fn delete(&self, thread_id: &ThreadId) -> Result<bool, RepositoryError> {
        Ok(self.threads.remove(thread_id).is_some())
    }
}
