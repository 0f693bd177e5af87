//! Turn engine: one user message in, one handler reply out.
//!
//! A turn holds its thread's lock from load to save, so turns on the same
//! thread never interleave.

use tracing::{Instrument, info, info_span};

use switchboard_types::conversation::{ConversationState, ThreadId};
use switchboard_types::error::EngineError;
use switchboard_types::message::Message;
use switchboard_types::route::Route;

use crate::conversation::{ConversationStore, ThreadLocks};
use crate::handler::{HandlerReply, Handlers, TurnOptions};
use crate::router::Router;
use crate::router::classifier::RouteClassifier;

/// Result of a completed turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub thread_id: ThreadId,
    pub reply: Message,
    pub route: Route,
    pub generated_image_url: Option<String>,
}

pub struct TurnEngine<C: RouteClassifier, S: ConversationStore> {
    router: Router<C>,
    handlers: Handlers,
    store: S,
    locks: ThreadLocks,
}

impl<C: RouteClassifier, S: ConversationStore> TurnEngine<C, S> {
    pub fn new(router: Router<C>, handlers: Handlers, store: S) -> Self {
        Self {
            router,
            handlers,
            store,
            locks: ThreadLocks::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one turn on `thread_id`, or on a fresh thread when it is absent or blank.
    pub async fn run_turn(
        &self,
        thread_id: Option<&str>,
        message: Message,
        options: TurnOptions,
    ) -> Result<TurnOutcome, EngineError> {
        let thread_id = ThreadId::resolve(thread_id);
        let span = info_span!("turn", thread_id = %thread_id);
        self.run_locked(thread_id, message, options)
            .instrument(span)
            .await
    }

    async fn run_locked(
        &self,
        thread_id: ThreadId,
        message: Message,
        options: TurnOptions,
    ) -> Result<TurnOutcome, EngineError> {
        let _guard = self.locks.lock(&thread_id).await;

        let mut state = self.store.get_or_create(&thread_id).await?;
        state.push(message);

        let selection = self.router.select(&state.messages).await;
        let reply = self
            .handlers
            .dispatch(selection.route, &state, &options)
            .await;
        state.release_attachments();

        let outcome = apply_reply(&mut state, selection.route, reply);
        self.store.save(&state).await?;

        info!(route = %outcome.route, messages = state.messages.len(), "turn complete");
        Ok(outcome)
    }

    /// Full state of a thread, if it exists.
    pub async fn thread(&self, thread_id: &ThreadId) -> Result<ConversationState, EngineError> {
        self.store
            .get(thread_id)
            .await?
            .ok_or_else(|| EngineError::ThreadNotFound(thread_id.to_string()))
    }

    pub async fn delete_thread(&self, thread_id: &ThreadId) -> Result<(), EngineError> {
        let _guard = self.locks.lock(thread_id).await;
        if self.store.delete(thread_id).await? {
            Ok(())
        } else {
            Err(EngineError::ThreadNotFound(thread_id.to_string()))
        }
    }
}

/// Append the reply and remember a freshly generated image.
fn apply_reply(state: &mut ConversationState, route: Route, reply: HandlerReply) -> TurnOutcome {
    let generated_image_url = reply.generated_image.as_ref().map(|image| image.url.clone());
    if let Some(image) = reply.generated_image {
        state.generated_image_url = Some(image.url);
        state.image_prompt = Some(image.prompt);
    }
    state.push(reply.message.clone());

    TurnOutcome {
        thread_id: state.thread_id.clone(),
        reply: reply.message,
        route,
        generated_image_url,
    }
}
