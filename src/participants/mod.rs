mod list;
mod new;

use std::sync::Arc;

use axum::{routing::post, Router};

use crate::{
    clock::Clock,
    db::{Message, Participant, JOIN_TEXT},
    error::{ChatError, ChatResult},
    store::{DynStore, StoreError},
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/participants", post(new::register).get(list::list))
}

/// Who is in the room, and when each of them was last heard from.
#[derive(Clone)]
pub struct Registry {
    store: DynStore,
    clock: Arc<dyn Clock>,
}

impl Registry {
    pub fn new(store: DynStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Adds `name` to the room and announces it with a join status message.
    ///
    /// Uniqueness is enforced by the store's insert, so two concurrent
    /// registrations of the same name cannot both succeed. The participant
    /// insert and the join message are separate writes: if the second one
    /// fails the participant stays registered without a join message and
    /// the caller sees a store failure.
    pub async fn register(&self, name: Option<&str>) -> ChatResult<Participant> {
        let name = match name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(ChatError::InvalidInput("name is required".to_owned())),
        };

        let participant = Participant {
            name: name.to_owned(),
            last_status: self.clock.now_millis(),
        };

        match self.store.insert_participant(&participant).await {
            Ok(()) => {}
            Err(StoreError::DuplicateName(name)) => return Err(ChatError::Conflict(name)),
            Err(e) => return Err(e.into()),
        }

        let joined = Message::status(name, JOIN_TEXT, self.clock.now_time_of_day());
        self.store.insert_message(&joined).await?;

        tracing::info!("{name} joined");
        Ok(participant)
    }

    /// Every registered participant, in no particular order.
    pub async fn list(&self) -> ChatResult<Vec<Participant>> {
        Ok(self.store.list_participants().await?)
    }

    /// Refreshes the participant's last-seen timestamp.
    pub async fn heartbeat(&self, name: Option<&str>) -> ChatResult<()> {
        let Some(name) = name.filter(|name| !name.is_empty()) else {
            return Err(ChatError::NotFound(String::new()));
        };

        if !self.store.touch_participant(name, self.clock.now_millis()).await? {
            return Err(ChatError::NotFound(name.to_owned()));
        }

        tracing::trace!("heartbeat from {name}");
        Ok(())
    }

    /// Whether `name` is currently registered.
    pub async fn contains(&self, name: &str) -> ChatResult<bool> {
        Ok(self.store.find_participant(name).await?.is_some())
    }
}
