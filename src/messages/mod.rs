mod list;
mod send;

use std::sync::Arc;

use axum::{routing::post, Router};

use crate::{
    clock::Clock,
    db::{Message, MessageKind},
    error::{ChatError, ChatResult},
    store::DynStore,
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/messages", post(send::send_msg).get(list::list_msgs))
}

/// A message as submitted by a client, before validation.
#[derive(Debug, Default, Clone)]
pub struct Draft {
    pub to: Option<String>,
    pub text: Option<String>,
    pub kind: Option<String>,
}

/// Append-only log of everything said (and every join and leave).
#[derive(Clone)]
pub struct MessageLog {
    store: DynStore,
    clock: Arc<dyn Clock>,
}

impl MessageLog {
    pub fn new(store: DynStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Validates and stores a user-submitted message from `from`.
    ///
    /// Body problems are reported before the sender is looked up, and
    /// nothing is written unless both checks pass.
    pub async fn append(&self, from: Option<&str>, draft: Draft) -> ChatResult<Message> {
        let (to, text, kind) = validate(draft)?;

        let Some(from) = from.filter(|from| !from.is_empty()) else {
            return Err(ChatError::UnknownSender);
        };
        if self.store.find_participant(from).await?.is_none() {
            return Err(ChatError::UnknownSender);
        }

        let message = Message::new(from.to_owned(), to, text, kind, self.clock.now_time_of_day());
        self.store.insert_message(&message).await?;

        tracing::debug!("{from} -> {}: {} {}", message.to, message.kind, message.id);
        Ok(message)
    }

    /// Messages `viewer` may see, oldest first. A `limit` keeps only that
    /// many of the most recent ones.
    pub async fn list_for(&self, viewer: Option<&str>, limit: Option<usize>) -> ChatResult<Vec<Message>> {
        let mut visible: Vec<Message> = self
            .store
            .list_messages()
            .await?
            .into_iter()
            .filter(|message| message.is_visible_to(viewer))
            .collect();

        if let Some(limit) = limit {
            let skip = visible.len().saturating_sub(limit);
            visible.drain(..skip);
        }

        Ok(visible)
    }
}

fn validate(Draft { to, text, kind }: Draft) -> ChatResult<(String, String, MessageKind)> {
    fn required(field: &str, value: Option<String>) -> ChatResult<String> {
        match value {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(ChatError::InvalidInput(format!("{field} is required"))),
        }
    }

    let to = required("to", to)?;
    let text = required("text", text)?;
    let kind: MessageKind = required("type", kind)?
        .parse()
        .map_err(|e| ChatError::InvalidInput(format!("{e}")))?;

    if !kind.is_user_submittable() {
        return Err(ChatError::InvalidInput(format!("type {kind} is reserved")));
    }

    Ok((to, text, kind))
}

/// Only a positive integer limits the listing; anything else means "all".
pub(crate) fn parse_limit(raw: Option<&str>) -> Option<usize> {
    raw?.trim().parse::<usize>().ok().filter(|&limit| limit > 0)
}
