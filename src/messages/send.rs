use axum::{debug_handler, extract::{rejection::JsonRejection, State}, http::StatusCode, Json};
use serde::Deserialize;

use crate::{error::ChatError, AppResult, User};

use super::{Draft, MessageLog};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SendMessageBody {
    to: Option<String>,
    text: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn send_msg(
    State(log): State<MessageLog>,
    User(user): User,
    body: Result<Json<SendMessageBody>, JsonRejection>,
) -> AppResult<StatusCode> {
    let Json(SendMessageBody { to, text, kind }) =
        body.map_err(|e| ChatError::InvalidInput(e.body_text()))?;

    log.append(user.as_deref(), Draft { to, text, kind }).await?;

    Ok(StatusCode::CREATED)
}
