use axum::{debug_handler, extract::{rejection::JsonRejection, State}, http::StatusCode, Json};
use serde::Deserialize;

use crate::{error::ChatError, AppResult};

use super::Registry;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct NewParticipantBody {
    name: Option<String>,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn register(
    State(registry): State<Registry>,
    body: Result<Json<NewParticipantBody>, JsonRejection>,
) -> AppResult<StatusCode> {
    let Json(NewParticipantBody { name }) =
        body.map_err(|e| ChatError::InvalidInput(e.body_text()))?;

    registry.register(name.as_deref()).await?;

    Ok(StatusCode::CREATED)
}
