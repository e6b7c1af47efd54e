use axum::{debug_handler, extract::{rejection::QueryRejection, Query, State}, Json};
use serde::Deserialize;

use crate::{db::Message, AppResult, User};

use super::{parse_limit, MessageLog};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListMessagesQuery {
    limit: Option<String>,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn list_msgs(
    State(log): State<MessageLog>,
    User(user): User,
    query: Result<Query<ListMessagesQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Message>>> {
    let ListMessagesQuery { limit } = query.map(|Query(q)| q).unwrap_or_default();

    let messages = log.list_for(user.as_deref(), parse_limit(limit.as_deref())).await?;

    Ok(Json(messages))
}
