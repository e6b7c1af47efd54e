use axum::{debug_handler, extract::State, http::StatusCode, routing::post, Router};

use crate::{participants::Registry, AppResult, AppState, User};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", post(status))
}

#[debug_handler(state = AppState)]
pub(crate) async fn status(
    State(registry): State<Registry>,
    User(user): User,
) -> AppResult<StatusCode> {
    registry.heartbeat(user.as_deref()).await?;
    Ok(StatusCode::OK)
}
