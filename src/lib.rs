pub mod appresult;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod messages;
pub mod participants;
pub mod reaper;
pub mod status;
pub mod store;

use std::{convert::Infallible, sync::Arc};

use axum::{extract::{FromRef, FromRequestParts}, http::request::Parts, Router};
use tower_http::cors::CorsLayer;

pub use appresult::{AppError, AppResult};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use error::{ChatError, ChatResult};
pub use messages::{Draft, MessageLog};
pub use participants::Registry;
pub use reaper::{Reaper, SweepReport};

/// Header carrying the caller's display name.
pub const USER_HEADER: &str = "user";

#[derive(Clone, FromRef)]
pub struct AppState {
    pub registry: Registry,
    pub log: MessageLog,
}

impl AppState {
    pub fn new(store: store::DynStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            registry: Registry::new(store.clone(), clock.clone()),
            log: MessageLog::new(store, clock),
        }
    }
}

/// The `user` header, if present and valid UTF-8.
#[derive(Debug, Clone)]
pub struct User(pub Option<String>);

impl<S> FromRequestParts<S> for User
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| std::str::from_utf8(value.as_bytes()).ok())
            .map(str::to_owned);
        Ok(User(user))
    }
}

pub fn app(app_state: AppState) -> Router {
    Router::new()
        .merge(participants::router())
        .merge(messages::router())
        .merge(status::router())
        .with_state(app_state)
        .layer(CorsLayer::permissive())
}
