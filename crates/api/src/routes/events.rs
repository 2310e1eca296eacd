use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/events", get(handlers::events::list_events))
        .route("/api/events", post(handlers::events::create_event))
        .route("/api/events/:id", get(handlers::events::get_event))
        .route("/api/events/:id", put(handlers::events::update_event))
        .route("/api/events/:id", delete(handlers::events::delete_event))
        .route(
            "/api/events/:id/signups",
            get(handlers::signups::list_signups),
        )
        .route(
            "/api/events/:id/signups/:user_id",
            put(handlers::signups::set_rsvp),
        )
        .route("/api/events/:id/draft", post(handlers::squads::run_draft))
        .route("/api/events/:id/squads", get(handlers::squads::list_squads))
        .route("/api/events/:id/roster", get(handlers::squads::get_roster))
}
