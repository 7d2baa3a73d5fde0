//! Presence endpoint: who is currently joined.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{ParticipantDto, ParticipantsResponse};
use crate::app_state::AppState;

/// `GET /participants` — All joined connections.
#[utoipa::path(
    get,
    path = "/api/v1/participants",
    tag = "Chat",
    summary = "List participants",
    description = "Returns the connections that have sent JOIN and not yet disconnected, sorted by display name, with their connection id and open time. Duplicate names are listed once per connection.",
    responses(
        (status = 200, description = "Current participants", body = ParticipantsResponse),
    )
)]
pub async fn list_participants(State(state): State<AppState>) -> impl IntoResponse {
    let participants: Vec<ParticipantDto> = state
        .chat
        .sessions()
        .participants()
        .await
        .into_iter()
        .filter_map(ParticipantDto::from_session)
        .collect();
    Json(ParticipantsResponse {
        count: participants.len(),
        participants,
    })
}

/// Presence routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/participants", get(list_participants))
}
