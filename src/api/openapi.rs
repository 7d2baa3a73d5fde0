//! OpenAPI document for the HTTP surface.

use utoipa::OpenApi;

use super::dto::{HealthResponse, ParticipantDto, ParticipantsResponse};
use crate::domain::{ChatMessage, MessageKind};
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI description.
///
/// The WebSocket frame types are included as schemas so clients can be
/// generated from the same document, even though `/ws` itself is not a REST
/// path.
#[derive(Debug, OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::system::health_handler,
        crate::api::handlers::participants::list_participants,
    ),
    components(schemas(
        HealthResponse,
        ParticipantsResponse,
        ParticipantDto,
        ChatMessage,
        MessageKind,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "System", description = "Health and service metadata"),
        (name = "Chat", description = "Chat presence"),
    )
)]
pub struct ApiDoc;
