//! Response DTOs for the REST endpoints.

pub mod presence_dto;

pub use presence_dto::{HealthResponse, ParticipantDto, ParticipantsResponse};
