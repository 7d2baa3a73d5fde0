//! Service layer: message routing, disconnect handling and the chat
//! service that ties them to the broadcast sink.

pub mod chat_service;
pub mod notifier;
pub mod router;

pub use chat_service::ChatService;
pub use notifier::DisconnectNotifier;
pub use router::MessageRouter;
