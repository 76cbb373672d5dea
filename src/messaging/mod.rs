// ============================================================================
// Messaging - integration events leaving the service
// ============================================================================

pub mod broker;
pub mod handlers;
pub mod redpanda;

pub use broker::{InMemoryMessageBroker, MessageBroker};
pub use handlers::PublishVideoMediaReplacedInQueueHandler;
pub use redpanda::RedpandaBroker;
