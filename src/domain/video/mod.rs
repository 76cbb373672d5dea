// ============================================================================
// Video Domain
// ============================================================================
//
// - Value objects (VideoId, Rating, AudioVideoMedia)
// - Events (VideoCreated, VideoAudioMediaReplaced, AudioVideoMediaProcessed)
// - Commands (create, replace media, process media)
// - Aggregate (Video, is_published projection)
// - Repositories (filter, in-memory strategy)
// - Command Handler (VideoCommandHandler)
//
// ============================================================================

pub mod value_objects;
pub mod events;
pub mod commands;
pub mod aggregate;
pub mod repository;
pub mod command_handler;

pub use value_objects::*;
pub use events::*;
pub use commands::*;
pub use aggregate::*;
pub use repository::*;
pub use command_handler::*;
