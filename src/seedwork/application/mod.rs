pub mod application_service;
pub mod related_ids;

pub use application_service::ApplicationService;
pub use related_ids::existing_ids;
