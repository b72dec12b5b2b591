pub mod admin_service;
pub mod builder_service;
pub mod published_template_service;
pub mod response_service;
pub mod runner_service;
pub mod sync_service;
pub mod template_service;
