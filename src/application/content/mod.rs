//! Generic CRUD for news, schedule and media

pub mod guards;
pub mod service;

pub use guards::{DeleteGuard, MediaInUseGuard};
pub use service::ContentService;
