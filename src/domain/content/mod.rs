//! Generic content plumbing shared by news, schedule and media.

pub mod attachment;
pub mod repository;
pub mod resource;

pub use attachment::{FileStore, StoredFile, Upload};
pub use repository::ContentRepository;
pub use resource::ContentResource;
