//! Storage backends that live outside the database

pub mod memory;
pub mod uploads;

pub use memory::{InMemoryRepositoryProvider, MemoryContentRepository, MemoryUserRepository};
pub use uploads::{LocalFileStore, ALLOWED_MIME_TYPES, PUBLIC_PREFIX};
