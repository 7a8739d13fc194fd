//! Media library aggregate

pub mod model;

pub use model::{MediaAsset, MediaDraft, MediaFilter, MediaPatch, MediaType};
