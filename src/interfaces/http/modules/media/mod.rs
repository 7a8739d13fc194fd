//! Media library module; every route requires an editor

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
