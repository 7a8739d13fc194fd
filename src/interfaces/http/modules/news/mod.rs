//! News module: public listing, editor CRUD with an optional cover image

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
