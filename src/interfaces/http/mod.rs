//! HTTP REST API
//!
//! - `common`: response envelope, error mapping, extractors
//! - `middleware`: bearer authentication and role guards
//! - `modules`: request handlers and DTOs per resource
//! - `router`: route table, shared state and Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiDoc, AppState, HttpOptions};
