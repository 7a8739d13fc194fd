//! User aggregate
//!
//! Contains the User entity, the caller identity and the repository interface.

pub mod model;
pub mod repository;

pub use model::{Identity, NewUser, User, UserRole};
pub use repository::UserRepository;
