//! Identity: credentials, tokens, lockout and role checks

pub mod gate;
pub mod lockout;
pub mod service;

pub use gate::{require_role, ADMINS_ONLY, CONTENT_EDITORS};
pub use lockout::{LockoutPolicy, LoginAttemptTracker};
pub use service::{AuthResult, BootstrapAdmin, Registration, UserService};
