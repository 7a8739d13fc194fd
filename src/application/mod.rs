pub mod admin;
pub mod content;
pub mod identity;

// Re-export key types for convenience
pub use admin::{StatsService, StudioStats};
pub use content::{ContentService, DeleteGuard, MediaInUseGuard};
pub use identity::{
    require_role, AuthResult, BootstrapAdmin, LockoutPolicy, LoginAttemptTracker, Registration,
    UserService, ADMINS_ONLY, CONTENT_EDITORS,
};
