//! Admin dashboard queries

pub mod stats;

pub use stats::{StatsService, StudioStats};
