//! Class schedule aggregate

pub mod model;

pub use model::{ClassLevel, ScheduleDraft, ScheduleEntry, ScheduleFilter, SchedulePatch};
