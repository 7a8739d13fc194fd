//! Database entities module

pub mod media;
pub mod news;
pub mod schedule;
pub mod user;

pub use media::Entity as Media;
pub use news::Entity as News;
pub use schedule::Entity as Schedule;
pub use user::Entity as User;
