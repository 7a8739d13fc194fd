pub mod admin;
pub mod auth;
pub mod health;
pub mod media;
pub mod news;
pub mod request_id;
pub mod schedule;
