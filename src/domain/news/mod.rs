//! News aggregate

pub mod model;

pub use model::{parse_publish_date, News, NewsCategory, NewsDraft, NewsFilter, NewsPatch};
