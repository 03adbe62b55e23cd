//! SearxNG metasearch integration

mod models;
mod searxng;

pub use models::{
    GeneralSearchResult, MediaLength, RawResult, RawSearxngResponse, VideoSearchResult,
};
pub use searxng::SearxngClient;
