//! HTTP protocol layer module
//!
//! Protocol helpers shared by the file handler: path translation, MIME
//! detection, cache control and response builders.

pub mod cache;
pub mod mime;
pub mod path;
pub mod response;

// Re-export commonly used items
pub use cache::append_no_cache_headers;
pub use path::{translate_path, TranslatedPath};
pub use response::{
    build_304_response, build_404_response, build_501_response, build_file_response,
    build_html_response, build_redirect_response,
};
