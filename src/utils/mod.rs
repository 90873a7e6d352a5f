pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{is_http_url, last_path_segment, query_param, resolve_url};
