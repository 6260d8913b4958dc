pub mod handlers;
pub mod headers;
pub mod listing;
pub mod path_utils;
pub mod resolve;
pub mod spa;

use percent_encoding::percent_decode_str;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::http::split_target;

pub use handlers::{error_response, handle_request};
pub use headers::decorate_headers;
pub use resolve::{resolve, Resolution};
