use mime_guess::from_path;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

// Modern asset types the platform table gets wrong or lacks.
const EXTRA_TYPES: &[(&str, &str)] = &[
    ("mjs", "application/javascript"),
    ("js", "application/javascript"),
    ("wasm", "application/wasm"),
    ("map", "application/json"),
    ("css", "text/css"),
    ("txt", "text/plain"),
    ("svg", "image/svg+xml"),
    ("html", "text/html"),
    ("htm", "text/html"),
];

static OVERRIDES: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

fn overrides() -> &'static HashMap<&'static str, &'static str> {
    OVERRIDES.get_or_init(|| EXTRA_TYPES.iter().copied().collect())
}

/// Builds the override table. Called once at startup; lookups before that
/// initialize it lazily.
pub fn init() {
    let table = overrides();
    log::debug!("Registered {} MIME type overrides", table.len());
}

/// Content type for `path`, by extension. Unknown types are
/// `application/octet-stream`.
pub fn content_type(path: &Path) -> String {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    if let Some(mime) = extension.as_deref().and_then(|ext| overrides().get(ext)) {
        return (*mime).to_string();
    }

    from_path(path).first_or_octet_stream().to_string()
}
