use crate::config::ServerConfig;
use crate::http::set_header;

pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type, Range"),
];

pub const NO_CACHE_HEADERS: [(&str, &str); 3] = [
    (
        "Cache-Control",
        "no-store, no-cache, must-revalidate, proxy-revalidate",
    ),
    ("Pragma", "no-cache"),
    ("Expires", "0"),
];

/// Adds the CORS and cache-busting headers `config` asks for. Applied to
/// every response before its head is serialized.
pub fn decorate_headers(headers: &mut Vec<(String, String)>, config: &ServerConfig) {
    if config.cors_enabled {
        for (name, value) in CORS_HEADERS {
            set_header(headers, name, value);
        }
    }
    if config.cache_disabled {
        for (name, value) in NO_CACHE_HEADERS {
            set_header(headers, name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::find_header;
    use tempfile::tempdir;

    fn config(cors: bool, no_cache: bool) -> (tempfile::TempDir, ServerConfig) {
        let dir = tempdir().unwrap();
        let config = ServerConfig::new(dir.path())
            .unwrap()
            .with_cors(cors)
            .with_cache_disabled(no_cache);
        (dir, config)
    }

    #[test]
    fn both_enabled_by_default() {
        let (_dir, config) = config(true, true);
        let mut headers = vec![("Content-Type".to_string(), "text/css".to_string())];
        decorate_headers(&mut headers, &config);

        assert_eq!(headers.len(), 7);
        assert_eq!(find_header(&headers, "Access-Control-Allow-Origin"), Some("*"));
        assert_eq!(
            find_header(&headers, "Access-Control-Allow-Methods"),
            Some("GET, OPTIONS")
        );
        assert_eq!(
            find_header(&headers, "Access-Control-Allow-Headers"),
            Some("Content-Type, Range")
        );
        assert_eq!(
            find_header(&headers, "Cache-Control"),
            Some("no-store, no-cache, must-revalidate, proxy-revalidate")
        );
        assert_eq!(find_header(&headers, "Pragma"), Some("no-cache"));
        assert_eq!(find_header(&headers, "Expires"), Some("0"));
    }

    #[test]
    fn nothing_added_when_disabled() {
        let (_dir, config) = config(false, false);
        let mut headers = Vec::new();
        decorate_headers(&mut headers, &config);
        assert!(headers.is_empty());
    }

    #[test]
    fn cors_only() {
        let (_dir, config) = config(true, false);
        let mut headers = Vec::new();
        decorate_headers(&mut headers, &config);

        assert_eq!(headers.len(), 3);
        assert_eq!(find_header(&headers, "Cache-Control"), None);
    }

    #[test]
    fn decorating_twice_does_not_duplicate() {
        let (_dir, config) = config(true, true);
        let mut headers = Vec::new();
        decorate_headers(&mut headers, &config);
        decorate_headers(&mut headers, &config);
        assert_eq!(headers.len(), 6);
    }
}
