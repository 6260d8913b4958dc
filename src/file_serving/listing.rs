use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt::Write as _;

use super::*;
use crate::logging::LoggingExt;

// Everything but unreserved characters and '/' is escaped in hrefs.
const HREF: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

struct Entry {
    link: String,
    display: String,
}

/// Renders the HTML index page for `dir`. `display_path` is the decoded
/// request path shown in the title.
pub fn render_listing(dir: &Path, display_path: &str) -> io::Result<String> {
    let mut entries = Vec::new();
    for entry in dir.log_operation("read_dir", || fs::read_dir(dir))? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_symlink = entry.file_type().map(|t| t.is_symlink()).unwrap_or(false);
        let is_dir = fs::metadata(entry.path())
            .map(|m| m.is_dir())
            .unwrap_or(false);

        let mut link = name.clone();
        let mut display = name;
        if is_dir {
            link.push('/');
            display.push('/');
        }
        if is_symlink {
            display.push('@');
        }
        entries.push(Entry { link, display });
    }
    entries.sort_by_key(|e| e.display.to_lowercase());

    let title = escape_html(&format!("Directory listing for {}", display_path));
    let mut page = String::new();
    page.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n");
    page.push_str("<meta charset=\"utf-8\">\n");
    let _ = writeln!(page, "<title>{}</title>", title);
    page.push_str("</head>\n<body>\n");
    let _ = writeln!(page, "<h1>{}</h1>", title);
    page.push_str("<hr>\n<ul>\n");
    for entry in &entries {
        let _ = writeln!(
            page,
            "<li><a href=\"{}\">{}</a></li>",
            utf8_percent_encode(&entry.link, HREF),
            escape_html(&entry.display)
        );
    }
    page.push_str("</ul>\n<hr>\n</body>\n</html>\n");

    log::debug!("Listed {} entries in {}", entries.len(), dir.display());
    Ok(page)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
