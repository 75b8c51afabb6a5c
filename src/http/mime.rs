//! MIME type detection module
//!
//! Returns the corresponding Content-Type based on file extension.

use std::path::Path;

/// Get MIME Content-Type based on file extension
///
/// Unrecognized extensions have no content type.
///
/// # Examples
/// ```
/// use revers::http::mime::get_content_type;
/// assert_eq!(get_content_type(Some("html")), Some("text/html"));
/// assert_eq!(get_content_type(Some("png")), None);
/// assert_eq!(get_content_type(None), None);
/// ```
pub fn get_content_type(extension: Option<&str>) -> Option<&'static str> {
    match extension? {
        // Text
        "md" => Some("text/markdown"),
        "html" | "htm" => Some("text/html"),
        "txt" => Some("text/plain"),
        "css" => Some("text/css"),

        // Data
        "json" | "map" => Some("application/json"),

        // Scripts
        "ts" => Some("text/typescript"),
        "tsx" => Some("text/tsx"),
        "js" => Some("application/javascript"),
        "jsx" => Some("text/jsx"),
        "wasm" => Some("application/wasm"),

        // Other
        "gz" => Some("application/gzip"),
        "ico" => Some("image/vnd.microsoft.icon"),

        _ => None,
    }
}

/// Content type for a file path
pub fn content_type_for(path: &Path) -> Option<&'static str> {
    get_content_type(path.extension().and_then(|e| e.to_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(get_content_type(Some("md")), Some("text/markdown"));
        assert_eq!(get_content_type(Some("htm")), Some("text/html"));
        assert_eq!(get_content_type(Some("map")), Some("application/json"));
        assert_eq!(get_content_type(Some("js")), Some("application/javascript"));
        assert_eq!(get_content_type(Some("wasm")), Some("application/wasm"));
        assert_eq!(
            get_content_type(Some("ico")),
            Some("image/vnd.microsoft.icon")
        );
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(get_content_type(Some("xyz")), None);
        assert_eq!(get_content_type(Some("HTML")), None);
        assert_eq!(get_content_type(None), None);
    }

    #[test]
    fn test_content_type_for_path() {
        assert_eq!(
            content_type_for(Path::new("public/404.html")),
            Some("text/html")
        );
        assert_eq!(content_type_for(Path::new("archive.tar.gz")), Some("application/gzip"));
        assert_eq!(content_type_for(Path::new("Makefile")), None);
    }
}
