//! File extension to content type mapping.

use std::path::Path;

/// Content type used when the extension is missing or unknown.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Returns the content type for a file based on its extension.
///
/// Extensions compare ASCII case-insensitively.
pub fn content_type(path: impl AsRef<Path>) -> &'static str {
    let Some(extension) = path.as_ref().extension().and_then(|e| e.to_str()) else {
        return DEFAULT_CONTENT_TYPE;
    };

    match extension.to_ascii_lowercase().as_str() {
        "txt" => "text/plain;charset=UTF-8",
        "html" | "htm" => "text/html;charset=UTF-8",
        "css" => "text/css;charset=UTF-8",
        "js" => "application/javascript",
        "json" => "application/json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "ico" => "image/x-icon",
        _ => DEFAULT_CONTENT_TYPE,
    }
}
