//! Tests for path resolution, content types and file responses.

use std::fs;

use tempfile::TempDir;

use crate::files::{content_type, resolve, serve_file, DEFAULT_CONTENT_TYPE};
use crate::server::{Error, StatusCode, SERVER_NAME};

/// A web root at `<tmp>/www` with a `secret.txt` next to it.
fn web_root() -> TempDir {
    let dir = TempDir::new().unwrap();
    let www = dir.path().join("www");
    fs::create_dir_all(www.join("css")).unwrap();
    fs::write(www.join("test.txt"), "This is a test, for lots of reasons.\n").unwrap();
    fs::write(www.join("css/site.css"), "body { margin: 0 }").unwrap();
    fs::write(dir.path().join("secret.txt"), "top secret").unwrap();
    dir
}

#[test]
fn test_content_types() {
    assert_eq!(content_type("test.txt"), "text/plain;charset=UTF-8");
    assert_eq!(content_type("index.html"), "text/html;charset=UTF-8");
    assert_eq!(content_type("app.js"), "application/javascript");
    assert_eq!(content_type("css/site.css"), "text/css;charset=UTF-8");
    assert_eq!(content_type("logo.svg"), "image/svg+xml");
    assert_eq!(content_type("logo.png"), "image/png");
    assert_eq!(content_type("LOGO.PNG"), "image/png");
}

#[test]
fn test_unknown_extension_defaults_to_plain_text() {
    assert_eq!(content_type("archive.tar.zst"), DEFAULT_CONTENT_TYPE);
    assert_eq!(content_type("Makefile"), "text/plain");
    assert_eq!(content_type(".hidden"), "text/plain");
}

#[tokio::test]
async fn test_resolve_inside_root() {
    let dir = web_root();
    let www = dir.path().join("www");

    let resolved = resolve("/css/site.css", &www).await.unwrap();
    assert_eq!(resolved.as_path(), fs::canonicalize(www.join("css/site.css")).unwrap());

    let resolved = resolve("/css/../test.txt", &www).await.unwrap();
    assert_eq!(resolved.as_path(), fs::canonicalize(www.join("test.txt")).unwrap());
}

#[tokio::test]
async fn test_resolve_strips_query_string() {
    let dir = web_root();
    let www = dir.path().join("www");

    let resolved = resolve("/test.txt?version=2&x=../../secret.txt", &www).await.unwrap();
    assert_eq!(resolved.as_path(), fs::canonicalize(www.join("test.txt")).unwrap());
}

#[tokio::test]
async fn test_traversal_is_rejected_whether_or_not_target_exists() {
    let dir = web_root();
    let www = dir.path().join("www");

    let escapes = [
        "/../secret.txt",
        "/../../secret.txt",
        "/../does-not-exist",
        "/css/../../secret.txt",
        "..",
    ];
    for resource in escapes {
        let result = resolve(resource, &www).await;
        assert!(
            matches!(result, Err(Error::SecurityViolation(ref r)) if r == resource),
            "{resource}"
        );
    }
}

#[tokio::test]
async fn test_traversal_before_query_string_is_rejected() {
    let dir = web_root();
    let www = dir.path().join("www");

    let result = resolve("/../secret.txt?x=1", &www).await;
    assert!(matches!(result, Err(Error::SecurityViolation(_))));

    // Query text is never treated as path segments
    let resolved = resolve("/nothing?/../../secret.txt", &www).await.unwrap();
    assert_eq!(resolved.as_path(), fs::canonicalize(&www).unwrap().join("nothing"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlinks_out_of_root_are_rejected() {
    let dir = web_root();
    let www = dir.path().join("www");
    std::os::unix::fs::symlink(dir.path(), www.join("escape")).unwrap();
    std::os::unix::fs::symlink(dir.path().join("secret.txt"), www.join("secret.txt")).unwrap();

    let result = resolve("/escape/secret.txt", &www).await;
    assert!(matches!(result, Err(Error::SecurityViolation(_))));

    let result = resolve("/secret.txt", &www).await;
    assert!(matches!(result, Err(Error::SecurityViolation(_))));
}

#[tokio::test]
async fn test_missing_directories_are_not_found() {
    let dir = web_root();
    let www = dir.path().join("www");

    let result = resolve("/missing/dir/file.txt", &www).await;
    assert!(matches!(result, Err(Error::NotFound(_))));

    let result = resolve("/test.txt", &dir.path().join("no-such-root")).await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_serve_file() {
    let dir = web_root();
    let www = dir.path().join("www");

    let resolved = resolve("/test.txt", &www).await.unwrap();
    let response = serve_file(&resolved).await.unwrap();

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.body, b"This is a test, for lots of reasons.\n".to_vec());
    assert_eq!(
        response.headers,
        vec![
            ("Content-Length".to_string(), "37".to_string()),
            ("Server".to_string(), SERVER_NAME.to_string()),
            ("Content-Type".to_string(), "text/plain;charset=UTF-8".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_serve_missing_file_or_directory() {
    let dir = web_root();
    let www = dir.path().join("www");

    let resolved = resolve("/nope.html", &www).await.unwrap();
    assert!(matches!(serve_file(&resolved).await, Err(Error::NotFound(_))));

    let resolved = resolve("/css", &www).await.unwrap();
    assert!(matches!(serve_file(&resolved).await, Err(Error::NotFound(_))));

    let resolved = resolve("/", &www).await.unwrap();
    assert!(matches!(serve_file(&resolved).await, Err(Error::NotFound(_))));
}
