//! Static file responses.

use log::debug;

use crate::files::mime::content_type;
use crate::files::path::ResolvedPath;
use crate::server::{Error, HttpResponse, StatusCode};

/// Reads the whole file and wraps it in a `200 OK` response.
///
/// The file is read completely before anything is returned; a file that is
/// missing, is a directory, or cannot be read yields [`Error::NotFound`].
pub async fn serve_file(path: &ResolvedPath) -> Result<HttpResponse, Error> {
    let body = tokio::fs::read(path).await.map_err(|e| {
        debug!("Cannot read {}: {e}", path.as_path().display());
        Error::NotFound(path.as_path().display().to_string())
    })?;

    Ok(HttpResponse::new(StatusCode::Ok)
        .with_body_bytes(body)
        .with_server_name()
        .with_content_type(content_type(path)))
}
