//! Static file serving: path resolution, content types and file responses.

mod mime;
mod path;
mod responder;
#[cfg(test)]
mod tests;

pub use mime::{content_type, DEFAULT_CONTENT_TYPE};
pub use path::{resolve, ResolvedPath};
pub use responder::serve_file;
