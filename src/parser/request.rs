//! HTTP request parsing and representation.

use log::warn;

use crate::parser::error::Error;
use crate::parser::method::Method;
use crate::parser::scanner::LineScanner;
use crate::parser::version::HttpVersion;

/// Represents an HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The requested resource: path plus optional query string
    pub resource: String,
    /// The HTTP version
    pub version: HttpVersion,
    /// The HTTP headers, in the order they were received
    pub headers: Vec<(String, String)>,
    /// Bytes following the header section, passed through unparsed
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Create a new HTTP request with an empty body.
    pub fn new(
        method: Method,
        resource: impl Into<String>,
        version: HttpVersion,
        headers: Vec<(String, String)>,
    ) -> Self {
        Self {
            method,
            resource: resource.into(),
            version,
            headers,
            body: Vec::new(),
        }
    }

    /// Replace the request body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Get a header value. Names compare case-insensitively; the first
    /// matching header wins.
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Check if a header exists.
    pub fn has_header(&self, name: &str) -> bool {
        self.get_header(name).is_some()
    }

    /// The resource with any query string removed.
    pub fn path(&self) -> &str {
        match self.resource.split_once('?') {
            Some((path, _)) => path,
            None => &self.resource,
        }
    }

    /// The query string, without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.resource.split_once('?').map(|(_, query)| query)
    }
}

/// Parser states. Each state consumes exactly one line.
enum ParseState {
    RequestLine,
    Headers(RequestLine),
    Complete(RequestLine),
}

struct RequestLine {
    method: Method,
    resource: String,
    version: HttpVersion,
}

fn parse_request_line(line: &[u8]) -> Result<RequestLine, Error> {
    let line = std::str::from_utf8(line)
        .map_err(|_| Error::MalformedRequestLine("Invalid UTF-8".to_string()))?;

    let mut tokens = line.split_ascii_whitespace();
    let (Some(method), Some(resource), Some(version), None) =
        (tokens.next(), tokens.next(), tokens.next(), tokens.next())
    else {
        return Err(Error::MalformedRequestLine(line.to_string()));
    };

    let method = Method::from_token(method);
    if !method.is_recognized() {
        warn!("Unrecognized method token: {method}");
    }

    Ok(RequestLine {
        method,
        resource: resource.to_string(),
        version: version.parse()?,
    })
}

fn parse_header_line(line: &[u8]) -> Result<(String, String), Error> {
    let line = std::str::from_utf8(line)
        .map_err(|_| Error::InvalidHeaderFormat("Invalid UTF-8".to_string()))?;

    let Some((name, value)) = line.split_once(':') else {
        return Err(Error::InvalidHeaderFormat(line.to_string()));
    };

    let name = name.trim_matches([' ', '\t']);
    if name.is_empty() || name.bytes().any(|b| b.is_ascii_control()) {
        return Err(Error::InvalidHeaderFormat(line.to_string()));
    }

    Ok((name.to_string(), value.trim_matches([' ', '\t']).to_string()))
}

/// Parse an HTTP request from a byte slice.
///
/// The input must contain the complete header section, i.e. everything up to
/// and including the blank line. Whatever follows the blank line becomes the
/// request body as-is.
///
/// # Errors
///
/// Returns an error if the request line or any header line violates the
/// grammar, or if the input ends before the header section is closed.
pub fn parse_request(input: &[u8]) -> Result<HttpRequest, Error> {
    if input.is_empty() {
        return Err(Error::EmptyRequest);
    }

    let mut scanner = LineScanner::new(input);
    let mut headers = Vec::new();
    let mut state = ParseState::RequestLine;

    let request_line = loop {
        state = match state {
            ParseState::RequestLine => {
                let line = scanner.next_line().ok_or(Error::Truncated)?;
                if !line.is_empty() {
                    ParseState::Headers(parse_request_line(line)?)
                } else if scanner.is_exhausted() {
                    return Err(Error::EmptyRequest);
                } else {
                    // Tolerate blank lines ahead of the request line
                    ParseState::RequestLine
                }
            }
            ParseState::Headers(request_line) => {
                let line = scanner.next_line().ok_or(Error::Truncated)?;
                if line.is_empty() {
                    ParseState::Complete(request_line)
                } else {
                    headers.push(parse_header_line(line)?);
                    ParseState::Headers(request_line)
                }
            }
            ParseState::Complete(request_line) => break request_line,
        };
    };

    Ok(HttpRequest::new(
        request_line.method,
        request_line.resource,
        request_line.version,
        headers,
    )
    .with_body(scanner.remainder()))
}
