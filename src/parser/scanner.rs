//! Line scanner for the request line and header section.

/// Splits raw request bytes into lines without copying.
///
/// A line ends at `\n`; a preceding `\r` is dropped, so both CRLF and bare LF
/// terminators are accepted. Bytes after the last terminator are never
/// returned as a line.
#[derive(Debug)]
pub(crate) struct LineScanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> LineScanner<'a> {
    pub(crate) fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// The next complete line without its terminator, or `None` if no
    /// terminator follows.
    pub(crate) fn next_line(&mut self) -> Option<&'a [u8]> {
        let rest = &self.input[self.pos..];
        let end = rest.iter().position(|&b| b == b'\n')?;
        self.pos += end + 1;

        let line = &rest[..end];
        Some(line.strip_suffix(b"\r").unwrap_or(line))
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Everything after the last line returned.
    pub(crate) fn remainder(&self) -> &'a [u8] {
        &self.input[self.pos..]
    }
}

/// Returns the offset just past the blank line that closes the header
/// section, or `None` if the input does not contain one yet.
///
/// Leading blank lines before the request line are skipped, matching
/// [`parse_request`](crate::parser::parse_request).
pub fn find_header_end(input: &[u8]) -> Option<usize> {
    let mut scanner = LineScanner::new(input);
    let mut seen_request_line = false;

    while let Some(line) = scanner.next_line() {
        if !line.is_empty() {
            seen_request_line = true;
        } else if seen_request_line {
            return Some(scanner.pos);
        }
    }
    None
}
