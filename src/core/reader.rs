/*
 * SPDX-License-Identifier: Apache-2.0 OR MIT
 */

use crate::{
    core::part::{build_part, Part},
    decoders::charsets::{default_resolver, CharsetResolver},
    parsers::{
        header::parse_header_block,
        mime::{next_block, BoundaryScan},
    },
    Error, HeaderMap,
};

/// Reader configuration, passed at creation time.
#[derive(Debug, Clone, Copy)]
pub struct ReaderOptions {
    pub(crate) decode_text_attachments: bool,
    pub(crate) charset_resolver: CharsetResolver,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        ReaderOptions {
            decode_text_attachments: true,
            charset_resolver: default_resolver,
        }
    }
}

impl ReaderOptions {
    /// Whether `text/*` attachments get charset-decoded like inline text
    /// parts, or keep their transfer-decoded bytes untouched. Enabled by
    /// default.
    pub fn decode_text_attachments(mut self, value: bool) -> Self {
        self.decode_text_attachments = value;
        self
    }

    /// Replaces the charset lookup used for text bodies and encoded
    /// words in part headers.
    pub fn charset_resolver(mut self, resolver: CharsetResolver) -> Self {
        self.charset_resolver = resolver;
        self
    }

    /// Parses the top-level header block and prepares a part traversal
    /// over `message`. Fails only when no header block can be framed;
    /// defects below the top level degrade during traversal instead.
    pub fn create_reader<'x>(&self, message: &'x [u8]) -> Result<MailReader<'x>, Error> {
        if message.is_empty() {
            return Err(Error::Structure);
        }
        let (mut headers, body) = parse_header_block(message).ok_or(Error::Structure)?;
        headers.resolver = self.charset_resolver;

        let mut reader = MailReader {
            headers,
            options: *self,
            root: None,
            stack: Vec::new(),
        };

        // A multipart without a usable boundary degrades to a single
        // leaf over the whole body.
        match multipart_boundary(&reader.headers) {
            Some(boundary) => reader.stack.push(Frame { boundary, rest: body }),
            None => reader.root = Some(body),
        }

        Ok(reader)
    }
}

#[derive(Debug)]
struct Frame<'x> {
    boundary: Vec<u8>,
    rest: &'x [u8],
}

/// A pull-based walk over a message's leaf parts.
///
/// Nested multiparts are flattened: intermediate container entities are
/// never yielded, only their leaves, in the order they appear in the
/// input. The walk keeps an explicit stack of open multipart bodies, one
/// frame per nesting level.
#[derive(Debug)]
pub struct MailReader<'x> {
    headers: HeaderMap<'x>,
    options: ReaderOptions,
    root: Option<&'x [u8]>,
    stack: Vec<Frame<'x>>,
}

impl<'x> MailReader<'x> {
    /// Creates a reader over `message` with default options.
    pub fn parse(message: &'x [u8]) -> Result<MailReader<'x>, Error> {
        ReaderOptions::default().create_reader(message)
    }

    /// The message's top-level header fields.
    pub fn headers(&self) -> &HeaderMap<'x> {
        &self.headers
    }

    /// Advances to the next leaf part. Returns `Ok(None)` once the walk
    /// is exhausted, and keeps returning it on further calls.
    ///
    /// A truncated multipart body reports [`Error::Truncated`] exactly
    /// once for its nesting level; the walk then resumes in the
    /// enclosing level.
    pub fn next_part(&mut self) -> Result<Option<Part<'x>>, Error> {
        if let Some(body) = self.root.take() {
            return Ok(Some(build_part(self.headers.clone(), body, &self.options)));
        }

        loop {
            let scan = match self.stack.last_mut() {
                Some(frame) => {
                    let scan = next_block(frame.rest, &frame.boundary);
                    if let BoundaryScan::Block { rest, .. } = scan {
                        frame.rest = rest;
                    }
                    scan
                }
                None => return Ok(None),
            };

            match scan {
                BoundaryScan::Block { block, .. } => {
                    // A sub-entity whose header block cannot be framed is
                    // treated as a headerless leaf.
                    let (mut headers, body) = parse_header_block(block)
                        .unwrap_or_else(|| (HeaderMap::default(), block));
                    headers.resolver = self.options.charset_resolver;

                    match multipart_boundary(&headers) {
                        Some(boundary) => self.stack.push(Frame { boundary, rest: body }),
                        None => return Ok(Some(build_part(headers, body, &self.options))),
                    }
                }
                BoundaryScan::End => {
                    self.stack.pop();
                }
                BoundaryScan::Truncated => {
                    self.stack.pop();
                    return Err(Error::Truncated);
                }
            }
        }
    }

    /// Ends the traversal early; subsequent [`MailReader::next_part`]
    /// calls return `Ok(None)`. The top-level headers stay readable.
    pub fn close(&mut self) {
        self.root = None;
        self.stack.clear();
    }
}

fn multipart_boundary(headers: &HeaderMap<'_>) -> Option<Vec<u8>> {
    let content_type = headers.content_type();
    if !content_type.is_multipart() {
        return None;
    }
    content_type
        .attribute("boundary")
        .filter(|boundary| !boundary.is_empty())
        .map(|boundary| boundary.as_bytes().to_vec())
}
