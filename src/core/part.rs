/*
 * SPDX-License-Identifier: Apache-2.0 OR MIT
 */

use std::borrow::Cow;

use crate::{core::reader::ReaderOptions, Error, HeaderMap};

/// A leaf part's headers, tagged by how the part should be handled.
///
/// Classification follows the Content-Disposition field when present;
/// without one, media types a mail client renders in the message view
/// (`text/*`, `image/*`, `audio/*`, `video/*`) count as inline and
/// everything else as an attachment.
#[derive(Debug, Clone, PartialEq)]
pub enum PartHeader<'x> {
    Inline(HeaderMap<'x>),
    Attachment(HeaderMap<'x>),
}

impl<'x> PartHeader<'x> {
    /// Returns the underlying header fields regardless of the tag.
    pub fn headers(&self) -> &HeaderMap<'x> {
        match self {
            PartHeader::Inline(headers) | PartHeader::Attachment(headers) => headers,
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, PartHeader::Inline(_))
    }

    pub fn is_attachment(&self) -> bool {
        matches!(self, PartHeader::Attachment(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PartBody<'x> {
    Decoded(Cow<'x, [u8]>),
    /// The Content-Transfer-Encoding token was not recognized; the body
    /// could not be decoded but the raw bytes remain available.
    Unsupported { error: Error, raw: &'x [u8] },
}

/// One leaf part of a message, with its transfer encoding reversed and,
/// for text parts, its declared charset decoded to UTF-8.
#[derive(Debug, Clone, PartialEq)]
pub struct Part<'x> {
    pub header: PartHeader<'x>,
    pub(crate) body: PartBody<'x>,
    pub(crate) raw: &'x [u8],
}

impl<'x> Part<'x> {
    /// Returns the part's header fields.
    pub fn headers(&self) -> &HeaderMap<'x> {
        self.header.headers()
    }

    /// Returns the decoded body. Fails when the part declared a
    /// Content-Transfer-Encoding this library does not implement; the
    /// undecoded bytes stay reachable through [`Part::raw_body`].
    pub fn body(&self) -> Result<&[u8], Error> {
        match &self.body {
            PartBody::Decoded(bytes) => Ok(bytes.as_ref()),
            PartBody::Unsupported { error, .. } => Err(error.clone()),
        }
    }

    /// Returns the body bytes exactly as they appeared on the wire.
    pub fn raw_body(&self) -> &'x [u8] {
        match &self.body {
            PartBody::Decoded(_) => self.raw,
            PartBody::Unsupported { raw, .. } => raw,
        }
    }

    /// Returns the decoded body as text, replacing any byte sequence
    /// that is not valid UTF-8.
    pub fn text_contents(&self) -> Result<Cow<'_, str>, Error> {
        Ok(String::from_utf8_lossy(self.body()?))
    }

    pub fn is_inline(&self) -> bool {
        self.header.is_inline()
    }

    pub fn is_attachment(&self) -> bool {
        self.header.is_attachment()
    }
}

pub(crate) fn build_part<'x>(
    headers: HeaderMap<'x>,
    raw: &'x [u8],
    options: &ReaderOptions,
) -> Part<'x> {
    let inline = is_inline_part(&headers);

    let body = match headers.transfer_encoding() {
        Ok(encoding) => {
            let mut decoded = encoding.decode(raw);

            let content_type = headers.content_type();
            if content_type.is_text() && (inline || options.decode_text_attachments) {
                if let Some(decoder) = content_type
                    .attribute("charset")
                    .and_then(|charset| (options.charset_resolver)(charset))
                {
                    decoded = Cow::Owned(decoder.decode(&decoded).into_bytes());
                }
            }

            PartBody::Decoded(decoded)
        }
        Err(error) => PartBody::Unsupported { error, raw },
    };

    let header = if inline {
        PartHeader::Inline(headers)
    } else {
        PartHeader::Attachment(headers)
    };

    Part { header, body, raw }
}

fn is_inline_part(headers: &HeaderMap<'_>) -> bool {
    match headers.content_disposition() {
        Some(disposition) => !disposition.is_attachment(),
        None => {
            let content_type = headers.content_type();
            matches!(
                content_type.ctype(),
                "text" | "image" | "audio" | "video"
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::build_part;
    use crate::{core::reader::ReaderOptions, parsers::header::parse_header_block, Error};

    fn part<'x>(input: &'x [u8], options: &ReaderOptions) -> super::Part<'x> {
        let (headers, body) = parse_header_block(input).unwrap();
        build_part(headers, body, options)
    }

    #[test]
    fn classification() {
        let options = ReaderOptions::default();
        let inputs = [
            ("Content-Type: text/plain\r\n\r\nhi", true),
            ("Content-Type: image/png\r\n\r\n", true),
            ("Content-Type: application/pdf\r\n\r\n", false),
            ("Content-Type: message/rfc822\r\n\r\n", false),
            (
                "Content-Type: text/plain\r\nContent-Disposition: attachment; filename=a.txt\r\n\r\n",
                false,
            ),
            (
                "Content-Type: application/pdf\r\nContent-Disposition: inline\r\n\r\n",
                true,
            ),
            ("\r\nimplicit text/plain", true),
        ];

        for (input, inline) in inputs {
            assert_eq!(
                part(input.as_bytes(), &options).is_inline(),
                inline,
                "failed for {input:?}"
            );
        }
    }

    #[test]
    fn quoted_printable_body_is_decoded() {
        let options = ReaderOptions::default();
        let part = part(
            b"Content-Transfer-Encoding: quoted-printable\r\n\r\ncaf=C3=A9",
            &options,
        );
        assert_eq!(part.body().unwrap(), "café".as_bytes());
        assert_eq!(part.raw_body(), b"caf=C3=A9");
    }

    #[test]
    fn charset_decoded_for_inline_text() {
        let options = ReaderOptions::default();
        let part = part(
            b"Content-Type: text/plain; charset=iso-8859-1\r\n\r\ncaf\xe9",
            &options,
        );
        assert_eq!(part.text_contents().unwrap(), "café");
    }

    #[test]
    fn text_attachment_policy() {
        let input = b"Content-Type: text/plain; charset=iso-8859-1\r\n\
            Content-Disposition: attachment; filename=a.txt\r\n\
            \r\n\
            caf\xe9";

        let decoded = part(input, &ReaderOptions::default());
        assert_eq!(decoded.text_contents().unwrap(), "café");

        let raw = part(
            input,
            &ReaderOptions::default().decode_text_attachments(false),
        );
        assert_eq!(raw.body().unwrap(), b"caf\xe9");
    }

    #[test]
    fn unknown_charset_degrades_to_raw() {
        let options = ReaderOptions::default();
        let part = part(
            b"Content-Type: text/plain; charset=x-mystery\r\n\r\ncaf\xe9",
            &options,
        );
        assert_eq!(part.body().unwrap(), b"caf\xe9");
    }

    #[test]
    fn unsupported_encoding_keeps_raw_bytes() {
        let options = ReaderOptions::default();
        let part = part(
            b"Content-Transfer-Encoding: x-uuencode\r\n\r\nraw stuff",
            &options,
        );
        assert_eq!(
            part.body(),
            Err(Error::UnsupportedEncoding("x-uuencode".to_string()))
        );
        assert_eq!(part.raw_body(), b"raw stuff");
    }
}
