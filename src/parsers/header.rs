/*
 * SPDX-License-Identifier: Apache-2.0 OR MIT
 */

use std::borrow::Cow;

use crate::{Header, HeaderMap};

/// Splits a raw entity into its header block and body.
///
/// Folded lines (continuations starting with whitespace) belong to the
/// preceding field; the raw value keeps its folds, unfolding happens at
/// access time. Returns `None` when a field line carries no colon, which
/// makes the block unparseable.
pub fn parse_header_block(data: &[u8]) -> Option<(HeaderMap<'_>, &[u8])> {
    let mut headers = Vec::new();
    let mut pos = 0;

    loop {
        match data.get(pos) {
            None => return Some((HeaderMap::new(headers), &data[data.len()..])),
            Some(b'\n') => return Some((HeaderMap::new(headers), &data[pos + 1..])),
            Some(b'\r') if data.get(pos + 1) == Some(&b'\n') => {
                return Some((HeaderMap::new(headers), &data[pos + 2..]));
            }
            _ => (),
        }

        let line_end = end_of_line(data, pos);
        let colon = data[pos..line_end].iter().position(|&ch| ch == b':')?;
        let name = trim_bytes(&data[pos..pos + colon]);
        if name.is_empty() {
            return None;
        }

        let value_start = pos + colon + 1;
        let mut value_end = line_end;
        pos = next_line(data, line_end);

        // Fold: continuation lines start with SP or TAB
        while matches!(data.get(pos), Some(b' ') | Some(b'\t')) {
            value_end = end_of_line(data, pos);
            pos = next_line(data, value_end);
        }

        headers.push(Header {
            name: String::from_utf8_lossy(name),
            raw: trim_bytes(&data[value_start..value_end]),
        });
    }
}

/// Unfolds a raw field value into display form: each CRLF plus the
/// following run of whitespace collapses into a single space.
pub fn unfold(raw: &[u8]) -> Cow<'_, str> {
    if !raw.contains(&b'\n') {
        String::from_utf8_lossy(raw)
    } else {
        let mut buf = Vec::with_capacity(raw.len());
        let mut pos = 0;
        while pos < raw.len() {
            match raw[pos] {
                b'\r' if raw.get(pos + 1) == Some(&b'\n') => pos += 1,
                b'\n' => {
                    buf.push(b' ');
                    pos += 1;
                    while matches!(raw.get(pos), Some(b' ') | Some(b'\t')) {
                        pos += 1;
                    }
                    continue;
                }
                ch => {
                    buf.push(ch);
                    pos += 1;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned().into()
    }
}

fn end_of_line(data: &[u8], pos: usize) -> usize {
    data[pos..]
        .iter()
        .position(|&ch| ch == b'\n')
        .map_or(data.len(), |nl| {
            if nl > 0 && data[pos + nl - 1] == b'\r' {
                pos + nl - 1
            } else {
                pos + nl
            }
        })
}

fn next_line(data: &[u8], line_end: usize) -> usize {
    let mut pos = line_end;
    if data.get(pos) == Some(&b'\r') {
        pos += 1;
    }
    if data.get(pos) == Some(&b'\n') {
        pos += 1;
    }
    pos
}

fn trim_bytes(mut bytes: &[u8]) -> &[u8] {
    while let [b' ' | b'\t', rest @ ..] = bytes {
        bytes = rest;
    }
    while let [rest @ .., b' ' | b'\t'] = bytes {
        bytes = rest;
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::parse_header_block;

    #[test]
    fn parse_headers() {
        let input = b"Subject: Your Name\r\n\
            Received: one\r\n\
            Content-Type: multipart/mixed;\r\n\
            \tboundary=frontier\r\n\
            Received: two\r\n\
            \r\n\
            body bytes";

        let (headers, body) = parse_header_block(input).unwrap();
        assert_eq!(body, b"body bytes");
        assert_eq!(headers.len(), 4);
        assert_eq!(headers.get("subject").unwrap(), "Your Name");
        // Last occurrence wins
        assert_eq!(headers.get("RECEIVED").unwrap(), "two");
        assert_eq!(
            headers.get("Content-Type").unwrap(),
            "multipart/mixed; boundary=frontier"
        );
    }

    #[test]
    fn parse_headers_without_body() {
        let (headers, body) = parse_header_block(b"Subject: hi\r\n").unwrap();
        assert_eq!(headers.get("Subject").unwrap(), "hi");
        assert!(body.is_empty());
    }

    #[test]
    fn reject_unparseable_block() {
        assert!(parse_header_block(b"this line has no colon\r\n\r\n").is_none());
    }

    #[test]
    fn empty_header_block() {
        let (headers, body) = parse_header_block(b"\r\nWho are you?").unwrap();
        assert!(headers.is_empty());
        assert_eq!(body, b"Who are you?");
    }
}
