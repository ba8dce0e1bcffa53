/*
 * SPDX-License-Identifier: Apache-2.0 OR MIT
 */

use std::borrow::Cow;

/// Decodes a quoted-printable body: `=XX` hex escapes and soft line
/// breaks. Invalid escape sequences are passed through verbatim so that
/// commonly-malformed messages remain readable.
pub fn decode_body(src: &[u8]) -> Cow<'_, [u8]> {
    if !src.contains(&b'=') {
        return Cow::Borrowed(src);
    }

    let mut buf = Vec::with_capacity(src.len());
    let mut pos = 0;

    while pos < src.len() {
        let ch = src[pos];
        if ch != b'=' {
            buf.push(ch);
            pos += 1;
            continue;
        }

        match src.get(pos + 1..pos + 3) {
            // Soft line break
            Some(&[b'\r', b'\n']) => pos += 3,
            Some(&[b'\n', _]) => pos += 2,
            Some(hex) => {
                if let (Some(hi), Some(lo)) = (hex_val(hex[0]), hex_val(hex[1])) {
                    buf.push((hi << 4) | lo);
                    pos += 3;
                } else {
                    buf.push(b'=');
                    pos += 1;
                }
            }
            None => {
                // "=\n" or a dangling "=" at the end of input
                match src.get(pos + 1) {
                    Some(b'\n') | None => pos = src.len(),
                    Some(&ch) => {
                        buf.push(b'=');
                        buf.push(ch);
                        pos += 2;
                    }
                }
            }
        }
    }

    Cow::Owned(buf)
}

/// Decodes an RFC 2047 "Q" encoded word: underscores map to spaces and
/// malformed escapes fail the whole word.
pub fn decode_word(src: &[u8]) -> Option<Vec<u8>> {
    let mut buf = Vec::with_capacity(src.len());
    let mut pos = 0;

    while pos < src.len() {
        match src[pos] {
            b'=' => {
                let hex = src.get(pos + 1..pos + 3)?;
                buf.push((hex_val(hex[0])? << 4) | hex_val(hex[1])?);
                pos += 3;
            }
            b'_' => {
                buf.push(b' ');
                pos += 1;
            }
            b'\r' | b'\n' => return None,
            ch => {
                buf.push(ch);
                pos += 1;
            }
        }
    }

    Some(buf)
}

#[inline(always)]
fn hex_val(ch: u8) -> Option<u8> {
    match ch {
        b'0'..=b'9' => Some(ch - b'0'),
        b'A'..=b'F' => Some(ch - b'A' + 10),
        b'a'..=b'f' => Some(ch - b'a' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_body, decode_word};

    #[test]
    fn decode_quoted_printable_body() {
        let inputs = [
            ("plain text, nothing quoted", "plain text, nothing quoted"),
            ("J'interdis aux marchands de vanter=\r\n leurs merchandises", "J'interdis aux marchands de vanter leurs merchandises"),
            ("foo=20bar", "foo bar"),
            ("=C3=A9t=C3=A9", "été"),
            ("line one\r\nline two", "line one\r\nline two"),
            ("broken =XY escape", "broken =XY escape"),
            ("trailing equals=", "trailing equals"),
            // =E2=80=89 is U+2009 THIN SPACE
            ("=E2=80=94=E2=80=89Antoine de Saint-Exup=C3=A9ry", "—\u{2009}Antoine de Saint-Exupéry"),
        ];

        for (input, expected) in inputs {
            assert_eq!(
                decode_body(input.as_bytes()).as_ref(),
                expected.as_bytes(),
                "failed for {input:?}"
            );
        }
    }

    #[test]
    fn decode_quoted_printable_word() {
        let inputs = [
            ("this=20is=20some=20text", Some("this is some text")),
            ("Keith_Moore", Some("Keith Moore")),
            ("Patrik_F=E4ltstr=F6m", None), // latin-1 bytes, not utf-8
            ("=2=123", None),
            ("= 20", None),
        ];

        for (input, expected) in inputs {
            let decoded = decode_word(input.as_bytes());
            match expected {
                Some(text) => assert_eq!(
                    decoded.as_deref().map(String::from_utf8_lossy),
                    Some(text.into()),
                    "failed for {input:?}"
                ),
                None => {
                    if let Some(decoded) = decoded {
                        assert!(
                            std::str::from_utf8(&decoded).is_err(),
                            "expected failure or non-utf8 for {input:?}"
                        );
                    }
                }
            }
        }
    }
}
