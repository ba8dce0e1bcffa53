/*
 * SPDX-License-Identifier: Apache-2.0 OR MIT
 */

use crate::decoders::{base64, charsets::CharsetResolver, quoted_printable};

// RFC 2047 caps an encoded word at 75 octets; tolerate a bit more.
const MAX_WORD_LEN: usize = 100;

/// Decodes RFC 2047 encoded-word runs (`=?charset?Q|B?...?=`) inside a
/// header value. Returns `None` when the input contains no decodable
/// word. Words in an unknown charset are left verbatim rather than
/// failing the whole header; whitespace between two adjacent encoded
/// words is elided per the RFC.
pub fn decode_rfc2047(input: &str, resolver: CharsetResolver) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out: Option<String> = None;
    let mut pos = 0;
    let mut copied = 0;

    while let Some(start) = find_word_start(bytes, pos) {
        match parse_word(&bytes[start..], resolver) {
            Some(word) => {
                let out = out.get_or_insert_with(|| String::with_capacity(input.len()));
                out.push_str(&input[copied..start]);
                out.push_str(&word.text);
                pos = start + word.len;
                copied = pos;

                // Linear whitespace between two encoded words is not
                // displayed
                let mut lookahead = pos;
                while bytes
                    .get(lookahead)
                    .is_some_and(|ch| ch.is_ascii_whitespace())
                {
                    lookahead += 1;
                }
                if lookahead > pos
                    && bytes[lookahead..].starts_with(b"=?")
                    && parse_word(&bytes[lookahead..], resolver).is_some()
                {
                    pos = lookahead;
                    copied = lookahead;
                }
            }
            None => pos = start + 2,
        }
    }

    out.map(|mut out| {
        out.push_str(&input[copied..]);
        out
    })
}

struct Word {
    text: String,
    /// Total length of the encoded word in the source, including the
    /// `=?` and `?=` markers.
    len: usize,
}

fn find_word_start(bytes: &[u8], from: usize) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(2)
        .position(|pair| pair == b"=?")
        .map(|pos| from + pos)
}

fn parse_word(bytes: &[u8], resolver: CharsetResolver) -> Option<Word> {
    let inner = bytes.strip_prefix(b"=?")?;

    let charset_end = inner.iter().position(|&ch| ch == b'?')?;
    let charset = std::str::from_utf8(&inner[..charset_end]).ok()?;
    if charset.is_empty() || charset_end > 45 {
        return None;
    }

    let encoding = *inner.get(charset_end + 1)?;
    if inner.get(charset_end + 2) != Some(&b'?') {
        return None;
    }

    let payload_start = charset_end + 3;
    let payload_len = inner
        .get(payload_start..)?
        .windows(2)
        .position(|pair| pair == b"?=")?;
    let payload = &inner[payload_start..payload_start + payload_len];
    let len = 2 + payload_start + payload_len + 2;
    if len > MAX_WORD_LEN {
        return None;
    }

    let decoded = match encoding {
        b'q' | b'Q' => quoted_printable::decode_word(payload)?,
        b'b' | b'B' => base64::decode_word(payload)?,
        _ => return None,
    };

    // An RFC 2231 language suffix may trail the charset label
    let charset = charset.split('*').next().unwrap_or(charset);
    let text = match resolver(charset) {
        Some(decoder) => decoder.decode(&decoded),
        // Unknown charset: leave the whole run verbatim
        None => String::from_utf8_lossy(&bytes[..len]).into_owned(),
    };

    Some(Word { text, len })
}

#[cfg(test)]
mod tests {
    use super::decode_rfc2047;
    use crate::decoders::charsets::default_resolver;

    fn decode(input: &str) -> Option<String> {
        decode_rfc2047(input, default_resolver)
    }

    #[test]
    fn decode_encoded_words() {
        let inputs = [
            ("=?US-ASCII?Q?Keith_Moore?=", "Keith Moore"),
            ("=?ISO-8859-1?Q?Olle_J=E4rnefors?=", "Olle Järnefors"),
            (
                "=?ISO-8859-1?B?SWYgeW91IGNhbiByZWFkIHRoaXMgeW8=?=",
                "If you can read this yo",
            ),
            (
                "=?utf-8?b?VGjDrXMgw61zIHbDoWzDrWQgw5pURjg=?=",
                "Thís ís válíd ÚTF8",
            ),
            (
                "Subject prefix =?utf-8?q?and_an_encoded_tail?=",
                "Subject prefix and an encoded tail",
            ),
            (
                "=?ISO-8859-1?Q?a?= =?ISO-8859-1?Q?b?=",
                "ab",
            ),
            ("=?ISO-8859-1*en?Q?a?=", "a"),
            (
                "Why not both? =?utf-8?b?4pi6?=",
                "Why not both? ☺",
            ),
        ];

        for (input, expected) in inputs {
            assert_eq!(
                decode(input).as_deref(),
                Some(expected),
                "failed for {input:?}"
            );
        }
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(decode("Your Name"), None);
        assert_eq!(decode("100% =? not a word"), None);
    }

    #[test]
    fn unknown_charset_left_verbatim() {
        assert_eq!(
            decode("hi =?x-mystery?q?data?= there").as_deref(),
            Some("hi =?x-mystery?q?data?= there")
        );
    }
}
