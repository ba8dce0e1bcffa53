/*
 * SPDX-License-Identifier: Apache-2.0 OR MIT
 */

use std::borrow::Cow;

use crate::{decoders::charsets::CharsetResolver, ContentType};

use super::MessageStream;

/// Parses a raw Content-Type or Content-Disposition field value per the
/// RFC 2045/2183 grammar, decoding RFC 2231 parameter continuations and
/// charset-encoded parameter values through `resolver`.
///
/// Parsing is best-effort: grammar violations set the `malformed` flag on
/// the result instead of failing, since the body must remain readable.
pub fn parse_content_type<'x>(raw: &'x [u8], resolver: CharsetResolver) -> ContentType<'x> {
    let mut stream = MessageStream::new(raw);
    let mut malformed = false;

    let c_type = read_token(&mut stream).map(lowercase);
    let c_subtype = if stream.skip_if(b'/') {
        read_token(&mut stream).map(lowercase)
    } else {
        None
    };
    if c_type.is_none() {
        malformed = true;
    }

    let mut params: Vec<(String, Cow<'_, str>)> = Vec::new();
    loop {
        skip_ws_and_comments(&mut stream);
        if !stream.skip_if(b';') {
            if !stream.is_eof() {
                malformed = true;
            }
            break;
        }
        skip_ws_and_comments(&mut stream);
        let name = match read_token(&mut stream) {
            Some(name) => name.to_ascii_lowercase(),
            None => continue,
        };
        skip_ws_and_comments(&mut stream);
        if !stream.skip_if(b'=') {
            malformed = true;
            skip_to_semicolon(&mut stream);
            continue;
        }
        skip_ws_and_comments(&mut stream);
        match read_value(&mut stream) {
            Some(value) => params.push((name, value)),
            None => malformed = true,
        }
    }

    ContentType {
        c_type: c_type.unwrap_or(Cow::Borrowed("")),
        c_subtype,
        attributes: assemble_params(params, resolver),
        malformed,
    }
}

/// One RFC 2231 parameter section: `name`, `name*0`, `name*1*`, ...
struct Section<'x> {
    number: Option<u32>,
    extended: bool,
    value: Cow<'x, str>,
}

/// Reassembles continuation sections in order and decodes extended
/// (percent-encoded, charset-tagged) sections.
fn assemble_params<'x>(
    params: Vec<(String, Cow<'x, str>)>,
    resolver: CharsetResolver,
) -> Option<Vec<(Cow<'x, str>, Cow<'x, str>)>> {
    if params.is_empty() {
        return None;
    }

    let mut grouped: Vec<(String, Vec<Section<'_>>)> = Vec::new();
    for (name, value) in params {
        let (base, section) = match name.split_once('*') {
            None => (
                name,
                Section {
                    number: None,
                    extended: false,
                    value,
                },
            ),
            Some((base, rest)) => {
                let extended = rest.is_empty() || rest.ends_with('*');
                let digits = rest.trim_end_matches('*');
                let number = if digits.is_empty() {
                    Some(0)
                } else {
                    match digits.parse::<u32>() {
                        Ok(number) => Some(number),
                        // Not a continuation after all, treat verbatim
                        Err(_) => None,
                    }
                };
                match number {
                    Some(number) => (
                        base.to_string(),
                        Section {
                            number: Some(number),
                            extended,
                            value,
                        },
                    ),
                    None => (
                        name,
                        Section {
                            number: None,
                            extended: false,
                            value,
                        },
                    ),
                }
            }
        };

        match grouped.iter_mut().find(|(key, _)| *key == base) {
            Some((_, sections)) => sections.push(section),
            None => grouped.push((base, vec![section])),
        }
    }

    let mut attributes = Vec::with_capacity(grouped.len());
    for (name, mut sections) in grouped {
        if sections.len() == 1 && !(sections[0].extended || sections[0].number.is_some()) {
            if let Some(Section { value, .. }) = sections.pop() {
                attributes.push((Cow::Owned(name), value));
            }
            continue;
        }

        sections.sort_by_key(|section| section.number.unwrap_or(0));

        let mut out = String::new();
        let mut pending: Vec<u8> = Vec::new();
        let mut charset: Option<String> = None;
        for section in sections {
            if section.extended {
                let mut payload = section.value.as_ref();
                if charset.is_none() {
                    // charset'language'value prefix on the first
                    // extended section
                    let mut split = payload.splitn(3, '\'');
                    if let (Some(cs), Some(_lang), Some(rest)) =
                        (split.next(), split.next(), split.next())
                    {
                        charset = Some(cs.to_string());
                        payload = rest;
                    } else {
                        charset = Some(String::new());
                    }
                }
                percent_decode(payload.as_bytes(), &mut pending);
            } else {
                flush_extended(&mut out, &mut pending, charset.as_deref(), resolver);
                out.push_str(section.value.as_ref());
            }
        }
        flush_extended(&mut out, &mut pending, charset.as_deref(), resolver);
        attributes.push((Cow::Owned(name), Cow::Owned(out)));
    }

    Some(attributes)
}

fn flush_extended(
    out: &mut String,
    pending: &mut Vec<u8>,
    charset: Option<&str>,
    resolver: CharsetResolver,
) {
    if pending.is_empty() {
        return;
    }
    match charset.and_then(resolver) {
        Some(decoder) => out.push_str(&decoder.decode(pending)),
        None => out.push_str(&String::from_utf8_lossy(pending)),
    }
    pending.clear();
}

fn percent_decode(src: &[u8], out: &mut Vec<u8>) {
    let mut pos = 0;
    while pos < src.len() {
        if src[pos] == b'%' {
            if let Some(&[hi, lo]) = src.get(pos + 1..pos + 3) {
                if let (Some(hi), Some(lo)) = (hex_val(hi), hex_val(lo)) {
                    out.push((hi << 4) | lo);
                    pos += 3;
                    continue;
                }
            }
        }
        out.push(src[pos]);
        pos += 1;
    }
}

fn hex_val(ch: u8) -> Option<u8> {
    match ch {
        b'0'..=b'9' => Some(ch - b'0'),
        b'A'..=b'F' => Some(ch - b'A' + 10),
        b'a'..=b'f' => Some(ch - b'a' + 10),
        _ => None,
    }
}

fn is_token_char(ch: u8) -> bool {
    !ch.is_ascii_whitespace()
        && !ch.is_ascii_control()
        && !matches!(
            ch,
            b'(' | b')'
                | b'<'
                | b'>'
                | b'@'
                | b','
                | b';'
                | b':'
                | b'\\'
                | b'"'
                | b'/'
                | b'['
                | b']'
                | b'?'
                | b'='
        )
}

fn read_token<'x>(stream: &mut MessageStream<'x>) -> Option<Cow<'x, str>> {
    skip_ws_and_comments(stream);
    let start = stream.pos;
    while stream.peek().is_some_and(is_token_char) {
        stream.pos += 1;
    }
    if stream.pos > start {
        Some(String::from_utf8_lossy(stream.bytes(start, stream.pos)))
    } else {
        None
    }
}

/// Reads a parameter value: a quoted string, or a lenient token running
/// to the next `;` or end of line (real-world unquoted values carry
/// spaces).
fn read_value<'x>(stream: &mut MessageStream<'x>) -> Option<Cow<'x, str>> {
    if stream.skip_if(b'"') {
        read_quoted_string(stream)
    } else {
        let start = stream.pos;
        let mut end = stream.pos;
        while let Some(ch) = stream.peek() {
            if matches!(ch, b';' | b'\r' | b'\n') {
                break;
            }
            stream.pos += 1;
            if ch != b' ' && ch != b'\t' {
                end = stream.pos;
            }
        }
        (end > start).then(|| String::from_utf8_lossy(stream.bytes(start, end)))
    }
}

fn read_quoted_string<'x>(stream: &mut MessageStream<'x>) -> Option<Cow<'x, str>> {
    let start = stream.pos;
    let mut value: Option<Vec<u8>> = None;

    while let Some(ch) = stream.next() {
        match ch {
            b'"' => {
                return Some(match value {
                    Some(value) => String::from_utf8_lossy(&value).into_owned().into(),
                    None => String::from_utf8_lossy(stream.bytes(start, stream.pos - 1)),
                });
            }
            b'\\' => {
                let buf = value.get_or_insert_with(|| stream.bytes(start, stream.pos - 1).to_vec());
                if let Some(escaped) = stream.next() {
                    buf.push(escaped);
                }
            }
            b'\r' => {
                value.get_or_insert_with(|| stream.bytes(start, stream.pos - 1).to_vec());
            }
            b'\n' => {
                let buf = value.get_or_insert_with(|| stream.bytes(start, stream.pos - 1).to_vec());
                buf.push(b' ');
                while matches!(stream.peek(), Some(b' ') | Some(b'\t')) {
                    stream.pos += 1;
                }
            }
            ch => {
                if let Some(buf) = value.as_mut() {
                    buf.push(ch);
                }
            }
        }
    }

    // Unterminated quoted string, take what we have
    Some(match value {
        Some(value) => String::from_utf8_lossy(&value).into_owned().into(),
        None => String::from_utf8_lossy(stream.bytes(start, stream.pos)),
    })
}

fn skip_ws_and_comments(stream: &mut MessageStream<'_>) {
    loop {
        match stream.peek() {
            Some(b' ' | b'\t' | b'\r' | b'\n') => {
                stream.pos += 1;
            }
            Some(b'(') => {
                let mut depth = 0usize;
                while let Some(ch) = stream.next() {
                    match ch {
                        b'(' => depth += 1,
                        b')' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        b'\\' => {
                            stream.next();
                        }
                        _ => (),
                    }
                }
            }
            _ => return,
        }
    }
}

fn skip_to_semicolon(stream: &mut MessageStream<'_>) {
    while let Some(ch) = stream.peek() {
        if ch == b';' {
            return;
        }
        stream.pos += 1;
    }
}

fn lowercase(value: Cow<'_, str>) -> Cow<'_, str> {
    if value.bytes().any(|ch| ch.is_ascii_uppercase()) {
        Cow::Owned(value.to_ascii_lowercase())
    } else {
        value
    }
}
