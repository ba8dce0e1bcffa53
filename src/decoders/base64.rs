/*
 * SPDX-License-Identifier: Apache-2.0 OR MIT
 */

/// Decodes a base64 body, ignoring embedded line breaks and any other
/// byte outside the base64 alphabet. Padding ends the decode.
pub fn decode(bytes: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity((bytes.len() / 4) * 3 + 3);
    let mut chunk: u32 = 0;
    let mut bits: u32 = 0;

    for &ch in bytes {
        let val = match base64_val(ch) {
            Some(val) => val,
            None => {
                if ch == b'=' {
                    break;
                }
                continue;
            }
        };

        chunk = (chunk << 6) | val as u32;
        bits += 6;
        if bits >= 8 {
            bits -= 8;
            buf.push((chunk >> bits) as u8);
        }
    }

    buf
}

/// Same alphabet, but fails on bytes that are not valid inside an
/// RFC 2047 "B" encoded word.
pub fn decode_word(bytes: &[u8]) -> Option<Vec<u8>> {
    if bytes
        .iter()
        .all(|&ch| base64_val(ch).is_some() || ch == b'=')
    {
        Some(decode(bytes))
    } else {
        None
    }
}

#[inline(always)]
fn base64_val(ch: u8) -> Option<u8> {
    match ch {
        b'A'..=b'Z' => Some(ch - b'A'),
        b'a'..=b'z' => Some(ch - b'a' + 26),
        b'0'..=b'9' => Some(ch - b'0' + 52),
        b'+' => Some(62),
        b'/' => Some(63),
        _ => None,
    }
}
