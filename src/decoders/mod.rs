/*
 * SPDX-License-Identifier: Apache-2.0 OR MIT
 */

pub mod base64;
pub mod charsets;
pub mod quoted_printable;

use std::borrow::Cow;

use crate::Error;

/// A Content-Transfer-Encoding, reduced to the transform it implies.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Encoding {
    /// 7bit, 8bit and binary are all identity transforms.
    #[default]
    None,
    QuotedPrintable,
    Base64,
}

impl Encoding {
    /// Maps a Content-Transfer-Encoding token, case-insensitively. An
    /// absent header is represented by the empty token and defaults to
    /// identity; unknown tokens fail closed.
    pub fn parse(token: &str) -> Result<Encoding, Error> {
        let token = token.trim();
        if token.is_empty()
            || token.eq_ignore_ascii_case("7bit")
            || token.eq_ignore_ascii_case("8bit")
            || token.eq_ignore_ascii_case("binary")
        {
            Ok(Encoding::None)
        } else if token.eq_ignore_ascii_case("quoted-printable") {
            Ok(Encoding::QuotedPrintable)
        } else if token.eq_ignore_ascii_case("base64") {
            Ok(Encoding::Base64)
        } else {
            Err(Error::UnsupportedEncoding(token.to_string()))
        }
    }

    /// Reverses the transfer encoding over a body slice.
    pub fn decode<'x>(&self, body: &'x [u8]) -> Cow<'x, [u8]> {
        match self {
            Encoding::None => Cow::Borrowed(body),
            Encoding::QuotedPrintable => quoted_printable::decode_body(body),
            Encoding::Base64 => Cow::Owned(base64::decode(body)),
        }
    }
}
