/*
 * SPDX-License-Identifier: Apache-2.0 OR MIT
 */

/// A resolved byte-stream to text decoder for one charset.
///
/// UTF-8 and US-ASCII are handled internally; everything else is
/// provided by [`encoding_rs`] behind the `full_encoding` feature.
#[derive(Debug, Clone, Copy)]
pub enum CharsetDecoder {
    Utf8,
    #[cfg(feature = "full_encoding")]
    Extended(&'static encoding_rs::Encoding),
}

impl CharsetDecoder {
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            CharsetDecoder::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            #[cfg(feature = "full_encoding")]
            CharsetDecoder::Extended(encoding) => encoding.decode(bytes).0.into_owned(),
        }
    }
}

/// Maps a charset label to a decoder, `None` for unknown charsets.
///
/// The reader degrades to raw passthrough whenever the resolver returns
/// `None`, so a custom resolver controls the fallback policy.
pub type CharsetResolver = fn(&str) -> Option<CharsetDecoder>;

/// The default registry: UTF-8/US-ASCII plus, with `full_encoding`, all
/// labels known to [`encoding_rs`].
pub fn default_resolver(label: &str) -> Option<CharsetDecoder> {
    let label = label.trim();
    if label.eq_ignore_ascii_case("utf-8")
        || label.eq_ignore_ascii_case("utf8")
        || label.eq_ignore_ascii_case("us-ascii")
        || label.eq_ignore_ascii_case("ascii")
    {
        return Some(CharsetDecoder::Utf8);
    }

    #[cfg(feature = "full_encoding")]
    {
        encoding_rs::Encoding::for_label_no_replacement(label.as_bytes())
            .map(CharsetDecoder::Extended)
    }

    #[cfg(not(feature = "full_encoding"))]
    None
}
