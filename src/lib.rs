/*
 * SPDX-License-Identifier: Apache-2.0 OR MIT
 */

//! # mail-reader
//!
//! _mail-reader_ is a **streaming e-mail part reader** for messages in the
//! Internet Message Format (_RFC 5322_) with MIME structure
//! (_RFC 2045 - 2049_, _RFC 2183_, _RFC 2231_). It walks a message's
//! entity tree and yields each leaf part, inline text or attachment,
//! one at a time, reversing the content-transfer-encoding and the
//! declared character set along the way.
//!
//! Unlike parsers that materialize the whole message, the reader
//! flattens arbitrarily nested multiparts into a linear pull-based
//! sequence: each [`MailReader::next_part`] call advances a pre-order
//! walk and returns the next leaf, classified [`PartHeader::Inline`] or
//! [`PartHeader::Attachment`]. Parsing is zero-copy where possible;
//! bodies and header values borrow from the input message unless
//! decoding forces an allocation.
//!
//! The library abides by the Robustness Principle: commonly-malformed
//! real-world messages parse best-effort instead of failing. A declared
//! multipart without a usable boundary degrades to a single leaf, an
//! unknown charset degrades to raw bytes, and a malformed Content-Type
//! falls back to `text/plain` while staying inspectable.
//!
//! ```ignore
//! use mail_reader::MailReader;
//!
//! let mut reader = MailReader::parse(raw_message)?;
//! println!("subject: {:?}", reader.headers().subject());
//!
//! while let Some(part) = reader.next_part()? {
//!     match &part.header {
//!         mail_reader::PartHeader::Inline(_) => {
//!             println!("text: {}", part.text_contents().unwrap());
//!         }
//!         mail_reader::PartHeader::Attachment(headers) => {
//!             println!("attachment: {}", headers.filename()?);
//!         }
//!     }
//! }
//! ```
//!
//! Nested `message/rfc822` parts are yielded as opaque bodies; feed a
//! part's body into a fresh `MailReader` to walk the inner message.

pub mod core;
pub mod decoders;
pub mod parsers;

mod error;

use std::borrow::Cow;

pub use crate::core::part::{Part, PartHeader};
pub use crate::core::reader::{MailReader, ReaderOptions};
pub use crate::decoders::charsets::{default_resolver, CharsetDecoder, CharsetResolver};
pub use crate::decoders::Encoding;
pub use error::Error;

/// One raw RFC 5322 header field, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct Header<'x> {
    pub(crate) name: Cow<'x, str>,
    pub(crate) raw: &'x [u8],
}

/// An ordered multimap of header fields with case-insensitive lookup.
///
/// Insertion order is preserved and a name may repeat (for example
/// multiple `Received` fields); single-valued lookups return the last
/// occurrence. The map carries the charset lookup its decoding
/// accessors use, so a reader's custom resolver also governs encoded
/// words and RFC 2231 parameters in the headers it hands out.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderMap<'x> {
    pub(crate) headers: Vec<Header<'x>>,
    pub(crate) resolver: CharsetResolver,
}

/// An RFC 2045 Content-Type or RFC 2183 Content-Disposition field.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentType<'x> {
    pub(crate) c_type: Cow<'x, str>,
    pub(crate) c_subtype: Option<Cow<'x, str>>,
    pub(crate) attributes: Option<Vec<(Cow<'x, str>, Cow<'x, str>)>>,
    pub(crate) malformed: bool,
}
