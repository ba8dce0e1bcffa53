/*
 * SPDX-License-Identifier: Apache-2.0 OR MIT
 */

use std::borrow::Cow;

use crate::{
    decoders::{charsets::default_resolver, Encoding},
    parsers::{content_type::parse_content_type, encoded_word::decode_rfc2047, header::unfold},
    ContentType, Error, Header, HeaderMap,
};

impl<'x> Header<'x> {
    /// Returns the header field name as it appeared in the message.
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    /// Returns the raw, still folded field value.
    pub fn raw_value(&self) -> &'x [u8] {
        self.raw
    }
}

impl Default for HeaderMap<'_> {
    fn default() -> Self {
        HeaderMap {
            headers: Vec::new(),
            resolver: default_resolver,
        }
    }
}

impl<'x> HeaderMap<'x> {
    pub(crate) fn new(headers: Vec<Header<'x>>) -> HeaderMap<'x> {
        HeaderMap {
            headers,
            resolver: default_resolver,
        }
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.len() == 0
    }

    /// Iterates the fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Header<'x>> {
        self.headers.iter()
    }

    /// Returns the unfolded value of the last field matching `name`,
    /// case-insensitively. Later fields override earlier ones for
    /// single-valued lookups.
    pub fn get(&self, name: &str) -> Option<Cow<'x, str>> {
        self.raw(name).map(unfold)
    }

    /// Returns the raw bytes of the last field matching `name`.
    pub fn raw(&self, name: &str) -> Option<&'x [u8]> {
        self.headers
            .iter()
            .rev()
            .find(|header| header.name.eq_ignore_ascii_case(name))
            .map(|header| header.raw)
    }

    /// Returns every value for `name` in insertion order.
    pub fn all<'y>(&'y self, name: &'y str) -> impl Iterator<Item = Cow<'x, str>> + 'y {
        self.headers
            .iter()
            .filter(move |header| header.name.eq_ignore_ascii_case(name))
            .map(|header| unfold(header.raw))
    }

    /// Returns a field value with RFC 2047 encoded words decoded for
    /// display. Runs in an unknown charset stay verbatim.
    pub fn text(&self, name: &str) -> Option<Cow<'x, str>> {
        let value = self.get(name)?;
        match decode_rfc2047(&value, self.resolver) {
            Some(decoded) => Some(Cow::Owned(decoded)),
            None => Some(value),
        }
    }

    /// The decoded Subject field.
    pub fn subject(&self) -> Option<Cow<'x, str>> {
        self.text("Subject")
    }

    /// Parses the Content-Type field. Defaults to `text/plain` when the
    /// field is absent or unusable; grammar violations set the malformed
    /// flag on a best-effort result instead of failing.
    pub fn content_type(&self) -> ContentType<'x> {
        match self.raw("Content-Type") {
            Some(raw) => {
                let mut ct = parse_content_type(raw, self.resolver);
                if ct.c_type.is_empty() {
                    ct.c_type = Cow::Borrowed("text");
                    ct.c_subtype = Some(Cow::Borrowed("plain"));
                    ct.malformed = true;
                } else if ct.c_subtype.is_none() {
                    ct.malformed = true;
                }
                ct
            }
            None => ContentType::default(),
        }
    }

    /// Parses the Content-Disposition field, `None` when absent.
    pub fn content_disposition(&self) -> Option<ContentType<'x>> {
        self.raw("Content-Disposition")
            .map(|raw| parse_content_type(raw, self.resolver))
    }

    /// Returns the part's filename: the Content-Disposition `filename`
    /// parameter, falling back to the Content-Type `name` parameter,
    /// with RFC 2047 encoded words decoded.
    pub fn filename(&self) -> Result<String, Error> {
        let value = self
            .content_disposition()
            .and_then(|disposition| disposition.attribute("filename").map(str::to_string))
            .or_else(|| {
                self.content_type()
                    .attribute("name")
                    .map(str::to_string)
            })
            .ok_or(Error::NotFound)?;

        Ok(decode_rfc2047(&value, self.resolver).unwrap_or(value))
    }

    /// Maps the Content-Transfer-Encoding field to its transform; an
    /// absent field means identity, unknown tokens fail closed.
    pub fn transfer_encoding(&self) -> Result<Encoding, Error> {
        Encoding::parse(self.get("Content-Transfer-Encoding").as_deref().unwrap_or(""))
    }
}

impl Default for ContentType<'_> {
    fn default() -> Self {
        ContentType {
            c_type: Cow::Borrowed("text"),
            c_subtype: Some(Cow::Borrowed("plain")),
            attributes: None,
            malformed: false,
        }
    }
}

impl<'x> ContentType<'x> {
    /// Returns the type, lowercased.
    pub fn ctype(&self) -> &str {
        &self.c_type
    }

    /// Returns the sub-type, lowercased.
    pub fn subtype(&self) -> Option<&str> {
        self.c_subtype.as_deref()
    }

    /// Returns an attribute by name, RFC 2231 continuations already
    /// reassembled and decoded.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .as_ref()?
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_ref())
    }

    /// Returns `true` when the provided attribute name is present.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Returns all attributes.
    pub fn attributes(&self) -> Option<&[(Cow<'x, str>, Cow<'x, str>)]> {
        self.attributes.as_deref()
    }

    /// Returns `true` if the Content-Disposition type is "attachment".
    pub fn is_attachment(&self) -> bool {
        self.c_type == "attachment"
    }

    /// Returns `true` if the Content-Disposition type is "inline".
    pub fn is_inline(&self) -> bool {
        self.c_type == "inline"
    }

    /// Returns `true` for any `text/*` media type.
    pub fn is_text(&self) -> bool {
        self.c_type == "text"
    }

    /// Returns `true` for any `multipart/*` media type.
    pub fn is_multipart(&self) -> bool {
        self.c_type == "multipart"
    }

    /// Returns `true` when the field did not fully match the RFC
    /// grammar and this value is a best-effort fallback.
    pub fn is_malformed(&self) -> bool {
        self.malformed
    }
}
