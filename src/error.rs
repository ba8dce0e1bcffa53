/*
 * SPDX-License-Identifier: Apache-2.0 OR MIT
 */

/// Errors surfaced while creating a reader or reading parts.
///
/// Only `Structure` aborts reader creation; every other variant is scoped
/// to the single part or header access that triggered it and leaves the
/// rest of the traversal usable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The top-level header block could not be parsed.
    #[error("unparseable message header block")]
    Structure,

    /// The stream ended before a multipart terminator was seen. Reported
    /// once; subsequent reads return end-of-parts.
    #[error("unexpected end of message before multipart terminator")]
    Truncated,

    /// Unknown Content-Transfer-Encoding token. The raw bytes of the
    /// affected part remain accessible through [`Part::raw_body`].
    ///
    /// [`Part::raw_body`]: crate::Part::raw_body
    #[error("unsupported content transfer encoding: {0:?}")]
    UnsupportedEncoding(String),

    /// No filename parameter present in Content-Disposition or
    /// Content-Type.
    #[error("part has no filename parameter")]
    NotFound,
}
