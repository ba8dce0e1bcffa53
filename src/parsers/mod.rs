/*
 * SPDX-License-Identifier: Apache-2.0 OR MIT
 */

pub mod content_type;
pub mod encoded_word;
pub mod header;
pub mod mime;

/// A cursor over a raw header or body slice, shared by the incremental
/// field parsers.
pub struct MessageStream<'x> {
    pub data: &'x [u8],
    pub pos: usize,
}

impl<'x> MessageStream<'x> {
    pub fn new(data: &'x [u8]) -> MessageStream<'x> {
        MessageStream { data, pos: 0 }
    }

    #[inline(always)]
    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    #[inline(always)]
    pub fn next(&mut self) -> Option<u8> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    #[inline(always)]
    pub fn skip_if(&mut self, ch: u8) -> bool {
        if self.peek() == Some(ch) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    #[inline(always)]
    pub fn bytes(&self, from: usize, to: usize) -> &'x [u8] {
        &self.data[from..to]
    }

    #[inline(always)]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.data.len()
    }
}
