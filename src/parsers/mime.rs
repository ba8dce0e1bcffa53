/*
 * SPDX-License-Identifier: Apache-2.0 OR MIT
 */

/// Result of scanning a multipart body for the next delimiter pair.
#[derive(Debug, PartialEq)]
pub enum BoundaryScan<'x> {
    /// One raw sub-entity (header block plus body) and the remainder of
    /// the parent body, starting at the delimiter that closed the block.
    Block { block: &'x [u8], rest: &'x [u8] },
    /// The terminator line `--boundary--` was found; the epilogue is
    /// discarded.
    End,
    /// The body ended before the next delimiter.
    Truncated,
}

/// Scans for the next raw sub-entity between two delimiter lines.
///
/// Bytes before the first delimiter are preamble and discarded. The CRLF
/// preceding the closing delimiter belongs to the delimiter, not to the
/// block body.
pub fn next_block<'x>(data: &'x [u8], boundary: &[u8]) -> BoundaryScan<'x> {
    let opening = match find_delimiter(data, boundary, 0) {
        Some(delimiter) if delimiter.is_terminator => return BoundaryScan::End,
        Some(delimiter) => delimiter,
        None => return BoundaryScan::Truncated,
    };

    let block_start = match opening.next_line {
        Some(pos) => pos,
        None => return BoundaryScan::Truncated,
    };

    match find_delimiter(data, boundary, block_start) {
        Some(closing) => {
            let mut block_end = closing.line_start;
            if block_end > block_start && data[block_end - 1] == b'\n' {
                block_end -= 1;
                if block_end > block_start && data[block_end - 1] == b'\r' {
                    block_end -= 1;
                }
            }
            BoundaryScan::Block {
                block: &data[block_start..block_end],
                rest: &data[closing.line_start..],
            }
        }
        None => BoundaryScan::Truncated,
    }
}

struct Delimiter {
    line_start: usize,
    /// Offset just past the delimiter's line ending, `None` at EOF.
    next_line: Option<usize>,
    is_terminator: bool,
}

/// Finds the next line equal to `--boundary` or `--boundary--`, allowing
/// trailing linear whitespace on the line.
fn find_delimiter(data: &[u8], boundary: &[u8], mut pos: usize) -> Option<Delimiter> {
    while pos < data.len() {
        let line_start = pos;
        let nl = data[pos..].iter().position(|&ch| ch == b'\n');
        let mut line_end = nl.map_or(data.len(), |nl| pos + nl);
        if line_end > line_start && data[line_end - 1] == b'\r' {
            line_end -= 1;
        }

        let line = &data[line_start..line_end];
        if let Some(tail) = line
            .strip_prefix(b"--")
            .and_then(|line| line.strip_prefix(boundary))
        {
            let (is_terminator, tail) = match tail.strip_prefix(b"--") {
                Some(tail) => (true, tail),
                None => (false, tail),
            };
            if tail.iter().all(|&ch| ch == b' ' || ch == b'\t') {
                return Some(Delimiter {
                    line_start,
                    next_line: nl.map(|nl| pos + nl + 1),
                    is_terminator,
                });
            }
        }

        match nl {
            Some(nl) => pos += nl + 1,
            None => break,
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::{next_block, BoundaryScan};

    const BODY: &[u8] = b"preamble is ignored\r\n\
        --frontier\r\n\
        Content-Type: text/plain\r\n\
        \r\n\
        first part\r\n\
        --frontier\r\n\
        \r\n\
        second part\r\n\
        --frontier--\r\n\
        epilogue is ignored\r\n";

    #[test]
    fn split_blocks_in_order() {
        let (first, rest) = match next_block(BODY, b"frontier") {
            BoundaryScan::Block { block, rest } => (block, rest),
            other => panic!("expected block, got {other:?}"),
        };
        assert_eq!(first, b"Content-Type: text/plain\r\n\r\nfirst part");

        let (second, rest) = match next_block(rest, b"frontier") {
            BoundaryScan::Block { block, rest } => (block, rest),
            other => panic!("expected block, got {other:?}"),
        };
        assert_eq!(second, b"\r\nsecond part");

        assert_eq!(next_block(rest, b"frontier"), BoundaryScan::End);
    }

    #[test]
    fn missing_terminator_is_truncated() {
        let body = b"--b\r\nContent-Type: text/plain\r\n\r\nunterminated";
        assert_eq!(next_block(body, b"b"), BoundaryScan::Truncated);
    }

    #[test]
    fn no_delimiter_at_all_is_truncated() {
        assert_eq!(
            next_block(b"just some bytes", b"frontier"),
            BoundaryScan::Truncated
        );
    }

    #[test]
    fn delimiter_without_preamble() {
        let body = b"--b\r\nX: y\r\n\r\nbody\r\n--b--\r\n";
        match next_block(body, b"b") {
            BoundaryScan::Block { block, .. } => {
                assert_eq!(block, b"X: y\r\n\r\nbody");
            }
            other => panic!("expected block, got {other:?}"),
        }
    }

    #[test]
    fn trailing_whitespace_on_delimiter_line() {
        let body = b"--b  \r\nX: y\r\n\r\nbody\r\n--b-- \t\r\n";
        match next_block(body, b"b") {
            BoundaryScan::Block { block, .. } => {
                assert_eq!(block, b"X: y\r\n\r\nbody");
            }
            other => panic!("expected block, got {other:?}"),
        }
    }
}
