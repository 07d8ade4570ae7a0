//! Regenerates a listfile's byte stream, replacing only dirty statements.
//!
//! The rewriter walks the original buffer with a line cursor. Everything
//! outside the spans of dirty statements (comments, blank lines, unrelated
//! statements) is copied verbatim. A dirty statement's span is replaced by
//! its re-serialized text; a statement without a span (synthesized for a
//! previously unknown target) is appended after the final byte. Statement
//! spans are refreshed against the produced buffer so the model can keep
//! being mutated and rewritten.

use crate::model::SourcesStatement;
use crate::parser::Span;

/// Line-granular cursor over the original bytes.
struct RawDataReader<'a> {
    data: &'a [u8],
    pos: usize,
    line: u32,
}

impl<'a> RawDataReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0, line: 1 }
    }

    fn eof(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn current_line(&self) -> u32 {
        self.line
    }

    /// The next line including its terminator (the last line may lack one).
    fn read_line(&mut self) -> &'a [u8] {
        let start = self.pos;
        while self.pos < self.data.len() {
            let byte = self.data[self.pos];
            self.pos += 1;
            if byte == b'\n' {
                self.line += 1;
                break;
            }
        }
        &self.data[start..self.pos]
    }
}

/// Rows spanned by `text` and the byte length of its last row.
fn count_rows(text: &str) -> (u32, u32) {
    let mut rows = 1;
    let mut last = 0;
    for byte in text.bytes() {
        if byte == b'\n' {
            rows += 1;
            last = 0;
        } else {
            last += 1;
        }
    }
    (rows, last)
}

/// 1-based line/column of the next byte to be appended to `out`.
fn next_position(out: &[u8]) -> (u32, u32) {
    let mut line = 1;
    let mut column = 1;
    for &byte in out {
        if byte == b'\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

pub(crate) fn rewrite(content: &[u8], blocks: &mut [SourcesStatement]) -> Vec<u8> {
    let mut reader = RawDataReader::new(content);
    let mut out = Vec::with_capacity(content.len() + 256);
    let mut line_offset: i64 = 0;

    for block in blocks.iter_mut() {
        if !block.dirty {
            // Clean statements stay raw bytes; only their recorded spans
            // shift when an earlier rewrite changed the line count.
            if line_offset != 0 {
                if let Some(span) = block.statement.span() {
                    block.statement.set_span(shifted(span, line_offset));
                }
            }
            continue;
        }

        block.rebuild_arguments();
        let text = block.statement.to_text();

        match block.statement.span() {
            Some(span) => {
                while !reader.eof() && reader.current_line() < span.start_line {
                    out.extend_from_slice(reader.read_line());
                }

                let mut line: &[u8] = &[];
                if span.start_column > 1 && !reader.eof() {
                    line = reader.read_line();
                    let prefix = (span.start_column as usize - 1).min(line.len());
                    out.extend_from_slice(&line[..prefix]);
                }

                let (new_start_line, new_start_column) = next_position(&out);
                out.extend_from_slice(text.as_bytes());

                while !reader.eof() && reader.current_line() <= span.end_line {
                    line = reader.read_line();
                }

                let rest_from = span.end_column as usize;
                if line.len() > rest_from {
                    out.extend_from_slice(&line[rest_from..]);
                }

                let (rows, last_len) = count_rows(&text);
                block.statement.set_span(Span {
                    start_line: new_start_line,
                    start_column: new_start_column,
                    end_line: new_start_line + rows - 1,
                    end_column: if rows > 1 {
                        last_len
                    } else {
                        new_start_column + last_len - 1
                    },
                });

                let old_rows = span.end_line - span.start_line + 1;
                line_offset += i64::from(rows) - i64::from(old_rows);
            }
            None => {
                // Synthesized statement: everything else first, then the
                // new block right after the last byte.
                while !reader.eof() {
                    out.extend_from_slice(reader.read_line());
                }
                let (start_line, start_column) = next_position(&out);
                out.extend_from_slice(text.as_bytes());
                let (rows, last_len) = count_rows(&text);
                block.statement.set_span(Span {
                    start_line,
                    start_column,
                    end_line: start_line + rows - 1,
                    end_column: if rows > 1 {
                        last_len
                    } else {
                        start_column + last_len - 1
                    },
                });
            }
        }

        block.dirty = false;
    }

    while !reader.eof() {
        out.extend_from_slice(reader.read_line());
    }

    out
}

fn shifted(span: Span, line_offset: i64) -> Span {
    Span {
        start_line: (i64::from(span.start_line) + line_offset) as u32,
        end_line: (i64::from(span.end_line) + line_offset) as u32,
        ..span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_rows_counts_bytes_after_last_newline() {
        assert_eq!(count_rows("abc"), (1, 3));
        assert_eq!(count_rows("a\nbc"), (2, 2));
        assert_eq!(count_rows("a\nbc\n"), (3, 0));
    }

    #[test]
    fn next_position_tracks_lines_and_columns() {
        assert_eq!(next_position(b""), (1, 1));
        assert_eq!(next_position(b"ab"), (1, 3));
        assert_eq!(next_position(b"ab\n"), (2, 1));
        assert_eq!(next_position(b"ab\ncd"), (2, 3));
    }

    #[test]
    fn reader_yields_lines_with_terminators() {
        let mut reader = RawDataReader::new(b"one\ntwo\nthree");
        assert_eq!(reader.read_line(), b"one\n");
        assert_eq!(reader.current_line(), 2);
        assert_eq!(reader.read_line(), b"two\n");
        assert_eq!(reader.read_line(), b"three");
        assert!(reader.eof());
    }
}
