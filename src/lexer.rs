use thiserror::Error;

/// Lexical token kinds of the CMake listfile language.
///
/// The scanner is deliberately dumb: it knows nothing about statements or
/// nesting. Everything above token granularity (paren balancing, separator
/// accumulation, statement spans) belongs to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    ParenLeft,
    ParenRight,
    ArgumentUnquoted,
    ArgumentQuoted,
    ArgumentBracket,
    Comment,
    Space,
    Newline,
}

/// A single lexical token with its raw text and 1-based source position.
///
/// `line`/`column` address the first byte of the token; columns count bytes,
/// which is what the rewriter needs to slice the original buffer exactly.
/// For quoted arguments `text` is the content between the quotes, escapes
/// untouched; all other kinds carry the raw bytes verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
    pub column: u32,
}

#[derive(Error, Debug)]
pub enum LexError {
    #[error("unterminated quoted argument starting at line {line}")]
    UnterminatedString { line: u32 },

    #[error("unterminated bracket argument starting at line {line}")]
    UnterminatedBracket { line: u32 },
}

/// Split a listfile into tokens.
///
/// The token stream covers the input completely: concatenating the raw text
/// of all tokens (plus the quotes stripped from quoted arguments) yields the
/// input again.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Scanner::new(input).run()
}

struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        while self.pos < self.bytes.len() {
            let line = self.line;
            let column = self.column;
            let start = self.pos;

            let kind = match self.bytes[self.pos] {
                b'\n' => {
                    self.advance(1);
                    TokenKind::Newline
                }
                b'\r' if self.peek(1) == Some(b'\n') => {
                    self.advance(2);
                    TokenKind::Newline
                }
                b' ' | b'\t' | b'\r' => {
                    self.scan_space();
                    TokenKind::Space
                }
                b'(' => {
                    self.advance(1);
                    TokenKind::ParenLeft
                }
                b')' => {
                    self.advance(1);
                    TokenKind::ParenRight
                }
                b'"' => {
                    let text = self.scan_quoted(line)?;
                    tokens.push(Token {
                        kind: TokenKind::ArgumentQuoted,
                        text,
                        line,
                        column,
                    });
                    continue;
                }
                b'#' => {
                    self.scan_comment(line)?;
                    TokenKind::Comment
                }
                b'[' => {
                    if let Some(level) = self.bracket_open_level(self.pos) {
                        self.scan_bracket(level, line)?;
                        TokenKind::ArgumentBracket
                    } else {
                        self.scan_unquoted()
                    }
                }
                _ => self.scan_unquoted(),
            };

            tokens.push(Token {
                kind,
                text: self.src[start..self.pos].to_string(),
                line,
                column,
            });
        }

        Ok(tokens)
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    /// Consume `n` bytes, keeping the line/column counters in step.
    fn advance(&mut self, n: usize) {
        for _ in 0..n {
            if self.bytes[self.pos] == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.pos += 1;
        }
    }

    fn scan_space(&mut self) {
        while let Some(b) = self.peek(0) {
            let is_space = b == b' '
                || b == b'\t'
                || (b == b'\r' && self.peek(1) != Some(b'\n'));
            if !is_space {
                break;
            }
            self.advance(1);
        }
    }

    /// Quoted argument. Returns the content without the surrounding quotes;
    /// escape sequences stay raw and are resolved at argument construction.
    fn scan_quoted(&mut self, start_line: u32) -> Result<String, LexError> {
        self.advance(1); // opening quote
        let content_start = self.pos;
        loop {
            match self.peek(0) {
                None => return Err(LexError::UnterminatedString { line: start_line }),
                Some(b'\\') if self.pos + 1 < self.bytes.len() => self.advance(2),
                Some(b'"') => {
                    let text = self.src[content_start..self.pos].to_string();
                    self.advance(1); // closing quote
                    return Ok(text);
                }
                Some(_) => self.advance(1),
            }
        }
    }

    /// Line comment or bracket comment, `#` already at the cursor.
    fn scan_comment(&mut self, start_line: u32) -> Result<(), LexError> {
        self.advance(1);
        if let Some(level) = self.bracket_open_level(self.pos) {
            return self.scan_bracket(level, start_line);
        }
        while let Some(b) = self.peek(0) {
            if b == b'\n' || (b == b'\r' && self.peek(1) == Some(b'\n')) {
                break;
            }
            self.advance(1);
        }
        Ok(())
    }

    /// Bracket open sequence `[=*[` at `at`? Returns the `=` count.
    fn bracket_open_level(&self, at: usize) -> Option<usize> {
        if self.bytes.get(at) != Some(&b'[') {
            return None;
        }
        let mut level = 0;
        while self.bytes.get(at + 1 + level) == Some(&b'=') {
            level += 1;
        }
        if self.bytes.get(at + 1 + level) == Some(&b'[') {
            Some(level)
        } else {
            None
        }
    }

    /// Consume a bracket construct of the given level up to and including
    /// its `]=*]` terminator.
    fn scan_bracket(&mut self, level: usize, start_line: u32) -> Result<(), LexError> {
        self.advance(level + 2); // [=*[
        loop {
            match self.peek(0) {
                None => return Err(LexError::UnterminatedBracket { line: start_line }),
                Some(b']') => {
                    let mut eq = 0;
                    while self.peek(1 + eq) == Some(b'=') {
                        eq += 1;
                    }
                    if eq == level && self.peek(1 + eq) == Some(b']') {
                        self.advance(level + 2);
                        return Ok(());
                    }
                    self.advance(1);
                }
                Some(_) => self.advance(1),
            }
        }
    }

    /// Unquoted run: everything up to whitespace, parens, a quote or a
    /// comment, with `\` escaping the following byte. A run that happens to
    /// match the identifier pattern is an Identifier token; the distinction
    /// only matters at line starts, where identifiers may open a statement.
    fn scan_unquoted(&mut self) -> TokenKind {
        let start = self.pos;
        let mut escaped = false;
        while let Some(b) = self.peek(0) {
            match b {
                b'\\' if self.pos + 1 < self.bytes.len() => {
                    escaped = true;
                    self.advance(2);
                }
                b' ' | b'\t' | b'\r' | b'\n' | b'(' | b')' | b'"' | b'#' => break,
                _ => self.advance(1),
            }
        }
        if !escaped && is_identifier(&self.bytes[start..self.pos]) {
            TokenKind::Identifier
        } else {
            TokenKind::ArgumentUnquoted
        }
    }
}

fn is_identifier(bytes: &[u8]) -> bool {
    let Some((first, rest)) = bytes.split_first() else {
        return false;
    };
    (first.is_ascii_alphabetic() || *first == b'_')
        && rest.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn simple_statement() {
        let tokens = tokenize("add_executable(tool main.cpp)").unwrap();
        let expected = [
            (TokenKind::Identifier, "add_executable", 1, 1),
            (TokenKind::ParenLeft, "(", 1, 15),
            (TokenKind::Identifier, "tool", 1, 16),
            (TokenKind::Space, " ", 1, 20),
            (TokenKind::ArgumentUnquoted, "main.cpp", 1, 21),
            (TokenKind::ParenRight, ")", 1, 29),
        ];
        assert_eq!(tokens.len(), expected.len());
        for (token, (kind, text, line, column)) in tokens.iter().zip(expected) {
            assert_eq!(token.kind, kind);
            assert_eq!(token.text, text);
            assert_eq!(token.line, line);
            assert_eq!(token.column, column);
        }
    }

    #[test]
    fn quoted_argument_strips_quotes() {
        let tokens = tokenize("set(x \"a b\")").unwrap();
        let quoted = tokens
            .iter()
            .find(|t| t.kind == TokenKind::ArgumentQuoted)
            .unwrap();
        assert_eq!(quoted.text, "a b");
        assert_eq!(quoted.column, 7);
    }

    #[test]
    fn newline_positions() {
        let tokens = tokenize("foo(\n    bar\n)").unwrap();
        let close = tokens.last().unwrap();
        assert_eq!(close.kind, TokenKind::ParenRight);
        assert_eq!(close.line, 3);
        assert_eq!(close.column, 1);
    }

    #[test]
    fn crlf_is_one_newline() {
        assert_eq!(
            kinds("a()\r\nb()"),
            vec![
                TokenKind::Identifier,
                TokenKind::ParenLeft,
                TokenKind::ParenRight,
                TokenKind::Newline,
                TokenKind::Identifier,
                TokenKind::ParenLeft,
                TokenKind::ParenRight,
            ]
        );
    }

    #[test]
    fn comment_runs_to_end_of_line() {
        let tokens = tokenize("# a comment\nfoo()").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].text, "# a comment");
        assert_eq!(tokens[1].kind, TokenKind::Newline);
    }

    #[test]
    fn bracket_argument() {
        let tokens = tokenize("foo([=[a ) b]=])").unwrap();
        let bracket = tokens
            .iter()
            .find(|t| t.kind == TokenKind::ArgumentBracket)
            .unwrap();
        assert_eq!(bracket.text, "[=[a ) b]=]");
    }

    #[test]
    fn bracket_comment() {
        let tokens = tokenize("#[[ anything ( goes ]]foo()").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].text, "#[[ anything ( goes ]]");
    }

    #[test]
    fn escaped_space_stays_unquoted() {
        let tokens = tokenize("foo(a\\ b)").unwrap();
        assert_eq!(tokens[2].kind, TokenKind::ArgumentUnquoted);
        assert_eq!(tokens[2].text, "a\\ b");
    }

    #[test]
    fn unterminated_string_fails() {
        assert!(matches!(
            tokenize("foo(\"abc)"),
            Err(LexError::UnterminatedString { line: 1 })
        ));
    }

    #[test]
    fn unterminated_bracket_fails() {
        assert!(matches!(
            tokenize("foo([[abc)"),
            Err(LexError::UnterminatedBracket { line: 1 })
        ));
    }

    #[test]
    fn tokens_cover_input() {
        let input = "# header\nproject(demo)\n\ntarget_sources(demo PRIVATE \"a b.cpp\")\n";
        let tokens = tokenize(input).unwrap();
        let mut rebuilt = String::new();
        for token in &tokens {
            if token.kind == TokenKind::ArgumentQuoted {
                rebuilt.push('"');
                rebuilt.push_str(&token.text);
                rebuilt.push('"');
            } else {
                rebuilt.push_str(&token.text);
            }
        }
        assert_eq!(rebuilt, input);
    }
}
