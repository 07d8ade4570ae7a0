//! Token stream to statement list.
//!
//! A statement is opened by an identifier that begins a source line and must
//! be followed (spaces aside) by `(`. Inside a statement, whitespace tokens
//! accumulate into a pending separator that is attached to the next argument;
//! nested parens count depth and are kept as plain arguments. Any failure
//! poisons the entire parse; there is no statement-level recovery.

use crate::lexer::{Token, TokenKind};
use crate::parser::errors::ParseError;
use crate::parser::statement::{Argument, Span, Statement};

pub fn parse(tokens: &[Token]) -> Result<Vec<Statement>, ParseError> {
    let mut statements = Vec::new();
    let mut have_newline = true;
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];
        match token.kind {
            TokenKind::Newline => {
                have_newline = true;
                i += 1;
            }
            TokenKind::Identifier if have_newline => {
                have_newline = false;
                let (statement, next) = read_statement(tokens, i)?;
                statements.push(statement);
                i = next;
            }
            _ => i += 1,
        }
    }

    Ok(statements)
}

/// Read one statement starting at the identifier token at `start`. Returns
/// the statement and the index of the first token past its closing paren.
fn read_statement(tokens: &[Token], start: usize) -> Result<(Statement, usize), ParseError> {
    let name_token = &tokens[start];
    let mut statement = Statement::new(&name_token.text);
    let start_line = name_token.line;
    let start_column = name_token.column;

    let mut separator = String::new();
    let mut i = start + 1;

    // Spaces, then the opening paren; anything else is fatal.
    loop {
        let Some(token) = tokens.get(i) else {
            return Err(ParseError::UnterminatedStatement {
                name: statement.name().to_string(),
                line: start_line,
            });
        };
        i += 1;
        match token.kind {
            TokenKind::Space => separator.push_str(&token.text),
            TokenKind::ParenLeft => break,
            _ => {
                return Err(ParseError::ExpectedParen {
                    name: statement.name().to_string(),
                    line: token.line,
                });
            }
        }
    }
    statement.set_leading_space(separator);

    let mut separator = String::new();
    let mut depth = 1u32;

    loop {
        let Some(token) = tokens.get(i) else {
            return Err(ParseError::UnterminatedStatement {
                name: statement.name().to_string(),
                line: start_line,
            });
        };
        i += 1;

        match token.kind {
            TokenKind::ParenRight => {
                depth -= 1;
                if depth == 0 {
                    statement.set_trailing_space(separator);
                    statement.set_span(Span {
                        start_line,
                        start_column,
                        end_line: token.line,
                        end_column: token.column,
                    });
                    return Ok((statement, i));
                }
                statement.push_argument(Argument::new(&token.text, false, separator));
                separator = String::new();
            }
            TokenKind::ParenLeft => {
                depth += 1;
                statement.push_argument(Argument::new(&token.text, false, separator));
                separator = String::new();
            }
            TokenKind::Identifier | TokenKind::ArgumentBracket | TokenKind::ArgumentUnquoted => {
                statement.push_argument(Argument::new(&token.text, false, separator));
                separator = String::new();
            }
            TokenKind::ArgumentQuoted => {
                statement.push_argument(Argument::new(&token.text, true, separator));
                separator = String::new();
            }
            TokenKind::Space | TokenKind::Newline => {
                separator.push_str(&token.text);
            }
            TokenKind::Comment => {
                return Err(ParseError::UnexpectedToken {
                    name: statement.name().to_string(),
                    line: token.line,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_str(input: &str) -> Result<Vec<Statement>, ParseError> {
        parse(&tokenize(input).unwrap())
    }

    #[test]
    fn parses_statement_with_span() {
        let statements = parse_str("target_sources(main\n    PRIVATE\n    a.cpp\n)\n").unwrap();
        assert_eq!(statements.len(), 1);
        let statement = &statements[0];
        assert_eq!(statement.name(), "target_sources");
        let span = statement.span().unwrap();
        assert_eq!((span.start_line, span.start_column), (1, 1));
        assert_eq!((span.end_line, span.end_column), (4, 1));

        let values: Vec<&str> = statement.arguments().iter().map(|a| a.value()).collect();
        assert_eq!(values, vec!["main", "PRIVATE", "a.cpp"]);
        assert_eq!(statement.arguments()[1].separator(), "\n    ");
        assert_eq!(statement.trailing_space(), "\n");
    }

    #[test]
    fn name_is_lowercased() {
        let statements = parse_str("TARGET_SOURCES(main PRIVATE a.cpp)").unwrap();
        assert_eq!(statements[0].name(), "target_sources");
    }

    #[test]
    fn leading_space_between_name_and_paren() {
        let statements = parse_str("foo  (bar)").unwrap();
        assert_eq!(statements[0].leading_space(), "  ");
        assert_eq!(statements[0].to_text(), "foo  (bar)");
    }

    #[test]
    fn nested_parens_become_arguments() {
        let statements = parse_str("if(NOT (A AND B))").unwrap();
        let values: Vec<&str> = statements[0]
            .arguments()
            .iter()
            .map(|a| a.value())
            .collect();
        assert_eq!(values, vec!["NOT", "(", "A", "AND", "B", ")"]);
    }

    #[test]
    fn statement_must_begin_a_line() {
        let statements = parse_str("foo() bar()\nbaz()").unwrap();
        let names: Vec<&str> = statements.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["foo", "baz"]);
    }

    #[test]
    fn indented_statement_still_begins_its_line() {
        let statements = parse_str("    foo(x)\n").unwrap();
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].span().unwrap().start_column, 5);
    }

    #[test]
    fn comments_between_statements_are_skipped() {
        let statements = parse_str("# header\nfoo(a) # trailing\nbar(b)\n").unwrap();
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn unbalanced_parens_fail() {
        assert!(matches!(
            parse_str("target_sources(main\n    a.cpp\n"),
            Err(ParseError::UnterminatedStatement { .. })
        ));
    }

    #[test]
    fn missing_paren_fails() {
        assert!(matches!(
            parse_str("set x 1\n"),
            Err(ParseError::ExpectedParen { .. })
        ));
    }

    #[test]
    fn comment_inside_statement_fails() {
        assert!(matches!(
            parse_str("target_sources(main # files\n    a.cpp\n)"),
            Err(ParseError::UnexpectedToken { line: 1, .. })
        ));
    }

    #[test]
    fn quoted_arguments_keep_their_flag() {
        let statements = parse_str("target_sources(main PRIVATE \"a b.cpp\")").unwrap();
        let args = statements[0].arguments();
        assert!(args[2].is_quoted());
        assert_eq!(args[2].value(), "a b.cpp");
    }
}
