//! The statement-level data model: arguments with their original separator
//! text, and function-call-shaped statements with exact source spans.

/// One argument of a statement.
///
/// `separator` is the raw whitespace (spaces, tabs, newlines) that preceded
/// the argument in the source, or the synthetic separator chosen for an
/// inserted argument. It is cosmetic: two arguments are equal when value and
/// quoting agree, whatever their separators.
#[derive(Debug, Clone)]
pub struct Argument {
    value: String,
    quoted: bool,
    separator: String,
}

impl Argument {
    /// Build an argument from raw source text. Escape sequences (`\n`, `\r`,
    /// `\t`, or an escaped literal) are resolved here, once.
    pub fn new(value: impl Into<String>, quoted: bool, separator: impl Into<String>) -> Self {
        Self {
            value: unescape(&value.into()),
            quoted,
            separator: separator.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn set_separator(&mut self, separator: impl Into<String>) {
        self.separator = separator.into();
    }

    /// Serialize as `separator + value`, re-adding quotes for quoted
    /// arguments.
    pub(crate) fn render_into(&self, out: &mut String) {
        out.push_str(&self.separator);
        if self.quoted {
            out.push('"');
            out.push_str(&self.value);
            out.push('"');
        } else {
            out.push_str(&self.value);
        }
    }
}

impl PartialEq for Argument {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.quoted == other.quoted
    }
}

impl Eq for Argument {}

fn unescape(value: &str) -> String {
    if !value.contains('\\') {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Inclusive 1-based source span of a statement, from the first byte of its
/// name to the closing parenthesis. Columns count bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

/// One parsed function-call-like construct: `name(arguments...)`.
///
/// Statements parsed from a buffer carry a span; statements synthesized by
/// the editor (a `target_sources` block for a previously unknown target)
/// have none and are appended after the last byte on rewrite.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    name: String,
    arguments: Vec<Argument>,
    span: Option<Span>,
    leading_space: String,
    trailing_space: String,
}

impl Statement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_lowercase(),
            arguments: Vec::new(),
            span: None,
            leading_space: String::new(),
            trailing_space: String::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn set_arguments(&mut self, arguments: Vec<Argument>) {
        self.arguments = arguments;
    }

    pub fn push_argument(&mut self, argument: Argument) {
        self.arguments.push(argument);
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }

    pub fn set_span(&mut self, span: Span) {
        self.span = Some(span);
    }

    pub fn leading_space(&self) -> &str {
        &self.leading_space
    }

    pub fn set_leading_space(&mut self, space: impl Into<String>) {
        self.leading_space = space.into();
    }

    pub fn trailing_space(&self) -> &str {
        &self.trailing_space
    }

    pub fn set_trailing_space(&mut self, space: impl Into<String>) {
        self.trailing_space = space.into();
    }

    /// Serialize the statement. For an unmodified statement this reproduces
    /// the original source text byte for byte.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.name);
        out.push_str(&self.leading_space);
        out.push('(');
        for argument in &self.arguments {
            argument.render_into(&mut out);
        }
        out.push_str(&self.trailing_space);
        out.push(')');
        out
    }
}
