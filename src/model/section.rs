use crate::model::placement::parent_directory;
use crate::model::DEFAULT_SEPARATOR;
use crate::parser::Argument;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Visibility keyword of a section, or `Anonymous` for the bare source list
/// of `add_executable`/`add_library` statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Private,
    Public,
    Interface,
    Anonymous,
}

impl SectionKind {
    /// Match an unquoted argument against the section keywords,
    /// case-insensitively. `Anonymous` has no keyword.
    pub fn from_keyword(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("PRIVATE") {
            Some(SectionKind::Private)
        } else if value.eq_ignore_ascii_case("PUBLIC") {
            Some(SectionKind::Public)
        } else if value.eq_ignore_ascii_case("INTERFACE") {
            Some(SectionKind::Interface)
        } else {
            None
        }
    }

    pub fn keyword(self) -> Option<&'static str> {
        match self {
            SectionKind::Private => Some("PRIVATE"),
            SectionKind::Public => Some("PUBLIC"),
            SectionKind::Interface => Some("INTERFACE"),
            SectionKind::Anonymous => None,
        }
    }

    /// The keyword as a fresh argument for a created section.
    pub(crate) fn to_argument(self) -> Option<Argument> {
        self.keyword()
            .map(|keyword| Argument::new(keyword, false, DEFAULT_SEPARATOR))
    }
}

/// A named or anonymous group of file arguments inside a sources statement.
#[derive(Debug, Clone)]
pub struct Section {
    pub kind: SectionKind,
    /// The original keyword token; `None` for anonymous sections.
    pub name_argument: Option<Argument>,
    pub file_names: Vec<Argument>,
    /// Parent directories of `file_names`, captured once at load. This is a
    /// static snapshot: files added later in the session do not extend it.
    pub common_prefixes: HashSet<String>,
}

impl Section {
    pub fn new(kind: SectionKind, name_argument: Option<Argument>) -> Self {
        Self {
            kind,
            name_argument,
            file_names: Vec::new(),
            common_prefixes: HashSet::new(),
        }
    }

    pub(crate) fn snapshot_prefixes(&mut self) {
        self.common_prefixes = self
            .file_names
            .iter()
            .map(|argument| parent_directory(argument.value()).to_string())
            .collect();
    }

    /// Stable re-sort: paths with a directory component group ahead of bare
    /// file names, each group ordered by full value.
    pub(crate) fn sort_files(&mut self) {
        self.file_names.sort_by(file_name_order);
    }
}

fn has_path_separator(value: &str) -> bool {
    value.contains('/') || value.contains('\\')
}

fn file_name_order(a: &Argument, b: &Argument) -> Ordering {
    match (has_path_separator(a.value()), has_path_separator(b.value())) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.value().cmp(b.value()),
    }
}
