//! Classified view of statements that declare a target's source files, and
//! the classifier that builds it.

use crate::model::section::{Section, SectionKind};
use crate::parser::{Argument, Statement};

/// Statement shapes that list sources directly after the target name and any
/// modifier keywords.
const ADD_TARGET_COMMANDS: &[&str] = &[
    "add_executable",
    "add_library",
    "qt_add_executable",
    "qt_add_library",
    "qt6_add_executable",
    "qt6_add_library",
];

/// Recognized but not yet editable; statements of these shapes are kept out
/// of the mutable model so we never regenerate (and silently reorder) them.
const QML_MODULE_COMMANDS: &[&str] = &["qt_add_qml_module", "qt6_add_qml_module"];

/// Modifier keywords of the add-target shapes. They precede the source list
/// and must survive regeneration in place, so they are kept as plain slots.
const TARGET_MODIFIERS: &[&str] = &[
    "WIN32",
    "MACOSX_BUNDLE",
    "EXCLUDE_FROM_ALL",
    "STATIC",
    "SHARED",
    "MODULE",
    "INTERFACE",
    "OBJECT",
    "MANUAL_FINALIZATION",
];

/// Modifier keywords that carry a value argument (also not a source file).
const KEYWORD_VALUE_MODIFIERS: &[&str] = &["CLASS_NAME", "OUTPUT_TARGETS"];

/// One position in a sources statement's argument layout: either a plain
/// argument (target name, modifier, keyword value) or a section group.
/// Regeneration walks the slots so the original interleaving survives edits.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Plain(Argument),
    Section(usize),
}

/// The mutable view of one statement that declares sources for a target.
#[derive(Debug, Clone)]
pub struct SourcesStatement {
    /// Backing statement; source of truth for the span, and re-serialized
    /// verbatim while the block is clean.
    pub statement: Statement,
    pub target: String,
    pub slots: Vec<Slot>,
    pub sections: Vec<Section>,
    /// Kind of the section to create when an add finds none to reuse.
    pub default_section_kind: SectionKind,
    /// Reserved for statement kinds with structural placement rules; nothing
    /// sets it today, but the placement engine honors it first.
    pub preferred: bool,
    pub dirty: bool,
}

impl SourcesStatement {
    fn new(statement: Statement, target: &Argument, default_section_kind: SectionKind) -> Self {
        Self {
            statement,
            target: target.value().to_string(),
            slots: vec![Slot::Plain(target.clone())],
            sections: Vec::new(),
            default_section_kind,
            preferred: false,
            dirty: false,
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests(statement: Statement, target: &str) -> Self {
        let target = Argument::new(target, false, "");
        Self::new(statement, &target, SectionKind::Private)
    }

    /// Append a new section and its slot. Returns the section index.
    pub(crate) fn push_section(&mut self, section: Section) -> usize {
        self.sections.push(section);
        self.slots.push(Slot::Section(self.sections.len() - 1));
        self.sections.len() - 1
    }

    fn snapshot_prefixes(&mut self) {
        for section in &mut self.sections {
            section.snapshot_prefixes();
        }
    }

    /// Regenerate the backing statement's argument list from the slots,
    /// substituting each section's current keyword and files.
    pub(crate) fn rebuild_arguments(&mut self) {
        let mut arguments = Vec::new();
        for slot in &self.slots {
            match slot {
                Slot::Plain(argument) => arguments.push(argument.clone()),
                Slot::Section(index) => {
                    let section = &self.sections[*index];
                    if let Some(name) = &section.name_argument {
                        arguments.push(name.clone());
                    }
                    arguments.extend(section.file_names.iter().cloned());
                }
            }
        }
        self.statement.set_arguments(arguments);
    }
}

/// Build the mutable view of a statement, if its shape declares sources.
/// Statements that do not classify stay in the raw list untouched.
pub fn classify(statement: &Statement) -> Option<SourcesStatement> {
    let name = statement.name();
    if name == "target_sources" {
        read_target_sources(statement)
    } else if ADD_TARGET_COMMANDS.contains(&name) {
        read_add_target(statement)
    } else if QML_MODULE_COMMANDS.contains(&name) {
        log::warn!(
            "'{}' is recognized but not editable yet; leaving the statement untouched",
            name
        );
        None
    } else {
        None
    }
}

/// `target_sources(<target> [PRIVATE|PUBLIC|INTERFACE <file>...]...)`.
fn read_target_sources(statement: &Statement) -> Option<SourcesStatement> {
    let mut arguments = statement.arguments().iter();

    let target = arguments.next()?;
    if target.value().is_empty() {
        return None;
    }
    let mut block = SourcesStatement::new(statement.clone(), target, SectionKind::Private);

    for argument in arguments {
        if !argument.is_quoted() {
            if let Some(kind) = SectionKind::from_keyword(argument.value()) {
                block.push_section(Section::new(kind, Some(argument.clone())));
                continue;
            }
        }
        match block.sections.last_mut() {
            Some(section) => section.file_names.push(argument.clone()),
            // Files before the first section keyword are malformed for this
            // shape; they are not retained.
            None => log::debug!(
                "dropping argument '{}' before the first section of target_sources({})",
                argument.value(),
                block.target
            ),
        }
    }

    block.snapshot_prefixes();
    Some(block)
}

/// `add_executable`/`add_library` and their Qt-prefixed variants: modifiers
/// and keyword-value pairs first, then one anonymous section holding every
/// remaining argument.
fn read_add_target(statement: &Statement) -> Option<SourcesStatement> {
    let mut arguments = statement.arguments().iter();

    let target = arguments.next()?;
    if target.value().is_empty() {
        return None;
    }
    let mut block = SourcesStatement::new(statement.clone(), target, SectionKind::Anonymous);

    while let Some(argument) = arguments.next() {
        if block.sections.is_empty() && !argument.is_quoted() {
            let value = argument.value();
            if TARGET_MODIFIERS.iter().any(|m| value.eq_ignore_ascii_case(m)) {
                block.slots.push(Slot::Plain(argument.clone()));
                continue;
            }
            if KEYWORD_VALUE_MODIFIERS
                .iter()
                .any(|m| value.eq_ignore_ascii_case(m))
            {
                block.slots.push(Slot::Plain(argument.clone()));
                if let Some(value_argument) = arguments.next() {
                    block.slots.push(Slot::Plain(value_argument.clone()));
                }
                continue;
            }
        }
        if block.sections.is_empty() {
            block.push_section(Section::new(SectionKind::Anonymous, None));
        }
        if !argument.value().is_empty() {
            block.sections[0].file_names.push(argument.clone());
        }
    }

    block.snapshot_prefixes();
    Some(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    fn classify_str(input: &str) -> Option<SourcesStatement> {
        let statements = parse(&tokenize(input).unwrap()).unwrap();
        classify(&statements[0])
    }

    #[test]
    fn target_sources_sections() {
        let block = classify_str(
            "target_sources(main PRIVATE a.cpp b.cpp PUBLIC api.h INTERFACE iface.h)",
        )
        .unwrap();
        assert_eq!(block.target, "main");
        assert_eq!(block.sections.len(), 3);
        assert_eq!(block.sections[0].kind, SectionKind::Private);
        assert_eq!(block.sections[0].file_names.len(), 2);
        assert_eq!(block.sections[1].kind, SectionKind::Public);
        assert_eq!(block.sections[2].kind, SectionKind::Interface);
        assert_eq!(block.default_section_kind, SectionKind::Private);
        assert!(!block.dirty);
    }

    #[test]
    fn section_keywords_are_case_insensitive_but_not_quoted() {
        let block = classify_str("target_sources(main private a.cpp \"PUBLIC\" b.cpp)").unwrap();
        assert_eq!(block.sections.len(), 1);
        // the quoted "PUBLIC" is an ordinary file argument
        let values: Vec<&str> = block.sections[0]
            .file_names
            .iter()
            .map(|a| a.value())
            .collect();
        assert_eq!(values, vec!["a.cpp", "PUBLIC", "b.cpp"]);
    }

    #[test]
    fn files_before_first_section_are_dropped() {
        let block = classify_str("target_sources(main stray.cpp PRIVATE a.cpp)").unwrap();
        assert_eq!(block.sections.len(), 1);
        assert_eq!(block.sections[0].file_names.len(), 1);
        assert_eq!(block.slots.len(), 2); // target + one section
    }

    #[test]
    fn add_executable_modifiers_and_files() {
        let block = classify_str(
            "add_executable(tool WIN32 MACOSX_BUNDLE main.cpp cli/Options.cpp)",
        )
        .unwrap();
        assert_eq!(block.target, "tool");
        assert_eq!(block.sections.len(), 1);
        assert_eq!(block.sections[0].kind, SectionKind::Anonymous);
        let values: Vec<&str> = block.sections[0]
            .file_names
            .iter()
            .map(|a| a.value())
            .collect();
        assert_eq!(values, vec!["main.cpp", "cli/Options.cpp"]);
        // target + two modifiers + section
        assert_eq!(block.slots.len(), 4);
        assert_eq!(block.default_section_kind, SectionKind::Anonymous);
    }

    #[test]
    fn keyword_value_pairs_are_plain_slots() {
        let block =
            classify_str("qt6_add_library(widgets CLASS_NAME Widgets STATIC w.cpp)").unwrap();
        let values: Vec<&str> = block.sections[0]
            .file_names
            .iter()
            .map(|a| a.value())
            .collect();
        assert_eq!(values, vec!["w.cpp"]);
        // target, CLASS_NAME, Widgets, STATIC, section
        assert_eq!(block.slots.len(), 5);
    }

    #[test]
    fn modifiers_after_first_file_are_files() {
        let block = classify_str("add_library(lib a.cpp STATIC)").unwrap();
        let values: Vec<&str> = block.sections[0]
            .file_names
            .iter()
            .map(|a| a.value())
            .collect();
        assert_eq!(values, vec!["a.cpp", "STATIC"]);
    }

    #[test]
    fn qml_modules_are_not_classified() {
        assert!(classify_str("qt_add_qml_module(app URI Demo)").is_none());
        assert!(classify_str("qt6_add_qml_module(app URI Demo)").is_none());
    }

    #[test]
    fn unrelated_statements_are_not_classified() {
        assert!(classify_str("add_subdirectory(vendor)").is_none());
        assert!(classify_str("set(SOURCES a.cpp)").is_none());
    }

    #[test]
    fn rebuild_preserves_slot_interleaving() {
        let mut block = classify_str(
            "add_executable(tool WIN32 main.cpp)",
        )
        .unwrap();
        block.sections[0]
            .file_names
            .push(Argument::new("extra.cpp", false, " "));
        block.rebuild_arguments();
        assert_eq!(
            block.statement.to_text(),
            "add_executable(tool WIN32 main.cpp extra.cpp)"
        );
    }

    #[test]
    fn rebuild_uses_current_section_contents() {
        let mut block = classify_str("target_sources(main PRIVATE a.cpp b.cpp)").unwrap();
        block.sections[0].file_names.retain(|a| a.value() != "a.cpp");
        block.rebuild_arguments();
        assert_eq!(
            block.statement.to_text(),
            "target_sources(main PRIVATE b.cpp)"
        );
    }
}
