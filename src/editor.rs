//! The editable model of one CMake listfile.
//!
//! `ListsFile` parses the buffer once at construction (all or nothing),
//! indexes the statements that declare sources by target, and applies
//! add/rename/remove mutations to that index. Mutations only touch the
//! in-memory model; [`ListsFile::save`] runs the surgical rewriter and
//! replaces the buffer content, leaving every untouched byte alone.

use crate::buffer::FileBuffer;
use crate::lexer::tokenize;
use crate::model::placement::{find_insert_section, Placement};
use crate::model::{
    classify, EditError, Section, SectionKind, Slot, SourcesStatement, DEFAULT_SEPARATOR,
};
use crate::parser::{parse, Argument, ParseError, Statement};
use crate::rewriter::rewrite;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortPolicy {
    #[default]
    NoSort,
    Sort,
}

/// Whether `add` may synthesize a `target_sources` statement for a target
/// that has none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockCreationPolicy {
    #[default]
    Create,
    NoCreate,
}

pub struct ListsFile<B: FileBuffer> {
    buffer: B,
    statements: Vec<Statement>,
    blocks: Vec<SourcesStatement>,
    index: HashMap<String, Vec<usize>>,
    load_error: Option<ParseError>,
    dirty: bool,
    sort_policy: SortPolicy,
    block_creation: BlockCreationPolicy,
    default_section_kind: SectionKind,
}

impl<B: FileBuffer> ListsFile<B> {
    /// Parse the buffer content into a model. On a parse failure the file
    /// reports `!is_loaded()` and every mutation fails; the error is kept
    /// for diagnostics.
    pub fn new(buffer: B) -> Self {
        let mut file = Self {
            buffer,
            statements: Vec::new(),
            blocks: Vec::new(),
            index: HashMap::new(),
            load_error: None,
            dirty: false,
            sort_policy: SortPolicy::default(),
            block_creation: BlockCreationPolicy::default(),
            default_section_kind: SectionKind::Private,
        };
        file.load();
        file
    }

    fn load(&mut self) {
        self.statements.clear();
        self.blocks.clear();
        self.index.clear();
        self.load_error = None;
        self.dirty = false;

        let result = std::str::from_utf8(self.buffer.content())
            .map_err(ParseError::from)
            .and_then(|content| {
                let tokens = tokenize(content)?;
                parse(&tokens)
            });

        let statements = match result {
            Ok(statements) => statements,
            Err(error) => {
                log::warn!("could not parse {}: {}", self.buffer_name(), error);
                self.load_error = Some(error);
                return;
            }
        };

        let mut blocks = Vec::new();
        let mut index: HashMap<String, Vec<usize>> = HashMap::new();
        for statement in &statements {
            if let Some(block) = classify(statement) {
                index.entry(block.target.clone()).or_default().push(blocks.len());
                blocks.push(block);
            }
        }

        self.statements = statements;
        self.blocks = blocks;
        self.index = index;
    }

    fn buffer_name(&self) -> String {
        self.buffer
            .file_name()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<memory>".to_string())
    }

    pub fn is_loaded(&self) -> bool {
        self.load_error.is_none()
    }

    /// The parse error of the last (re)load, if it failed.
    pub fn load_error(&self) -> Option<&ParseError> {
        self.load_error.as_ref()
    }

    /// True once any mutation succeeded and `save` has not run yet.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_sort_policy(&mut self, policy: SortPolicy) {
        self.sort_policy = policy;
    }

    pub fn set_block_creation_policy(&mut self, policy: BlockCreationPolicy) {
        self.block_creation = policy;
    }

    /// Section kind used for statements synthesized for unknown targets.
    /// Defaults to `Private`.
    pub fn set_default_section_kind(&mut self, kind: SectionKind) {
        self.default_section_kind = kind;
    }

    /// All parsed statements, classified or not, in file order.
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut B {
        &mut self.buffer
    }

    pub fn into_buffer(self) -> B {
        self.buffer
    }

    /// Drop the model and parse the current buffer content again. Returns
    /// whether the reload succeeded.
    pub fn reload(&mut self) -> bool {
        self.load();
        self.is_loaded()
    }

    fn ensure_loaded(&self) -> Result<(), EditError> {
        if self.is_loaded() {
            Ok(())
        } else {
            Err(EditError::NotLoaded)
        }
    }

    /// Add `file_name` to `target`, placing it in the best-scoring section
    /// (see the placement module). The new argument inherits the separator
    /// of the section's last file; values containing a space are quoted.
    pub fn add_source_file(&mut self, target: &str, file_name: &str) -> Result<(), EditError> {
        self.ensure_loaded()?;

        let (block_index, section_index) = match self.index.get(target) {
            None => {
                if self.block_creation == BlockCreationPolicy::NoCreate {
                    log::warn!(
                        "target '{}' not found in {} and statement creation is disabled",
                        target,
                        self.buffer_name()
                    );
                    return Err(EditError::CreationDisabled {
                        target: target.to_string(),
                    });
                }
                let block_index = self.create_sources_block(target);
                (block_index, 0)
            }
            Some(candidates) => {
                match find_insert_section(&self.blocks, candidates, file_name, None) {
                    Placement::Existing { block, section } => (block, section),
                    Placement::CreateSection { block } => {
                        (block, self.ensure_insert_section(block))
                    }
                }
            }
        };

        let section = &mut self.blocks[block_index].sections[section_index];
        let separator = section
            .file_names
            .last()
            .map(|argument| argument.separator().to_string())
            .unwrap_or_else(|| DEFAULT_SEPARATOR.to_string());
        let quoted = needs_quotation(file_name);
        section.file_names.push(Argument::new(file_name, quoted, separator));

        if self.sort_policy == SortPolicy::Sort {
            section.sort_files();
        }

        self.blocks[block_index].dirty = true;
        self.dirty = true;
        Ok(())
    }

    /// Rename the first occurrence of `old_file_name` under `target`. The
    /// argument keeps its separator and quoting.
    pub fn rename_source_file(
        &mut self,
        target: &str,
        old_file_name: &str,
        new_file_name: &str,
    ) -> Result<(), EditError> {
        self.ensure_loaded()?;
        let candidates = self.target_blocks(target)?;

        for block_index in candidates {
            let block = &mut self.blocks[block_index];
            for section in &mut block.sections {
                if let Some(argument) = section
                    .file_names
                    .iter_mut()
                    .find(|argument| argument.value() == old_file_name)
                {
                    argument.set_value(new_file_name);
                    if self.sort_policy == SortPolicy::Sort {
                        section.sort_files();
                    }
                    block.dirty = true;
                    self.dirty = true;
                    return Ok(());
                }
            }
        }

        self.report_missing_file(target, old_file_name)
    }

    /// Remove the first occurrence of `file_name` under `target`.
    pub fn remove_source_file(&mut self, target: &str, file_name: &str) -> Result<(), EditError> {
        self.ensure_loaded()?;
        let candidates = self.target_blocks(target)?;

        for block_index in candidates {
            let block = &mut self.blocks[block_index];
            for section in &mut block.sections {
                if let Some(position) = section
                    .file_names
                    .iter()
                    .position(|argument| argument.value() == file_name)
                {
                    section.file_names.remove(position);
                    if self.sort_policy == SortPolicy::Sort {
                        section.sort_files();
                    }
                    block.dirty = true;
                    self.dirty = true;
                    return Ok(());
                }
            }
        }

        self.report_missing_file(target, file_name)
    }

    /// Rewrite the buffer: dirty statements are regenerated in place, every
    /// other byte is copied verbatim. With nothing dirty this is the
    /// identity on the content.
    pub fn save(&mut self) -> Result<(), EditError> {
        self.ensure_loaded()?;
        let output = rewrite(self.buffer.content(), &mut self.blocks);
        self.buffer.set_content(output);
        self.dirty = false;
        Ok(())
    }

    fn target_blocks(&self, target: &str) -> Result<Vec<usize>, EditError> {
        match self.index.get(target) {
            Some(candidates) => Ok(candidates.clone()),
            None => {
                log::warn!(
                    "target '{}' not found in {}",
                    target,
                    self.buffer_name()
                );
                Err(EditError::TargetNotFound {
                    target: target.to_string(),
                })
            }
        }
    }

    fn report_missing_file(&self, target: &str, file_name: &str) -> Result<(), EditError> {
        log::warn!(
            "file '{}' not found for target '{}' in {}",
            file_name,
            target,
            self.buffer_name()
        );
        Err(EditError::FileNotFound {
            target: target.to_string(),
            file: file_name.to_string(),
        })
    }

    /// Synthesize a `target_sources` statement for an unknown target. It has
    /// no span and is appended after the last byte on save.
    fn create_sources_block(&mut self, target: &str) -> usize {
        let statement = Statement::new("target_sources");
        let target_argument = Argument::new(target, false, "");

        let mut block = SourcesStatement {
            statement,
            target: target.to_string(),
            slots: vec![Slot::Plain(target_argument)],
            sections: Vec::new(),
            default_section_kind: self.default_section_kind,
            preferred: false,
            dirty: false,
        };
        let kind = self.default_section_kind;
        block.push_section(Section::new(kind, kind.to_argument()));

        let index = self.blocks.len();
        self.blocks.push(block);
        self.index.entry(target.to_string()).or_default().push(index);
        index
    }

    /// Find or create the section an add falls back to when scoring selects
    /// none: the last section of the statement's default kind, else the last
    /// section at all, else a freshly created default section.
    fn ensure_insert_section(&mut self, block_index: usize) -> usize {
        let block = &mut self.blocks[block_index];
        let kind = block.default_section_kind;
        if let Some(section) = block.sections.iter().rposition(|s| s.kind == kind) {
            return section;
        }
        if !block.sections.is_empty() {
            return block.sections.len() - 1;
        }
        block.push_section(Section::new(kind, kind.to_argument()))
    }
}

/// Documented approximation of the real quoting rules: quote iff the value
/// contains a space.
fn needs_quotation(value: &str) -> bool {
    value.contains(' ')
}
