//! cmakelists-edit: surgical editing of CMake listfiles.
//!
//! Adds, renames, and removes source-file references inside the statements
//! that declare a target's sources (`target_sources`, `add_executable`,
//! `add_library` and their Qt-prefixed variants) while reproducing every
//! byte of the file that is not semantically touched, comments, blank
//! lines, indentation, and argument separators included.
//!
//! # Architecture
//!
//! Bytes flow through a fixed pipeline: [`lexer`] turns the buffer into
//! positioned tokens, [`parser`] folds them into statements with exact
//! source spans, [`model`] classifies the statements that own sources and
//! indexes them by target, and the rewriter patches the original byte
//! stream, regenerating only the statements an edit dirtied. Placement of
//! added files scores existing sections by directory affinity so new files
//! land next to their siblings.
//!
//! # Example
//!
//! ```
//! use cmakelists_edit::ListsFile;
//!
//! let input = b"target_sources(main PRIVATE\n    a.cpp\n)\n".to_vec();
//! let mut file = ListsFile::new(input);
//! assert!(file.is_loaded());
//!
//! file.add_source_file("main", "b.cpp")?;
//! file.save()?;
//! assert_eq!(
//!     file.buffer().as_slice(),
//!     b"target_sources(main PRIVATE\n    a.cpp\n    b.cpp\n)\n",
//! );
//! # Ok::<(), cmakelists_edit::EditError>(())
//! ```

pub mod buffer;
pub mod editor;
pub mod lexer;
pub mod model;
pub mod parser;
mod rewriter;

// Re-exports
pub use buffer::{BufferError, FileBuffer, StandardFileBuffer};
pub use editor::{BlockCreationPolicy, ListsFile, SortPolicy};
pub use lexer::{tokenize, LexError, Token, TokenKind};
pub use model::{EditError, Section, SectionKind, SourcesStatement};
pub use parser::{Argument, ParseError, Span, Statement};
