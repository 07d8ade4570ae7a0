pub mod errors;
pub mod placement;
pub mod section;
pub mod sources;

pub use errors::EditError;
pub use section::{Section, SectionKind};
pub use sources::{classify, Slot, SourcesStatement};

/// Separator given to arguments that have no original separator to inherit:
/// the section keyword and first file of a created section, and the files of
/// a previously empty section.
// TODO derive the indent from neighboring statements instead of hardcoding
pub(crate) const DEFAULT_SEPARATOR: &str = "\n    ";
