//! Directory-affinity placement for added files.
//!
//! A file added under a tree that already has sibling files should land next
//! to them, not in an arbitrary default bucket. Sections are scored against
//! the new file's parent directory: an exact directory match wins outright,
//! otherwise the longest common leading run of characters decides, and
//! sections without any files are never selected.

use crate::model::section::SectionKind;
use crate::model::sources::SourcesStatement;

/// Where an added file should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placement {
    Existing { block: usize, section: usize },
    CreateSection { block: usize },
}

/// Score of a section against a candidate directory. Ordering is the
/// selection priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum PrefixScore {
    Partial(usize),
    Exact,
}

pub(crate) fn parent_directory(file_name: &str) -> &str {
    match file_name.rfind(['/', '\\']) {
        Some(index) => &file_name[..index],
        None => "",
    }
}

fn common_prefix_length(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .count()
}

fn score_section(
    prefixes: &std::collections::HashSet<String>,
    file_directory: &str,
) -> Option<PrefixScore> {
    if prefixes.is_empty() {
        return None;
    }
    let mut best = 0;
    for prefix in prefixes {
        if prefix == file_directory {
            return Some(PrefixScore::Exact);
        }
        best = best.max(common_prefix_length(prefix, file_directory));
    }
    Some(PrefixScore::Partial(best))
}

/// Choose the section to receive `file_name` among the statements registered
/// for one target. `candidates` holds block indices in file order and must
/// not be empty. `section_hint` optionally restricts the scan to one section
/// kind (derived from a file-kind hint by the caller; unconstrained today).
pub(crate) fn find_insert_section(
    blocks: &[SourcesStatement],
    candidates: &[usize],
    file_name: &str,
    section_hint: Option<SectionKind>,
) -> Placement {
    let file_directory = parent_directory(file_name);

    // Preferred statements short-circuit the scoring pass entirely.
    for &block in candidates {
        if !blocks[block].preferred {
            continue;
        }
        let wanted = section_hint.unwrap_or(blocks[block].default_section_kind);
        if let Some(section) = blocks[block]
            .sections
            .iter()
            .rposition(|section| section.kind == wanted)
        {
            return Placement::Existing { block, section };
        }
        return Placement::CreateSection { block };
    }

    let mut best: Option<(PrefixScore, usize, usize)> = None;
    for &block in candidates {
        for (section, candidate) in blocks[block].sections.iter().enumerate() {
            if let Some(hint) = section_hint {
                if candidate.kind != hint {
                    continue;
                }
            }
            match score_section(&candidate.common_prefixes, file_directory) {
                Some(PrefixScore::Exact) => {
                    log::debug!(
                        "placing '{}' by exact directory match in statement {}",
                        file_name,
                        block
                    );
                    return Placement::Existing { block, section };
                }
                Some(score) => {
                    // Strict comparison keeps the first-encountered winner on ties.
                    if best.map_or(true, |(b, _, _)| score > b) {
                        best = Some((score, block, section));
                    }
                }
                None => {}
            }
        }
    }

    match best {
        Some((_, block, section)) => Placement::Existing { block, section },
        // No section anywhere holds a file: fall back to the first statement.
        None => Placement::CreateSection {
            block: candidates[0],
        },
    }
}
