//! Byte-identity guarantees: a loaded file with no mutations writes back
//! exactly its input, and a file that fails to parse yields no usable model.

use cmakelists_edit::{EditError, FileBuffer, ListsFile};
use proptest::prelude::*;
use std::fs;

fn load_fixture(name: &str) -> Vec<u8> {
    fs::read(format!("tests/fixtures/{name}"))
        .unwrap_or_else(|err| panic!("failed to load fixture {name}: {err}"))
}

fn assert_roundtrip(input: &[u8]) {
    let mut file = ListsFile::new(input.to_vec());
    assert!(file.is_loaded());
    file.save().unwrap();
    assert_eq!(
        String::from_utf8_lossy(file.buffer().content()),
        String::from_utf8_lossy(input)
    );
}

#[test]
fn fixtures_roundtrip_unchanged() {
    for name in [
        "two_source_blocks.cmake",
        "no_source_block.cmake",
        "empty_source_block.cmake",
        "add_executable.cmake",
        "mixed_constructs.cmake",
    ] {
        assert_roundtrip(&load_fixture(name));
    }
}

#[test]
fn repeated_saves_stay_identical() {
    let input = load_fixture("two_source_blocks.cmake");
    let mut file = ListsFile::new(input.clone());
    file.save().unwrap();
    file.save().unwrap();
    assert_eq!(file.buffer().content(), input.as_slice());
}

#[test]
fn unbalanced_parens_contained() {
    let file = ListsFile::new(load_fixture("invalid_listsfile.cmake"));
    assert!(!file.is_loaded());
    assert!(file.load_error().is_some());
    assert!(file.statements().is_empty());
}

#[test]
fn mutations_on_unloaded_file_fail() {
    let mut file = ListsFile::new(load_fixture("invalid_listsfile.cmake"));
    assert!(matches!(
        file.add_source_file("main", "b.cpp"),
        Err(EditError::NotLoaded)
    ));
}

#[test]
fn crlf_line_endings_survive_roundtrip_and_edit() {
    let input = b"project(demo)\r\ntarget_sources(main PRIVATE\r\n    a.cpp\r\n)\r\n".to_vec();
    assert_roundtrip(&input);

    let mut file = ListsFile::new(input);
    file.add_source_file("main", "b.cpp").unwrap();
    file.save().unwrap();
    assert_eq!(
        String::from_utf8_lossy(file.buffer().content()),
        "project(demo)\r\ntarget_sources(main PRIVATE\r\n    a.cpp\r\n    b.cpp\r\n)\r\n"
    );
}

#[test]
fn file_without_trailing_newline_roundtrips() {
    assert_roundtrip(b"target_sources(main PRIVATE a.cpp)");
}

prop_compose! {
    fn argument_text()(
        value in "[A-Za-z0-9_./]{1,12}",
        quoted in any::<bool>(),
        space_value in "[A-Za-z0-9_. /]{1,12}",
    ) -> String {
        if quoted {
            format!("\"{space_value}\"")
        } else {
            value
        }
    }
}

prop_compose! {
    fn statement_text()(
        name in "[a-z_][a-z0-9_]{0,14}",
        leading in prop::sample::select(vec!["", " ", "  "]),
        separators in prop::collection::vec(
            prop::sample::select(vec![" ", "  ", "\t", "\n    ", "\n\t", " \n        "]),
            0..6,
        ),
        arguments in prop::collection::vec(argument_text(), 6),
        trailing in prop::sample::select(vec!["", " ", "\n"]),
    ) -> String {
        let mut text = format!("{name}{leading}(");
        for (index, separator) in separators.iter().enumerate() {
            if index > 0 {
                text.push_str(separator);
            }
            text.push_str(&arguments[index]);
        }
        text.push_str(trailing);
        text.push(')');
        text
    }
}

prop_compose! {
    fn listfile_text()(
        header in prop::sample::select(vec!["", "# generated header\n", "\n"]),
        statements in prop::collection::vec(statement_text(), 1..8),
        gaps in prop::collection::vec(
            prop::sample::select(vec!["\n", "\n\n", "\n# a comment\n", "\n    \n"]),
            8,
        ),
        trailer in prop::sample::select(vec!["", "\n", "\n# done\n"]),
    ) -> String {
        let mut text = String::from(header);
        for (index, statement) in statements.iter().enumerate() {
            if index > 0 {
                text.push_str(gaps[index]);
            }
            text.push_str(statement);
        }
        text.push_str(trailer);
        text
    }
}

proptest! {
    #[test]
    fn generated_listfiles_roundtrip(input in listfile_text()) {
        let mut file = ListsFile::new(input.clone().into_bytes());
        prop_assert!(file.is_loaded(), "generated listfile should parse:\n{input}");
        file.save().unwrap();
        prop_assert_eq!(
            String::from_utf8_lossy(file.buffer().content()),
            input.as_str()
        );
    }
}
