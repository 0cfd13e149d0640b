use std::collections::BTreeSet;

use swf_translator::fonts;

#[test]
fn unknown_family_is_not_found() {
    let chars = BTreeSet::from(['a', 'Ж']);
    assert!(fonts::find_font_file("No Such Family For Tests").is_none());
    assert!(fonts::missing_glyphs("No Such Family For Tests", &chars).is_none());
}

#[test]
fn unparseable_font_data_has_no_coverage() {
    let chars = BTreeSet::from(['a']);
    assert!(fonts::uncovered_chars(b"not a font", 0, &chars).is_none());
}

#[test]
fn index_skips_unreadable_files_and_missing_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("nested");
    std::fs::create_dir(&nested).unwrap();
    std::fs::write(nested.join("Broken.ttf"), b"not a font").unwrap();
    std::fs::write(dir.path().join("readme.txt"), b"hello").unwrap();

    let index = fonts::index_font_dirs(&[dir.path().to_path_buf(), dir.path().join("absent")]);
    assert!(index.is_empty());
}
