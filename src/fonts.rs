//! Installed-font lookup used to sanity-check the fallback family before a
//! fallback font is synthesized from it.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use ttf_parser::Face;
use walkdir::WalkDir;

/// lowercase family name -> (file path, face index within TTC)
type FontLookup = HashMap<String, (PathBuf, u32)>;

static FONT_INDEX: OnceLock<FontLookup> = OnceLock::new();

fn font_family_name(face: &Face) -> Option<String> {
    for name in face.names() {
        if name.name_id == ttf_parser::name_id::FAMILY
            && name.is_unicode()
            && let Some(s) = name.to_string()
        {
            return Some(s);
        }
    }
    None
}

/// Directories from `SWF_TRANSLATOR_FONTS` first, then the platform's
/// usual font locations.
fn font_directories() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = std::env::var_os("SWF_TRANSLATOR_FONTS")
        .map(|val| std::env::split_paths(&val).collect())
        .unwrap_or_default();
    let home = std::env::var_os("HOME").map(PathBuf::from);

    if cfg!(target_os = "macos") {
        dirs.push("/Library/Fonts".into());
        dirs.push("/System/Library/Fonts".into());
        dirs.extend(home.map(|h| h.join("Library/Fonts")));
    } else if cfg!(windows) {
        let windir = std::env::var_os("WINDIR").unwrap_or_else(|| "C:\\Windows".into());
        dirs.push(PathBuf::from(windir).join("Fonts"));
    } else {
        dirs.push("/usr/share/fonts".into());
        dirs.extend(home.map(|h| h.join(".local/share/fonts")));
    }
    dirs
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"))
}

/// Indexes the regular faces of every font file under `dirs` by lowercase
/// family name. Earlier directories win when a family appears twice.
pub fn index_font_dirs(dirs: &[PathBuf]) -> HashMap<String, (PathBuf, u32)> {
    let mut index = FontLookup::new();
    let files = dirs.iter().flat_map(|dir| {
        WalkDir::new(dir)
            .follow_links(true)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file() && is_font_file(e.path()))
    });

    for entry in files {
        let Ok(data) = std::fs::read(entry.path()) else {
            continue;
        };
        let face_count = ttf_parser::fonts_in_collection(&data).unwrap_or(1);
        for face_index in 0..face_count {
            let Ok(face) = Face::parse(&data, face_index) else {
                continue;
            };
            if face.is_bold() || face.is_italic() {
                continue;
            }
            if let Some(family) = font_family_name(&face) {
                index
                    .entry(family.to_lowercase())
                    .or_insert_with(|| (entry.path().to_path_buf(), face_index));
            }
        }
    }
    log::debug!("indexed {} font families", index.len());
    index
}

fn get_font_index() -> &'static FontLookup {
    FONT_INDEX.get_or_init(|| index_font_dirs(&font_directories()))
}

pub fn find_font_file(family: &str) -> Option<(PathBuf, u32)> {
    get_font_index().get(&family.to_lowercase()).cloned()
}

/// Characters of `chars` that `font_data` has no glyph for. Control
/// characters are not expected to have glyphs and are skipped.
pub fn uncovered_chars(
    font_data: &[u8],
    face_index: u32,
    chars: &BTreeSet<char>,
) -> Option<Vec<char>> {
    let face = Face::parse(font_data, face_index).ok()?;
    Some(
        chars
            .iter()
            .copied()
            .filter(|c| !c.is_control() && face.glyph_index(*c).is_none())
            .collect(),
    )
}

/// Characters the installed `family` cannot render, or `None` when the
/// family is not installed.
pub fn missing_glyphs(family: &str, chars: &BTreeSet<char>) -> Option<Vec<char>> {
    let (path, face_index) = find_font_file(family)?;
    let data = std::fs::read(&path).ok()?;
    uncovered_chars(&data, face_index, chars)
}
