//! Inspect a text document before patching it.
//!
//! Usage:
//!   doc-inspect <document.json>              list fonts and text elements
//!   doc-inspect <document.json> --records    print the records `parse` would write
//!   doc-inspect <document.json> <id>         dump one element's formatted text

use std::path::Path;

use swf_translator::{Document, Tag, TextElement, extract_records};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage:");
        eprintln!("  doc-inspect <document.json>              list fonts and text elements");
        eprintln!("  doc-inspect <document.json> --records    print extracted records");
        eprintln!("  doc-inspect <document.json> <id>         dump formatted text");
        std::process::exit(1);
    }

    let doc = Document::load(Path::new(&args[1])).unwrap_or_else(|e| {
        eprintln!("Cannot load '{}': {e}", args[1]);
        std::process::exit(1);
    });

    match args.get(2).map(String::as_str) {
        None => list_tags(&doc),
        Some("--records") => {
            let records = extract_records(&doc).unwrap_or_else(|e| {
                eprintln!("Cannot extract records: {e}");
                std::process::exit(1);
            });
            match serde_json::to_string_pretty(&records) {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("Cannot encode records: {e}"),
            }
        }
        Some(id) => {
            let Ok(id) = id.parse::<u16>() else {
                eprintln!("'{id}' is not an element id");
                std::process::exit(1);
            };
            match doc.element(id) {
                Ok(element) => print!("{}", element.formatted_text),
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            }
        }
    }
}

fn list_tags(doc: &Document) {
    println!("{:>6}  {:<5}  {}", "id", "kind", "details");
    println!("{}", "-".repeat(60));
    for tag in &doc.tags {
        match tag {
            Tag::Font(font) => println!(
                "{:>6}  {:<5}  {} {}pt, {} glyphs",
                font.id,
                "font",
                font.family,
                font.size_pt,
                font.glyphs.chars().count()
            ),
            Tag::Text(element) => {
                println!(
                    "{:>6}  {:<5}  {} runs{}",
                    element.id,
                    "text",
                    element.texts.len(),
                    if element.modified { ", modified" } else { "" }
                );
                report_missing_glyphs(doc, element);
            }
        }
    }
}

/// Flags runs whose text the element's fonts cannot draw.
fn report_missing_glyphs(doc: &Document, element: &TextElement) {
    for uncovered in doc.uncovered_runs(&element.formatted_text, &element.texts) {
        match uncovered.font.filter(|&id| doc.font(id).is_some()) {
            None => println!("{:>14}run {}: no font", "", uncovered.run),
            Some(font) => println!(
                "{:>14}run {}: font {font} lacks {:?}",
                "", uncovered.run, uncovered.missing
            ),
        }
    }
}
