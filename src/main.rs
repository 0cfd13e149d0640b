use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use swf_translator::{PatchConfig, PatchReport, TranslateConfig, TranslationMemory};

#[derive(Parser)]
#[command(name = "swf-translator", about = "Extract, translate and patch text in SWF text tags")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract text records from a document
    Parse {
        /// Input document
        input: PathBuf,
        /// Output records file (defaults to <input>.records.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Fill in untranslated rows from a translation memory
    ///
    /// Given a records file, writes translated records. Given a document,
    /// extracts, translates and patches it in one step.
    Translate {
        /// Input records file or document
        input: PathBuf,
        /// Translation memory (JSON list of entries)
        #[arg(short, long)]
        memory: PathBuf,
        /// Source language (en, ru, etc.)
        #[arg(short, long)]
        source_lang: Option<String>,
        /// Target language (en, ru, etc.)
        #[arg(short, long, default_value = "en-US")]
        target_lang: String,
        /// Output file (defaults to <input>-translated.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Fallback font family when patching a document
        #[arg(short, long, default_value = "Arial")]
        font_name: String,
    },
    /// Write records back into a document
    Patch {
        /// Input document
        document: PathBuf,
        /// Records file
        records: PathBuf,
        /// Output document (defaults to <document>-translated)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Font family used when the original fonts lack glyphs
        #[arg(short, long, default_value = "Arial")]
        font_name: String,
        /// Size of the fallback font in points
        #[arg(long, default_value_t = 18)]
        font_size: u16,
        /// Scale heights of translated runs by text length (best effort)
        #[arg(long)]
        rescale_heights: bool,
    },
}

fn translated_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{stem}-translated.{}", ext.to_string_lossy()),
        None => format!("{stem}-translated"),
    };
    input.with_file_name(name)
}

fn require_file(path: &Path) {
    if !path.exists() {
        eprintln!("Error: file not found: {}", path.display());
        std::process::exit(1);
    }
    if !path.is_file() {
        eprintln!("Error: not a file: {}", path.display());
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<i32, swf_translator::Error> {
    match command {
        Command::Parse { input, output } => {
            require_file(&input);
            let output = output.unwrap_or_else(|| input.with_extension("records.json"));
            let records = swf_translator::parse_document(&input, &output)?;
            println!("Saved {} records to {}", records.len(), output.display());
        }
        Command::Translate {
            input,
            memory,
            source_lang,
            target_lang,
            output,
            font_name,
        } => {
            require_file(&input);
            require_file(&memory);
            let output = output.unwrap_or_else(|| translated_path(&input));
            let mut memory = TranslationMemory::load(&memory)?;
            let config = TranslateConfig {
                source_lang,
                target_lang,
            };
            if swf_translator::is_document_file(&input)? {
                let patch_config = PatchConfig {
                    fallback_family: font_name,
                    ..PatchConfig::default()
                };
                let (_, report) = swf_translator::translate_document(
                    &input,
                    &output,
                    &mut memory,
                    &config,
                    &patch_config,
                )?;
                println!("Saved to {}", output.display());
                return Ok(report_problems(&report));
            }
            let mut records = swf_translator::load_records(&input)?;
            swf_translator::translate_records(&mut records, &mut memory, &config)?;
            swf_translator::save_records(&records, &output)?;
            println!("Saved to {}", output.display());
        }
        Command::Patch {
            document,
            records,
            output,
            font_name,
            font_size,
            rescale_heights,
        } => {
            require_file(&document);
            require_file(&records);
            let output = output.unwrap_or_else(|| translated_path(&document));
            let records = swf_translator::load_records(&records)?;
            let config = PatchConfig {
                fallback_family: font_name,
                fallback_size_pt: font_size,
                rescale_heights,
                ..PatchConfig::default()
            };
            let report = swf_translator::patch_document(&document, &records, &output, &config)?;
            println!("Saved to {}", output.display());
            return Ok(report_problems(&report));
        }
    }
    Ok(0)
}

/// Prints the elements that were not patched. Returns the exit code.
fn report_problems(report: &PatchReport) -> i32 {
    if report.is_complete() {
        return 0;
    }
    if !report.fatal.is_empty() {
        eprintln!("Could not patch elements: {:?}", report.fatal);
    }
    if !report.skipped.is_empty() {
        eprintln!("Skipped elements with mismatched rows: {:?}", report.skipped);
    }
    if !report.failed.is_empty() {
        eprintln!("Malformed elements left unchanged: {:?}", report.failed);
    }
    2
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    match run(args.command) {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
