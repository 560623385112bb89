//! CLI tool for viewing and exporting place details.

mod render;

use anyhow::{Context, Result};
use clap::Parser;
use place_core::{DetailSession, Tab};
use place_xlsx::{DirectoryTarget, XlsxExporter};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Show the detail tabs of place records and export them to XLSX.
#[derive(Parser, Debug)]
#[command(name = "place-details")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input place record(s) as JSON
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Tab to show (overview, hours, services, reviews, photos)
    #[arg(short, long, default_value = "overview")]
    tab: Tab,

    /// Show every tab
    #[arg(short, long)]
    all: bool,

    /// Print view models as JSON instead of text
    #[arg(short, long)]
    json: bool,

    /// Export each record to "<name>_details.xlsx"
    #[arg(short, long)]
    export: bool,

    /// Output directory for exports (default: same as input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON pointer to the record inside the input, e.g. /data/result
    #[arg(short, long, default_value = "")]
    pointer: String,

    /// Sheet name for exports
    #[arg(long, default_value = place_xlsx::DEFAULT_SHEET_NAME)]
    sheet_name: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let exporter = XlsxExporter::new().with_sheet_name(&args.sheet_name);

    for input_path in &args.input {
        if args.verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        if let Err(e) = process_file(input_path, &args, &exporter) {
            eprintln!("Error processing {}: {:#}", input_path.display(), e);
        }
    }

    Ok(())
}

/// Show and optionally export a single record file.
fn process_file(input_path: &Path, args: &Args, exporter: &XlsxExporter) -> Result<()> {
    let text = fs::read_to_string(input_path)
        .with_context(|| format!("Failed to read {}", input_path.display()))?;
    let document: Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse JSON in {}", input_path.display()))?;

    let value = select_record(&document, &args.pointer)?;

    let mut session =
        DetailSession::open_value(value).map_err(|e| anyhow::anyhow!("{}", e))?;

    let tabs: Vec<Tab> = if args.all {
        Tab::ALL.to_vec()
    } else {
        vec![args.tab]
    };

    for tab in tabs {
        let content = session.select(tab);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&content)?);
        } else {
            print!("{}", render::render_tab(content)?);
        }
    }

    if args.export {
        let dir = get_output_dir(input_path, args.output.as_ref());
        let mut target = DirectoryTarget::new(&dir);
        let artifact = exporter
            .export(&session.details().export)
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        artifact
            .deliver(&mut target)
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        if args.verbose {
            eprintln!(
                "Written to: {}",
                target.path_for(&artifact.filename).display()
            );
        }
    }

    Ok(())
}

/// Pick the record out of a response envelope. An empty pointer selects the
/// whole document.
fn select_record<'a>(document: &'a Value, pointer: &str) -> Result<&'a Value> {
    document
        .pointer(pointer)
        .ok_or_else(|| anyhow::anyhow!("Nothing found at pointer '{}'", pointer))
}

/// Determine the directory exports go to.
fn get_output_dir(input_path: &Path, output_dir: Option<&PathBuf>) -> PathBuf {
    match output_dir {
        Some(dir) => dir.clone(),
        None => input_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    }
}
