use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use sheetforge_spec::{SchemaDocument, generate_schema_json_pretty};

/// Validate sheetforge schema documents.
#[derive(Parser)]
#[command(name = "schema-lint", version, about)]
struct Cli {
    /// Schema YAML files to validate.
    #[arg(required_unless_present = "emit_json_schema")]
    files: Vec<PathBuf>,

    /// Print the JSON schema for schema documents and exit.
    #[arg(long)]
    emit_json_schema: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.emit_json_schema {
        println!("{}", generate_schema_json_pretty());
        return Ok(());
    }

    let mut failures = 0usize;
    for path in &cli.files {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let document = SchemaDocument::from_yaml_str(&text)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        match document.validate() {
            Ok(()) => println!("{}: ok", path.display()),
            Err(err) => {
                failures += 1;
                eprintln!("{}: {err}", path.display());
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} documents failed validation", cli.files.len());
    }
    Ok(())
}
