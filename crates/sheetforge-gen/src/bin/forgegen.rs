use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sheetforge_gen::{OperationContext, generate_exports_list, generate_operations_codes};
use sheetforge_spec::SchemaDocument;

/// Generate spreadsheet data-access code from a feature schema.
#[derive(Parser)]
#[command(name = "forgegen", version, about)]
struct Cli {
    /// Schema YAML document describing the feature.
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Feature name; required when no schema is given, otherwise taken
    /// from the schema.
    #[arg(long)]
    feature: Option<String>,

    /// Named range to read records from instead of the schema data range.
    #[arg(long)]
    range_name: Option<String>,

    /// Spreadsheet id to open; defaults to the active spreadsheet.
    #[arg(long)]
    spreadsheet_id: Option<String>,

    /// Print the export list instead of function bodies.
    #[arg(long)]
    exports: bool,

    /// Operation ids to generate.
    #[arg(required = true)]
    operations: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.exports {
        println!("{}", generate_exports_list(&cli.operations)?);
        return Ok(());
    }

    let mut ctx = match &cli.schema {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let document = SchemaDocument::from_yaml_str(&text)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            document.validate()?;
            let feature = cli.feature.clone().unwrap_or_else(|| document.feature.name.clone());
            OperationContext::new(&feature).with_schema(document.feature)
        }
        None => {
            let feature = cli
                .feature
                .clone()
                .context("--feature is required when no --schema is given")?;
            OperationContext::new(&feature)
        }
    };
    if let Some(range_name) = &cli.range_name {
        ctx = ctx.with_range_name(range_name.clone());
    }
    if let Some(id) = &cli.spreadsheet_id {
        ctx = ctx.with_custom_param("spreadsheetId", id.clone());
    }

    let codes = generate_operations_codes(&cli.operations, &ctx)?;
    println!("{}", codes.join("\n"));
    Ok(())
}
