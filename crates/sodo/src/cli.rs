use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use sodo_core::{ExtractionPipeline, ExtractorConfig, Field, TextNormalizer};

#[derive(Parser)]
#[command(
    name = "sodo",
    about = "Extract structured records from OCR'd Vietnamese land-title certificates",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize and extract one document from an OCR text file ('-' for stdin)
    Extract {
        /// Path to the recognized text of one document
        file: PathBuf,
        /// Print the full extraction output as JSON
        #[arg(long, conflicts_with = "context")]
        json: bool,
        /// Print the template placeholder map as JSON, for the renderer
        #[arg(long)]
        context: bool,
    },
    /// Repair OCR artifacts and canonicalize whitespace, print the result
    Normalize {
        /// Path to the recognized text ('-' for stdin)
        file: PathBuf,
    },
    /// List the default field catalog
    Fields,
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))
    }
}

pub fn run_extract(file: &Path, json: bool, context: bool) -> Result<()> {
    let text = read_input(file)?;
    let pipeline = ExtractionPipeline::new()?;
    let output = pipeline.run(&text);

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }
    if context {
        println!(
            "{}",
            serde_json::to_string_pretty(&output.extraction.template_context())?
        );
        return Ok(());
    }

    for field in Field::ALL {
        println!("{}: {}", field.title(), output.extraction.record.get(field));
    }
    for (i, person) in output.extraction.persons.iter().enumerate() {
        println!();
        println!("Người {}: {}", i + 1, person.name);
        println!("  CCCD: {}", person.id_no);
        println!("  Địa chỉ: {}", person.address);
    }
    eprintln!(
        "{} fields, {} person entries",
        output.stats.fields_found, output.stats.persons_found
    );
    Ok(())
}

pub fn run_normalize(file: &Path) -> Result<()> {
    let text = read_input(file)?;
    println!("{}", TextNormalizer::default().normalize(&text));
    Ok(())
}

pub fn run_fields() -> Result<()> {
    let config = ExtractorConfig::default();
    for rule in &config.fields {
        println!("{:<14} {}  [{}]", rule.field.as_str(), rule.label, rule.shape);
    }
    println!(
        "{:<14} {}  [token {} within {} chars]",
        Field::IssueNo.as_str(),
        config.issue_no.anchor,
        config.issue_no.token,
        config.issue_no.window
    );
    println!(
        "{:<14} ngày D tháng M năm YYYY  [DD/MM/YYYY]",
        Field::IssuedAt.as_str()
    );
    Ok(())
}
