use std::path::PathBuf;

use anyhow::{bail, Context, Error, Result};
use class_id::{compute_contract_class, load_contract_artifact_from_path, ClassIdOptions};
use class_id_common::Fr;
use clap::{Parser, ValueHint};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Compute the class ID of a compiled contract artifact",
    long_about = None
)]
struct Args {
    /// Path to the contract artifact (processed or raw compiler output, JSON)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    artifact: PathBuf,

    /// Class ID the artifact is expected to produce; fails on mismatch
    #[arg(short, long, value_name = "HEX")]
    expected: Option<String>,

    /// Hash on the calling thread only
    #[arg(long)]
    sequential: bool,

    /// Capacity of the packed public bytecode, in field elements
    #[arg(long, value_name = "N")]
    max_bytecode_fields: Option<usize>,

    /// Print the class ID and its preimage as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn options(&self) -> ClassIdOptions {
        let mut options = ClassIdOptions {
            parallel: !self.sequential,
            ..Default::default()
        };
        if let Some(max) = self.max_bytecode_fields {
            options.max_packed_public_bytecode_fields = max;
        }
        options
    }
}

fn main() -> Result<(), Error> {
    let args = Args::parse();
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let expected = args
        .expected
        .as_deref()
        .map(Fr::from_hex)
        .transpose()
        .context("Invalid --expected class ID")?;

    let artifact = load_contract_artifact_from_path(&args.artifact)
        .with_context(|| format!("Error loading artifact '{}'", args.artifact.display()))?;

    let class = compute_contract_class(&artifact, &args.options())
        .with_context(|| format!("Failed to compute class ID of '{}'", artifact.name))?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&class).context("Failed to serialize class ID")?
        );
    } else {
        println!("{class}");
    }

    if let Some(expected) = expected {
        if expected != class.id {
            bail!("Class ID mismatch: expected {expected}, computed {}", class.id);
        }
        if !args.json {
            println!("Class ID matches expected value");
        }
    }

    Ok(())
}
