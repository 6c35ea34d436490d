//! DLT to CB5 converter - CLI tool for producing bounced-cheque batch XML.

use clap::Parser;
use dlt2cb5::convert::{convert, ConvertOptions};
use dlt2cb5::Result;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dlt2cb5_converter")]
#[command(about = "Convert a DLT bounced-cheque batch file to CB5 XML", long_about = None)]
struct Cli {
    /// Input DLT file path
    #[arg(short, long)]
    input: PathBuf,

    /// Output XML file path
    #[arg(short, long)]
    output: PathBuf,

    /// Optional XSD to validate the produced document against
    #[arg(long)]
    xsd: Option<PathBuf>,

    /// Optional postal reference source (SQL-like city/code dump)
    #[arg(long = "postal-ref")]
    postal_ref: Option<PathBuf>,

    /// Optional audit log for address-resolution decisions
    #[arg(long = "audit-log")]
    audit_log: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let report = convert(&ConvertOptions {
        input: cli.input,
        output: cli.output.clone(),
        xsd: cli.xsd,
        postal_ref: cli.postal_ref,
        audit_log: cli.audit_log,
    })?;

    if report.schema_valid {
        println!(
            "Conversion and validation successful: {} ({} records)",
            cli.output.display(),
            report.records
        );
    } else {
        println!(
            "Conversion completed with validation issues: {} ({} records)",
            cli.output.display(),
            report.records
        );
        for issue in &report.issues {
            eprintln!("  {}", issue);
        }
    }

    Ok(())
}
