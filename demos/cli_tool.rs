//! CLI Tool Example
//!
//! Converts any supported input (.xlsx, .csv, .tsv) to a legacy `.xls` file.

use std::io;
use std::process;
use xlsretro::{ConverterBuilder, SheetSelector, XlsRetroError};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <input> <output.xls> [options]", args[0]);
        eprintln!("\nOptions:");
        eprintln!("  --sheet-index <n>    Select sheet by index (0-based)");
        eprintln!("  --sheet-name <name>  Select sheet by name");
        eprintln!("  --no-header          Treat the first row as data");
        eprintln!("  --compact            Write without indentation");
        eprintln!("\nExamples:");
        eprintln!("  {} report.xlsx report.xls", args[0]);
        eprintln!("  {} payments.csv payments.xls --compact", args[0]);
        eprintln!("  {} data.tsv - ", args[0]);
        process::exit(1);
    }

    let input_path = &args[1];
    let output_path = &args[2];

    let mut builder = ConverterBuilder::new();
    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--sheet-index" => {
                let Some(value) = args.get(i + 1) else {
                    eprintln!("Error: --sheet-index requires a value");
                    process::exit(1);
                };
                let index = value.parse::<usize>().unwrap_or_else(|_| {
                    eprintln!("Error: Invalid sheet index: {}", value);
                    process::exit(1);
                });
                builder = builder.with_sheet_selector(SheetSelector::Index(index));
                i += 2;
            }
            "--sheet-name" => {
                let Some(value) = args.get(i + 1) else {
                    eprintln!("Error: --sheet-name requires a value");
                    process::exit(1);
                };
                builder = builder.with_sheet_selector(SheetSelector::Name(value.clone()));
                i += 2;
            }
            "--no-header" => {
                builder = builder.with_header_row(false);
                i += 1;
            }
            "--compact" => {
                builder = builder.with_indent(0);
                i += 1;
            }
            other => {
                eprintln!("Error: Unknown option: {}", other);
                process::exit(1);
            }
        }
    }

    if let Err(e) = run(builder, input_path, output_path) {
        match e {
            XlsRetroError::UnsupportedFormat(_) => {
                eprintln!("Error: {}", e);
                eprintln!("Supported inputs: .xlsx, .csv, .tsv");
            }
            _ => eprintln!("Error: {}", e),
        }
        process::exit(1);
    }
}

fn run(builder: ConverterBuilder, input: &str, output: &str) -> Result<(), XlsRetroError> {
    let converter = builder.build()?;

    if output == "-" {
        converter.convert_path(input, io::stdout().lock())
    } else {
        converter.convert_path_to_file(input, output)?;
        eprintln!("✓ Converted {} -> {}", input, output);
        Ok(())
    }
}
