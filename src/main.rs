use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use pdf_image_census::config::ScanOptions;
use pdf_image_census::pipeline::doc_scanner::scan_document;
use pdf_image_census::report;

fn print_usage() {
    eprintln!("Usage: pdf_image_census [--json] [--extract-dir DIR] <input.pdf>");
    eprintln!("  Scan a PDF and report per-page image classification counts.");
}

fn main() -> ExitCode {
    // Scan diagnostics go to stderr; the report itself goes to stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return if args.is_empty() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        eprintln!("pdf_image_census {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let mut options = ScanOptions::default();
    let mut inputs: Vec<PathBuf> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => options.json = true,
            "--extract-dir" => match iter.next() {
                Some(dir) => options.extract_dir = Some(PathBuf::from(dir)),
                None => {
                    eprintln!("ERROR: --extract-dir requires a directory argument");
                    print_usage();
                    return ExitCode::FAILURE;
                }
            },
            other if other.starts_with('-') => {
                eprintln!("ERROR: Unknown option '{other}'");
                print_usage();
                return ExitCode::FAILURE;
            }
            other => inputs.push(PathBuf::from(other)),
        }
    }

    if inputs.len() != 1 {
        print_usage();
        return ExitCode::FAILURE;
    }
    let input = &inputs[0];

    if !options.json {
        println!("Beginning Document \"{}\"", input.display());
    }

    // Only an unopenable input is fatal. Malformed pages and operators
    // inside the document are logged during the scan and do not change
    // the exit status.
    let document_report = match scan_document(input, &options) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("ERROR: Failed to scan {}: {e}", input.display());
            return ExitCode::FAILURE;
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let written = if options.json {
        report::write_json(&document_report, &mut out)
    } else {
        report::write_text(&document_report, &mut out).map_err(Into::into)
    };
    if let Err(e) = written {
        eprintln!("ERROR: Failed to write report: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
