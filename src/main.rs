use std::env;
use std::process::ExitCode;

use log::error;
use nutriscan::{ProductScanner, ScanOutcome};

const USAGE: &str = "Usage: nutriscan <image-path> [--parse-only]\n       nutriscan --text <ocr-text> [--parse-only]";

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("{}", USAGE);
        return ExitCode::FAILURE;
    }

    let parse_only = args.iter().any(|a| a == "--parse-only");

    let mut builder = ProductScanner::builder();
    if let Some(pos) = args.iter().position(|a| a == "--text") {
        match args.get(pos + 1) {
            Some(text) => builder = builder.text(text),
            None => {
                eprintln!("{}", USAGE);
                return ExitCode::FAILURE;
            }
        }
    } else {
        // First non-flag argument is the image path
        match args.iter().find(|a| !a.starts_with("--")) {
            Some(path) => builder = builder.image(path),
            None => {
                eprintln!("{}", USAGE);
                return ExitCode::FAILURE;
            }
        }
    }

    if parse_only {
        builder = builder.parse_only();
    }

    match builder.build().await {
        Ok(ScanOutcome::Record(record)) => print_json(&record),
        Ok(ScanOutcome::Report(report)) => print_json(&report),
        Err(e) => {
            error!("Scan failed: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
