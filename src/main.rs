//! IMD Care admin report renderer
//!
//! Renders one administrative report from a JSON request file:
//!
//! ```text
//! imd-report <request.json> [output-dir]
//! ```

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use imd_report::{write_report, ReportConfig, ReportRequest};

/// Load the report configuration from `IMD_REPORT_CONFIG` or use defaults
fn load_config() -> Result<ReportConfig, Box<dyn std::error::Error>> {
    match std::env::var("IMD_REPORT_CONFIG") {
        Ok(path) => {
            eprintln!("Config path: {}", path);
            Ok(ReportConfig::from_json_file(path)?)
        }
        Err(_) => Ok(ReportConfig::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries the JSON summary
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("imd_report=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let request_path = match args.next() {
        Some(path) => PathBuf::from(path),
        None => {
            eprintln!("Usage: imd-report <request.json> [output-dir]");
            std::process::exit(2);
        }
    };
    let output_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    let config = load_config()?;
    let request = ReportRequest::from_json_file(&request_path)?;

    let generated_at = chrono::Local::now().naive_local();
    let (path, report) = write_report(&request, &config, &output_dir, generated_at)?;

    eprintln!("Report written to {}", path.display());
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
