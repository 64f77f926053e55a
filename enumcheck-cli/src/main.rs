//! enumcheck CLI - closed-set discipline checker over program snapshots.
//!
//! Reads one snapshot file or every `*.json` snapshot under a directory,
//! prints findings as `file:line:column: message`, and exits with 1 when
//! anything was found.

use anyhow::Result;
use clap::Parser;

use enumcheck_core::{
    init_structured_logging, print_facts, print_json, print_plain, AnalysisResult, Enumcheck,
    OutputFormat,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Closed-set (enum) discipline checker")]
pub struct Cli {
    /// Snapshot file, or a directory searched for *.json snapshots
    #[arg(default_value = ".")]
    path: String,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Also print the closed types each unit declares
    #[arg(long)]
    facts: bool,

    /// Unit paths or patterns whose findings are not reported
    #[arg(long, num_args = 1..)]
    ignore: Vec<String>,

    /// Directive marker token (default: enumcheck)
    #[arg(long)]
    marker: Option<String>,

    /// Analyze units one at a time
    #[arg(long)]
    sequential: bool,
}

impl Cli {
    fn analyzer(&self) -> Enumcheck {
        let mut analyzer = Enumcheck::new(&self.path)
            .parallel(!self.sequential)
            .ignore_units(self.ignore.iter().cloned());
        if let Some(marker) = &self.marker {
            analyzer = analyzer.marker(marker.clone());
        }
        analyzer
    }

    /// `--json` wins; otherwise the config file decides.
    fn format(&self, result: &AnalysisResult) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            result.output_format.unwrap_or_default()
        }
    }
}

fn exit_code(result: &AnalysisResult) -> i32 {
    if result.has_diagnostics() {
        1
    } else {
        0
    }
}

fn main() -> Result<()> {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] enumcheck internal error: {}", info);
        eprintln!("[PANIC] The process will exit with code 2.");
        std::process::exit(2);
    }));

    // JSON to stderr, respects RUST_LOG
    init_structured_logging();

    let cli = Cli::parse();
    let result = cli.analyzer().analyze()?;

    match cli.format(&result) {
        OutputFormat::Json => print_json(&result),
        OutputFormat::Plain => print_plain(&result),
    }
    if cli.facts {
        print_facts(&result);
    }

    std::process::exit(exit_code(&result));
}
