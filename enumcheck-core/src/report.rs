//! Output formatting - plaintext and JSON.

use serde_json::json;

use crate::builder::AnalysisResult;

/// Renders diagnostics one per line as `file:line:column: message`.
pub fn render_plain(result: &AnalysisResult) -> String {
    let mut out = String::new();
    for diagnostic in &result.diagnostics {
        out.push_str(&diagnostic.to_string());
        out.push('\n');
    }
    out
}

fn summary(result: &AnalysisResult) -> String {
    let mut line = format!(
        "{} diagnostic{} in {} unit{}",
        result.diagnostics.len(),
        plural(result.diagnostics.len()),
        result.units,
        plural(result.units),
    );
    if result.suppressed > 0 {
        line.push_str(&format!(" ({} suppressed)", result.suppressed));
    }
    line
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Prints diagnostics and a summary to stdout, internal errors to stderr.
pub fn print_plain(result: &AnalysisResult) {
    print!("{}", render_plain(result));
    for err in &result.internal_errors {
        eprintln!("{}", err);
    }
    for path in &result.skipped {
        eprintln!("[WARN] skipped unreadable snapshot {}", path.display());
    }
    println!("{}", summary(result));
}

/// JSON document with diagnostics, facts, internal errors and skipped snapshots.
pub fn to_json(result: &AnalysisResult) -> serde_json::Value {
    let skipped: Vec<String> = result
        .skipped
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    json!({
        "diagnostics": result.diagnostics,
        "facts": result.facts,
        "internal_errors": result.internal_errors,
        "skipped": skipped,
    })
}

/// Prints the JSON document.
///
/// Falls back to the plain rendering if serialization fails.
pub fn print_json(result: &AnalysisResult) {
    match serde_json::to_string_pretty(&to_json(result)) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            print_plain(result);
        }
    }
}

/// Prints the fact rendering of every declaring unit.
pub fn print_facts(result: &AnalysisResult) {
    for (unit, facts) in &result.facts {
        println!("{}: {}", unit, facts);
    }
}
