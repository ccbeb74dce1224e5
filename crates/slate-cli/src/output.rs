//! CLI output styling for slate

use colored::{ColoredString, Colorize};
use slate::{OperationReport, Outcome};
use std::io::{self, BufRead, Write};

/// Prefix used for all slate output
pub fn prefix() -> ColoredString {
    "[slate]".truecolor(112, 128, 144)
}

/// Print a per-category report followed by its summary line.
pub fn print_report(operation: &str, report: &OperationReport) {
    for (category, outcome) in report.outcomes() {
        let rendered = match outcome {
            Outcome::Success => "ok".green(),
            Outcome::Skipped(reason) => format!("skipped ({reason})").truecolor(150, 150, 150),
            Outcome::Failed(err) => format!("failed ({err})").red(),
        };
        eprintln!("  {}  {}", category.to_string().white().bold(), rendered);
    }

    let summary = format!(
        "{operation}: {}/{} categories succeeded",
        report.succeeded(),
        report.attempted()
    );
    if report.overall_ok() {
        eprintln!("{} {}", prefix(), summary);
    } else {
        eprintln!("{} {}", prefix(), summary.red());
    }
    if let Some(identity) = report.identity() {
        eprintln!("{} backup identity: {}", prefix(), identity.to_string().white().bold());
    }
}

/// Ask the user for a yes/no confirmation on stderr, reading stdin.
pub fn confirm(question: &str) -> bool {
    eprint!("{} {} [y/N] ", prefix(), question);
    let _ = io::stderr().flush();

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes" | "YES")
}

/// Format a byte count as a human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
