//! Shared output formatting for analysis results.

use anyhow::Result;
use nsdepcop_core::{AnalysisResult, Severity};

use crate::OutputFormat;

/// Print analysis results in the specified format.
pub fn print(result: &AnalysisResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
    }
    Ok(())
}

fn print_text(result: &AnalysisResult) {
    let (errors, warnings, infos) = result.count_by_severity();

    for issue in &result.issues {
        let severity_indicator = match issue.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        match &issue.location {
            Some(location) => println!(
                "{} at {}:{}:{}",
                issue.code(),
                location.file.display(),
                location.line,
                location.column,
            ),
            None => println!("{}", issue.code()),
        }
        println!("  {}: {}", severity_indicator, issue.message);
        println!();
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} dependencies\x1b[0m",
        summary_color, errors, warnings, infos, result.dependencies_checked
    );
}

fn print_json(result: &AnalysisResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &AnalysisResult) {
    for issue in &result.issues {
        println!("{issue}");
    }
}
