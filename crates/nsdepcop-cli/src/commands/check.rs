//! Check command implementation.

use anyhow::{Context, Result};
use nsdepcop_core::DependencyAnalyzer;
use std::path::Path;

use super::input::DependencyList;
use crate::OutputFormat;

/// Runs the check command.
pub fn run(path: &Path, deps: &Path, format: OutputFormat) -> Result<()> {
    let content = std::fs::read_to_string(deps)
        .with_context(|| format!("Failed to read dependency list: {}", deps.display()))?;
    let list = DependencyList::parse(&content)
        .with_context(|| format!("Failed to parse dependency list: {}", deps.display()))?;

    let analyzer = DependencyAnalyzer::new(path);
    tracing::info!(
        "Checking {} type and {} assembly dependencies in {} ({})",
        list.types.len(),
        list.assemblies.len(),
        path.display(),
        analyzer.state()
    );

    let mut result = analyzer.analyze(&list.occurrences());
    result.extend(analyzer.analyze_assemblies(&list.assembly_dependencies()));
    result.issues.extend(analyzer.unused_allow_rule_issues());

    if let Some(validator) = analyzer.snapshot().validator() {
        for stats in validator.cache_statistics() {
            tracing::debug!(
                "{} cache: {} hits, {} misses ({:.1}% efficiency)",
                stats.name,
                stats.hit_count,
                stats.miss_count,
                stats.efficiency_percent()
            );
        }
    }

    super::output::print(&result, format)?;

    if result.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}
