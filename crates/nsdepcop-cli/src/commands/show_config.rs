//! Show-config command implementation.

use anyhow::Result;
use nsdepcop_core::{ConfigState, DependencyAnalyzer};
use std::fmt::Write;
use std::path::Path;

/// Runs the show-config command.
pub fn run(path: &Path) -> Result<()> {
    let analyzer = DependencyAnalyzer::new(path);
    print!("{}", render(&analyzer)?);
    Ok(())
}

/// Formats the effective state, contributing files and merged settings.
fn render(analyzer: &DependencyAnalyzer) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    let state = analyzer.state();

    writeln!(out, "Project: {}", analyzer.project_dir().display())?;
    writeln!(out, "State:   {state}")?;

    let files = analyzer.config_files();
    if !files.is_empty() {
        writeln!(out, "Files (most general first):")?;
        for file in &files {
            writeln!(out, "  {}", file.display())?;
        }
    }

    match &state {
        ConfigState::Enabled(config) => {
            writeln!(out, "Settings:")?;
            writeln!(
                out,
                "  child_can_depend_on_parent_implicitly = {}",
                config.child_can_depend_on_parent_implicitly()
            )?;
            writeln!(
                out,
                "  parent_can_depend_on_child_implicitly = {}",
                config.parent_can_depend_on_child_implicitly()
            )?;
            writeln!(out, "  max_issue_count = {}", config.max_issue_count())?;
            writeln!(
                out,
                "  dependency_issue_severity = {}",
                config.dependency_issue_severity()
            )?;
            writeln!(
                out,
                "  max_issue_count_severity = {}",
                config.max_issue_count_severity()
            )?;
            writeln!(
                out,
                "  check_assembly_dependencies = {}",
                config.check_assembly_dependencies()
            )?;
            let excluded: Vec<&str> = config.excluded_files().iter().map(|g| g.as_str()).collect();
            writeln!(out, "  excluded_files = {excluded:?}")?;

            writeln!(out, "Allowed ({}):", config.allow_rules().len())?;
            for allow in config.allow_rules() {
                if allow.visible_types.is_empty() {
                    writeln!(out, "  {}", allow.rule)?;
                } else {
                    writeln!(out, "  {} [{}]", allow.rule, allow.visible_types)?;
                }
            }
            writeln!(out, "Disallowed ({}):", config.disallow_rules().len())?;
            for rule in config.disallow_rules() {
                writeln!(out, "  {rule}")?;
            }
            let mut visible: Vec<_> = config.visible_types_by_namespace().iter().collect();
            visible.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
            writeln!(out, "Visible members ({}):", visible.len())?;
            for (namespace, types) in visible {
                writeln!(out, "  {namespace}: {types}")?;
            }
            writeln!(out, "Allowed assemblies ({}):", config.allowed_assembly_rules().len())?;
            for rule in config.allowed_assembly_rules() {
                writeln!(out, "  {rule}")?;
            }
            writeln!(
                out,
                "Disallowed assemblies ({}):",
                config.disallowed_assembly_rules().len()
            )?;
            for rule in config.disallowed_assembly_rules() {
                writeln!(out, "  {rule}")?;
            }
        }
        ConfigState::Error(error) => {
            writeln!(out, "Error:   {error}")?;
        }
        ConfigState::Disabled | ConfigState::NoConfig => {}
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsdepcop_core::config::CONFIG_FILE_NAME;
    use nsdepcop_core::MultiLevelConfigProvider;
    use tempfile::TempDir;

    fn render_dir(content: Option<&str>) -> String {
        let tmp = TempDir::new().unwrap();
        if let Some(content) = content {
            std::fs::write(tmp.path().join(CONFIG_FILE_NAME), content).unwrap();
        }
        let analyzer = DependencyAnalyzer::with_provider(
            MultiLevelConfigProvider::new(tmp.path()).with_max_depth(1),
        );
        render(&analyzer).unwrap()
    }

    #[test]
    fn shows_rules_of_enabled_config() {
        let out = render_dir(Some(
            "[[allowed]]\nfrom = \"App.*\"\nto = \"Lib\"\nvisible_types = [\"Api\"]\n\n[[disallowed]]\nfrom = \"App.Internal\"\nto = \"Lib\"\n",
        ));
        assert!(out.contains("State:   enabled"));
        assert!(out.contains("  App.* -> Lib [Api]"));
        assert!(out.contains("Disallowed (1):\n  App.Internal -> Lib"));
        assert!(out.contains("max_issue_count = 100"));
    }

    #[test]
    fn shows_missing_config() {
        let out = render_dir(None);
        assert!(out.contains("State:   no-config"));
        assert!(!out.contains("Files"));
    }

    #[test]
    fn shows_config_error() {
        let out = render_dir(Some("max_issue_count = -"));
        assert!(out.contains("State:   config-error"));
        assert!(out.contains("Error:"));
    }
}
