//! Init command implementation.

use anyhow::{bail, Context, Result};
use nsdepcop_core::config::CONFIG_FILE_NAME;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = r#"# nsdepcop configuration
#
# Config files are inherited: nsdepcop.toml files in parent folders apply
# too, and settings here override theirs. Rule lists are combined.

# Set to false to switch analysis off for this folder and below.
is_enabled = true

# A namespace may use its ancestors (App.Ui -> App) without a rule.
child_can_depend_on_parent_implicitly = true

# A namespace may use its descendants (App -> App.Ui) without a rule.
# parent_can_depend_on_child_implicitly = false

# Stop reporting after this many illegal dependencies.
max_issue_count = 100

# Severity of illegal dependencies and of the issue-limit notice:
# info, warning or error.
dependency_issue_severity = "warning"
# max_issue_count_severity = "warning"

# Also check assembly references against [[allowed-assembly]] rules.
# check_assembly_dependencies = false

# Source files to skip, relative to the project folder.
excluded_files = ["**/obj/**", "**/*.g.cs"]

# Pattern syntax:
#   App.Ui      exact namespace ("." is the global namespace)
#   App.?       exactly one more component
#   App.*       App and any number of components below it
#   /App\..+/   regular expression over the whole name
#
# The most specific matching allow rule wins; any matching disallow rule
# vetoes.

[[allowed]]
from = "*"
to = "System.*"

# [[allowed]]
# from = "App.Ui"
# to = "App.Services"
# visible_types = ["OrderService"]

# [[disallowed]]
# from = "App.Services.*"
# to = "App.Ui.*"

# [[visible-members]]
# of_namespace = "App.Services"
# types = ["OrderService", "UserService"]

# [[allowed-assembly]]
# from = "App.*"
# to = "App.Core"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let path = write_template(Path::new("."), force)?;

    println!("Created {}", path.display());
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE_NAME} to declare the allowed dependencies");
    println!("  2. Run: nsdepcop check --deps <dependencies.json>");

    Ok(())
}

/// Writes the template config into `dir`.
fn write_template(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn template_is_a_valid_config() {
        let config = nsdepcop_core::config::parse_config(DEFAULT_CONFIG, Path::new(CONFIG_FILE_NAME))
            .unwrap()
            .build();
        assert!(config.is_enabled());
        assert!(config.child_can_depend_on_parent_implicitly());
        assert_eq!(config.allow_rules().len(), 1);
        assert_eq!(config.excluded_files().len(), 2);
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE_NAME), "max_issue_count = 1").unwrap();

        assert!(write_template(tmp.path(), false).is_err());
        let kept = std::fs::read_to_string(tmp.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(kept, "max_issue_count = 1");

        write_template(tmp.path(), true).unwrap();
        let replaced = std::fs::read_to_string(tmp.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(replaced, DEFAULT_CONFIG);
    }
}
