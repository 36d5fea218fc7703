//! Tool command construction.
//!
//! Each Go tool gets its own [`ToolCommand`] with the transformers that turn its
//! output into flymake lines:
//!
//! | tool             | stdout              | stderr      |
//! |------------------|---------------------|-------------|
//! | `go build`/`test`| passthrough         | passthrough |
//! | `go vet`         | passthrough         | severity    |
//! | `gofmt -d`       | diff (`fmt`)        | passthrough |
//! | `go tool fix`    | diff (`fix`)        | passthrough |

use crate::config::Config;
use crate::package::{is_test_file, PackageLookup};
use flymake_runner::ToolCommand;
use flymake_transform::LineTransformer;
use tracing::debug;

#[cfg(windows)]
const NULL_DEVICE: &str = "NUL";
#[cfg(not(windows))]
const NULL_DEVICE: &str = "/dev/null";

/// Returns the four tool commands for the configured file.
pub fn tool_commands(config: &Config, lookup: &impl PackageLookup) -> Vec<ToolCommand> {
    vec![
        build_command(config, lookup),
        vet_command(config),
        fmt_command(config),
        fix_command(config),
    ]
}

/// Builds the file's package, or its test binary for `_test.go` files.
///
/// If the file carries the flymake prefix, the original it shadows is left
/// out of the build. When the package cannot be listed only the single file
/// is built.
pub fn build_command(config: &Config, lookup: &impl PackageLookup) -> ToolCommand {
    let ignored = shadowed_file(config.file_name(), &config.prefix);
    let is_test = is_test_file(config.file.as_str());

    let mut args: Vec<String> = if is_test {
        // The test binary is written into the package directory.
        vec!["test".into(), "-c".into()]
    } else {
        vec!["build".into(), "-o".into(), NULL_DEVICE.into()]
    };

    let dir = config.package_dir();
    let command = ToolCommand::new("build", &config.tools.go);

    let command = match lookup.package_files(dir) {
        Ok(package) => {
            let mut files = package.go_files;
            if is_test {
                files.extend(package.test_go_files);
            }
            args.extend(files.into_iter().filter(|f| Some(f.as_str()) != ignored));
            command.current_dir(dir)
        }
        Err(error) => {
            debug!(%error, "package lookup failed, building single file");
            args.push(config.file.to_string());
            command
        }
    };

    debug!(?args, "go build arguments");
    command.args(args)
}

/// Runs `go vet`, marking its findings as warnings.
pub fn vet_command(config: &Config) -> ToolCommand {
    ToolCommand::new("vet", &config.tools.go)
        .args(["vet", config.file.as_str()])
        .stderr_transformer(LineTransformer::SeverityAnnotate)
}

/// Runs `gofmt -d` and turns the diff into warnings.
pub fn fmt_command(config: &Config) -> ToolCommand {
    ToolCommand::new("fmt", &config.tools.gofmt)
        .args(["-d", config.file.as_str()])
        .stdout_transformer(LineTransformer::diff("fmt"))
}

/// Runs `go tool fix -diff` and turns the diff into warnings.
pub fn fix_command(config: &Config) -> ToolCommand {
    ToolCommand::new("fix", &config.tools.go)
        .args(["tool", "fix", "-diff", config.file.as_str()])
        .stdout_transformer(LineTransformer::diff("fix"))
}

/// Returns the real file a prefixed flymake copy stands in for.
fn shadowed_file<'a>(file_name: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return None;
    }
    file_name.strip_prefix(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolPaths;
    use crate::package::{LookupError, PackageFiles};
    use camino::{Utf8Path, Utf8PathBuf};
    use pretty_assertions::assert_eq;

    struct FixedLookup(Option<PackageFiles>);

    impl PackageLookup for FixedLookup {
        fn package_files(&self, dir: &Utf8Path) -> Result<PackageFiles, LookupError> {
            self.0
                .clone()
                .ok_or_else(|| LookupError::NoGoFiles(dir.to_path_buf()))
        }
    }

    fn package() -> FixedLookup {
        FixedLookup(Some(PackageFiles {
            go_files: vec![
                "flymake_main.go".into(),
                "main.go".into(),
                "util.go".into(),
            ],
            test_go_files: vec!["main_test.go".into()],
        }))
    }

    fn config_for(file: &str) -> Config {
        Config {
            file: Utf8PathBuf::from(file),
            prefix: "flymake_".to_string(),
            debug: false,
            timeout: None,
            tools: ToolPaths {
                go: Utf8PathBuf::from("/usr/local/go/bin/go"),
                gofmt: Utf8PathBuf::from("/usr/local/go/bin/gofmt"),
            },
        }
    }

    #[test]
    fn test_build_excludes_shadowed_file() {
        let cmd = build_command(&config_for("app/flymake_main.go"), &package());
        assert_eq!(cmd.program().as_str(), "/usr/local/go/bin/go");
        assert_eq!(
            cmd.arguments(),
            ["build", "-o", NULL_DEVICE, "flymake_main.go", "util.go"]
        );
        assert_eq!(cmd.working_dir().map(Utf8Path::as_str), Some("app"));
    }

    #[test]
    fn test_build_without_prefix_keeps_all_files() {
        let cmd = build_command(&config_for("app/main.go"), &package());
        assert_eq!(
            cmd.arguments(),
            ["build", "-o", NULL_DEVICE, "flymake_main.go", "main.go", "util.go"]
        );
    }

    #[test]
    fn test_build_test_file() {
        let cmd = build_command(&config_for("app/main_test.go"), &package());
        assert_eq!(
            cmd.arguments(),
            ["test", "-c", "flymake_main.go", "main.go", "util.go", "main_test.go"]
        );
    }

    #[test]
    fn test_build_single_file_fallback() {
        let cmd = build_command(&config_for("scratch/flymake_x.go"), &FixedLookup(None));
        assert_eq!(
            cmd.arguments(),
            ["build", "-o", NULL_DEVICE, "scratch/flymake_x.go"]
        );
        assert!(cmd.working_dir().is_none());
    }

    #[test]
    fn test_empty_prefix_never_excludes() {
        let mut config = config_for("app/main.go");
        config.prefix.clear();
        let cmd = build_command(&config, &package());
        assert!(cmd.arguments().iter().any(|a| a == "main.go"));
    }

    #[test]
    fn test_transformers() {
        let config = config_for("main.go");
        let vet = vet_command(&config);
        assert_eq!(vet.arguments(), ["vet", "main.go"]);
        assert_eq!(vet.stdout(), &LineTransformer::Passthrough);
        assert_eq!(vet.stderr(), &LineTransformer::SeverityAnnotate);

        let fmt = fmt_command(&config);
        assert_eq!(fmt.program().as_str(), "/usr/local/go/bin/gofmt");
        assert_eq!(fmt.arguments(), ["-d", "main.go"]);
        assert_eq!(fmt.stdout(), &LineTransformer::diff("fmt"));
        assert_eq!(fmt.stderr(), &LineTransformer::Passthrough);

        let fix = fix_command(&config);
        assert_eq!(fix.arguments(), ["tool", "fix", "-diff", "main.go"]);
        assert_eq!(fix.stdout(), &LineTransformer::diff("fix"));
    }

    #[test]
    fn test_four_commands() {
        let names: Vec<String> = tool_commands(&config_for("main.go"), &package())
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names, ["build", "vet", "fmt", "fix"]);
    }

    #[test]
    fn test_shadowed_file() {
        assert_eq!(shadowed_file("flymake_a.go", "flymake_"), Some("a.go"));
        assert_eq!(shadowed_file("a.go", "flymake_"), None);
        assert_eq!(shadowed_file("a.go", ""), None);
    }
}
