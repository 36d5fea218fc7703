//! Run configuration.

use crate::cli::Args;
use camino::{Utf8Path, Utf8PathBuf};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable that turns on debug logging.
pub const DEBUG_ENV: &str = "GOFLYMAKE_DEBUG";

/// Everything a run needs, built once from the command line and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The Go file under inspection.
    pub file: Utf8PathBuf,
    /// Prefix of the temporary copy flymake writes next to the real file.
    pub prefix: String,
    /// Whether debug logging is enabled.
    pub debug: bool,
    /// Optional deadline for all tools together.
    pub timeout: Option<Duration>,
    /// Locations of the Go binaries.
    pub tools: ToolPaths,
}

impl Config {
    /// Builds the configuration from parsed arguments.
    pub fn from_args(args: &Args) -> Self {
        Self {
            file: args.file.clone(),
            prefix: args.prefix.clone(),
            debug: args.debug || read_env_bool(DEBUG_ENV).unwrap_or(false),
            timeout: args.timeout.map(Duration::from_secs),
            tools: ToolPaths::discover(),
        }
    }

    /// Returns the base name of the checked file.
    pub fn file_name(&self) -> &str {
        self.file.file_name().unwrap_or(self.file.as_str())
    }

    /// Returns the directory containing the checked file.
    pub fn package_dir(&self) -> &Utf8Path {
        match self.file.parent() {
            Some(dir) if !dir.as_str().is_empty() => dir,
            _ => Utf8Path::new("."),
        }
    }
}

/// Paths of the external Go tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub go: Utf8PathBuf,
    pub gofmt: Utf8PathBuf,
}

impl ToolPaths {
    /// Locates `go` and `gofmt` on `PATH` or under `$GOROOT/bin`.
    pub fn discover() -> Self {
        Self {
            go: resolve_tool("go"),
            gofmt: resolve_tool("gofmt"),
        }
    }
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            go: Utf8PathBuf::from("go"),
            gofmt: Utf8PathBuf::from("gofmt"),
        }
    }
}

/// Resolves a tool binary.
///
/// Falls back to the bare name so a missing tool surfaces as a spawn failure.
fn resolve_tool(name: &str) -> Utf8PathBuf {
    if let Ok(path) = which::which(name) {
        if let Ok(path) = Utf8PathBuf::try_from(path) {
            return path;
        }
    }

    if let Some(goroot) = std::env::var_os("GOROOT") {
        let candidate = PathBuf::from(goroot)
            .join("bin")
            .join(format!("{name}{}", std::env::consts::EXE_SUFFIX));
        if candidate.is_file() {
            if let Ok(path) = Utf8PathBuf::try_from(candidate) {
                return path;
            }
        }
    }

    Utf8PathBuf::from(name)
}

fn read_env_bool(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use std::fs;

    fn config_for(file: &str) -> Config {
        Config {
            file: Utf8PathBuf::from(file),
            prefix: "flymake_".to_string(),
            debug: false,
            timeout: None,
            tools: ToolPaths::default(),
        }
    }

    #[test]
    #[serial]
    fn test_from_args() {
        std::env::remove_var(DEBUG_ENV);
        let args = Args::parse_from(["goflymake-rs", "--timeout", "5", "src/app/flymake_main.go"]);
        let config = Config::from_args(&args);
        assert_eq!(config.file.as_str(), "src/app/flymake_main.go");
        assert_eq!(config.prefix, "flymake_");
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert!(!config.debug);
    }

    #[test]
    #[serial]
    fn test_debug_from_env() {
        std::env::set_var(DEBUG_ENV, "yes");
        let config = Config::from_args(&Args::parse_from(["goflymake-rs", "main.go"]));
        std::env::remove_var(DEBUG_ENV);
        assert!(config.debug);
    }

    #[test]
    fn test_file_parts() {
        let config = config_for("src/app/main.go");
        assert_eq!(config.file_name(), "main.go");
        assert_eq!(config.package_dir().as_str(), "src/app");

        let config = config_for("main.go");
        assert_eq!(config.file_name(), "main.go");
        assert_eq!(config.package_dir().as_str(), ".");
    }

    #[test]
    fn test_read_env_bool_values() {
        std::env::set_var("GOFLYMAKE_TEST_BOOL", "Off");
        assert_eq!(read_env_bool("GOFLYMAKE_TEST_BOOL"), Some(false));
        std::env::set_var("GOFLYMAKE_TEST_BOOL", "maybe");
        assert_eq!(read_env_bool("GOFLYMAKE_TEST_BOOL"), None);
        std::env::remove_var("GOFLYMAKE_TEST_BOOL");
        assert_eq!(read_env_bool("GOFLYMAKE_TEST_BOOL"), None);
    }

    #[test]
    fn test_missing_tool_keeps_bare_name() {
        assert_eq!(
            resolve_tool("goflymake-no-such-tool"),
            Utf8PathBuf::from("goflymake-no-such-tool")
        );
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_goroot_fallback() {
        let temp = tempfile::tempdir().unwrap();
        let bin = temp.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        fs::write(bin.join("goflymake-fake-vet"), "").unwrap();

        let previous = std::env::var_os("GOROOT");
        std::env::set_var("GOROOT", temp.path());
        let resolved = resolve_tool("goflymake-fake-vet");
        match previous {
            Some(value) => std::env::set_var("GOROOT", value),
            None => std::env::remove_var("GOROOT"),
        }

        assert_eq!(resolved.as_std_path(), bin.join("goflymake-fake-vet"));
    }
}
