//! Configuration file handling.
//!
//! This module handles loading, validating and merging configuration from
//! `.deadscan.toml` files. A `Config` is loaded once per run and handed to
//! the orchestrator by value; nothing mutates it afterwards.

use crate::error::ScanError;
use crate::report::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name looked up in the current directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = ".deadscan.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Options forwarded to the analysis routine.
    #[serde(default)]
    pub scan: ScanOptions,

    /// Report filtering settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// External analyzer settings.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Release check settings.
    #[serde(default)]
    pub update: UpdateConfig,
}

/// General run settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Resolve the project through the interactive guided setup.
    #[serde(default)]
    pub guided_setup: bool,

    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// File the rendered output is appended to.
    #[serde(default)]
    pub output_path: Option<String>,

    /// Fail the run when any result is reported.
    #[serde(default)]
    pub strict: bool,

    /// Only emit results, no informational output.
    #[serde(default)]
    pub quiet: bool,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl GeneralConfig {
    /// Log level implied by the quiet and verbose settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

/// Inclusion options consumed by the analysis routine, not by the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Treat all public declarations as used.
    #[serde(default)]
    pub retain_public: bool,

    /// Treat declarations accessible from Objective-C as used.
    #[serde(default)]
    pub retain_objc_accessible: bool,

    /// Targets to analyze. Empty means all.
    #[serde(default)]
    pub targets: Vec<String>,
}

/// Report filtering settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Only report declarations in files matching one of these globs.
    #[serde(default)]
    pub include: Vec<String>,

    /// Never report declarations in files matching one of these globs.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// External analyzer settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Executable producing a JSON array of scan results on stdout.
    #[serde(default)]
    pub command: Option<String>,

    /// Extra arguments passed before the generated ones.
    #[serde(default)]
    pub args: Vec<String>,
}

/// Release check settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateConfig {
    /// Check for a newer release while the scan runs.
    #[serde(default = "default_true")]
    pub check: bool,

    /// Latest-release endpoint.
    #[serde(default = "default_update_url")]
    pub url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_update_timeout")]
    pub timeout_seconds: u64,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            check: true,
            url: default_update_url(),
            timeout_seconds: default_update_timeout(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_update_url() -> String {
    "https://api.github.com/repos/deadscan/deadscan/releases/latest".to_string()
}

fn default_update_timeout() -> u64 {
    5
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ScanError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScanError::configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            ScanError::configuration(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Try to load configuration from the default location in `dir`.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default(dir: &Path) -> Result<Option<Self>, ScanError> {
        let default_path = dir.join(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(&default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Resolve the configuration for a run from the current directory.
    pub fn discover(path: Option<&Path>) -> Result<Self, ScanError> {
        Self::discover_in(path, Path::new("."))
    }

    /// Resolve the configuration for a run.
    ///
    /// An explicit path must exist. Without one, the default file in `dir`
    /// is used when present, otherwise defaults apply.
    pub fn discover_in(path: Option<&Path>, dir: &Path) -> Result<Self, ScanError> {
        if let Some(path) = path {
            tracing::info!("Loading config from: {}", path.display());
            return Self::load(path);
        }

        match Self::load_default(dir)? {
            Some(config) => {
                tracing::info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
                Ok(config)
            }
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(Config::default())
            }
        }
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<(), ScanError> {
        for pattern in self.report.include.iter().chain(&self.report.exclude) {
            if let Err(e) = glob::Pattern::new(pattern) {
                return Err(ScanError::configuration(format!(
                    "Invalid report pattern '{}': {}",
                    pattern, e
                )));
            }
        }

        if let Some(ref command) = self.analyzer.command {
            if command.trim().is_empty() {
                return Err(ScanError::configuration("Analyzer command must not be blank"));
            }
        }

        if self.general.quiet && self.general.verbose {
            return Err(ScanError::configuration(
                "general.quiet and general.verbose cannot both be set",
            ));
        }

        if self.update.timeout_seconds == 0 {
            return Err(ScanError::configuration(
                "Update check timeout must be at least 1 second",
            ));
        }

        Ok(())
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if args.setup {
            self.general.guided_setup = true;
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }
        if let Some(ref output_path) = args.output_path {
            self.general.output_path = Some(output_path.to_string_lossy().to_string());
        }
        if args.strict {
            self.general.strict = true;
        }
        if args.quiet {
            self.general.quiet = true;
            self.general.verbose = false;
        }
        if args.verbose {
            self.general.verbose = true;
            self.general.quiet = false;
        }

        if args.retain_public {
            self.scan.retain_public = true;
        }
        if args.retain_objc_accessible {
            self.scan.retain_objc_accessible = true;
        }
        if let Some(ref targets) = args.targets {
            self.scan.targets = targets.clone();
        }

        if let Some(ref include) = args.report_include {
            self.report.include = include.clone();
        }
        if let Some(ref exclude) = args.report_exclude {
            self.report.exclude = exclude.clone();
        }

        if args.skip_update_check {
            self.update.check = false;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.general.guided_setup);
        assert!(!config.general.strict);
        assert_eq!(config.general.format, OutputFormat::Text);
        assert!(config.general.output_path.is_none());
        assert!(config.update.check);
        assert_eq!(config.update.timeout_seconds, 5);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
format = "json"
output_path = "unused.log"
strict = true

[scan]
retain_public = true
targets = ["App", "Core"]

[report]
exclude = ["Tests/**"]

[analyzer]
command = "deadscan-engine"
args = ["--index-store", ".build/index"]

[update]
check = false
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.format, OutputFormat::Json);
        assert_eq!(config.general.output_path.as_deref(), Some("unused.log"));
        assert!(config.general.strict);
        assert!(config.scan.retain_public);
        assert_eq!(config.scan.targets, vec!["App", "Core"]);
        assert_eq!(config.report.exclude, vec!["Tests/**"]);
        assert_eq!(config.analyzer.command.as_deref(), Some("deadscan-engine"));
        assert!(!config.update.check);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let error = Config::discover(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(error, ScanError::Configuration(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[general\nstrict = ").unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(matches!(error, ScanError::Configuration(_)));
        assert!(error.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_discover_in_uses_default_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "[general]\nformat = \"csv\"\n",
        )
        .unwrap();

        let config = Config::discover_in(None, dir.path()).unwrap();
        assert_eq!(config.general.format, OutputFormat::Csv);
    }

    #[test]
    fn test_discover_in_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let config = Config::discover_in(None, dir.path()).unwrap();
        assert_eq!(config.general.format, OutputFormat::Text);
        assert!(config.update.check);
    }

    #[test]
    fn test_discover_in_prefers_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "[general]\nstrict = true\n").unwrap();
        let explicit = dir.path().join("ci.toml");
        std::fs::write(&explicit, "[general]\nformat = \"json\"\n").unwrap();

        let config = Config::discover_in(Some(&explicit), dir.path()).unwrap();
        assert_eq!(config.general.format, OutputFormat::Json);
        assert!(!config.general.strict);
    }

    #[test]
    fn test_discover_in_rejects_invalid_default_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "[general\n").unwrap();

        let error = Config::discover_in(None, dir.path()).unwrap_err();
        assert!(matches!(error, ScanError::Configuration(_)));
    }

    #[test]
    fn test_log_level_from_file() {
        let config: Config = toml::from_str("[general]\nverbose = true\n").unwrap();
        assert_eq!(config.general.log_level(), tracing::Level::DEBUG);

        let config: Config = toml::from_str("[general]\nquiet = true\n").unwrap();
        assert_eq!(config.general.log_level(), tracing::Level::ERROR);

        assert_eq!(Config::default().general.log_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_validate_rejects_quiet_and_verbose() {
        let config: Config = toml::from_str("[general]\nquiet = true\nverbose = true\n").unwrap();
        assert!(matches!(config.validate(), Err(ScanError::Configuration(_))));
    }

    #[test]
    fn test_merge_verbose_flag_overrides_file_quiet() {
        let mut config: Config = toml::from_str("[general]\nquiet = true\n").unwrap();
        let mut args = crate::cli::tests::make_args();
        args.verbose = true;

        config.merge_with_args(&args);

        assert!(config.general.verbose);
        assert!(!config.general.quiet);
        assert_eq!(config.general.log_level(), tracing::Level::DEBUG);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_default_absent() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_default(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_default_present() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "[general]\nstrict = true\n",
        )
        .unwrap();

        let config = Config::load_default(dir.path()).unwrap().unwrap();
        assert!(config.general.strict);
    }

    #[test]
    fn test_validate_rejects_bad_glob() {
        let mut config = Config::default();
        config.report.exclude = vec!["Sources/[".to_string()];

        let error = config.validate().unwrap_err();
        assert!(matches!(error, ScanError::Configuration(_)));
    }

    #[test]
    fn test_validate_rejects_blank_command_and_zero_timeout() {
        let mut config = Config::default();
        config.analyzer.command = Some("  ".to_string());
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.update.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        let mut args = crate::cli::tests::make_args();
        args.strict = true;
        args.format = Some(OutputFormat::Csv);
        args.report_exclude = Some(vec!["Generated/*".to_string()]);
        args.skip_update_check = true;

        config.merge_with_args(&args);

        assert!(config.general.strict);
        assert_eq!(config.general.format, OutputFormat::Csv);
        assert_eq!(config.report.exclude, vec!["Generated/*"]);
        assert!(!config.update.check);
        // Untouched by absent flags
        assert!(!config.general.guided_setup);
        assert!(config.report.include.is_empty());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[update]"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.update.timeout_seconds, 5);
    }
}
