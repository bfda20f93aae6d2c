//! Project resolution.
//!
//! A run targets exactly one `Project`, obtained either by identifying the
//! project in the working directory and validating it, or by a guided setup
//! that constructs and validates it in one step.

use crate::config::Config;
use crate::error::ScanError;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Build system of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    /// `*.xcworkspace` or `*.xcodeproj`
    Xcode,
    /// `Package.swift`
    SwiftPackage,
    /// `Cargo.toml`
    Cargo,
    /// Nothing recognisable was found.
    Unknown,
}

impl ProjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectKind::Xcode => "xcode",
            ProjectKind::SwiftPackage => "swift-package",
            ProjectKind::Cargo => "cargo",
            ProjectKind::Unknown => "unknown",
        }
    }

    /// Build tool that must be on `PATH` for the analysis to run.
    pub fn build_tool(&self) -> Option<&'static str> {
        match self {
            ProjectKind::Xcode => Some("xcodebuild"),
            ProjectKind::SwiftPackage => Some("swift"),
            ProjectKind::Cargo => Some("cargo"),
            ProjectKind::Unknown => None,
        }
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolved build context for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    root: PathBuf,
    kind: ProjectKind,
    manifest: Option<PathBuf>,
}

impl Project {
    pub fn new(root: PathBuf, kind: ProjectKind, manifest: Option<PathBuf>) -> Self {
        Self {
            root,
            kind,
            manifest,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn kind(&self) -> ProjectKind {
        self.kind
    }

    pub fn manifest(&self) -> Option<&Path> {
        self.manifest.as_deref()
    }

    /// Inspect the top level of `dir` for a known project manifest.
    ///
    /// Xcode workspaces win over Xcode projects, which win over Swift
    /// packages, which win over Cargo manifests. Never fails: a directory
    /// without a manifest yields `ProjectKind::Unknown`, which
    /// `validate_environment` rejects.
    pub fn identify(dir: &Path) -> Self {
        let mut workspace = None;
        let mut xcodeproj = None;
        let mut package = None;
        let mut cargo = None;

        let entries = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok());

        for entry in entries {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy();

            match path.extension().and_then(|e| e.to_str()) {
                Some("xcworkspace") if workspace.is_none() => {
                    workspace = Some(path.to_path_buf())
                }
                Some("xcodeproj") if xcodeproj.is_none() => xcodeproj = Some(path.to_path_buf()),
                _ if name == "Package.swift" => package = Some(path.to_path_buf()),
                _ if name == "Cargo.toml" => cargo = Some(path.to_path_buf()),
                _ => {}
            }
        }

        let (kind, manifest) = if let Some(found) = workspace.or(xcodeproj) {
            (ProjectKind::Xcode, Some(found))
        } else if let Some(found) = package {
            (ProjectKind::SwiftPackage, Some(found))
        } else if let Some(found) = cargo {
            (ProjectKind::Cargo, Some(found))
        } else {
            (ProjectKind::Unknown, None)
        };

        debug!("Identified {} project in {}", kind, dir.display());
        Self::new(dir.to_path_buf(), kind, manifest)
    }

    /// Check that the project can be analyzed from this environment.
    pub fn validate_environment(&self) -> Result<(), ScanError> {
        if !self.root.is_dir() {
            return Err(ScanError::environment(format!(
                "Project root is not a directory: {}",
                self.root.display()
            )));
        }

        let tool = self.kind.build_tool().ok_or_else(|| {
            ScanError::environment(format!(
                "No Xcode project, Swift package or Cargo manifest found in {}",
                self.root.display()
            ))
        })?;

        if let Some(ref manifest) = self.manifest {
            if !manifest.exists() {
                return Err(ScanError::environment(format!(
                    "Project manifest no longer exists: {}",
                    manifest.display()
                )));
            }
        }

        which::which(tool).map_err(|e| {
            ScanError::environment(format!(
                "'{}' is required for {} projects but was not found: {}",
                tool, self.kind, e
            ))
        })?;

        Ok(())
    }
}

/// Interactive flow that constructs and validates a project.
pub trait GuidedSetup {
    fn perform(&self, working_dir: &Path) -> Result<Project, ScanError>;
}

/// Guided setup asking for the project directory on stdin.
pub struct PromptSetup;

impl GuidedSetup for PromptSetup {
    fn perform(&self, working_dir: &Path) -> Result<Project, ScanError> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        prompt_for_project(&mut stdin.lock(), &mut stdout, working_dir)
    }
}

fn prompt_for_project(
    input: &mut impl BufRead,
    output: &mut impl Write,
    working_dir: &Path,
) -> Result<Project, ScanError> {
    let aborted = |e: io::Error| ScanError::environment(format!("Guided setup aborted: {}", e));

    let detected = Project::identify(working_dir);
    if detected.kind() != ProjectKind::Unknown {
        writeln!(
            output,
            "Detected a {} project in {}.",
            detected.kind(),
            working_dir.display()
        )
        .map_err(aborted)?;
    }

    write!(output, "Project directory [{}]: ", working_dir.display()).map_err(aborted)?;
    output.flush().map_err(aborted)?;

    let mut answer = String::new();
    input.read_line(&mut answer).map_err(aborted)?;

    let answer = answer.trim();
    let dir = if answer.is_empty() {
        working_dir.to_path_buf()
    } else {
        working_dir.join(answer)
    };

    let project = Project::identify(&dir);
    project.validate_environment()?;
    info!("Guided setup selected {} project at {}", project.kind(), dir.display());
    Ok(project)
}

/// How the project for a run is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    AutoIdentify,
    GuidedSetup,
}

impl Resolution {
    pub fn from_config(config: &Config) -> Self {
        if config.general.guided_setup {
            Resolution::GuidedSetup
        } else {
            Resolution::AutoIdentify
        }
    }

    /// Produce a validated project.
    pub fn resolve(
        &self,
        working_dir: &Path,
        guided: &dyn GuidedSetup,
    ) -> Result<Project, ScanError> {
        match self {
            // Guided setup validates the project it builds.
            Resolution::GuidedSetup => guided.perform(working_dir),
            Resolution::AutoIdentify => {
                let project = Project::identify(working_dir);
                project.validate_environment()?;
                Ok(project)
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::doubles::StubSetup;
    use super::*;
    use std::fs;

    #[test]
    fn test_identify_cargo() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Cargo.toml"), "[package]\n").unwrap();

        let project = Project::identify(dir.path());
        assert_eq!(project.kind(), ProjectKind::Cargo);
        assert_eq!(project.manifest(), Some(dir.path().join("Cargo.toml").as_path()));
    }

    #[test]
    fn test_identify_priority() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Cargo.toml"), "").unwrap();
        fs::write(dir.path().join("Package.swift"), "").unwrap();
        assert_eq!(Project::identify(dir.path()).kind(), ProjectKind::SwiftPackage);

        fs::create_dir(dir.path().join("App.xcodeproj")).unwrap();
        fs::create_dir(dir.path().join("App.xcworkspace")).unwrap();
        let project = Project::identify(dir.path());
        assert_eq!(project.kind(), ProjectKind::Xcode);
        assert!(project.manifest().unwrap().ends_with("App.xcworkspace"));
    }

    #[test]
    fn test_identify_ignores_nested_manifests() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("vendor")).unwrap();
        fs::write(dir.path().join("vendor").join("Cargo.toml"), "").unwrap();

        assert_eq!(Project::identify(dir.path()).kind(), ProjectKind::Unknown);
    }

    #[test]
    fn test_validate_unknown_project_fails() {
        let dir = tempfile::tempdir().unwrap();
        let error = Project::identify(dir.path()).validate_environment().unwrap_err();
        assert!(matches!(error, ScanError::EnvironmentValidation(_)));
    }

    #[test]
    fn test_validate_missing_manifest_fails() {
        let dir = tempfile::tempdir().unwrap();
        let project = Project::new(
            dir.path().to_path_buf(),
            ProjectKind::Cargo,
            Some(dir.path().join("Cargo.toml")),
        );

        let error = project.validate_environment().unwrap_err();
        assert!(error.to_string().contains("no longer exists"));
    }

    #[test]
    fn test_validate_missing_root_fails() {
        let project = Project::new(
            PathBuf::from("/nonexistent/deadscan/project"),
            ProjectKind::Cargo,
            None,
        );
        assert!(matches!(
            project.validate_environment(),
            Err(ScanError::EnvironmentValidation(_))
        ));
    }

    #[test]
    fn test_resolution_from_config() {
        let mut config = Config::default();
        assert_eq!(Resolution::from_config(&config), Resolution::AutoIdentify);

        config.general.guided_setup = true;
        assert_eq!(Resolution::from_config(&config), Resolution::GuidedSetup);
    }

    #[test]
    fn test_guided_resolution_uses_setup_only() {
        let dir = tempfile::tempdir().unwrap();
        let setup = StubSetup::succeeding(dir.path());

        let project = Resolution::GuidedSetup.resolve(dir.path(), &setup).unwrap();
        assert_eq!(project.kind(), ProjectKind::Cargo);
        assert_eq!(setup.calls.get(), 1);
    }

    #[test]
    fn test_auto_resolution_validates() {
        let dir = tempfile::tempdir().unwrap();
        let setup = StubSetup::succeeding(dir.path());

        let error = Resolution::AutoIdentify.resolve(dir.path(), &setup).unwrap_err();
        assert!(matches!(error, ScanError::EnvironmentValidation(_)));
        assert_eq!(setup.calls.get(), 0);
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_prompt_write_failure_is_environment_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut input = io::Cursor::new(b"\n".to_vec());

        let error = prompt_for_project(&mut input, &mut BrokenPipe, dir.path()).unwrap_err();

        assert!(matches!(error, ScanError::EnvironmentValidation(_)));
        assert!(error.to_string().contains("Guided setup aborted"));
    }

    #[test]
    fn test_prompt_accepts_default_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Cargo.toml"), "[package]\n").unwrap();

        let mut input = io::Cursor::new(b"\n".to_vec());
        let mut output = Vec::new();
        let result = prompt_for_project(&mut input, &mut output, dir.path());

        let prompt = String::from_utf8(output).unwrap();
        assert!(prompt.contains("Detected a cargo project"));
        match result {
            Ok(project) => assert_eq!(project.root(), dir.path()),
            // Only acceptable failure: cargo missing from PATH
            Err(e) => assert!(e.to_string().contains("'cargo' is required")),
        }
    }

    #[test]
    fn test_prompt_rejects_directory_without_project() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();

        let mut input = io::Cursor::new(b"empty\n".to_vec());
        let mut output = Vec::new();
        let error = prompt_for_project(&mut input, &mut output, dir.path()).unwrap_err();

        assert!(matches!(error, ScanError::EnvironmentValidation(_)));
        let prompt = String::from_utf8(output).unwrap();
        assert!(prompt.contains("Project directory ["));
    }
}
