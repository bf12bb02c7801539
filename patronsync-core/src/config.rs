//! Immutable run configuration.
//!
//! A [`SyncConfig`] is constructed exactly once at process start from CLI
//! flags and environment, then passed by parameter into every component —
//! no component reads ambient configuration directly.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::types::{BranchPolicy, MarkerSpec};

/// Default git author email for the roster-update commit.
pub const DEFAULT_GIT_EMAIL: &str = "actions@github.com";

/// Default name of the dedicated working branch.
pub const DEFAULT_BRANCH: &str = "chore/update-patrons-list";

/// Default name of the repository's main line.
pub const DEFAULT_BASE: &str = "main";

// ---------------------------------------------------------------------------
// Repository slug
// ---------------------------------------------------------------------------

/// An `owner/name` GitHub repository slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl FromStr for RepoSlug {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self {
                    owner: owner.to_owned(),
                    name: name.to_owned(),
                })
            }
            _ => Err(ConfigError::InvalidRepo {
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

// ---------------------------------------------------------------------------
// Sync configuration
// ---------------------------------------------------------------------------

/// Everything a run needs, fixed before the first side effect.
///
/// Secrets (the API token) are deliberately *not* part of this struct; they
/// travel straight from the environment to the gateway that needs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Roster endpoint URL.
    pub roster_url: String,
    /// Repository checkout the target files live in.
    pub workdir: PathBuf,
    /// Target files, relative to `workdir`.
    pub files: Vec<PathBuf>,
    /// Marker delimiters and missing-region policy.
    pub markers: MarkerSpec,
    /// Author email for the update commit.
    pub git_email: String,
    /// Dedicated working branch name.
    pub branch: String,
    /// Main-line branch the pull request targets.
    pub base: String,
    /// Working-branch preparation policy.
    pub branch_policy: BranchPolicy,
}

impl SyncConfig {
    /// Validate the parts of the configuration that must hold before any
    /// network or file activity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.files.is_empty() {
            return Err(ConfigError::NoTargetFiles);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Files-list input parsing
// ---------------------------------------------------------------------------

/// Parse the files-to-update input into a list of relative paths.
///
/// The input is a YAML sequence (the structured list format used by CI
/// workflow inputs); a plain newline-separated list is accepted as a
/// fallback. An empty result is a [`ConfigError::NoTargetFiles`].
pub fn parse_files_list(input: &str) -> Result<Vec<PathBuf>, ConfigError> {
    let files: Vec<PathBuf> = match serde_yaml::from_str::<Vec<String>>(input) {
        Ok(entries) => entries
            .into_iter()
            .map(|entry| PathBuf::from(entry.trim()))
            .filter(|path| !path.as_os_str().is_empty())
            .collect(),
        Err(_) => input
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .collect(),
    };

    if files.is_empty() {
        return Err(ConfigError::NoTargetFiles);
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_sequence_parses_to_paths() {
        let files = parse_files_list("- README.md\n- docs/SUPPORTERS.md\n").expect("parse");
        assert_eq!(
            files,
            vec![PathBuf::from("README.md"), PathBuf::from("docs/SUPPORTERS.md")]
        );
    }

    #[test]
    fn flow_style_yaml_sequence_parses() {
        let files = parse_files_list(r#"["README.md", "PATRONS.md"]"#).expect("parse");
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn newline_separated_fallback_parses() {
        let files = parse_files_list("README.md\n\n  docs/SUPPORTERS.md  \n").expect("parse");
        assert_eq!(
            files,
            vec![PathBuf::from("README.md"), PathBuf::from("docs/SUPPORTERS.md")]
        );
    }

    #[test]
    fn empty_input_is_a_config_error() {
        let err = parse_files_list("  \n ").expect_err("must fail");
        assert!(matches!(err, ConfigError::NoTargetFiles));
    }

    #[test]
    fn empty_yaml_sequence_is_a_config_error() {
        let err = parse_files_list("[]").expect_err("must fail");
        assert!(matches!(err, ConfigError::NoTargetFiles));
    }

    #[test]
    fn repo_slug_parses_owner_and_name() {
        let slug: RepoSlug = "octo/patrons".parse().expect("parse");
        assert_eq!(slug.owner, "octo");
        assert_eq!(slug.name, "patrons");
        assert_eq!(slug.to_string(), "octo/patrons");
    }

    #[test]
    fn repo_slug_rejects_malformed_values() {
        for value in ["octo", "/patrons", "octo/", "a/b/c", ""] {
            assert!(
                value.parse::<RepoSlug>().is_err(),
                "'{value}' should be rejected"
            );
        }
    }

    #[test]
    fn validate_rejects_empty_file_list() {
        let config = SyncConfig {
            roster_url: "https://example.test/roster".into(),
            workdir: PathBuf::from("."),
            files: vec![],
            markers: MarkerSpec {
                start: "<!-- patrons -->".into(),
                end: "<!-- /patrons -->".into(),
                fail_on_missing: true,
            },
            git_email: DEFAULT_GIT_EMAIL.into(),
            branch: DEFAULT_BRANCH.into(),
            base: DEFAULT_BASE.into(),
            branch_policy: BranchPolicy::Reuse,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NoTargetFiles)
        ));
    }
}
