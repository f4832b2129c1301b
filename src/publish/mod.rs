//! publish
//!
//! The upload workflow: resolve the remote repository, then stage and push
//! the folder as a single commit.
//!
//! # Architecture
//!
//! - [`errors`] - The [`PublishError`] taxonomy
//! - [`reconcile`] - Create-or-adopt the remote repository
//! - [`workspace`] - Scoped temporary workspace and the filtered copy
//! - [`pipeline`] - The git steps from init to push
//!
//! [`Publisher`] ties them together. It takes credentials and a forge as
//! arguments and never prompts; the command layer supplies every input.
//!
//! # Order of checks
//!
//! Cheap local checks run before anything touches the network, so a bad
//! folder or a missing git never leaves a half-created repository:
//!
//! 1. Credentials are usable
//! 2. Source folder exists and is a directory
//! 3. Repository name is valid
//! 4. Source holds at least one file outside `.git*` entries
//! 5. Git is available
//! 6. Reconcile the remote repository
//! 7. Stage and push
//!
//! # Example
//!
//! ```ignore
//! use ghpublish::publish::{Publisher, UploadRequest};
//!
//! let forge = create_forge(&creds.token, &ForgeOptions::default());
//! let publisher = Publisher::new(forge.as_ref(), GitCli::new(), Verbosity::Normal);
//! let outcome = publisher.publish(&creds, &UploadRequest::new("./demo1")).await?;
//! println!("Uploaded: {}", outcome.handle.web_url);
//! ```

pub mod errors;
pub mod pipeline;
pub mod reconcile;
pub mod workspace;

pub use errors::PublishError;
pub use pipeline::{StagedCommit, StagingPipeline, INITIAL_COMMIT_MESSAGE, REMOTE_NAME};
pub use reconcile::{reconcile, Reconciled, RepoSettings};
pub use workspace::{SourceManifest, StagingWorkspace};

use std::path::{Path, PathBuf};

use crate::core::types::{BranchName, Credentials, RepoName, RepositoryHandle};
use crate::forge::Forge;
use crate::git::{CommitInfo, GitCli};
use crate::ui::output::{self, Verbosity};

/// One upload to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// Folder to publish
    pub source: PathBuf,
    /// Repository name; defaults to one derived from the folder name
    pub name: Option<String>,
    /// Visibility override; defaults to the stored preference
    pub private: Option<bool>,
    /// Description override; defaults to the stored description
    pub description: Option<String>,
    /// Branch to create and push
    pub branch: BranchName,
}

impl UploadRequest {
    /// Upload `source` with every setting at its default.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            name: None,
            private: None,
            description: None,
            branch: BranchName::main(),
        }
    }

    /// Use an explicit repository name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn settings(&self, credentials: &Credentials) -> RepoSettings {
        let mut settings = RepoSettings::from_credentials(credentials);
        if let Some(private) = self.private {
            settings.private = private;
        }
        if let Some(description) = &self.description {
            let description = description.trim();
            settings.description = (!description.is_empty()).then(|| description.to_string());
        }
        settings
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    /// The repository that received the push
    pub handle: RepositoryHandle,
    /// The single commit that was pushed
    pub commit: CommitInfo,
    /// Whether the repository was created by this upload
    pub created: bool,
}

/// Runs uploads against one forge.
pub struct Publisher<'a> {
    forge: &'a dyn Forge,
    pipeline: StagingPipeline,
    verbosity: Verbosity,
}

impl<'a> Publisher<'a> {
    /// Create a publisher over `forge`, running `git` for local steps.
    pub fn new(forge: &'a dyn Forge, git: GitCli, verbosity: Verbosity) -> Self {
        Self {
            forge,
            pipeline: StagingPipeline::new(git, verbosity),
            verbosity,
        }
    }

    /// Replace the staging pipeline (custom workspace root in tests).
    pub fn with_pipeline(mut self, pipeline: StagingPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Publish `request.source` using `credentials`.
    ///
    /// `credentials` must match the token the forge is bound to.
    pub async fn publish(
        &self,
        credentials: &Credentials,
        request: &UploadRequest,
    ) -> Result<UploadOutcome, PublishError> {
        if !credentials.is_usable() {
            return Err(PublishError::ConfigurationMissing);
        }

        let source = resolve_source(&request.source)?;
        let name = resolve_name(request.name.as_deref(), &source)?;
        output::debug(
            format!("publishing {} as '{}'", source.display(), name),
            self.verbosity,
        );

        let manifest = SourceManifest::scan(&source)
            .map_err(|e| PublishError::local_tool("populate", e.to_string()))?;
        if manifest.file_count() == 0 {
            return Err(PublishError::EmptySource(source));
        }

        self.pipeline.preflight()?;

        let reconciled = reconcile(
            self.forge,
            credentials,
            &name,
            &request.settings(credentials),
            self.verbosity,
        )
        .await?;
        output::debug(
            format!(
                "{} {}",
                if reconciled.created { "created" } else { "adopted" },
                reconciled.handle.web_url
            ),
            self.verbosity,
        );

        let staged = self.pipeline.stage_and_push(
            &reconciled.handle,
            &source,
            credentials,
            &request.branch,
        )?;

        Ok(UploadOutcome {
            handle: reconciled.handle,
            commit: staged.commit,
            created: reconciled.created,
        })
    }
}

/// Canonical path of an existing directory, or `SourceNotFound`.
fn resolve_source(source: &Path) -> Result<PathBuf, PublishError> {
    let canonical = source
        .canonicalize()
        .map_err(|_| PublishError::SourceNotFound(source.to_path_buf()))?;
    if !canonical.is_dir() {
        return Err(PublishError::SourceNotFound(source.to_path_buf()));
    }
    Ok(canonical)
}

/// The explicit name if given, else one suggested from the folder name.
pub fn resolve_name(explicit: Option<&str>, source: &Path) -> Result<RepoName, PublishError> {
    match explicit {
        Some(name) => Ok(RepoName::new(name)?),
        None => RepoName::suggest_for(source).ok_or_else(|| {
            PublishError::InvalidRepoName(format!(
                "cannot derive a repository name from '{}'; pass --name",
                source.display()
            ))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::mock::MockForge;
    use std::fs;
    use tempfile::TempDir;

    fn creds() -> Credentials {
        Credentials::new("octocat", "ghp_abc")
    }

    fn publisher(forge: &MockForge) -> Publisher<'_> {
        Publisher::new(forge, GitCli::new(), Verbosity::Quiet)
    }

    #[tokio::test]
    async fn unusable_credentials_are_configuration_missing() {
        let forge = MockForge::new("octocat");
        let source = TempDir::new().unwrap();

        let err = publisher(&forge)
            .publish(&Credentials::new("", "ghp_abc"), &UploadRequest::new(source.path()))
            .await
            .unwrap_err();

        assert_eq!(err, PublishError::ConfigurationMissing);
        assert!(forge.operations().is_empty());
    }

    #[tokio::test]
    async fn missing_source_makes_no_calls() {
        let forge = MockForge::new("octocat");
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");

        let err = publisher(&forge)
            .publish(&creds(), &UploadRequest::new(&missing))
            .await
            .unwrap_err();

        assert_eq!(err, PublishError::SourceNotFound(missing));
        assert!(forge.operations().is_empty());
    }

    #[tokio::test]
    async fn file_source_is_not_found() {
        let forge = MockForge::new("octocat");
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        let err = publisher(&forge)
            .publish(&creds(), &UploadRequest::new(&file))
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::SourceNotFound(_)));
    }

    #[tokio::test]
    async fn empty_source_makes_no_calls() {
        let forge = MockForge::new("octocat");
        let source = TempDir::new().unwrap();
        fs::write(source.path().join(".gitignore"), "target").unwrap();

        let err = publisher(&forge)
            .publish(&creds(), &UploadRequest::new(source.path()).with_name("demo1"))
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::EmptySource(_)));
        assert!(forge.operations().is_empty());
    }

    #[tokio::test]
    async fn invalid_name_makes_no_calls() {
        let forge = MockForge::new("octocat");
        let source = TempDir::new().unwrap();
        fs::write(source.path().join("readme.txt"), "hello").unwrap();

        let err = publisher(&forge)
            .publish(&creds(), &UploadRequest::new(source.path()).with_name("bad name"))
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::InvalidRepoName(_)));
        assert!(forge.operations().is_empty());
    }

    #[tokio::test]
    async fn missing_git_makes_no_calls() {
        let forge = MockForge::new("octocat");
        let source = TempDir::new().unwrap();
        fs::write(source.path().join("readme.txt"), "hello").unwrap();

        let publisher = Publisher::new(
            &forge,
            GitCli::with_program("/nonexistent/bin/git"),
            Verbosity::Quiet,
        );
        let err = publisher
            .publish(&creds(), &UploadRequest::new(source.path()).with_name("demo1"))
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::LocalToolError { .. }));
        assert!(forge.operations().is_empty());
    }

    #[test]
    fn request_overrides_stored_settings() {
        let mut stored = creds();
        stored.default_private = true;
        stored.default_description = "stored".into();

        let mut request = UploadRequest::new("/tmp/demo1");
        assert_eq!(
            request.settings(&stored),
            RepoSettings {
                private: true,
                description: Some("stored".into())
            }
        );

        request.private = Some(false);
        request.description = Some("  ".into());
        assert_eq!(request.settings(&stored), RepoSettings::default());
    }

    #[test]
    fn name_resolution() {
        assert_eq!(
            resolve_name(None, Path::new("/home/me/My Project"))
                .unwrap()
                .as_str(),
            "My-Project"
        );
        assert_eq!(
            resolve_name(Some("demo1"), Path::new("/ignored"))
                .unwrap()
                .as_str(),
            "demo1"
        );
        assert!(resolve_name(None, Path::new("/")).is_err());
    }
}
