//! publish::reconcile
//!
//! Create-or-adopt resolution of the remote repository.
//!
//! # Algorithm
//!
//! 1. `POST /user/repos` with the name and visibility.
//! 2. On success, the created repository is the handle.
//! 3. On 422 (name already taken on this account), `GET /repos/{owner}/{name}`
//!    and adopt what it returns.
//! 4. Anything else fails with [`PublishError::RemoteError`] carrying the
//!    status, or [`PublishError::AuthInvalid`] when the token itself was
//!    rejected (401).
//!
//! Running it twice with the same name yields the same handle.

use crate::core::types::{Credentials, RepoName, RepositoryHandle};
use crate::forge::{CreateRepoRequest, Forge, ForgeError, RemoteRepository};
use crate::ui::output::{self, Verbosity};

use super::PublishError;

/// Visibility and description for a newly created repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoSettings {
    /// Create as private
    pub private: bool,
    /// Description, omitted from the request when `None`
    pub description: Option<String>,
}

impl RepoSettings {
    /// The account defaults stored with the credentials.
    pub fn from_credentials(credentials: &Credentials) -> Self {
        let description = credentials.default_description.trim();
        Self {
            private: credentials.default_private,
            description: (!description.is_empty()).then(|| description.to_string()),
        }
    }
}

/// A resolved repository and whether this call created it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// The repository to push to
    pub handle: RepositoryHandle,
    /// `true` if created now, `false` if it already existed
    pub created: bool,
}

impl From<RemoteRepository> for RepositoryHandle {
    fn from(repo: RemoteRepository) -> Self {
        Self {
            name: repo.name,
            clone_url: repo.clone_url,
            web_url: repo.html_url,
        }
    }
}

/// Resolve `name` on the account behind `forge` to a repository handle.
///
/// `forge` must be bound to `credentials`' token; the fallback lookup uses
/// `credentials.username` as the owner.
pub async fn reconcile(
    forge: &dyn Forge,
    credentials: &Credentials,
    name: &RepoName,
    settings: &RepoSettings,
    verbosity: Verbosity,
) -> Result<Reconciled, PublishError> {
    let request = CreateRepoRequest {
        name: name.to_string(),
        private: settings.private,
        description: settings.description.clone(),
    };

    output::debug(
        format!(
            "creating {} repository '{}'",
            if settings.private { "private" } else { "public" },
            name
        ),
        verbosity,
    );

    match forge.create_repo(request).await {
        Ok(repo) => Ok(Reconciled {
            handle: repo.into(),
            created: true,
        }),
        Err(err) if err.is_name_conflict() => {
            output::debug(
                format!("'{}' already exists, looking it up", name),
                verbosity,
            );
            adopt(forge, credentials.owner(), name).await
        }
        Err(err) => Err(err.into()),
    }
}

async fn adopt(forge: &dyn Forge, owner: &str, name: &RepoName) -> Result<Reconciled, PublishError> {
    match forge.get_repo(owner, name.as_str()).await {
        Ok(repo) => Ok(Reconciled {
            handle: repo.into(),
            created: false,
        }),
        // Taken but not visible to us: likely a username mismatch
        Err(ForgeError::NotFound(_)) => Err(PublishError::RemoteError {
            status: Some(404),
            message: format!(
                "'{}' already exists but {}/{} could not be found; check the configured username",
                name, owner, name
            ),
        }),
        Err(err) => Err(err.into()),
    }
}
