//! forge::mock
//!
//! Mock forge implementation for deterministic testing.
//!
//! # Design
//!
//! The mock forge provides a deterministic implementation of the `Forge` trait
//! for use in tests. It stores repositories in memory, behaves like GitHub on
//! name conflicts (HTTP 422), records every call, and allows configuring
//! failure scenarios.
//!
//! Clone URLs default to `https://github.com/<owner>/<name>.git`; tests that
//! need a real push target can install a URL factory pointing at a local bare
//! repository.
//!
//! # Example
//!
//! ```
//! use ghpublish::forge::mock::MockForge;
//! use ghpublish::forge::{CreateRepoRequest, Forge};
//!
//! # tokio_test::block_on(async {
//! let forge = MockForge::new("octocat");
//!
//! let repo = forge.create_repo(CreateRepoRequest {
//!     name: "demo1".to_string(),
//!     private: false,
//!     description: None,
//! }).await.unwrap();
//! assert_eq!(repo.html_url, "https://github.com/octocat/demo1");
//!
//! // Creating it again conflicts, like GitHub does
//! let again = forge.create_repo(CreateRepoRequest {
//!     name: "demo1".to_string(),
//!     private: false,
//!     description: None,
//! }).await;
//! assert!(again.unwrap_err().is_name_conflict());
//! # });
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::traits::{AuthenticatedUser, CreateRepoRequest, Forge, ForgeError, RemoteRepository};

/// Builds a clone URL from `(owner, name)`.
pub type CloneUrlFn = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

/// Mock forge for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Clone)]
pub struct MockForge {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockForgeInner>>,
    /// Clone URL factory.
    clone_url: CloneUrlFn,
}

impl std::fmt::Debug for MockForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockForge")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

/// Internal mutable state.
#[derive(Debug)]
struct MockForgeInner {
    /// Login the mock token authenticates as.
    login: String,
    /// Stored repositories by `(owner, name)`.
    repos: HashMap<(String, String), RemoteRepository>,
    /// Method to fail on (for testing error paths).
    fail_on: Vec<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail current_user with the given error.
    CurrentUser(ForgeError),
    /// Fail create_repo with the given error.
    CreateRepo(ForgeError),
    /// Fail get_repo with the given error.
    GetRepo(ForgeError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    CurrentUser,
    CreateRepo {
        name: String,
        private: bool,
        description: Option<String>,
    },
    GetRepo {
        owner: String,
        name: String,
    },
}

impl MockForge {
    /// Create a new mock forge whose token authenticates as `login`.
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockForgeInner {
                login: login.into(),
                repos: HashMap::new(),
                fail_on: Vec::new(),
                operations: Vec::new(),
            })),
            clone_url: Arc::new(|owner, name| format!("https://github.com/{}/{}.git", owner, name)),
        }
    }

    /// Use a custom clone URL for every repository created or seeded afterwards.
    pub fn with_clone_url(
        mut self,
        factory: impl Fn(&str, &str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.clone_url = Arc::new(factory);
        self
    }

    /// Seed a pre-existing repository owned by `owner`.
    pub fn with_repo(self, owner: &str, name: &str) -> Self {
        let repo = self.build_repo(owner, name, false);
        self.lock()
            .repos
            .insert((owner.to_string(), name.to_string()), repo);
        self
    }

    /// Configure the mock to fail on a specific operation.
    ///
    /// # Example
    ///
    /// ```
    /// use ghpublish::forge::mock::{MockForge, FailOn};
    /// use ghpublish::forge::ForgeError;
    ///
    /// let forge = MockForge::new("octocat")
    ///     .fail_on(FailOn::CreateRepo(ForgeError::RateLimited));
    /// ```
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.lock().fail_on.push(fail_on);
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        self.lock().fail_on.clear();
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.lock().operations.clone()
    }

    /// Clear recorded operations.
    pub fn clear_operations(&self) {
        self.lock().operations.clear();
    }

    /// Get the count of stored repositories.
    pub fn repo_count(&self) -> usize {
        self.lock().repos.len()
    }

    /// Get a stored repository (for test verification).
    pub fn repo(&self, owner: &str, name: &str) -> Option<RemoteRepository> {
        self.lock()
            .repos
            .get(&(owner.to_string(), name.to_string()))
            .cloned()
    }

    fn lock(&self) -> MutexGuard<'_, MockForgeInner> {
        // A panicking test thread must not hide the state from later assertions
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn build_repo(&self, owner: &str, name: &str, private: bool) -> RemoteRepository {
        RemoteRepository {
            name: name.to_string(),
            owner: owner.to_string(),
            clone_url: (self.clone_url)(owner, name),
            html_url: format!("https://github.com/{}/{}", owner, name),
            private,
        }
    }

    fn record(&self, op: MockOperation) {
        self.lock().operations.push(op);
    }

    /// Check if we should fail and return the error if so.
    fn check_fail(&self, expected: &str) -> Option<ForgeError> {
        self.lock().fail_on.iter().find_map(|f| match f {
            FailOn::CurrentUser(e) if expected == "current_user" => Some(e.clone()),
            FailOn::CreateRepo(e) if expected == "create_repo" => Some(e.clone()),
            FailOn::GetRepo(e) if expected == "get_repo" => Some(e.clone()),
            _ => None,
        })
    }
}

#[async_trait]
impl Forge for MockForge {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn current_user(&self) -> Result<AuthenticatedUser, ForgeError> {
        self.record(MockOperation::CurrentUser);

        if let Some(err) = self.check_fail("current_user") {
            return Err(err);
        }

        Ok(AuthenticatedUser {
            login: self.lock().login.clone(),
        })
    }

    async fn create_repo(
        &self,
        request: CreateRepoRequest,
    ) -> Result<RemoteRepository, ForgeError> {
        self.record(MockOperation::CreateRepo {
            name: request.name.clone(),
            private: request.private,
            description: request.description.clone(),
        });

        if let Some(err) = self.check_fail("create_repo") {
            return Err(err);
        }

        let owner = self.lock().login.clone();
        let key = (owner.clone(), request.name.clone());
        if self.lock().repos.contains_key(&key) {
            return Err(ForgeError::ApiError {
                status: 422,
                message: "Repository creation failed. (name already exists on this account)"
                    .into(),
            });
        }

        let repo = self.build_repo(&owner, &request.name, request.private);
        self.lock().repos.insert(key, repo.clone());
        Ok(repo)
    }

    async fn get_repo(&self, owner: &str, name: &str) -> Result<RemoteRepository, ForgeError> {
        self.record(MockOperation::GetRepo {
            owner: owner.to_string(),
            name: name.to_string(),
        });

        if let Some(err) = self.check_fail("get_repo") {
            return Err(err);
        }

        self.lock()
            .repos
            .get(&(owner.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| ForgeError::NotFound("Not Found".into()))
    }
}
