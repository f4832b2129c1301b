//! forge
//!
//! Abstraction for the remote hosting service.
//!
//! # Architecture
//!
//! The `Forge` trait defines the three remote calls the publish workflow
//! needs: identify the token's account, create a repository, and look one
//! up. Commands use the [`create_forge`] factory function rather than
//! importing specific forge implementations directly.
//!
//! # Modules
//!
//! - `traits`: Core `Forge` trait and request/response types
//! - [`github`]: GitHub implementation using the REST API
//! - [`mock`]: Mock implementation for deterministic testing
//! - `factory`: Forge creation
//!
//! # Example
//!
//! ```ignore
//! use ghpublish::forge::{create_forge, CreateRepoRequest, ForgeOptions};
//!
//! let forge = create_forge(token, &ForgeOptions::default());
//! let repo = forge.create_repo(CreateRepoRequest {
//!     name: "demo1".to_string(),
//!     private: false,
//!     description: None,
//! }).await?;
//!
//! println!("Created {}", repo.html_url);
//! ```

mod factory;
pub mod github;
pub mod mock;
mod traits;

pub use factory::{create_forge, ForgeOptions, VALIDATION_TIMEOUT};
pub use traits::*;
