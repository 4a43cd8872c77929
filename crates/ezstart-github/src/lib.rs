//! GitHub Actions client for ezstart
//!
//! Implements `AutomationClient`: repository secrets (public key fetch,
//! RSA-OAEP encryption, upload) and `workflow_dispatch` triggers.

pub mod client;
pub mod crypto;
pub mod error;
pub mod secrets;
pub mod workflow;

pub use client::{GITHUB_API_BASE, GithubClient};
pub use crypto::encrypt_secret;
pub use error::{GithubError, Result};
pub use secrets::RepoPublicKey;
