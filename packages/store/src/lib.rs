//! # Mosaic Store
//!
//! Persistence for the site document, delegated to an external hosted
//! store. There is no server component of our own: the document lives as
//! a JSON file in a repository, and writes are compare-and-swap updates
//! keyed by the store's content hash.
//!
//! [`DocumentStore`] is the seam: [`GithubStore`] talks to the GitHub
//! contents API, [`MemoryStore`] backs tests with the same
//! compare-and-swap semantics.
//!
//! Failure policy is propagate-not-retry: every error surfaces to the
//! caller, nothing is retried or merged automatically.

mod client;
mod credentials;
mod errors;
mod github;
mod memory;

pub use client::{DocumentStore, VersionToken};
pub use credentials::Credentials;
pub use errors::StoreError;
pub use github::GithubStore;
pub use memory::MemoryStore;
