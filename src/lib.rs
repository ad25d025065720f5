//! Recursive duplication of Contentful entries across environments and spaces.
//!
//! [`duplicate::run_job`] copies a set of root entries together with every
//! entry they reference, rewriting links so the copies point at each other.
//! The Content Management API is reached through [`api::ContentfulClient`];
//! anything implementing [`api::ContentStore`] can stand in for it.

pub mod api;
pub mod config;
pub mod duplicate;
pub mod error;

pub use error::{DuplicateError, DuplicateResult, StoreError, StoreResult};
