//! Contentful Content Management API access
//!
//! The duplication engine only sees the [`ContentStore`] trait. This module
//! provides the HTTP implementation plus the retry and rate limiting it needs.

pub mod client;
pub mod constants;
pub mod manager;
pub mod models;
pub mod resilience;
pub mod store;

pub use client::ContentfulClient;
pub use manager::{ClientManager, ConnectionSettings};
pub use models::{Asset, ContentType, ContentTypeField, Entry, Environment, Fields, Link, LinkType};
pub use resilience::{RateLimitConfig, RateLimiter, ResilienceConfig, RetryConfig, RetryPolicy};
pub use store::ContentStore;
