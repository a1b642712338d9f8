//! # Tenant Clients Core
//!
//! Core types for caching per-tenant cloud API clients.
//!
//! A controller that reconciles resources on behalf of many tenant projects
//! needs a client scoped to each resource's project. This crate hands out
//! those clients lazily: the first request for a project reads that project's
//! configuration, authenticates and builds a typed client; later requests
//! reuse it. Resources that are not tenant-scoped get a default client.
//!
//! ## Features
//!
//! - **Label-driven scoping**: [`PROJECT_ALIAS_LABEL`] selects the tenant
//! - **At most one client per tenant**: concurrent first requests construct once
//! - **Graceful degradation**: construction failures are logged and answered
//!   with the default client, never surfaced to the caller
//! - **Pluggable SDK**: [`ClientBuilder`] wraps whatever cloud SDK builds clients
//! - **File-backed configuration**: [`FileConfigLoader`] reads `<root>/<alias>.conf`
//! - **Statistics**: optional hit/miss/fallback counters (with `stats` feature)
//!
//! ## Module Organization
//!
//! - [`key`] - client kinds and cache keys
//! - [`metadata`] - resource labels and the project alias label
//! - [`config`] - tenant configuration files and loaders
//! - [`provider`] - the client construction capability
//! - [`error`] - configuration and construction errors
//! - `tenant_cache` - the per-kind tenant client cache
//! - `client_set` - one cache per kind behind a single handle
mod client_set;
mod tenant_cache;

pub mod config;
pub mod error;
pub mod key;
pub mod metadata;
pub mod provider;

#[cfg(feature = "stats")]
mod stats;

pub use client_set::{DefaultClients, TenantClients};
pub use config::{CloudConfig, ConfigLoader, FileConfigLoader, GlobalConfig};
pub use error::{BoxError, ClientError, ConfigError};
pub use key::{CacheKey, ClientKind};
pub use metadata::{Labeled, ObjectMeta, PROJECT_ALIAS_LABEL};
pub use provider::{Availability, ClientBuilder, EndpointOpts, USER_AGENT};
pub use tenant_cache::TenantClientCache;

#[cfg(feature = "stats")]
pub use stats::CacheStats;
