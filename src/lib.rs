//! # Tenant Clients
//!
//! A lazy, thread-safe cache of per-tenant cloud API clients for controllers
//! that act on behalf of many projects.
//!
//! ## Features
//!
//! - **Label-driven scoping**: resources labelled with
//!   `shared.salt.x5.ru/project-alias` get a client for that project
//! - **Lazy construction**: a tenant's client is built on first use and reused
//! - **At most one client per tenant**: concurrent first requests construct once
//! - **Never fails**: construction errors are logged and the default client is
//!   returned, so reconciliation keeps going
//! - **Append-only**: no eviction, no invalidation, no background work
//!
//! ## Quick Start
//!
//! Wrap your cloud SDK in a [`ClientBuilder`], point a [`FileConfigLoader`] at
//! the directory holding `<alias>.conf` files and create one cache per kind:
//!
//! ```rust
//! use std::sync::Arc;
//! use tenant_clients::{
//!     BoxError, ClientBuilder, EndpointOpts, FileConfigLoader, GlobalConfig, ObjectMeta,
//!     TenantClientCache,
//! };
//!
//! #[derive(Debug)]
//! struct ServiceClient {
//!     endpoint: String,
//! }
//!
//! struct Sdk;
//!
//! impl ClientBuilder for Sdk {
//!     type Provider = String;
//!     type Client = ServiceClient;
//!
//!     fn authenticate(&self, global: &GlobalConfig, _user_agent: &str) -> Result<String, BoxError> {
//!         Ok(global.auth_url.clone())
//!     }
//!     fn compute(&self, p: &String, o: &EndpointOpts) -> Result<ServiceClient, BoxError> {
//!         Ok(ServiceClient { endpoint: format!("{p}/compute/{}", o.region) })
//!     }
//!     fn network(&self, p: &String, o: &EndpointOpts) -> Result<ServiceClient, BoxError> {
//!         Ok(ServiceClient { endpoint: format!("{p}/network/{}", o.region) })
//!     }
//!     fn load_balancer(&self, p: &String, o: &EndpointOpts) -> Result<ServiceClient, BoxError> {
//!         Ok(ServiceClient { endpoint: format!("{p}/lb/{}", o.region) })
//!     }
//!     fn key_manager(&self, p: &String, o: &EndpointOpts) -> Result<ServiceClient, BoxError> {
//!         Ok(ServiceClient { endpoint: format!("{p}/secrets/{}", o.region) })
//!     }
//! }
//!
//! let default_client = Arc::new(ServiceClient { endpoint: "default".to_string() });
//! let cache = TenantClientCache::new(
//!     "compute",
//!     Arc::clone(&default_client),
//!     Arc::new(Sdk),
//!     Arc::new(FileConfigLoader::new("/nonexistent")),
//! );
//!
//! // No project alias: default client.
//! let meta = ObjectMeta::new("vm-1");
//! assert!(Arc::ptr_eq(&cache.get(&meta), &default_client));
//!
//! // Alias without a configuration file: logged, default client.
//! let meta = ObjectMeta::new("vm-2").with_project_alias("acme");
//! assert!(Arc::ptr_eq(&cache.get(&meta), &default_client));
//! assert!(cache.is_empty());
//! ```
//!
//! ## All Kinds at Once
//!
//! [`TenantClients`] bundles the compute, network, load-balancer, routes and
//! secrets caches behind one handle, sharing the builder and loader.
//!
//! ## Error Handling
//!
//! [`TenantClientCache::get`] always returns a client. Use
//! [`TenantClientCache::try_get`] with an explicit alias to inspect the
//! [`ClientError`] instead.

pub use tenant_clients_core::*;
