use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::error::{report, ClientError};
use crate::metadata::Labeled;
use crate::provider::{ClientBuilder, EndpointOpts, USER_AGENT};
use crate::{CacheKey, ClientKind};

#[cfg(feature = "stats")]
use crate::CacheStats;

/// Write-once holder for one tenant's client.
type Slot<C> = Arc<OnceCell<Arc<C>>>;

/// A lazily populated cache of per-tenant service clients of one kind.
///
/// Resources that carry a non-empty [`PROJECT_ALIAS_LABEL`](crate::PROJECT_ALIAS_LABEL)
/// get a client built from that project's own configuration; every other
/// resource gets the default client supplied at construction.
///
/// # Lifecycle
///
/// Create one cache per client kind at start-up and keep it (usually behind an
/// `Arc`) for the life of the process. Entries are only ever added: there is
/// no eviction and no invalidation.
///
/// # Failure policy
///
/// [`get`](Self::get) never fails. When a tenant client cannot be built
/// (missing or malformed configuration, authentication failure, API not
/// available, unsupported kind) the error is logged and the **default client
/// is returned instead**. The caller may therefore receive a client scoped to
/// the wrong project when a tenant is misconfigured. Failures are not cached,
/// so the next request for the same tenant retries from scratch.
///
/// # Thread Safety
///
/// Keys live in a [`DashMap`]; each key maps to a write-once slot
/// (`once_cell::sync::OnceCell`). A caller finds or inserts the slot under the
/// shard lock, releases the shard, then initializes the slot. Concurrent
/// callers for the same tenant block on that slot, so at most one client per
/// key is ever constructed and stored, while callers for other tenants proceed
/// without waiting. The default-client path takes no lock at all.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tenant_clients_core::{
///     BoxError, ClientBuilder, CloudConfig, ConfigError, EndpointOpts, GlobalConfig,
///     ObjectMeta, TenantClientCache,
/// };
///
/// #[derive(Debug, PartialEq)]
/// struct Client(String);
///
/// struct Builder;
///
/// impl ClientBuilder for Builder {
///     type Provider = String;
///     type Client = Client;
///
///     fn authenticate(&self, g: &GlobalConfig, _: &str) -> Result<String, BoxError> {
///         Ok(g.auth_url.clone())
///     }
///     fn compute(&self, p: &String, _: &EndpointOpts) -> Result<Client, BoxError> {
///         Ok(Client(format!("compute@{p}")))
///     }
///     fn network(&self, p: &String, _: &EndpointOpts) -> Result<Client, BoxError> {
///         Ok(Client(format!("network@{p}")))
///     }
///     fn load_balancer(&self, p: &String, _: &EndpointOpts) -> Result<Client, BoxError> {
///         Ok(Client(format!("lb@{p}")))
///     }
///     fn key_manager(&self, p: &String, _: &EndpointOpts) -> Result<Client, BoxError> {
///         Ok(Client(format!("secrets@{p}")))
///     }
/// }
///
/// let loader = |alias: &str| -> Result<CloudConfig, ConfigError> {
///     Ok(CloudConfig { global: GlobalConfig::new(format!("https://{alias}.example.com")) })
/// };
///
/// let cache = TenantClientCache::new(
///     "compute",
///     Arc::new(Client("default".to_string())),
///     Arc::new(Builder),
///     Arc::new(loader),
/// );
///
/// let plain = ObjectMeta::new("vm-1");
/// assert_eq!(*cache.get(&plain), Client("default".to_string()));
///
/// let tenant = ObjectMeta::new("vm-2").with_project_alias("acme");
/// assert_eq!(*cache.get(&tenant), Client("compute@https://acme.example.com".to_string()));
/// assert!(cache.contains("acme"));
/// ```
pub struct TenantClientCache<B: ClientBuilder> {
    kind: ClientKind,
    default_client: Arc<B::Client>,
    clients: DashMap<CacheKey, Slot<B::Client>>,
    builder: Arc<B>,
    loader: Arc<dyn ConfigLoader>,
    #[cfg(feature = "stats")]
    stats: CacheStats,
}

impl<B: ClientBuilder> TenantClientCache<B> {
    /// Creates an empty cache for `kind`.
    ///
    /// # Parameters
    ///
    /// * `kind` - Client kind selector, e.g. `"compute"` or [`ClientKind::Routes`]
    /// * `default_client` - Client returned for resources without a project alias
    ///   and whenever tenant construction fails
    /// * `builder` - Provider and typed client constructors
    /// * `loader` - Source of per-tenant configuration
    ///
    /// An unsupported kind is accepted but every tenant-scoped request will
    /// fall back to the default client.
    pub fn new(
        kind: impl Into<ClientKind>,
        default_client: Arc<B::Client>,
        builder: Arc<B>,
        loader: Arc<dyn ConfigLoader>,
    ) -> Self {
        let kind = kind.into();
        if !kind.is_supported() {
            tracing::warn!(
                kind = %kind,
                "tenant client cache created for an unknown client type; tenant-scoped requests will use the default client"
            );
        }

        Self {
            kind,
            default_client,
            clients: DashMap::new(),
            builder,
            loader,
            #[cfg(feature = "stats")]
            stats: CacheStats::new(),
        }
    }

    /// Returns the client for the tenant named by `meta`'s project alias
    /// label, or the default client.
    ///
    /// Never fails: see the failure policy on [`TenantClientCache`].
    pub fn get<M: Labeled + ?Sized>(&self, meta: &M) -> Arc<B::Client> {
        let Some(alias) = meta.project_alias() else {
            return Arc::clone(&self.default_client);
        };

        match self.try_get(alias) {
            Ok(client) => client,
            Err(err) => {
                tracing::error!(
                    alias,
                    kind = %self.kind,
                    error = %report(&err),
                    "failed to get client for project, using default client"
                );
                #[cfg(feature = "stats")]
                self.stats.record_fallback();
                Arc::clone(&self.default_client)
            }
        }
    }

    /// Returns the cached client for `alias`, constructing it on first use.
    ///
    /// Unlike [`get`](Self::get) this surfaces construction errors instead of
    /// falling back. Nothing is stored on failure.
    pub fn try_get(&self, alias: &str) -> Result<Arc<B::Client>, ClientError> {
        let key = CacheKey::new(self.kind.clone(), alias);

        let cached = self
            .clients
            .get(&key)
            .and_then(|slot| slot.get().map(Arc::clone));
        if let Some(client) = cached {
            #[cfg(feature = "stats")]
            self.stats.record_hit();
            return Ok(client);
        }

        let result = {
            let slot = Arc::clone(&*self.clients.entry(key.clone()).or_default());
            let mut constructed = false;
            let result = slot
                .get_or_try_init(|| {
                    constructed = true;
                    self.construct(alias).map(Arc::new)
                })
                .map(Arc::clone);

            #[cfg(feature = "stats")]
            {
                if constructed {
                    self.stats.record_miss();
                } else {
                    // Another caller finished construction while we waited.
                    self.stats.record_hit();
                }
            }
            #[cfg(not(feature = "stats"))]
            let _ = constructed;

            result
        };

        if result.is_err() {
            // Drop the empty slot unless a concurrent caller still holds it.
            self.clients
                .remove_if(&key, |_, slot| slot.get().is_none() && Arc::strong_count(slot) == 1);
        }

        result
    }

    /// Runs the per-tenant construction procedure once, without retries.
    fn construct(&self, alias: &str) -> Result<B::Client, ClientError> {
        tracing::debug!(alias, kind = %self.kind, "constructing tenant client");

        let config = self
            .loader
            .load(alias)
            .map_err(|source| ClientError::Config {
                alias: alias.to_string(),
                source,
            })?;

        let provider = self
            .builder
            .authenticate(&config.global, USER_AGENT)
            .map_err(|source| ClientError::Provider {
                alias: alias.to_string(),
                source,
            })?;

        let opts = EndpointOpts::from(&config.global);

        let client = match &self.kind {
            ClientKind::Compute => self.builder.compute(&provider, &opts),
            // Routes are managed through the networking API.
            ClientKind::Network | ClientKind::Routes => self.builder.network(&provider, &opts),
            ClientKind::LoadBalancer => self.builder.load_balancer(&provider, &opts),
            ClientKind::Secrets => self.builder.key_manager(&provider, &opts),
            ClientKind::Unknown(_) => {
                return Err(ClientError::UnknownKind {
                    kind: self.kind.clone(),
                })
            }
        };

        let client = client.map_err(|source| ClientError::Construct {
            kind: self.kind.clone(),
            alias: alias.to_string(),
            source,
        })?;

        tracing::debug!(
            alias,
            kind = %self.kind,
            region = %opts.region,
            availability = %opts.availability,
            "tenant client constructed"
        );
        Ok(client)
    }

    /// Returns the client kind this cache constructs.
    pub fn kind(&self) -> &ClientKind {
        &self.kind
    }

    /// Returns the client served to resources without a project alias and
    /// whenever tenant construction fails.
    pub fn default_client(&self) -> &Arc<B::Client> {
        &self.default_client
    }

    /// Number of constructed tenant clients.
    pub fn len(&self) -> usize {
        self.clients
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }

    /// Returns `true` if no tenant client has been constructed yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if a client for `alias` has been constructed.
    pub fn contains(&self, alias: &str) -> bool {
        self.clients
            .get(&CacheKey::new(self.kind.clone(), alias))
            .is_some_and(|slot| slot.get().is_some())
    }

    /// Keys of all constructed tenant clients, sorted.
    pub fn keys(&self) -> Vec<CacheKey> {
        let mut keys: Vec<CacheKey> = self
            .clients
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();
        keys
    }

    /// Returns the hit, miss and fallback counters of this cache.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::sync::Arc;
    /// # use tenant_clients_core::*;
    /// # struct Sdk;
    /// # impl ClientBuilder for Sdk {
    /// #     type Provider = ();
    /// #     type Client = ();
    /// #     fn authenticate(&self, _: &GlobalConfig, _: &str) -> Result<(), BoxError> { Ok(()) }
    /// #     fn compute(&self, _: &(), _: &EndpointOpts) -> Result<(), BoxError> { Ok(()) }
    /// #     fn network(&self, _: &(), _: &EndpointOpts) -> Result<(), BoxError> { Ok(()) }
    /// #     fn load_balancer(&self, _: &(), _: &EndpointOpts) -> Result<(), BoxError> { Ok(()) }
    /// #     fn key_manager(&self, _: &(), _: &EndpointOpts) -> Result<(), BoxError> { Ok(()) }
    /// # }
    /// let loader = |alias: &str| -> Result<CloudConfig, ConfigError> {
    ///     Ok(CloudConfig { global: GlobalConfig::new(format!("https://{alias}.example.com")) })
    /// };
    /// let cache = TenantClientCache::new("compute", Arc::new(()), Arc::new(Sdk), Arc::new(loader));
    ///
    /// let meta = ObjectMeta::new("vm").with_project_alias("acme");
    /// cache.get(&meta);
    /// cache.get(&meta);
    ///
    /// assert_eq!(cache.stats().misses(), 1);
    /// assert_eq!(cache.stats().hits(), 1);
    /// ```
    #[cfg(feature = "stats")]
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

impl<B: ClientBuilder> fmt::Debug for TenantClientCache<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TenantClientCache")
            .field("kind", &self.kind)
            .field("clients", &self.len())
            .finish_non_exhaustive()
    }
}
