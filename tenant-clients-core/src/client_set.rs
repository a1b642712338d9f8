use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::metadata::Labeled;
use crate::provider::ClientBuilder;
use crate::{ClientKind, TenantClientCache};

/// Default clients, one per kind, used for resources without a project alias.
///
/// Routes are served by the networking API, so [`DefaultClients::new`] reuses
/// the network client as the routes default.
#[derive(Debug)]
pub struct DefaultClients<C> {
    pub compute: Arc<C>,
    pub network: Arc<C>,
    pub load_balancer: Arc<C>,
    pub routes: Arc<C>,
    pub secrets: Arc<C>,
}

impl<C> DefaultClients<C> {
    /// Default clients per kind. Routes share the network default.
    pub fn new(compute: Arc<C>, network: Arc<C>, load_balancer: Arc<C>, secrets: Arc<C>) -> Self {
        Self {
            compute,
            routes: Arc::clone(&network),
            network,
            load_balancer,
            secrets,
        }
    }
}

impl<C> Clone for DefaultClients<C> {
    fn clone(&self) -> Self {
        Self {
            compute: Arc::clone(&self.compute),
            network: Arc::clone(&self.network),
            load_balancer: Arc::clone(&self.load_balancer),
            routes: Arc::clone(&self.routes),
            secrets: Arc::clone(&self.secrets),
        }
    }
}

/// One [`TenantClientCache`] per client kind, sharing a builder and loader.
///
/// This is what a controller typically holds: it is created once at start-up
/// and consulted for every reconciled resource.
///
/// Each kind keeps its own entries. In particular network and routes clients
/// for the same tenant are built and cached separately even though both come
/// from the networking constructor.
pub struct TenantClients<B: ClientBuilder> {
    compute: TenantClientCache<B>,
    network: TenantClientCache<B>,
    load_balancer: TenantClientCache<B>,
    routes: TenantClientCache<B>,
    secrets: TenantClientCache<B>,
}

impl<B: ClientBuilder> TenantClients<B> {
    /// Creates one cache per supported kind, all sharing `builder` and `loader`.
    pub fn new(
        defaults: DefaultClients<B::Client>,
        builder: Arc<B>,
        loader: Arc<dyn ConfigLoader>,
    ) -> Self {
        let cache = |kind: ClientKind, default_client: Arc<B::Client>| {
            TenantClientCache::new(kind, default_client, Arc::clone(&builder), Arc::clone(&loader))
        };

        Self {
            compute: cache(ClientKind::Compute, defaults.compute),
            network: cache(ClientKind::Network, defaults.network),
            load_balancer: cache(ClientKind::LoadBalancer, defaults.load_balancer),
            routes: cache(ClientKind::Routes, defaults.routes),
            secrets: cache(ClientKind::Secrets, defaults.secrets),
        }
    }

    /// Compute client for `meta`.
    pub fn compute<M: Labeled + ?Sized>(&self, meta: &M) -> Arc<B::Client> {
        self.compute.get(meta)
    }

    /// Network client for `meta`.
    pub fn network<M: Labeled + ?Sized>(&self, meta: &M) -> Arc<B::Client> {
        self.network.get(meta)
    }

    /// Load-balancer client for `meta`.
    pub fn load_balancer<M: Labeled + ?Sized>(&self, meta: &M) -> Arc<B::Client> {
        self.load_balancer.get(meta)
    }

    /// Routes client for `meta`, built by the network constructor.
    pub fn routes<M: Labeled + ?Sized>(&self, meta: &M) -> Arc<B::Client> {
        self.routes.get(meta)
    }

    /// Key manager client for `meta`.
    pub fn secrets<M: Labeled + ?Sized>(&self, meta: &M) -> Arc<B::Client> {
        self.secrets.get(meta)
    }

    /// The cache serving `kind`, or `None` for an unknown kind.
    pub fn cache(&self, kind: &ClientKind) -> Option<&TenantClientCache<B>> {
        match kind {
            ClientKind::Compute => Some(&self.compute),
            ClientKind::Network => Some(&self.network),
            ClientKind::LoadBalancer => Some(&self.load_balancer),
            ClientKind::Routes => Some(&self.routes),
            ClientKind::Secrets => Some(&self.secrets),
            ClientKind::Unknown(_) => None,
        }
    }

    /// All caches, in [`ClientKind::SUPPORTED`] order.
    pub fn caches(&self) -> [&TenantClientCache<B>; 5] {
        [
            &self.compute,
            &self.network,
            &self.load_balancer,
            &self.routes,
            &self.secrets,
        ]
    }
}

impl<B: ClientBuilder> std::fmt::Debug for TenantClients<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.caches()).finish()
    }
}
