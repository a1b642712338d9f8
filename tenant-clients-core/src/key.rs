use std::fmt;

/// Selects which typed API surface a cache constructs for its tenants.
///
/// A cache is created for exactly one kind and keeps it for its whole life.
/// Parsing a selector never fails: anything that is not a known kind becomes
/// [`ClientKind::Unknown`], which is reported as a construction failure the
/// first time a tenant-scoped client is requested.
///
/// # Variants
///
/// * `Compute` - compute (servers) API, `"compute"`
/// * `Network` - networking API, `"network"`
/// * `LoadBalancer` - load-balancer API, `"loadbalancer"`
/// * `Routes` - route management, served by the networking API, `"routes"`
/// * `Secrets` - key manager API, `"secrets"`
/// * `Unknown` - any other selector
///
/// # Examples
///
/// ```
/// use tenant_clients_core::ClientKind;
///
/// let kind: ClientKind = "network".into();
/// assert_eq!(kind, ClientKind::Network);
/// assert_eq!(kind.as_str(), "network");
///
/// let lb: ClientKind = "load-balancer".into();
/// assert_eq!(lb, ClientKind::LoadBalancer);
///
/// let odd: ClientKind = "dns".into();
/// assert!(!odd.is_supported());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClientKind {
    Compute,
    Network,
    LoadBalancer,
    Routes,
    Secrets,
    Unknown(String),
}

impl ClientKind {
    /// All supported kinds, in the order a [`TenantClients`](crate::TenantClients) set builds them.
    pub const SUPPORTED: [ClientKind; 5] = [
        ClientKind::Compute,
        ClientKind::Network,
        ClientKind::LoadBalancer,
        ClientKind::Routes,
        ClientKind::Secrets,
    ];

    /// Returns the selector string used in cache keys and log fields.
    pub fn as_str(&self) -> &str {
        match self {
            ClientKind::Compute => "compute",
            ClientKind::Network => "network",
            ClientKind::LoadBalancer => "loadbalancer",
            ClientKind::Routes => "routes",
            ClientKind::Secrets => "secrets",
            ClientKind::Unknown(kind) => kind,
        }
    }

    /// Returns `false` only for [`ClientKind::Unknown`].
    pub fn is_supported(&self) -> bool {
        !matches!(self, ClientKind::Unknown(_))
    }
}

impl From<&str> for ClientKind {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "compute" => ClientKind::Compute,
            "network" => ClientKind::Network,
            "loadbalancer" | "load-balancer" => ClientKind::LoadBalancer,
            "routes" => ClientKind::Routes,
            "secrets" => ClientKind::Secrets,
            _ => ClientKind::Unknown(value.to_string()),
        }
    }
}

impl From<String> for ClientKind {
    fn from(value: String) -> Self {
        ClientKind::from(value.as_str())
    }
}

impl fmt::Display for ClientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one cached client: a (kind, tenant alias) pair.
///
/// Equality and hashing work on the structured pair, so an alias containing
/// `/` can never collide with a different kind/alias combination. The
/// rendered form `<kind>/<alias>` is for logs and introspection only.
///
/// ```
/// use tenant_clients_core::{CacheKey, ClientKind};
///
/// let key = CacheKey::new(ClientKind::Network, "acme");
/// assert_eq!(key.to_string(), "network/acme");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    kind: ClientKind,
    alias: String,
}

impl CacheKey {
    /// Creates the key for `alias` under `kind`.
    pub fn new(kind: ClientKind, alias: impl Into<String>) -> Self {
        Self {
            kind,
            alias: alias.into(),
        }
    }

    /// Returns the client kind part of the key.
    pub fn kind(&self) -> &ClientKind {
        &self.kind
    }

    /// Returns the tenant alias part of the key.
    pub fn alias(&self) -> &str {
        &self.alias
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.alias)
    }
}
