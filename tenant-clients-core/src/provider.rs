use std::fmt;

use crate::config::GlobalConfig;
use crate::error::BoxError;

/// Identity every tenant provider handle is created with.
pub const USER_AGENT: &str = "openstack-cloud-controller-manager";

/// Which endpoint of the service catalog a client talks to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Availability {
    #[default]
    Public,
    Internal,
    Admin,
}

impl Availability {
    /// Returns the lowercase endpoint interface name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Public => "public",
            Availability::Internal => "internal",
            Availability::Admin => "admin",
        }
    }

    /// Parses an `endpoint-type` setting. Unset means public; an unrecognized
    /// value is logged and treated as public.
    pub fn from_endpoint_type(endpoint_type: Option<&str>) -> Self {
        match endpoint_type.map(|value| value.trim().to_lowercase()) {
            None => Availability::Public,
            Some(value) => match value.as_str() {
                "" | "public" | "publicurl" => Availability::Public,
                "internal" | "internalurl" => Availability::Internal,
                "admin" | "adminurl" => Availability::Admin,
                _ => {
                    tracing::warn!(
                        endpoint_type = %value,
                        "unknown endpoint type, using public endpoints"
                    );
                    Availability::Public
                }
            },
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Region and endpoint selection for a typed client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EndpointOpts {
    pub region: String,
    pub availability: Availability,
}

impl From<&GlobalConfig> for EndpointOpts {
    fn from(global: &GlobalConfig) -> Self {
        Self {
            region: global.region.clone(),
            availability: Availability::from_endpoint_type(global.endpoint_type.as_deref()),
        }
    }
}

/// Capability that turns tenant configuration into service clients.
///
/// Implementations wrap a cloud SDK. `authenticate` produces a provider
/// handle from the `[Global]` section; each typed constructor turns that
/// handle plus [`EndpointOpts`] into a client. All kinds share one `Client`
/// type so a single cache can hold any of them.
///
/// There is no separate routes constructor: routes clients are built with
/// [`ClientBuilder::network`].
///
/// # Examples
///
/// ```
/// use tenant_clients_core::{BoxError, ClientBuilder, EndpointOpts, GlobalConfig};
///
/// #[derive(Debug)]
/// struct Endpoint(String);
///
/// struct Static;
///
/// impl ClientBuilder for Static {
///     type Provider = String;
///     type Client = Endpoint;
///
///     fn authenticate(&self, global: &GlobalConfig, _user_agent: &str) -> Result<String, BoxError> {
///         Ok(global.auth_url.clone())
///     }
///     fn compute(&self, p: &String, o: &EndpointOpts) -> Result<Endpoint, BoxError> {
///         Ok(Endpoint(format!("{p}/compute/{}", o.region)))
///     }
///     fn network(&self, p: &String, o: &EndpointOpts) -> Result<Endpoint, BoxError> {
///         Ok(Endpoint(format!("{p}/network/{}", o.region)))
///     }
///     fn load_balancer(&self, _: &String, _: &EndpointOpts) -> Result<Endpoint, BoxError> {
///         Err("load-balancer API is not deployed".into())
///     }
///     fn key_manager(&self, p: &String, o: &EndpointOpts) -> Result<Endpoint, BoxError> {
///         Ok(Endpoint(format!("{p}/key-manager/{}", o.region)))
///     }
/// }
/// ```
pub trait ClientBuilder: Send + Sync {
    /// Authenticated handle shared by the typed constructors of one tenant.
    type Provider;
    /// Service client handed out by the cache.
    type Client: Send + Sync;

    fn authenticate(
        &self,
        global: &GlobalConfig,
        user_agent: &str,
    ) -> Result<Self::Provider, BoxError>;

    fn compute(
        &self,
        provider: &Self::Provider,
        opts: &EndpointOpts,
    ) -> Result<Self::Client, BoxError>;

    fn network(
        &self,
        provider: &Self::Provider,
        opts: &EndpointOpts,
    ) -> Result<Self::Client, BoxError>;

    fn load_balancer(
        &self,
        provider: &Self::Provider,
        opts: &EndpointOpts,
    ) -> Result<Self::Client, BoxError>;

    fn key_manager(
        &self,
        provider: &Self::Provider,
        opts: &EndpointOpts,
    ) -> Result<Self::Client, BoxError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_parsing() {
        assert_eq!(Availability::from_endpoint_type(None), Availability::Public);
        assert_eq!(
            Availability::from_endpoint_type(Some("")),
            Availability::Public
        );
        assert_eq!(
            Availability::from_endpoint_type(Some("Internal")),
            Availability::Internal
        );
        assert_eq!(
            Availability::from_endpoint_type(Some("adminURL")),
            Availability::Admin
        );
        assert_eq!(
            Availability::from_endpoint_type(Some("private")),
            Availability::Public
        );
    }

    #[test]
    fn test_endpoint_opts_from_global() {
        let mut global = GlobalConfig::new("https://keystone.example.com/v3");
        global.region = "ru-2".to_string();
        global.endpoint_type = Some("internal".to_string());

        let opts = EndpointOpts::from(&global);
        assert_eq!(opts.region, "ru-2");
        assert_eq!(opts.availability, Availability::Internal);
    }

    #[test]
    fn test_endpoint_opts_defaults() {
        let opts = EndpointOpts::from(&GlobalConfig::default());
        assert_eq!(opts, EndpointOpts::default());
        assert_eq!(opts.availability.to_string(), "public");
    }
}
