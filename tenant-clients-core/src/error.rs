use std::path::PathBuf;
use thiserror::Error;

use crate::ClientKind;

/// Error type returned by [`ClientBuilder`](crate::ClientBuilder) implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure to load a tenant's configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The alias cannot be mapped to a file inside the configuration root
    #[error("invalid project alias '{alias}': {reason}")]
    InvalidAlias {
        alias: String,
        reason: &'static str,
    },

    /// The configuration file could not be opened or read
    #[error("failed to open cloud provider configuration {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid
    #[error("failed to read cloud provider configuration {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// The configuration parsed but is missing required settings
    #[error("invalid cloud provider configuration {}: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },
}

/// Failure to turn a configuration document into a [`CloudConfig`](crate::CloudConfig).
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Syntax(#[from] ini::ParseError),

    #[error("invalid value '{value}' for {key}")]
    Value { key: String, value: String },
}

/// Failure to construct a tenant-scoped client.
///
/// [`TenantClientCache::get`](crate::TenantClientCache::get) never returns
/// these; it logs them and falls back to the default client. Use
/// [`TenantClientCache::try_get`](crate::TenantClientCache::try_get) to see them.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to load configuration for project '{alias}'")]
    Config {
        alias: String,
        #[source]
        source: ConfigError,
    },

    #[error("failed to create provider client for project '{alias}'")]
    Provider {
        alias: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to create {kind} client for project '{alias}'")]
    Construct {
        kind: ClientKind,
        alias: String,
        #[source]
        source: BoxError,
    },

    #[error("unknown client type {kind}")]
    UnknownKind { kind: ClientKind },
}

impl ClientError {
    /// Tenant alias the failure belongs to, when there is one.
    pub fn alias(&self) -> Option<&str> {
        match self {
            ClientError::Config { alias, .. }
            | ClientError::Provider { alias, .. }
            | ClientError::Construct { alias, .. } => Some(alias),
            ClientError::UnknownKind { .. } => None,
        }
    }
}

/// Renders an error with its whole source chain, `outer: inner: root`.
pub(crate) fn report(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
