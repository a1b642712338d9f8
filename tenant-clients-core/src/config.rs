//! # Tenant configuration
//!
//! Each tenant project has its own cloud provider configuration file named
//! after its alias: `<root>/<alias>.conf`. Files use the INI layout of the
//! OpenStack cloud provider; only the `[Global]` section is read:
//!
//! ```ini
//! [Global]
//! auth-url=https://keystone.example.com/v3
//! application-credential-id=4f1c...
//! application-credential-secret=s3cr3t
//! region=ru-1
//! endpoint-type=internal
//! ```
//!
//! Configuration is never cached: a loader is consulted once per cache miss,
//! which for a given tenant happens once for the life of the process unless
//! construction fails.

use ini::Ini;
use secrecy::SecretString;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ParseError};

/// Directory holding per-tenant configuration files.
pub const DEFAULT_CONFIG_ROOT: &str = "/etc/config";

/// Environment variable overriding [`DEFAULT_CONFIG_ROOT`].
pub const CONFIG_ROOT_ENV: &str = "TENANT_CLIENTS_CONFIG_ROOT";

/// File extension of tenant configuration files.
pub const CONFIG_EXTENSION: &str = "conf";

const GLOBAL_SECTION: &str = "Global";

/// Parsed tenant configuration.
#[derive(Debug, Default)]
pub struct CloudConfig {
    pub global: GlobalConfig,
}

impl CloudConfig {
    /// Parses a cloud provider configuration document.
    ///
    /// Section and key names are case-insensitive. Sections other than
    /// `[Global]` and keys the cache does not use are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use tenant_clients_core::CloudConfig;
    ///
    /// let config = CloudConfig::from_ini_str(
    ///     "[Global]\nauth-url=https://keystone.example.com/v3\nregion=ru-1\n",
    /// )
    /// .unwrap();
    /// assert_eq!(config.global.region, "ru-1");
    /// ```
    pub fn from_ini_str(input: &str) -> Result<Self, ParseError> {
        let document = Ini::load_from_str(input)?;

        let mut global = GlobalConfig::default();
        for (section, properties) in document.iter() {
            let is_global =
                section.is_some_and(|name| name.trim().eq_ignore_ascii_case(GLOBAL_SECTION));
            if !is_global {
                continue;
            }
            for (key, value) in properties.iter() {
                global.set(key, value)?;
            }
        }

        Ok(CloudConfig { global })
    }
}

/// Credentials and endpoint selection for one tenant project.
///
/// Only `auth-url` is required here. Whether the remaining fields form a
/// usable set of credentials is up to
/// [`ClientBuilder::authenticate`](crate::ClientBuilder::authenticate).
///
/// Secret fields are wrapped in [`SecretString`] and print as redacted in
/// `Debug` output.
#[derive(Debug, Default)]
pub struct GlobalConfig {
    pub auth_url: String,
    pub username: Option<String>,
    pub user_id: Option<String>,
    pub password: Option<SecretString>,
    pub tenant_id: Option<String>,
    pub tenant_name: Option<String>,
    pub trust_id: Option<String>,
    pub domain_id: Option<String>,
    pub domain_name: Option<String>,
    pub tenant_domain_id: Option<String>,
    pub tenant_domain_name: Option<String>,
    pub user_domain_id: Option<String>,
    pub user_domain_name: Option<String>,
    pub application_credential_id: Option<String>,
    pub application_credential_name: Option<String>,
    pub application_credential_secret: Option<SecretString>,
    /// Read credentials from a `clouds.yaml` instead of this section
    pub use_clouds: bool,
    pub clouds_file: Option<PathBuf>,
    pub cloud: Option<String>,
    pub region: String,
    /// `public`, `internal` or `admin`; defaults to `public` when unset
    pub endpoint_type: Option<String>,
    pub ca_file: Option<PathBuf>,
    pub tls_insecure: bool,
}

impl GlobalConfig {
    /// Minimal configuration pointing at an identity endpoint.
    pub fn new(auth_url: impl Into<String>) -> Self {
        Self {
            auth_url: auth_url.into(),
            ..Self::default()
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ParseError> {
        let key = key.trim().to_ascii_lowercase();
        let value = unquote(value.trim());
        let text = || (!value.is_empty()).then(|| value.to_string());
        let secret = || (!value.is_empty()).then(|| SecretString::from(value.to_string()));
        let path = || (!value.is_empty()).then(|| PathBuf::from(value));

        match key.as_str() {
            "auth-url" => self.auth_url = value.to_string(),
            "username" => self.username = text(),
            "user-id" => self.user_id = text(),
            "password" => self.password = secret(),
            "tenant-id" => self.tenant_id = text(),
            "tenant-name" => self.tenant_name = text(),
            "trust-id" => self.trust_id = text(),
            "domain-id" => self.domain_id = text(),
            "domain-name" => self.domain_name = text(),
            "tenant-domain-id" => self.tenant_domain_id = text(),
            "tenant-domain-name" => self.tenant_domain_name = text(),
            "user-domain-id" => self.user_domain_id = text(),
            "user-domain-name" => self.user_domain_name = text(),
            "application-credential-id" => self.application_credential_id = text(),
            "application-credential-name" => self.application_credential_name = text(),
            "application-credential-secret" => self.application_credential_secret = secret(),
            "use-clouds" => self.use_clouds = parse_bool(&key, value)?,
            "clouds-file" => self.clouds_file = path(),
            "cloud" => self.cloud = text(),
            "region" => self.region = value.to_string(),
            "endpoint-type" => self.endpoint_type = text(),
            "ca-file" => self.ca_file = path(),
            "tls-insecure" => self.tls_insecure = parse_bool(&key, value)?,
            _ => tracing::trace!(key, "ignoring unused configuration key"),
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), String> {
        if self.auth_url.trim().is_empty() {
            return Err("auth-url is required".to_string());
        }
        Ok(())
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(value)
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ParseError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "" | "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ParseError::Value {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Produces the configuration for a tenant alias.
///
/// Implemented for [`FileConfigLoader`] and for any
/// `Fn(&str) -> Result<CloudConfig, ConfigError>` closure.
pub trait ConfigLoader: Send + Sync {
    fn load(&self, alias: &str) -> Result<CloudConfig, ConfigError>;
}

impl<F> ConfigLoader for F
where
    F: Fn(&str) -> Result<CloudConfig, ConfigError> + Send + Sync,
{
    fn load(&self, alias: &str) -> Result<CloudConfig, ConfigError> {
        self(alias)
    }
}

/// Reads `<root>/<alias>.conf` on every call.
///
/// # Examples
///
/// ```
/// use tenant_clients_core::FileConfigLoader;
/// use std::path::Path;
///
/// let loader = FileConfigLoader::new("/etc/config");
/// assert_eq!(
///     loader.config_path("acme").unwrap(),
///     Path::new("/etc/config/acme.conf")
/// );
/// assert!(loader.config_path("../acme").is_err());
/// ```
#[derive(Clone, Debug)]
pub struct FileConfigLoader {
    root: PathBuf,
}

impl FileConfigLoader {
    /// Loader reading tenant files from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Uses `TENANT_CLIENTS_CONFIG_ROOT` when set and non-empty, otherwise
    /// [`DEFAULT_CONFIG_ROOT`].
    pub fn from_env() -> Self {
        match env::var(CONFIG_ROOT_ENV) {
            Ok(root) if !root.trim().is_empty() => Self::new(root),
            _ => Self::default(),
        }
    }

    /// Returns the directory tenant files are read from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves the file for `alias`, refusing aliases that would point
    /// outside the root.
    pub fn config_path(&self, alias: &str) -> Result<PathBuf, ConfigError> {
        let reason = if alias.is_empty() {
            Some("alias is empty")
        } else if alias == "." || alias == ".." {
            Some("alias is a relative path component")
        } else if alias.contains('/') || alias.contains('\\') {
            Some("alias contains a path separator")
        } else if alias.contains('\0') {
            Some("alias contains a NUL byte")
        } else {
            None
        };

        if let Some(reason) = reason {
            return Err(ConfigError::InvalidAlias {
                alias: alias.to_string(),
                reason,
            });
        }

        Ok(self.root.join(format!("{alias}.{CONFIG_EXTENSION}")))
    }
}

impl Default for FileConfigLoader {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_ROOT)
    }
}

impl ConfigLoader for FileConfigLoader {
    fn load(&self, alias: &str) -> Result<CloudConfig, ConfigError> {
        let path = self.config_path(alias)?;
        tracing::debug!(alias, path = %path.display(), "reading tenant configuration");

        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        let config = CloudConfig::from_ini_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;

        config
            .global
            .validate()
            .map_err(|reason| ConfigError::Invalid { path, reason })?;

        Ok(config)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serial_test::serial;
    use std::io::Write;

    const PASSWORD_CONFIG: &str = "
[Global]
auth-url=https://keystone.example.com/v3
username=svc-ccm
password=hunter2
tenant-name=acme
domain-name=Default
region=ru-1
endpoint-type=internal
";

    fn write_config(dir: &Path, alias: &str, contents: &str) {
        let mut file = fs::File::create(dir.join(format!("{alias}.conf"))).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn test_parse_global_section() {
        let config = CloudConfig::from_ini_str(PASSWORD_CONFIG).unwrap();
        assert_eq!(config.global.auth_url, "https://keystone.example.com/v3");
        assert_eq!(config.global.username.as_deref(), Some("svc-ccm"));
        assert_eq!(config.global.region, "ru-1");
        assert_eq!(config.global.endpoint_type.as_deref(), Some("internal"));
        assert_eq!(
            config.global.password.as_ref().unwrap().expose_secret(),
            "hunter2"
        );
        assert!(!config.global.tls_insecure);
    }

    #[test]
    fn test_quoted_values_and_spacing() {
        let input = "[Global]\nauth-url = \"https://keystone.example.com/v3\"\nregion = \"ru-1\"\n";
        let config = CloudConfig::from_ini_str(input).unwrap();
        assert_eq!(config.global.auth_url, "https://keystone.example.com/v3");
        assert_eq!(config.global.region, "ru-1");
    }

    #[test]
    fn test_names_are_case_insensitive() {
        let input = "[global]\nAuth-URL=https://keystone.example.com/v3\nRegion=ru-1\n";
        let config = CloudConfig::from_ini_str(input).unwrap();
        assert_eq!(config.global.auth_url, "https://keystone.example.com/v3");
        assert_eq!(config.global.region, "ru-1");
    }

    #[test]
    fn test_bool_values() {
        let cases = [
            ("true", true),
            ("yes", true),
            ("1", true),
            ("false", false),
            ("off", false),
        ];
        for (value, expected) in cases {
            let input = format!("[Global]\nauth-url=https://k\ntls-insecure={value}\n");
            let config = CloudConfig::from_ini_str(&input).unwrap();
            assert_eq!(config.global.tls_insecure, expected, "tls-insecure={value}");
        }

        let err = CloudConfig::from_ini_str("[Global]\ntls-insecure=maybe\n").unwrap_err();
        assert!(matches!(err, ParseError::Value { ref key, .. } if key == "tls-insecure"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = CloudConfig::from_ini_str(PASSWORD_CONFIG).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("svc-ccm"));
    }

    #[test]
    fn test_other_sections_are_ignored() {
        let input = format!(
            "{PASSWORD_CONFIG}\n[LoadBalancer]\nlb-version=v2\nregion=elsewhere\n\n[Route]\nrouter-id=r1\n"
        );
        let config = CloudConfig::from_ini_str(&input).unwrap();
        assert_eq!(config.global.region, "ru-1");
    }

    #[test]
    fn test_unused_global_keys_are_ignored() {
        let input = format!("{PASSWORD_CONFIG}secret-name=cloud-config\nkubeconfig-path=/etc/kube\n");
        assert!(CloudConfig::from_ini_str(&input).is_ok());
    }

    #[test]
    fn test_config_path() {
        let loader = FileConfigLoader::new("/etc/config");
        assert_eq!(
            loader.config_path("acme").unwrap(),
            PathBuf::from("/etc/config/acme.conf")
        );
    }

    #[test]
    fn test_config_path_rejects_escaping_aliases() {
        let loader = FileConfigLoader::new("/etc/config");
        for alias in ["", ".", "..", "../etc/passwd", "a/b", "a\\b"] {
            assert!(
                matches!(
                    loader.config_path(alias),
                    Err(ConfigError::InvalidAlias { .. })
                ),
                "alias {alias:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "acme", PASSWORD_CONFIG);

        let loader = FileConfigLoader::new(dir.path());
        let config = loader.load("acme").unwrap();
        assert_eq!(config.global.tenant_name.as_deref(), Some("acme"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let loader = FileConfigLoader::new(dir.path());

        match loader.load("ghost") {
            Err(ConfigError::Read { path, source }) => {
                assert_eq!(path, dir.path().join("ghost.conf"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected read error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "broken", "[Global\nauth-url=https://k\n");

        let loader = FileConfigLoader::new(dir.path());
        assert!(matches!(
            loader.load("broken"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_rejects_missing_auth_url() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "partial", "[Global]\nregion=ru-1\n");

        let loader = FileConfigLoader::new(dir.path());
        match loader.load("partial") {
            Err(ConfigError::Invalid { reason, .. }) => {
                assert!(reason.contains("auth-url"));
            }
            other => panic!("expected invalid config, got {other:?}"),
        }
    }

    #[test]
    fn test_load_leaves_credentials_to_the_builder() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            "trusted",
            "[Global]\nauth-url=https://keystone.example.com/v3\ntrust-id=0a1b2c\n",
        );
        write_config(
            dir.path(),
            "clouds",
            "[Global]\nauth-url=https://keystone.example.com/v3\nuse-clouds=true\ncloud=acme\n",
        );

        let loader = FileConfigLoader::new(dir.path());
        let trusted = loader.load("trusted").unwrap();
        assert_eq!(trusted.global.trust_id.as_deref(), Some("0a1b2c"));
        assert!(trusted.global.password.is_none());

        let clouds = loader.load("clouds").unwrap();
        assert!(clouds.global.use_clouds);
        assert_eq!(clouds.global.cloud.as_deref(), Some("acme"));
    }

    #[test]
    fn test_application_credentials() {
        let input = "
[Global]
auth-url=https://keystone.example.com/v3
application-credential-id=4f1c
application-credential-secret=s3cr3t
";
        let config = CloudConfig::from_ini_str(input).unwrap();
        assert!(config.global.validate().is_ok());
        assert_eq!(config.global.application_credential_id.as_deref(), Some("4f1c"));
        assert_eq!(config.global.endpoint_type, None);
    }

    #[test]
    fn test_closure_loader() {
        let loader = |alias: &str| -> Result<CloudConfig, ConfigError> {
            Ok(CloudConfig {
                global: GlobalConfig::new(format!("https://{alias}.example.com")),
            })
        };
        let config = ConfigLoader::load(&loader, "acme").unwrap();
        assert_eq!(config.global.auth_url, "https://acme.example.com");
    }

    #[test]
    #[serial]
    fn test_from_env() {
        env::set_var(CONFIG_ROOT_ENV, "/srv/tenants");
        assert_eq!(FileConfigLoader::from_env().root(), Path::new("/srv/tenants"));

        env::set_var(CONFIG_ROOT_ENV, "");
        assert_eq!(
            FileConfigLoader::from_env().root(),
            Path::new(DEFAULT_CONFIG_ROOT)
        );

        env::remove_var(CONFIG_ROOT_ENV);
        assert_eq!(
            FileConfigLoader::from_env().root(),
            Path::new(DEFAULT_CONFIG_ROOT)
        );
    }
}
