use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Label that binds a resource to a tenant project.
///
/// Resources without this label, or with an empty value, are served by the
/// default client.
pub const PROJECT_ALIAS_LABEL: &str = "shared.salt.x5.ru/project-alias";

/// Anything that carries a label map the cache can inspect.
///
/// Only [`PROJECT_ALIAS_LABEL`] is ever looked up; everything else in the map
/// is ignored.
pub trait Labeled {
    /// Returns the value for `key`, or `None` when there is no label map or
    /// the key is missing.
    fn label(&self, key: &str) -> Option<&str>;

    /// Returns the tenant alias, if the resource is tenant-scoped.
    ///
    /// Empty label values are treated as absent.
    fn project_alias(&self) -> Option<&str> {
        self.label(PROJECT_ALIAS_LABEL)
            .filter(|alias| !alias.is_empty())
    }
}

impl Labeled for BTreeMap<String, String> {
    fn label(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl Labeled for HashMap<String, String> {
    fn label(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl<T: Labeled> Labeled for Option<T> {
    fn label(&self, key: &str) -> Option<&str> {
        self.as_ref().and_then(|inner| inner.label(key))
    }
}

impl<T: Labeled + ?Sized> Labeled for &T {
    fn label(&self, key: &str) -> Option<&str> {
        (**self).label(key)
    }
}

/// Minimal object metadata: the part of a resource the cache reads.
///
/// # Examples
///
/// ```
/// use tenant_clients_core::{Labeled, ObjectMeta, PROJECT_ALIAS_LABEL};
///
/// let meta = ObjectMeta::new("lb-1").with_label(PROJECT_ALIAS_LABEL, "acme");
/// assert_eq!(meta.project_alias(), Some("acme"));
///
/// let plain = ObjectMeta::new("lb-2");
/// assert_eq!(plain.project_alias(), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
}

impl ObjectMeta {
    /// Metadata with a name and no namespace or labels.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Shorthand for tagging the object with a tenant alias.
    #[must_use]
    pub fn with_project_alias(self, alias: impl Into<String>) -> Self {
        self.with_label(PROJECT_ALIAS_LABEL, alias)
    }
}

impl Labeled for ObjectMeta {
    fn label(&self, key: &str) -> Option<&str> {
        self.labels.label(key)
    }
}
