use tracing::debug;

use crate::core::{FastIndexMap, fast_index_map_new};
use crate::runtime::ValuePolicy;

use super::error::ConfigError;
use super::source::{ConfigSource, RawValue};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub value: String,
    pub frozen: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DerivedFlag {
    Bool(bool),
    Str(String),
}

/// Names accepted by [`ConfigRegistry::derived_flag`].
pub const DERIVED_FLAGS: &[&str] = &[
    "enable_shared",
    "libruby_is_shared",
    "libruby_so_path",
    "archiver",
    "stripper",
    "compiler",
    "installed",
];

/// Build and installation parameters, string to string.
///
/// Filled once from a [`ConfigSource`] and read-only afterwards.
#[derive(Debug, Clone)]
pub struct ConfigRegistry {
    entries: FastIndexMap<String, ConfigEntry>,
    installed: bool,
}

impl ConfigRegistry {
    pub fn empty() -> Self {
        Self {
            entries: fast_index_map_new(),
            installed: false,
        }
    }

    pub fn populate(source: &dyn ConfigSource, policy: ValuePolicy) -> Result<Self, ConfigError> {
        let mut entries = fast_index_map_new();
        for (key, value) in source.pairs()? {
            let key = match key {
                RawValue::Str(k) => k,
                other => return Err(ConfigError::NonStringKey(other.kind())),
            };
            let value = match value {
                RawValue::Str(v) => v,
                other => {
                    return Err(ConfigError::NonStringValue {
                        key,
                        kind: other.kind(),
                    });
                }
            };
            if entries.contains_key(&key) {
                return Err(ConfigError::DuplicateKey(key));
            }
            let frozen = policy == ValuePolicy::Frozen;
            entries.insert(key, ConfigEntry { value, frozen });
        }
        let installed = source.installed();
        debug!(entries = entries.len(), installed, ?policy, "configuration populated");
        Ok(Self { entries, installed })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|e| e.value.as_str())
    }

    pub fn fetch(&self, key: &str) -> Result<&str, ConfigError> {
        self.get(key)
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))
    }

    pub fn entry(&self, key: &str) -> Option<&ConfigEntry> {
        self.entries.get(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .map(|(k, e)| (k.as_str(), e.value.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_frozen(&self, key: &str) -> Option<bool> {
        self.entries.get(key).map(|e| e.frozen)
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// The installation prefix, or `None` when running from a build tree.
    pub fn topdir(&self) -> Option<&str> {
        if self.installed { self.get("prefix") } else { None }
    }

    pub fn enable_shared(&self) -> bool {
        self.get("ENABLE_SHARED") == Some("yes")
    }

    /// Location of the shared library: the directory named by `libdirname`, or
    /// `bindir` on platforms that search `PATH` for libraries.
    pub fn libruby_so_path(&self) -> Option<String> {
        let so = self.get("LIBRUBY_SO")?;
        let dir = if self.get("LIBPATHENV") == Some("PATH") {
            self.get("bindir")?
        } else {
            let dirname = self.get("libdirname").unwrap_or("libdir");
            self.get(dirname)?
        };
        Some(format!("{}/{}", dir.trim_end_matches('/'), so))
    }

    pub fn derived_flag(&self, name: &str) -> Option<DerivedFlag> {
        let string = |key: &str| self.get(key).map(|v| DerivedFlag::Str(v.to_string()));
        match name {
            "enable_shared" => Some(DerivedFlag::Bool(self.enable_shared())),
            "libruby_is_shared" => {
                let shared = match (self.get("LIBRUBY"), self.get("LIBRUBY_SO")) {
                    (Some(lib), Some(so)) => lib == so,
                    _ => false,
                };
                Some(DerivedFlag::Bool(shared))
            }
            "libruby_so_path" => self.libruby_so_path().map(DerivedFlag::Str),
            "archiver" => string("AR"),
            "stripper" => string("STRIP"),
            "compiler" => string("CC"),
            "installed" => Some(DerivedFlag::Bool(self.installed)),
            _ => None,
        }
    }
}

impl Default for ConfigRegistry {
    fn default() -> Self {
        Self::empty()
    }
}
