//! Encoding catalog and the process-wide default encodings.
//!
//! The registry is shared between runtimes through an `Arc`. Both defaults sit
//! behind one lock; an assignment is fully validated (including any coercion
//! callback) before the lock is taken.

pub mod catalog;

use parking_lot::Mutex;
use tracing::debug;

use crate::core::EncodingId;
use crate::errors::{RtResult, RuntimeError, messages};

pub use catalog::{CATALOG, EncodingInfo};

/// Result of asking a value for its string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coerced {
    Str(String),
    /// The coercion ran but produced something else; holds its class name.
    NotAString(String),
}

/// A value that can be asked for a string on demand.
pub trait CoercesToString {
    /// Name of the value's class, for error messages.
    fn type_name(&self) -> String;

    fn coerce_to_string(&mut self) -> RtResult<Coerced>;
}

/// Accepted right-hand sides of a default-encoding assignment.
pub enum EncodingArg<'a> {
    Nil,
    Encoding(EncodingId),
    Name(&'a str),
    Coercible(&'a mut dyn CoercesToString),
    /// Offers no coercion; holds its class name.
    Incoercible(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingDefaults {
    pub external: EncodingId,
    pub internal: Option<EncodingId>,
}

pub struct EncodingRegistry {
    catalog: &'static [EncodingInfo],
    defaults: Mutex<EncodingDefaults>,
}

impl EncodingRegistry {
    pub fn new(default_external: &str) -> RtResult<Self> {
        Self::with_catalog(CATALOG, default_external)
    }

    pub fn with_catalog(catalog: &'static [EncodingInfo], default_external: &str) -> RtResult<Self> {
        let external = catalog
            .iter()
            .position(|info| info.matches(default_external))
            .map(EncodingId)
            .ok_or_else(|| RuntimeError::UnknownEncoding(default_external.to_string()))?;
        Ok(Self {
            catalog,
            defaults: Mutex::new(EncodingDefaults {
                external,
                internal: None,
            }),
        })
    }

    /// Case-insensitive lookup by primary name or alias.
    pub fn find(&self, name: &str) -> Option<EncodingId> {
        self.catalog
            .iter()
            .position(|info| info.matches(name))
            .map(EncodingId)
    }

    pub fn info(&self, id: EncodingId) -> &'static EncodingInfo {
        &self.catalog[id.0]
    }

    pub fn list(&self) -> impl Iterator<Item = EncodingId> + '_ {
        (0..self.catalog.len()).map(EncodingId)
    }

    pub fn name_list(&self) -> Vec<&'static str> {
        self.catalog.iter().flat_map(|info| info.names()).collect()
    }

    pub fn defaults(&self) -> EncodingDefaults {
        *self.defaults.lock()
    }

    pub fn default_internal(&self) -> Option<EncodingId> {
        self.defaults.lock().internal
    }

    pub fn default_external(&self) -> EncodingId {
        self.defaults.lock().external
    }

    pub fn set_default_internal(&self, arg: EncodingArg<'_>) -> RtResult<Option<EncodingId>> {
        let resolved = self.resolve(arg)?;
        self.defaults.lock().internal = resolved;
        debug!(internal = ?resolved.map(|id| self.info(id).name), "default internal encoding set");
        Ok(resolved)
    }

    pub fn set_default_external(&self, arg: EncodingArg<'_>) -> RtResult<EncodingId> {
        let resolved = self
            .resolve(arg)?
            .ok_or_else(|| RuntimeError::Argument(messages::DEFAULT_EXTERNAL_NIL.into()))?;
        self.defaults.lock().external = resolved;
        debug!(external = self.info(resolved).name, "default external encoding set");
        Ok(resolved)
    }

    fn resolve(&self, arg: EncodingArg<'_>) -> RtResult<Option<EncodingId>> {
        let name = match arg {
            EncodingArg::Nil => return Ok(None),
            EncodingArg::Encoding(id) => {
                if id.0 >= self.catalog.len() {
                    return Err(RuntimeError::TypeMismatch(format!(
                        "encoding {} is not registered",
                        id.0
                    )));
                }
                return Ok(Some(id));
            }
            EncodingArg::Name(name) => name.to_string(),
            EncodingArg::Coercible(value) => match value.coerce_to_string()? {
                Coerced::Str(s) => s,
                Coerced::NotAString(got) => {
                    let ty = value.type_name();
                    return Err(RuntimeError::TypeMismatch(format!(
                        "can't convert {ty} to String ({ty}#to_str gives {got})"
                    )));
                }
            },
            EncodingArg::Incoercible(ty) => {
                return Err(RuntimeError::no_implicit_conversion(&ty, "String"));
            }
        };
        self.find(&name)
            .map(Some)
            .ok_or(RuntimeError::UnknownEncoding(name))
    }
}

impl Default for EncodingRegistry {
    /// Full catalog with UTF-8 as the default external encoding.
    fn default() -> Self {
        let external = CATALOG
            .iter()
            .position(|info| info.name == "UTF-8")
            .map(EncodingId)
            .unwrap_or(EncodingId(0));
        Self {
            catalog: CATALOG,
            defaults: Mutex::new(EncodingDefaults {
                external,
                internal: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_named_constructor() {
        let a = EncodingRegistry::default();
        let b = EncodingRegistry::new("utf-8").unwrap();
        assert_eq!(a.defaults(), b.defaults());
    }

    struct Fixed {
        reply: Coerced,
        calls: usize,
    }

    impl CoercesToString for Fixed {
        fn type_name(&self) -> String {
            "Mock".into()
        }

        fn coerce_to_string(&mut self) -> RtResult<Coerced> {
            self.calls += 1;
            Ok(self.reply.clone())
        }
    }

    #[test]
    fn internal_defaults_to_nil() {
        let registry = EncodingRegistry::new("UTF-8").unwrap();
        assert_eq!(registry.default_internal(), None);
        assert_eq!(registry.info(registry.default_external()).name, "UTF-8");
    }

    #[test]
    fn coercion_result_is_resolved() {
        let registry = EncodingRegistry::new("UTF-8").unwrap();
        let mut mock = Fixed {
            reply: Coerced::Str("ascii".into()),
            calls: 0,
        };
        let set = registry
            .set_default_internal(EncodingArg::Coercible(&mut mock))
            .unwrap();
        assert!(mock.calls >= 1);
        assert_eq!(set, registry.find("US-ASCII"));
        assert_eq!(registry.default_internal(), registry.find("US-ASCII"));
    }

    #[test]
    fn failed_assignment_leaves_state_untouched() {
        let registry = EncodingRegistry::new("UTF-8").unwrap();
        let binary = registry.find("BINARY").unwrap();
        registry
            .set_default_internal(EncodingArg::Encoding(binary))
            .unwrap();
        let mut mock = Fixed {
            reply: Coerced::NotAString("Integer".into()),
            calls: 0,
        };
        let err = registry
            .set_default_internal(EncodingArg::Coercible(&mut mock))
            .unwrap_err();
        assert_eq!(err.class_name(), "TypeError");
        assert_eq!(registry.default_internal(), Some(binary));
        let err = registry
            .set_default_internal(EncodingArg::Name("no-such-encoding"))
            .unwrap_err();
        assert_eq!(err, RuntimeError::UnknownEncoding("no-such-encoding".into()));
        assert_eq!(registry.default_internal(), Some(binary));
    }

    #[test]
    fn external_cannot_be_unset() {
        let registry = EncodingRegistry::new("UTF-8").unwrap();
        let err = registry.set_default_external(EncodingArg::Nil).unwrap_err();
        assert_eq!(err.class_name(), "ArgumentError");
    }

    #[test]
    fn unknown_initial_external_is_rejected() {
        assert!(EncodingRegistry::new("KLINGON").is_err());
    }
}
