//! Runtime configuration options.

/// Whether strings handed out by the configuration table are frozen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ValuePolicy {
    #[default]
    Mutable,
    Frozen,
}

#[derive(Clone, Copy, Debug)]
pub struct RuntimeConfig {
    /// String literals created through `Runtime::str_literal` start frozen.
    /// Configuration values are not affected.
    pub frozen_string_literal: bool,
    /// Refuse method table changes on the bootstrap classes and their metaclasses.
    pub seal_core_classes: bool,
    pub config_value_policy: ValuePolicy,
    pub default_external: &'static str,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            frozen_string_literal: false,
            seal_core_classes: false,
            config_value_policy: ValuePolicy::Mutable,
            default_external: "UTF-8",
        }
    }
}
