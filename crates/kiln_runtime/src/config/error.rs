use thiserror::Error;

/// Failures while populating or strictly querying the configuration table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("value of {key} must be a String, not {kind}")]
    NonStringValue { key: String, kind: &'static str },

    #[error("configuration keys must be Strings, not {0}")]
    NonStringKey(&'static str),

    #[error("duplicate configuration key {0}")]
    DuplicateKey(String),

    #[error("line {line}: cannot parse '{text}'")]
    MalformedLine { line: usize, text: String },

    #[error("key not found: {0}")]
    MissingKey(String),

    #[error("cannot read {path}: {message}")]
    Io { path: String, message: String },
}
