//! Runtime error kinds.
//!
//! Dispatch and encoding assignment surface these to the immediate caller.
//! Lookup misses (constants, config keys, ivars) are plain `Option`s instead.

use thiserror::Error;

pub mod messages {
    pub const NOT_A_CLASS: &str = "superclass must be a Class";
    pub const NOT_A_MODULE: &str = "wrong argument type (expected Module)";
    pub const SINGLETON_SUBCLASS: &str = "can't make subclass of singleton class";
    pub const SINGLETON_INSTANCE: &str = "can't create instance of singleton class";
    pub const NO_SINGLETON: &str = "can't define singleton";
    pub const DEFAULT_EXTERNAL_NIL: &str = "default external can not be nil";
}

pub type RtResult<T> = Result<T, RuntimeError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Dispatch exhausted, including the `method_missing` fallback.
    #[error("undefined method '{name}' for {receiver}")]
    NoSuchMethod { name: String, receiver: String },

    #[error("private method '{name}' called for {receiver}")]
    PrivateMethod { name: String, receiver: String },

    #[error("{0}")]
    TypeMismatch(String),

    /// Raised only by the strict constant getter.
    #[error("uninitialized constant {scope}::{name}")]
    NameError { scope: String, name: String },

    /// `scope` is empty for top-level constants.
    #[error("private constant {scope}::{name} referenced")]
    PrivateConstant { scope: String, name: String },

    #[error("constant {scope}::{name} not defined")]
    ConstantNotDefined { scope: String, name: String },

    #[error("wrong constant name {0}")]
    InvalidConstantName(String),

    #[error("'{0}' is not allowed as an instance variable name")]
    InvalidIvarName(String),

    #[error("method '{name}' not defined in {owner}")]
    MethodNotDefined { name: String, owner: String },

    #[error("can't modify frozen {0}")]
    Frozen(String),

    #[error("{0}")]
    Argument(String),

    #[error("unknown encoding name - {0}")]
    UnknownEncoding(String),
}

impl RuntimeError {
    /// Name of the exception class this error corresponds to.
    pub fn class_name(&self) -> &'static str {
        match self {
            RuntimeError::NoSuchMethod { .. } | RuntimeError::PrivateMethod { .. } => {
                "NoMethodError"
            }
            RuntimeError::TypeMismatch(_) => "TypeError",
            RuntimeError::NameError { .. }
            | RuntimeError::PrivateConstant { .. }
            | RuntimeError::ConstantNotDefined { .. }
            | RuntimeError::InvalidConstantName(_)
            | RuntimeError::InvalidIvarName(_)
            | RuntimeError::MethodNotDefined { .. } => "NameError",
            RuntimeError::Frozen(_) => "FrozenError",
            RuntimeError::Argument(_) | RuntimeError::UnknownEncoding(_) => "ArgumentError",
        }
    }

    pub fn argument_count(given: usize, expected: usize) -> Self {
        RuntimeError::Argument(format!(
            "wrong number of arguments (given {given}, expected {expected})"
        ))
    }

    pub fn no_implicit_conversion(from: &str, to: &str) -> Self {
        RuntimeError::TypeMismatch(format!("no implicit conversion of {from} into {to}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_names_follow_exception_hierarchy() {
        let e = RuntimeError::NoSuchMethod {
            name: "foo".into(),
            receiver: "an instance of Foo".into(),
        };
        assert_eq!(e.class_name(), "NoMethodError");
        assert_eq!(e.to_string(), "undefined method 'foo' for an instance of Foo");
        assert_eq!(
            RuntimeError::UnknownEncoding("bogus".into()).class_name(),
            "ArgumentError"
        );
        assert_eq!(
            RuntimeError::no_implicit_conversion("Object", "String").to_string(),
            "no implicit conversion of Object into String"
        );
    }
}
