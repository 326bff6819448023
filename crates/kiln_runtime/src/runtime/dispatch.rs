//! Method dispatch for Runtime.
//!
//! Lookup walks the receiver's singleton class, its class and the ancestors of
//! that class. A miss retries the walk for `method_missing`, passing the name as
//! a leading symbol argument. `BasicObject#method_missing` itself raises, so a
//! miss only escapes as `NoSuchMethod` if every `method_missing` declines.

use std::sync::Arc;

use smallvec::SmallVec;
use tracing::trace;

use crate::core::{Symbol, Value};
use crate::errors::{RtResult, RuntimeError};
use crate::object::{MethodBody, MethodEntry, Visibility};

use super::core::Runtime;

const METHOD_MISSING: &str = "method_missing";

impl Runtime {
    /// Call with an explicit receiver; private methods are refused.
    pub fn invoke(&mut self, receiver: Value, name: &str, args: &[Value]) -> RtResult<Value> {
        self.dispatch_name(receiver, name, args, true)
    }

    /// Call regardless of visibility.
    pub fn send(&mut self, receiver: Value, name: &str, args: &[Value]) -> RtResult<Value> {
        self.dispatch_name(receiver, name, args, false)
    }

    pub fn send_symbol(&mut self, receiver: Value, sym: Symbol, args: &[Value]) -> RtResult<Value> {
        self.dispatch(receiver, sym, args, false)
    }

    pub fn find_method(&self, receiver: Value, name: &str) -> Option<MethodEntry> {
        let sym = self.graph().lookup_symbol(name)?;
        self.graph().find_method(self.dispatch_class(receiver), sym)
    }

    pub fn respond_to(&self, receiver: Value, name: &str, include_private: bool) -> bool {
        self.find_method(receiver, name)
            .is_some_and(|e| include_private || e.visibility != Visibility::Private)
    }

    /// No method table can hold a name that was never interned, so an unknown
    /// name goes straight to `method_missing`. It is interned only when a
    /// user-defined hook is there to receive it as a symbol.
    fn dispatch_name(
        &mut self,
        receiver: Value,
        name: &str,
        args: &[Value],
        check_visibility: bool,
    ) -> RtResult<Value> {
        if let Some(sym) = self.graph().lookup_symbol(name) {
            return self.dispatch(receiver, sym, args, check_visibility);
        }
        if self.has_custom_missing(receiver) {
            let sym = self.intern(name);
            return self.method_missing(receiver, sym, args);
        }
        Err(RuntimeError::NoSuchMethod {
            name: name.to_owned(),
            receiver: self.describe_receiver(receiver),
        })
    }

    fn has_custom_missing(&self, receiver: Value) -> bool {
        let Some(missing) = self.graph().lookup_symbol(METHOD_MISSING) else {
            return false;
        };
        let Some(hook) = self.graph().find_method(self.dispatch_class(receiver), missing) else {
            return false;
        };
        match (&hook.body, &self.default_missing) {
            (MethodBody::Native(body), Some(stock)) => !Arc::ptr_eq(body, stock),
            _ => true,
        }
    }

    fn dispatch(
        &mut self,
        receiver: Value,
        name: Symbol,
        args: &[Value],
        check_visibility: bool,
    ) -> RtResult<Value> {
        let class = self.dispatch_class(receiver);
        if let Some(entry) = self.graph().find_method(class, name) {
            if check_visibility && entry.visibility == Visibility::Private {
                return Err(RuntimeError::PrivateMethod {
                    name: self.symbol_name(name),
                    receiver: self.describe_receiver(receiver),
                });
            }
            trace!(class = class.0, method = %self.symbol_name(name), owner = entry.owner.0, "dispatch");
            return self.call_entry(&entry, receiver, args);
        }
        self.method_missing(receiver, name, args)
    }

    fn method_missing(&mut self, receiver: Value, name: Symbol, args: &[Value]) -> RtResult<Value> {
        let missing = self.intern(METHOD_MISSING);
        let class = self.dispatch_class(receiver);
        let hook = if name == missing {
            None
        } else {
            self.graph().find_method(class, missing)
        };
        let Some(hook) = hook else {
            return Err(RuntimeError::NoSuchMethod {
                name: self.symbol_name(name),
                receiver: self.describe_receiver(receiver),
            });
        };
        trace!(class = class.0, method = %self.symbol_name(name), owner = hook.owner.0, "method_missing fallback");
        let mut full: SmallVec<[Value; 4]> = SmallVec::with_capacity(args.len() + 1);
        full.push(Value::symbol(name));
        full.extend(args.iter().copied());
        self.call_entry(&hook, receiver, &full)
    }

    fn call_entry(&mut self, entry: &MethodEntry, receiver: Value, args: &[Value]) -> RtResult<Value> {
        match &entry.body {
            MethodBody::Native(body) => {
                // The table may be rewritten by the body itself.
                let body = body.clone();
                body(self, receiver, args)
            }
            MethodBody::Undefined => Err(RuntimeError::NoSuchMethod {
                name: self.symbol_name(entry.name),
                receiver: self.describe_receiver(receiver),
            }),
        }
    }
}
