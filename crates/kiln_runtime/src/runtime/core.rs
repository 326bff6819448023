use std::sync::Arc;

use kiln_core::value::{INT_MAX, INT_MIN};
use tracing::debug;

use crate::builtins_registry::{BuiltinProvider, BuiltinRegistry, StdBuiltinProvider};
use crate::config::ConfigRegistry;
use crate::constants::ConstantResolver;
use crate::core::{
    ClassId, EncodingId, Heap, ObjectId, Payload, RObject, Symbol, Value, ValueKind,
};
use crate::encoding::{Coerced, CoercesToString, EncodingArg, EncodingRegistry};
use crate::errors::{RtResult, RuntimeError, messages};
use crate::object::names::{encoding_constant_names, is_ivar_name};
use crate::object::{
    ClassKind, CoreClasses, MethodBody, MethodEntry, NativeFn, ObjectGraph, Visibility,
};

use super::config::RuntimeConfig;

/// One interpreter instance: a class graph, an object heap and handles to the
/// shared encoding and configuration registries.
pub struct Runtime {
    graph: Arc<ObjectGraph>,
    pub(crate) heap: Heap,
    encodings: Arc<EncodingRegistry>,
    config: Arc<ConfigRegistry>,
    options: RuntimeConfig,
    /// Body of the stock `BasicObject#method_missing`, which only raises.
    pub(crate) default_missing: Option<NativeFn>,
}

impl Runtime {
    pub fn new() -> Self {
        Self::with_parts(
            RuntimeConfig::default(),
            Arc::new(EncodingRegistry::default()),
            Arc::new(ConfigRegistry::empty()),
        )
    }

    /// Fails only if `config.default_external` names no known encoding.
    pub fn with_config(config: RuntimeConfig) -> RtResult<Self> {
        let encodings = EncodingRegistry::new(config.default_external)?;
        Ok(Self::with_parts(
            config,
            Arc::new(encodings),
            Arc::new(ConfigRegistry::empty()),
        ))
    }

    /// Build a runtime around registries that may be shared with other runtimes.
    pub fn with_parts(
        options: RuntimeConfig,
        encodings: Arc<EncodingRegistry>,
        config: Arc<ConfigRegistry>,
    ) -> Self {
        let mut rt = Self {
            graph: Arc::new(ObjectGraph::new()),
            heap: Heap::new(),
            encodings,
            config,
            options,
            default_missing: None,
        };
        rt.install_provider(&StdBuiltinProvider);
        rt.register_encoding_constants();
        let missing = rt.intern("method_missing");
        rt.default_missing = match rt.graph.get(rt.core().basic_object).method(missing) {
            Some(MethodEntry {
                body: MethodBody::Native(body),
                ..
            }) => Some(body),
            _ => None,
        };
        rt
    }

    pub fn install_provider(&self, provider: &dyn BuiltinProvider) {
        let mut registry = BuiltinRegistry::new();
        provider.install(self.graph.core(), &mut registry);
        registry.install_into(&self.graph);
    }

    fn register_encoding_constants(&self) {
        let encoding = self.graph.get(self.core().encoding);
        for id in self.encodings.list() {
            for name in self.encodings.info(id).names() {
                for constant in encoding_constant_names(name) {
                    let sym = self.graph.intern(&constant);
                    if encoding.constant(sym).is_none() {
                        encoding.put_constant(sym, Value::encoding(id));
                    }
                }
            }
        }
    }

    pub fn graph(&self) -> &ObjectGraph {
        &self.graph
    }

    pub fn core(&self) -> CoreClasses {
        *self.graph.core()
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn encodings(&self) -> &EncodingRegistry {
        &self.encodings
    }

    pub fn config(&self) -> &ConfigRegistry {
        &self.config
    }

    pub fn options(&self) -> &RuntimeConfig {
        &self.options
    }

    // Symbols and strings

    pub fn intern(&self, name: &str) -> Symbol {
        self.graph.intern(name)
    }

    pub fn symbol(&self, name: &str) -> Value {
        Value::symbol(self.graph.intern(name))
    }

    pub fn symbol_name(&self, sym: Symbol) -> String {
        self.graph.symbol_name(sym)
    }

    pub fn new_string(&mut self, s: impl Into<String>) -> Value {
        let id = self
            .heap
            .alloc(RObject::new(self.core().string, Payload::Str(s.into())));
        Value::str(id)
    }

    /// A string as a source literal would produce it.
    pub fn str_literal(&mut self, s: impl Into<String>) -> Value {
        let value = self.new_string(s);
        if self.options.frozen_string_literal {
            self.heap.get_mut(value.as_obj_id()).frozen = true;
        }
        value
    }

    pub fn str_of(&self, value: Value) -> Option<&str> {
        match value.kind() {
            ValueKind::Str(id) => self.heap.get(id).as_str(),
            _ => None,
        }
    }

    pub fn new_array(&mut self, items: Vec<Value>) -> Value {
        let id = self
            .heap
            .alloc(RObject::new(self.core().array, Payload::Array(items)));
        Value::object(id)
    }

    pub fn array_of(&self, value: Value) -> Option<&[Value]> {
        match value.kind() {
            ValueKind::Object(id) => self.heap.get(id).as_array(),
            _ => None,
        }
    }

    /// Configuration value as a fresh string, frozen per the value policy.
    pub fn config_value(&mut self, key: &str) -> Option<Value> {
        let entry = self.config.entry(key)?.clone();
        let value = self.new_string(entry.value);
        self.heap.get_mut(value.as_obj_id()).frozen = entry.frozen;
        Some(value)
    }

    // Classes and instances

    pub fn new_class(&self, superclass: ClassId) -> RtResult<ClassId> {
        self.graph.new_class(superclass)
    }

    pub fn new_module(&self) -> ClassId {
        self.graph.new_module()
    }

    pub fn define_class(
        &self,
        scope: ClassId,
        name: &str,
        superclass: Option<ClassId>,
    ) -> RtResult<ClassId> {
        self.check_frozen(scope)?;
        self.graph.define_class(scope, name, superclass)
    }

    pub fn define_module(&self, scope: ClassId, name: &str) -> RtResult<ClassId> {
        self.check_frozen(scope)?;
        self.graph.define_module(scope, name)
    }

    /// A fresh, uninitialized instance of `class`.
    pub fn allocate(&mut self, class: ClassId) -> RtResult<Value> {
        let core = self.core();
        match self.graph.get(class).kind {
            ClassKind::Class => {}
            ClassKind::Singleton => {
                return Err(RuntimeError::TypeMismatch(messages::SINGLETON_INSTANCE.into()));
            }
            ClassKind::Module => {
                return Err(RuntimeError::TypeMismatch(format!(
                    "{} is a module",
                    self.graph.display_name(class)
                )));
            }
        }
        if self.graph.is_kind_of(class, core.module) {
            let created = if self.graph.is_kind_of(class, core.class) {
                self.graph.new_class(core.object)?
            } else {
                self.graph.new_module()
            };
            return Ok(Value::class(created));
        }
        let no_allocator = [
            core.integer,
            core.float,
            core.symbol,
            core.nil_class,
            core.true_class,
            core.false_class,
            core.encoding,
        ];
        if no_allocator.iter().any(|&c| self.graph.is_kind_of(class, c)) {
            return Err(RuntimeError::TypeMismatch(format!(
                "allocator undefined for {}",
                self.graph.display_name(class)
            )));
        }
        if self.graph.is_kind_of(class, core.string) {
            let id = self.heap.alloc(RObject::new(class, Payload::Str(String::new())));
            return Ok(Value::str(id));
        }
        if self.graph.is_kind_of(class, core.array) {
            let id = self.heap.alloc(RObject::new(class, Payload::Array(Vec::new())));
            return Ok(Value::object(id));
        }
        let id = self.heap.alloc(RObject::new(class, Payload::Plain));
        Ok(Value::object(id))
    }

    /// Allocate and send `initialize` with `args`.
    pub fn instantiate(&mut self, class: ClassId, args: &[Value]) -> RtResult<Value> {
        let value = self.allocate(class)?;
        self.send(value, "initialize", args)?;
        Ok(value)
    }

    /// The non-singleton class of a value.
    pub fn class_of(&self, value: Value) -> ClassId {
        let core = self.core();
        match value.kind() {
            ValueKind::Nil => core.nil_class,
            ValueKind::Bool(true) => core.true_class,
            ValueKind::Bool(false) => core.false_class,
            ValueKind::Int(_) => core.integer,
            ValueKind::Float(_) => core.float,
            ValueKind::Symbol(_) => core.symbol,
            ValueKind::Encoding(_) => core.encoding,
            ValueKind::Str(id) | ValueKind::Object(id) => self.heap.get(id).class,
            ValueKind::Class(id) => self.graph.class_of_class(id),
        }
    }

    /// Where method lookup starts: the singleton class if one exists.
    pub fn dispatch_class(&self, value: Value) -> ClassId {
        match value.kind() {
            ValueKind::Str(id) | ValueKind::Object(id) => self.heap.get(id).dispatch_class(),
            ValueKind::Class(id) => self.graph.metaclass_of(id),
            _ => self.class_of(value),
        }
    }

    /// Singleton class of `value`, created on first request.
    ///
    /// `nil`, `true` and `false` answer their own classes; numbers, symbols and
    /// encodings cannot have one.
    pub fn singleton_class_of(&mut self, value: Value) -> RtResult<ClassId> {
        match value.kind() {
            ValueKind::Class(id) => Ok(self.graph.metaclass_of(id)),
            ValueKind::Str(id) | ValueKind::Object(id) => Ok(self.object_singleton(value, id)),
            ValueKind::Nil | ValueKind::Bool(_) => Ok(self.class_of(value)),
            ValueKind::Int(_) | ValueKind::Float(_) | ValueKind::Symbol(_) | ValueKind::Encoding(_) => {
                Err(RuntimeError::TypeMismatch(messages::NO_SINGLETON.into()))
            }
        }
    }

    fn object_singleton(&mut self, value: Value, id: ObjectId) -> ClassId {
        if let Some(singleton) = self.heap.get(id).singleton {
            return singleton;
        }
        let class = self.heap.get(id).class;
        let singleton = self.graph.new_object_singleton(value, class);
        self.heap.get_mut(id).singleton = Some(singleton);
        singleton
    }

    pub fn is_a(&self, value: Value, class: ClassId) -> bool {
        self.graph.is_kind_of(self.dispatch_class(value), class)
    }

    pub fn ancestors(&self, class: ClassId) -> Vec<ClassId> {
        self.graph.ancestors(class)
    }

    // Method tables

    /// Define or redefine a public method. Calls already in progress keep
    /// running the body they started with.
    pub fn define_method<F>(&self, class: ClassId, name: &str, body: F) -> RtResult<Symbol>
    where
        F: Fn(&mut Runtime, Value, &[Value]) -> RtResult<Value> + Send + Sync + 'static,
    {
        self.add_method(class, name, MethodBody::Native(Arc::new(body)), Visibility::Public)
    }

    pub fn define_singleton_method<F>(&mut self, value: Value, name: &str, body: F) -> RtResult<Symbol>
    where
        F: Fn(&mut Runtime, Value, &[Value]) -> RtResult<Value> + Send + Sync + 'static,
    {
        let singleton = self.singleton_class_of(value)?;
        self.define_method(singleton, name, body)
    }

    pub(crate) fn add_method(
        &self,
        class: ClassId,
        name: &str,
        body: MethodBody,
        visibility: Visibility,
    ) -> RtResult<Symbol> {
        self.check_mutable(class)?;
        let sym = self.graph.intern(name);
        let previous = self.graph.get(class).put_method(MethodEntry {
            owner: class,
            name: sym,
            body,
            visibility,
        });
        debug!(
            class = %self.graph.display_name(class),
            method = %name,
            redefined = previous.is_some(),
            "method defined"
        );
        Ok(sym)
    }

    /// Delete the class's own entry; lookup then continues in its ancestors.
    pub fn remove_method(&self, class: ClassId, name: &str) -> RtResult<()> {
        self.check_mutable(class)?;
        let target = self.graph.get(class);
        let own = self
            .graph
            .lookup_symbol(name)
            .filter(|sym| target.method(*sym).is_some_and(|e| e.is_defined()));
        let Some(sym) = own else {
            return Err(self.method_not_defined(class, name));
        };
        target.take_method(sym);
        debug!(class = %self.graph.display_name(class), method = %name, "method removed");
        Ok(())
    }

    /// Hide `name` from this class and its descendants, inherited or not.
    pub fn undef_method(&self, class: ClassId, name: &str) -> RtResult<()> {
        self.check_mutable(class)?;
        let found = self
            .graph
            .lookup_symbol(name)
            .filter(|sym| self.graph.find_method(class, *sym).is_some());
        let Some(sym) = found else {
            return Err(self.method_not_defined(class, name));
        };
        self.graph.get(class).put_method(MethodEntry {
            owner: class,
            name: sym,
            body: MethodBody::Undefined,
            visibility: Visibility::Public,
        });
        debug!(class = %self.graph.display_name(class), method = %name, "method undefined");
        Ok(())
    }

    pub fn alias_method(&self, class: ClassId, new_name: &str, old_name: &str) -> RtResult<Symbol> {
        let entry = self
            .graph
            .lookup_symbol(old_name)
            .and_then(|sym| self.graph.find_method(class, sym))
            .ok_or_else(|| self.method_not_defined(class, old_name))?;
        self.add_method(class, new_name, entry.body, entry.visibility)
    }

    /// Change visibility, copying an inherited entry into `class` when needed.
    pub fn set_visibility(&self, class: ClassId, name: &str, visibility: Visibility) -> RtResult<()> {
        let entry = self
            .graph
            .lookup_symbol(name)
            .and_then(|sym| self.graph.find_method(class, sym))
            .ok_or_else(|| self.method_not_defined(class, name))?;
        if entry.visibility == visibility {
            return Ok(());
        }
        self.add_method(class, name, entry.body, visibility)?;
        Ok(())
    }

    pub fn include_module(&self, class: ClassId, module: ClassId) -> RtResult<bool> {
        self.check_mutable(class)?;
        self.graph.include_module(class, module)
    }

    pub fn prepend_module(&self, class: ClassId, module: ClassId) -> RtResult<bool> {
        self.check_mutable(class)?;
        self.graph.prepend_module(class, module)
    }

    /// Public and protected method names along the chain, each once.
    pub fn instance_methods(&self, class: ClassId, include_super: bool) -> Vec<Symbol> {
        let chain = if include_super {
            self.graph.ancestors(class)
        } else {
            vec![class]
        };
        let mut seen = Vec::new();
        let mut out = Vec::new();
        for ancestor in chain {
            let mut entries = self.graph.get(ancestor).method_entries();
            entries.sort_by_key(|e| e.name);
            for entry in entries {
                if seen.contains(&entry.name) {
                    continue;
                }
                seen.push(entry.name);
                if entry.is_defined() && entry.visibility != Visibility::Private {
                    out.push(entry.name);
                }
            }
        }
        out
    }

    pub fn method_defined(&self, class: ClassId, name: &str) -> bool {
        self.graph
            .lookup_symbol(name)
            .and_then(|sym| self.graph.find_method(class, sym))
            .is_some_and(|e| e.visibility != Visibility::Private)
    }

    fn method_not_defined(&self, class: ClassId, name: &str) -> RuntimeError {
        RuntimeError::MethodNotDefined {
            name: name.to_string(),
            owner: self.graph.display_name(class),
        }
    }

    fn check_frozen(&self, class: ClassId) -> RtResult<()> {
        if self.graph.get(class).is_frozen() {
            return Err(RuntimeError::Frozen(self.graph.display_name(class)));
        }
        Ok(())
    }

    /// Method tables of frozen classes, of singleton classes of frozen objects
    /// and, when sealed, of core classes cannot change.
    fn check_mutable(&self, class: ClassId) -> RtResult<()> {
        self.check_frozen(class)?;
        let target = self.graph.get(class);
        if self.options.seal_core_classes && target.is_core() {
            return Err(RuntimeError::Frozen(self.graph.display_name(class)));
        }
        if let Some(attached) = target.attached() {
            if self.is_frozen(attached) {
                return Err(RuntimeError::Frozen(self.inspect(attached)));
            }
        }
        Ok(())
    }

    // Constants

    pub fn const_set(&self, scope: ClassId, name: &str, value: Value) -> RtResult<Value> {
        self.check_frozen(scope)?;
        ConstantResolver::new(&self.graph).set(scope, name, value)
    }

    pub fn const_get(&self, scope: ClassId, name: &str) -> RtResult<Value> {
        ConstantResolver::new(&self.graph).get(scope, name)
    }

    pub fn resolve_constant(&self, scope: ClassId, name: &str, own_only: bool) -> Option<Value> {
        ConstantResolver::new(&self.graph).resolve(scope, name, own_only)
    }

    pub fn const_defined(&self, scope: ClassId, name: &str, inherit: bool) -> RtResult<bool> {
        ConstantResolver::new(&self.graph).is_defined(scope, name, inherit)
    }

    pub fn private_constant(&self, scope: ClassId, name: &str) -> RtResult<()> {
        self.check_frozen(scope)?;
        ConstantResolver::new(&self.graph).set_private(scope, name, true)
    }

    pub fn public_constant(&self, scope: ClassId, name: &str) -> RtResult<()> {
        self.check_frozen(scope)?;
        ConstantResolver::new(&self.graph).set_private(scope, name, false)
    }

    pub fn deprecate_constant(&self, scope: ClassId, name: &str) -> RtResult<()> {
        self.check_frozen(scope)?;
        ConstantResolver::new(&self.graph).deprecate(scope, name)
    }

    pub fn own_constants(&self, class: ClassId) -> Vec<String> {
        let resolver = ConstantResolver::new(&self.graph);
        resolver.names(&resolver.own_constants(class))
    }

    pub fn constants(&self, class: ClassId, inherit: bool) -> Vec<String> {
        let resolver = ConstantResolver::new(&self.graph);
        resolver.names(&resolver.constants(class, inherit))
    }

    // Instance variables and freezing

    fn ivar_symbol(&self, name: &str) -> RtResult<Symbol> {
        if !is_ivar_name(name) {
            return Err(RuntimeError::InvalidIvarName(name.to_string()));
        }
        Ok(self.graph.intern(name))
    }

    pub fn ivar_get(&self, value: Value, name: &str) -> RtResult<Option<Value>> {
        let sym = self.ivar_symbol(name)?;
        Ok(match value.kind() {
            ValueKind::Str(id) | ValueKind::Object(id) => self.heap.get(id).ivars.get(&sym).copied(),
            ValueKind::Class(id) => self.graph.get(id).ivar(sym),
            _ => None,
        })
    }

    pub fn ivar_set(&mut self, value: Value, name: &str, new_value: Value) -> RtResult<Value> {
        let sym = self.ivar_symbol(name)?;
        if self.is_frozen(value) {
            return Err(RuntimeError::Frozen(self.inspect(value)));
        }
        match value.kind() {
            ValueKind::Str(id) | ValueKind::Object(id) => {
                self.heap.get_mut(id).ivars.insert(sym, new_value);
            }
            ValueKind::Class(id) => self.graph.get(id).set_ivar(sym, new_value),
            _ => return Err(RuntimeError::Frozen(self.inspect(value))),
        }
        Ok(new_value)
    }

    pub fn ivar_names(&self, value: Value) -> Vec<Symbol> {
        match value.kind() {
            ValueKind::Str(id) | ValueKind::Object(id) => {
                self.heap.get(id).ivars.keys().copied().collect()
            }
            ValueKind::Class(id) => self.graph.get(id).ivar_names(),
            _ => Vec::new(),
        }
    }

    pub fn freeze(&mut self, value: Value) -> Value {
        match value.kind() {
            ValueKind::Str(id) | ValueKind::Object(id) => self.heap.get_mut(id).frozen = true,
            ValueKind::Class(id) => self.graph.get(id).freeze(),
            _ => {}
        }
        value
    }

    /// Immediates are always frozen.
    pub fn is_frozen(&self, value: Value) -> bool {
        match value.kind() {
            ValueKind::Str(id) | ValueKind::Object(id) => self.heap.get(id).frozen,
            ValueKind::Class(id) => self.graph.get(id).is_frozen(),
            _ => true,
        }
    }

    // Rendering

    /// Integers map to `2n + 1`. Ids past the immediate integer range come
    /// back as an exact Float so that distinct integers never share an id.
    pub fn object_id(&self, value: Value) -> Value {
        let id = match value.kind() {
            ValueKind::Int(n) => {
                let id = 2 * n + 1;
                if !(INT_MIN..=INT_MAX).contains(&id) {
                    return Value::from_f64(id as f64);
                }
                id
            }
            ValueKind::Bool(false) => 0,
            ValueKind::Nil => 8,
            ValueKind::Bool(true) => 20,
            ValueKind::Float(f) => {
                let bits = f.to_bits();
                ((9 << 32) | ((bits ^ (bits >> 32)) & 0xffff_ffff)) as i64 * 2
            }
            _ => {
                let payload = value.to_bits() & 0xffff_ffff;
                (((value.get_tag() << 32) | payload) as i64) * 2
            }
        };
        Value::from_i64(id)
    }

    pub fn to_s(&self, value: Value) -> String {
        match value.kind() {
            ValueKind::Nil => String::new(),
            ValueKind::Symbol(sym) => self.symbol_name(sym),
            ValueKind::Str(id) => self.heap.get(id).as_str().unwrap_or_default().to_string(),
            ValueKind::Encoding(id) => self.encodings.info(id).name.to_string(),
            ValueKind::Object(id) if self.heap.get(id).as_array().is_none() => format!(
                "#<{}:0x{:016x}>",
                self.graph.display_name(self.heap.get(id).class),
                id.0
            ),
            _ => self.inspect(value),
        }
    }

    pub fn inspect(&self, value: Value) -> String {
        match value.kind() {
            ValueKind::Nil => "nil".to_string(),
            ValueKind::Bool(b) => b.to_string(),
            ValueKind::Int(n) => n.to_string(),
            ValueKind::Float(f) => format_float(f),
            ValueKind::Symbol(sym) => format!(":{}", self.symbol_name(sym)),
            ValueKind::Str(id) => format!("{:?}", self.heap.get(id).as_str().unwrap_or_default()),
            ValueKind::Class(id) => self.graph.display_name(id),
            ValueKind::Encoding(id) => {
                let info = self.encodings.info(id);
                if info.dummy {
                    format!("#<Encoding:{} (dummy)>", info.name)
                } else {
                    format!("#<Encoding:{}>", info.name)
                }
            }
            ValueKind::Object(id) => {
                let obj = self.heap.get(id);
                if let Some(items) = obj.as_array() {
                    let parts: Vec<String> = items.iter().map(|v| self.inspect(*v)).collect();
                    return format!("[{}]", parts.join(", "));
                }
                let class = self.graph.display_name(obj.class);
                if obj.ivars.is_empty() {
                    return format!("#<{class}:0x{:016x}>", id.0);
                }
                let ivars: Vec<String> = obj
                    .ivars
                    .iter()
                    .map(|(k, v)| format!("{}={}", self.symbol_name(*k), self.inspect(*v)))
                    .collect();
                format!("#<{class}:0x{:016x} {}>", id.0, ivars.join(", "))
            }
        }
    }

    /// How error messages refer to a receiver.
    pub fn describe_receiver(&self, value: Value) -> String {
        match value.kind() {
            ValueKind::Nil | ValueKind::Bool(_) => self.inspect(value),
            ValueKind::Class(id) => {
                let kind = if self.graph.get(id).is_module() { "module" } else { "class" };
                format!("{kind} {}", self.graph.display_name(id))
            }
            _ => format!(
                "an instance of {}",
                self.graph.display_name(self.class_of(value))
            ),
        }
    }

    // Encoding defaults

    pub fn default_internal(&self) -> Value {
        self.encodings
            .default_internal()
            .map(Value::encoding)
            .unwrap_or(Value::NIL)
    }

    pub fn default_external(&self) -> Value {
        Value::encoding(self.encodings.default_external())
    }

    /// Accepts nil, an encoding, a string, or any object answering `to_str`.
    pub fn set_default_internal(&mut self, value: Value) -> RtResult<Value> {
        let encodings = Arc::clone(&self.encodings);
        let set = self.with_encoding_arg(value, |arg| encodings.set_default_internal(arg))?;
        Ok(set.map(Value::encoding).unwrap_or(Value::NIL))
    }

    pub fn set_default_external(&mut self, value: Value) -> RtResult<Value> {
        let encodings = Arc::clone(&self.encodings);
        let set = self.with_encoding_arg(value, |arg| encodings.set_default_external(arg))?;
        Ok(Value::encoding(set))
    }

    fn with_encoding_arg<T>(
        &mut self,
        value: Value,
        apply: impl FnOnce(EncodingArg<'_>) -> RtResult<T>,
    ) -> RtResult<T> {
        match value.kind() {
            ValueKind::Nil => apply(EncodingArg::Nil),
            ValueKind::Encoding(id) => apply(EncodingArg::Encoding(id)),
            ValueKind::Str(_) => {
                let name = self.str_of(value).unwrap_or_default().to_string();
                apply(EncodingArg::Name(&name))
            }
            _ if self.respond_to(value, "to_str", true) => {
                let mut coercion = MethodCoercion { rt: self, value };
                apply(EncodingArg::Coercible(&mut coercion))
            }
            _ => {
                let ty = self.graph.display_name(self.class_of(value));
                apply(EncodingArg::Incoercible(ty))
            }
        }
    }

    pub fn encoding_id(&self, value: Value) -> Option<EncodingId> {
        value.is_encoding().then(|| value.as_encoding_id())
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

/// Coerces by sending `to_str`.
struct MethodCoercion<'a> {
    rt: &'a mut Runtime,
    value: Value,
}

impl CoercesToString for MethodCoercion<'_> {
    fn type_name(&self) -> String {
        self.rt.graph.display_name(self.rt.class_of(self.value))
    }

    fn coerce_to_string(&mut self) -> RtResult<Coerced> {
        let result = self.rt.send(self.value, "to_str", &[])?;
        Ok(match self.rt.str_of(result) {
            Some(s) => Coerced::Str(s.to_string()),
            None => Coerced::NotAString(self.rt.graph.display_name(self.rt.class_of(result))),
        })
    }
}

pub(crate) fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{f:.1}")
    } else {
        f.to_string()
    }
}
