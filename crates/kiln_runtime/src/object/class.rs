//! Class, module and singleton-class records.
//!
//! A `ClassObject` is addressed by a stable `ClassId` in the object graph arena.
//! Its superclass is fixed at creation; everything that can be reopened later
//! (methods, constants, mixins, ivars, name) sits behind its own lock so that
//! readers never observe a half-applied update.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use smallvec::SmallVec;

use crate::core::{
    ClassId, FastHashMap, FastIndexMap, Symbol, Value, fast_index_map_new, fast_map_new,
};
use crate::errors::RtResult;
use crate::runtime::Runtime;

/// Callable body of a method: receiver and arguments in, value out.
pub type NativeFn = Arc<dyn Fn(&mut Runtime, Value, &[Value]) -> RtResult<Value> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Module,
    /// Metaclass of a class or module, or the per-object class of an instance.
    Singleton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Protected,
}

#[derive(Clone)]
pub enum MethodBody {
    Native(NativeFn),
    /// Left behind by `undef_method`; stops lookup.
    Undefined,
}

#[derive(Clone)]
pub struct MethodEntry {
    pub owner: ClassId,
    pub name: Symbol,
    pub body: MethodBody,
    pub visibility: Visibility,
}

impl MethodEntry {
    pub fn is_defined(&self) -> bool {
        !matches!(self.body, MethodBody::Undefined)
    }
}

impl fmt::Debug for MethodEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodEntry")
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field("defined", &self.is_defined())
            .field("visibility", &self.visibility)
            .finish()
    }
}

/// A constant slot. The flags survive reassignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstEntry {
    pub value: Value,
    pub private: bool,
    pub deprecated: bool,
}

impl ConstEntry {
    fn new(value: Value) -> Self {
        Self {
            value,
            private: false,
            deprecated: false,
        }
    }
}

pub struct ClassObject {
    pub id: ClassId,
    pub kind: ClassKind,
    superclass: Option<ClassId>,
    /// For singleton classes: the class, module or object this class belongs to.
    attached: Option<Value>,
    /// Created during bootstrap; subject to the sealed-core policy.
    core: bool,
    name: RwLock<Option<String>>,
    owner: RwLock<Option<ClassId>>,
    singleton: Mutex<Option<ClassId>>,
    methods: RwLock<FastHashMap<Symbol, MethodEntry>>,
    constants: RwLock<FastIndexMap<Symbol, ConstEntry>>,
    includes: RwLock<SmallVec<[ClassId; 2]>>,
    prepends: RwLock<SmallVec<[ClassId; 2]>>,
    ivars: RwLock<FastIndexMap<Symbol, Value>>,
    frozen: AtomicBool,
}

impl ClassObject {
    pub(crate) fn new(
        id: ClassId,
        kind: ClassKind,
        superclass: Option<ClassId>,
        attached: Option<Value>,
        core: bool,
    ) -> Self {
        Self {
            id,
            kind,
            superclass,
            attached,
            core,
            name: RwLock::new(None),
            owner: RwLock::new(None),
            singleton: Mutex::new(None),
            methods: RwLock::new(fast_map_new()),
            constants: RwLock::new(fast_index_map_new()),
            includes: RwLock::new(SmallVec::new()),
            prepends: RwLock::new(SmallVec::new()),
            ivars: RwLock::new(fast_index_map_new()),
            frozen: AtomicBool::new(false),
        }
    }

    pub fn superclass(&self) -> Option<ClassId> {
        self.superclass
    }

    pub fn attached(&self) -> Option<Value> {
        self.attached
    }

    pub fn is_core(&self) -> bool {
        self.core
    }

    pub fn is_singleton(&self) -> bool {
        self.kind == ClassKind::Singleton
    }

    pub fn is_module(&self) -> bool {
        self.kind == ClassKind::Module
    }

    pub fn name(&self) -> Option<String> {
        self.name.read().clone()
    }

    pub(crate) fn set_name(&self, name: String) {
        *self.name.write() = Some(name);
    }

    pub fn owner(&self) -> Option<ClassId> {
        *self.owner.read()
    }

    pub(crate) fn set_owner(&self, owner: ClassId) {
        *self.owner.write() = Some(owner);
    }

    /// Slot holding the memoized singleton class.
    pub(crate) fn singleton_slot(&self) -> &Mutex<Option<ClassId>> {
        &self.singleton
    }

    pub fn singleton(&self) -> Option<ClassId> {
        *self.singleton.lock()
    }

    // Methods

    pub fn method(&self, name: Symbol) -> Option<MethodEntry> {
        self.methods.read().get(&name).cloned()
    }

    pub(crate) fn put_method(&self, entry: MethodEntry) -> Option<MethodEntry> {
        self.methods.write().insert(entry.name, entry)
    }

    pub(crate) fn take_method(&self, name: Symbol) -> Option<MethodEntry> {
        self.methods.write().remove(&name)
    }

    pub fn method_names(&self) -> Vec<Symbol> {
        self.methods.read().keys().copied().collect()
    }

    /// Snapshot of every own entry, tombstones included.
    pub fn method_entries(&self) -> Vec<MethodEntry> {
        self.methods.read().values().cloned().collect()
    }

    // Constants

    pub fn constant(&self, name: Symbol) -> Option<Value> {
        self.constants.read().get(&name).map(|e| e.value)
    }

    pub fn constant_entry(&self, name: Symbol) -> Option<ConstEntry> {
        self.constants.read().get(&name).copied()
    }

    pub(crate) fn put_constant(&self, name: Symbol, value: Value) -> Option<Value> {
        let mut constants = self.constants.write();
        match constants.get_mut(&name) {
            Some(entry) => Some(std::mem::replace(&mut entry.value, value)),
            None => {
                constants.insert(name, ConstEntry::new(value));
                None
            }
        }
    }

    pub(crate) fn take_constant(&self, name: Symbol) -> Option<Value> {
        self.constants.write().shift_remove(&name).map(|e| e.value)
    }

    /// False if no such own constant.
    pub(crate) fn set_constant_private(&self, name: Symbol, private: bool) -> bool {
        self.constants
            .write()
            .get_mut(&name)
            .map(|e| e.private = private)
            .is_some()
    }

    pub(crate) fn deprecate_constant(&self, name: Symbol) -> bool {
        self.constants
            .write()
            .get_mut(&name)
            .map(|e| e.deprecated = true)
            .is_some()
    }

    pub fn constant_names(&self) -> Vec<Symbol> {
        self.constants.read().keys().copied().collect()
    }

    pub fn public_constant_names(&self) -> Vec<Symbol> {
        self.constants
            .read()
            .iter()
            .filter(|(_, e)| !e.private)
            .map(|(k, _)| *k)
            .collect()
    }

    // Mixins, most recent first

    pub fn includes(&self) -> SmallVec<[ClassId; 2]> {
        self.includes.read().clone()
    }

    pub(crate) fn push_include(&self, module: ClassId) {
        self.includes.write().insert(0, module);
    }

    pub fn prepends(&self) -> SmallVec<[ClassId; 2]> {
        self.prepends.read().clone()
    }

    pub(crate) fn push_prepend(&self, module: ClassId) {
        self.prepends.write().insert(0, module);
    }

    // Instance variables on the class object itself

    pub fn ivar(&self, name: Symbol) -> Option<Value> {
        self.ivars.read().get(&name).copied()
    }

    pub(crate) fn set_ivar(&self, name: Symbol, value: Value) {
        self.ivars.write().insert(name, value);
    }

    pub fn ivar_names(&self) -> Vec<Symbol> {
        self.ivars.read().keys().copied().collect()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    pub(crate) fn freeze(&self) {
        self.frozen.store(true, Ordering::Release);
    }
}

impl fmt::Debug for ClassObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassObject")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("name", &self.name())
            .field("superclass", &self.superclass)
            .finish()
    }
}
