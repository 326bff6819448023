//! Heap storage for instances and strings.
//!
//! Objects are never reclaimed; a handle stays valid for the lifetime of the
//! heap that issued it.

use super::{ClassId, FastIndexMap, ObjectId, Symbol, Value, fast_index_map_new};

#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Plain,
    Str(String),
    Array(Vec<Value>),
}

#[derive(Clone, Debug)]
pub struct RObject {
    pub class: ClassId,
    /// Created lazily on first per-object method definition or metaclass access.
    pub singleton: Option<ClassId>,
    pub ivars: FastIndexMap<Symbol, Value>,
    pub frozen: bool,
    pub payload: Payload,
}

impl RObject {
    pub fn new(class: ClassId, payload: Payload) -> Self {
        Self {
            class,
            singleton: None,
            ivars: fast_index_map_new(),
            frozen: false,
            payload,
        }
    }

    /// Class consulted first by dispatch.
    pub fn dispatch_class(&self) -> ClassId {
        self.singleton.unwrap_or(self.class)
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.payload {
            Payload::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match &self.payload {
            Payload::Array(items) => Some(items),
            _ => None,
        }
    }
}

pub struct Heap {
    objects: Vec<RObject>,
}

impl Heap {
    pub fn new() -> Self {
        Self {
            objects: Vec::with_capacity(256),
        }
    }

    pub fn alloc(&mut self, obj: RObject) -> ObjectId {
        let id = self.objects.len();
        self.objects.push(obj);
        ObjectId(id)
    }

    pub fn get(&self, id: ObjectId) -> &RObject {
        &self.objects[id.0]
    }

    pub fn get_mut(&mut self, id: ObjectId) -> &mut RObject {
        &mut self.objects[id.0]
    }

    pub fn try_get(&self, id: ObjectId) -> Option<&RObject> {
        self.objects.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}
