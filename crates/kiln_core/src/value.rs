//! Runtime value representation.
//!
//! Defines the runtime value representation using NaN-boxing: floats are stored
//! as their own bits, everything else lives in the payload of a quiet NaN whose
//! tag nibble says what the payload means.

use crate::handle::{ClassId, EncodingId, ObjectId};
use crate::symbol::Symbol;
use ahash::RandomState;
use hashbrown::HashMap;
use indexmap::{IndexMap, IndexSet};
use std::fmt;
use std::hash::Hash;

pub type FastHashMap<K, V> = HashMap<K, V, RandomState>;
pub type FastIndexMap<K, V> = IndexMap<K, V, RandomState>;
pub type FastIndexSet<T> = IndexSet<T, RandomState>;

pub fn fast_hasher() -> RandomState {
    RandomState::with_seeds(0, 0, 0, 0)
}

pub fn fast_map_new<K: Eq + Hash, V>() -> FastHashMap<K, V> {
    HashMap::with_hasher(fast_hasher())
}

pub fn fast_map_with_capacity<K: Eq + Hash, V>(cap: usize) -> FastHashMap<K, V> {
    HashMap::with_capacity_and_hasher(cap, fast_hasher())
}

pub fn fast_index_map_new<K: Eq + Hash, V>() -> FastIndexMap<K, V> {
    IndexMap::with_hasher(fast_hasher())
}

pub fn fast_index_set_new<T: Eq + Hash>() -> FastIndexSet<T> {
    IndexSet::with_hasher(fast_hasher())
}

// NaN-Boxing constants
pub const QNAN: u64 = 0x7ff8000000000000;
pub const TAG_BASE: u64 = 0xfff0000000000000;
pub const TAG_MASK: u64 = 0x000f000000000000;
pub const PAYLOAD_MASK: u64 = 0x0000ffffffffffff;

pub const TAG_INT: u64 = 0x0001;
pub const TAG_BOOL: u64 = 0x0002;
pub const TAG_NIL: u64 = 0x0003;
pub const TAG_SYMBOL: u64 = 0x0004;
pub const TAG_OBJECT: u64 = 0x0005;
pub const TAG_STR: u64 = 0x0006;
pub const TAG_CLASS: u64 = 0x0007;
pub const TAG_ENCODING: u64 = 0x0008;

/// Integers keep 48 bits of payload.
pub const INT_MIN: i64 = -(1 << 47);
pub const INT_MAX: i64 = (1 << 47) - 1;

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Value(u64);

impl Default for Value {
    fn default() -> Self {
        Self::NIL
    }
}

/// Decoded view of a [`Value`], convenient for `match`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueKind {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Symbol(Symbol),
    Str(ObjectId),
    Object(ObjectId),
    Class(ClassId),
    Encoding(EncodingId),
}

impl Value {
    pub const NIL: Value = Value(TAG_BASE | (TAG_NIL << 48));
    pub const TRUE: Value = Value(TAG_BASE | (TAG_BOOL << 48) | 1);
    pub const FALSE: Value = Value(TAG_BASE | (TAG_BOOL << 48));

    #[inline(always)]
    pub fn from_f64(f: f64) -> Self {
        // Normalize NaNs so they never collide with a tag
        if f.is_nan() {
            return Self(QNAN);
        }
        Self(f.to_bits())
    }

    /// Values outside `INT_MIN..=INT_MAX` are truncated to 48 bits.
    #[inline(always)]
    pub fn from_i64(i: i64) -> Self {
        Self(TAG_BASE | (TAG_INT << 48) | (i as u64 & PAYLOAD_MASK))
    }

    #[inline(always)]
    pub fn from_bool(b: bool) -> Self {
        if b { Self::TRUE } else { Self::FALSE }
    }

    #[inline(always)]
    fn from_payload(tag: u64, payload: u64) -> Self {
        Self(TAG_BASE | (tag << 48) | (payload & PAYLOAD_MASK))
    }

    pub fn symbol(sym: Symbol) -> Self {
        Self::from_payload(TAG_SYMBOL, sym.as_u32() as u64)
    }
    pub fn object(id: ObjectId) -> Self {
        Self::from_payload(TAG_OBJECT, id.0 as u64)
    }
    pub fn str(id: ObjectId) -> Self {
        Self::from_payload(TAG_STR, id.0 as u64)
    }
    pub fn class(id: ClassId) -> Self {
        Self::from_payload(TAG_CLASS, id.0 as u64)
    }
    pub fn encoding(id: EncodingId) -> Self {
        Self::from_payload(TAG_ENCODING, id.0 as u64)
    }

    #[inline(always)]
    pub fn is_f64(&self) -> bool {
        // -inf has every tag-base bit set but a zero tag
        (self.0 & TAG_BASE) != TAG_BASE || (self.0 & TAG_MASK) == 0
    }
    #[inline(always)]
    pub fn is_int(&self) -> bool {
        (self.0 & 0xffff000000000000) == 0xfff1000000000000
    }
    #[inline(always)]
    pub fn is_bool(&self) -> bool {
        self.get_tag() == TAG_BOOL
    }
    #[inline(always)]
    pub fn is_nil(&self) -> bool {
        *self == Self::NIL
    }
    #[inline(always)]
    pub fn is_symbol(&self) -> bool {
        self.get_tag() == TAG_SYMBOL
    }
    #[inline(always)]
    pub fn is_str(&self) -> bool {
        self.get_tag() == TAG_STR
    }
    #[inline(always)]
    pub fn is_object(&self) -> bool {
        self.get_tag() == TAG_OBJECT
    }
    #[inline(always)]
    pub fn is_class(&self) -> bool {
        self.get_tag() == TAG_CLASS
    }
    #[inline(always)]
    pub fn is_encoding(&self) -> bool {
        self.get_tag() == TAG_ENCODING
    }

    /// Only `nil` and `false` are falsy.
    #[inline(always)]
    pub fn is_truthy(&self) -> bool {
        !self.is_nil() && *self != Self::FALSE
    }

    /// Values that can never own per-object state.
    pub fn is_immediate(&self) -> bool {
        self.is_f64() || self.is_int() || self.is_symbol()
    }

    /// Values living in the runtime heap.
    pub fn is_heap(&self) -> bool {
        self.is_object() || self.is_str()
    }

    #[inline(always)]
    pub fn as_f64(self) -> f64 {
        f64::from_bits(self.0)
    }

    #[inline(always)]
    pub fn as_i64(&self) -> i64 {
        let val = (self.0 & PAYLOAD_MASK) as i64;
        // Sign extend from 48 bits
        if (val & 0x0000800000000000) != 0 {
            val | -0x0001000000000000
        } else {
            val
        }
    }

    #[inline(always)]
    pub fn as_bool(&self) -> bool {
        (self.0 & 1) != 0
    }

    #[inline(always)]
    pub fn as_symbol(&self) -> Symbol {
        Symbol::from_raw((self.0 & PAYLOAD_MASK) as u32)
    }

    #[inline(always)]
    pub fn as_obj_id(&self) -> ObjectId {
        ObjectId((self.0 & PAYLOAD_MASK) as usize)
    }

    #[inline(always)]
    pub fn as_class_id(&self) -> ClassId {
        ClassId((self.0 & PAYLOAD_MASK) as usize)
    }

    #[inline(always)]
    pub fn as_encoding_id(&self) -> EncodingId {
        EncodingId((self.0 & PAYLOAD_MASK) as usize)
    }

    #[inline(always)]
    pub fn to_bits(self) -> u64 {
        self.0
    }

    pub fn get_tag(&self) -> u64 {
        if self.is_f64() {
            0
        } else {
            (self.0 & TAG_MASK) >> 48
        }
    }

    pub fn kind(&self) -> ValueKind {
        if self.is_f64() {
            return ValueKind::Float(self.as_f64());
        }
        match self.get_tag() {
            TAG_INT => ValueKind::Int(self.as_i64()),
            TAG_BOOL => ValueKind::Bool(self.as_bool()),
            TAG_SYMBOL => ValueKind::Symbol(self.as_symbol()),
            TAG_STR => ValueKind::Str(self.as_obj_id()),
            TAG_OBJECT => ValueKind::Object(self.as_obj_id()),
            TAG_CLASS => ValueKind::Class(self.as_class_id()),
            TAG_ENCODING => ValueKind::Encoding(self.as_encoding_id()),
            _ => ValueKind::Nil,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self.kind() {
            ValueKind::Nil => "nil",
            ValueKind::Bool(true) => "true",
            ValueKind::Bool(false) => "false",
            ValueKind::Int(_) => "Integer",
            ValueKind::Float(_) => "Float",
            ValueKind::Symbol(_) => "Symbol",
            ValueKind::Str(_) => "String",
            ValueKind::Object(_) => "Object",
            ValueKind::Class(_) => "Class",
            ValueKind::Encoding(_) => "Encoding",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ValueKind::Nil => write!(f, "Nil"),
            ValueKind::Bool(b) => write!(f, "Bool({})", b),
            ValueKind::Int(i) => write!(f, "Int({})", i),
            ValueKind::Float(x) => write!(f, "Float({})", x),
            ValueKind::Symbol(s) => write!(f, "Symbol({})", s.as_u32()),
            ValueKind::Str(id) => write!(f, "Str(id={:?})", id),
            ValueKind::Object(id) => write!(f, "Object(id={:?})", id),
            ValueKind::Class(id) => write!(f, "Class(id={:?})", id),
            ValueKind::Encoding(id) => write!(f, "Encoding(id={:?})", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn nil_and_false_are_the_only_falsy_values() {
        assert!(!Value::NIL.is_truthy());
        assert!(!Value::FALSE.is_truthy());
        assert!(Value::TRUE.is_truthy());
        assert!(Value::from_i64(0).is_truthy());
        assert!(Value::from_f64(0.0).is_truthy());
    }

    #[test]
    fn negative_infinity_stays_a_float() {
        let v = Value::from_f64(f64::NEG_INFINITY);
        assert!(v.is_f64());
        assert_eq!(v.kind(), ValueKind::Float(f64::NEG_INFINITY));
    }

    #[test]
    fn nan_is_normalized() {
        let v = Value::from_f64(f64::NAN);
        assert!(v.is_f64());
        assert!(!v.is_nil());
    }

    #[test]
    fn handles_keep_their_tag() {
        assert_eq!(Value::class(ClassId(7)).kind(), ValueKind::Class(ClassId(7)));
        assert_eq!(Value::str(ObjectId(3)).kind(), ValueKind::Str(ObjectId(3)));
        assert_eq!(Value::object(ObjectId(3)).kind(), ValueKind::Object(ObjectId(3)));
        assert_ne!(Value::str(ObjectId(3)), Value::object(ObjectId(3)));
        assert_eq!(
            Value::encoding(EncodingId(2)).kind(),
            ValueKind::Encoding(EncodingId(2))
        );
        let sym = Symbol::from_raw(11);
        assert_eq!(Value::symbol(sym).as_symbol(), sym);
    }

    #[test]
    fn immediates_are_classified() {
        assert!(Value::from_i64(1).is_immediate());
        assert!(Value::from_f64(1.5).is_immediate());
        assert!(Value::symbol(Symbol::from_raw(0)).is_immediate());
        assert!(!Value::NIL.is_immediate());
        assert!(!Value::object(ObjectId(0)).is_immediate());
    }

    proptest! {
        #[test]
        fn ints_in_range_survive_boxing(i in INT_MIN..=INT_MAX) {
            let v = Value::from_i64(i);
            prop_assert!(v.is_int());
            prop_assert_eq!(v.as_i64(), i);
        }

        #[test]
        fn finite_floats_survive_boxing(x in -1.0e300f64..1.0e300f64) {
            let v = Value::from_f64(x);
            prop_assert!(v.is_f64());
            prop_assert_eq!(v.as_f64().to_bits(), x.to_bits());
        }
    }
}
