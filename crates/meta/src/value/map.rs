//! Map storage keyed by value equality.
//!
//! Map keys are arbitrary comparable values, which are not `Hash` in general
//! (floats, interface keys holding values of different types). [`MapKey`] is
//! a hashable projection of such a value: two keys project to the same
//! `MapKey` iff the values are equal as map keys.

use rustc_hash::FxHashMap;

use super::{Data, Handle, Shared, Value};
use crate::errors::{MetaError, MetaResult};
use crate::types::Type;

/// Hashable identity of a map key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MapKey {
    /// Nil interface or absent key.
    Nil,
    Bool(bool),
    Int(i64),
    Uint(u64),
    /// Bit pattern, with `-0.0` folded into `+0.0`.
    Float(u64),
    Str(Box<str>),
    /// Arrays and records, element-wise.
    Composite(Box<[MapKey]>),
    /// Pointers, channels and raw addresses compare by address.
    Addr(usize),
    /// Interface keys compare by dynamic type and held value.
    Dynamic(Type, Box<MapKey>),
}

impl MapKey {
    /// Project `value` onto its key identity.
    ///
    /// Slices, maps and functions are not comparable and cannot be keys.
    pub fn of(value: &Value) -> MetaResult<MapKey> {
        let Some((ty, data)) = value.parts() else {
            return Ok(MapKey::Nil);
        };

        let key = match data {
            Data::Bool(b) => MapKey::Bool(*b),
            Data::Int(n) => MapKey::Int(*n),
            Data::Uint(n) => MapKey::Uint(*n),
            Data::Float(x) => MapKey::Float(float_bits(*x)),
            Data::Str(s) => MapKey::Str(s.as_str().into()),
            Data::Array(items) | Data::Struct(items) => MapKey::Composite(
                items
                    .iter()
                    .map(MapKey::of)
                    .collect::<MetaResult<Box<[MapKey]>>>()?,
            ),
            Data::Pointer(target) => MapKey::Addr(target.as_ref().map_or(0, Shared::addr)),
            Data::Chan(handle) => MapKey::Addr(handle.as_ref().map_or(0, Handle::addr)),
            Data::UnsafePointer(addr) => MapKey::Addr(*addr),
            Data::Interface(None) => MapKey::Nil,
            Data::Interface(Some(held)) => match held.ty() {
                Some(held_ty) => MapKey::Dynamic(held_ty.clone(), Box::new(MapKey::of(held)?)),
                None => MapKey::Nil,
            },
            Data::Slice(_) | Data::Map(_) | Data::Func(_) => {
                return Err(MetaError::UnhashableKey {
                    type_name: ty.to_string(),
                })
            }
        };
        Ok(key)
    }
}

fn float_bits(x: f64) -> u64 {
    if x == 0.0 {
        0.0f64.to_bits()
    } else {
        x.to_bits()
    }
}

/// Entries of a map value.
///
/// Each entry keeps the original key value next to its associated value, so
/// iteration yields real keys, not their projections.
#[derive(Clone, Default)]
pub struct MapData {
    entries: FxHashMap<MapKey, (Value, Value)>,
}

impl MapData {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        MapData {
            entries: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value associated with `key`.
    pub fn get(&self, key: &MapKey) -> Option<&Value> {
        self.entries.get(key).map(|(_, value)| value)
    }

    /// Iterate over `(projection, key, value)` triples in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&MapKey, &Value, &Value)> {
        self.entries
            .iter()
            .map(|(projection, (key, value))| (projection, key, value))
    }

    /// Insert or replace. An existing entry keeps its original key value.
    pub(crate) fn insert(&mut self, projection: MapKey, key: Value, value: Value) {
        match self.entries.get_mut(&projection) {
            Some(entry) => entry.1 = value,
            None => {
                self.entries.insert(projection, (key, value));
            }
        }
    }
}
