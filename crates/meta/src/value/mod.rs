//! Runtime values.
//!
//! A [`Value`] is either absent (the untyped nil) or a typed value: a
//! [`Type`] plus [`Data`] matching that type's kind.
//!
//! # Ownership
//!
//! Scalars, strings, fixed arrays and records are held by value: cloning a
//! `Value` copies them. Slices, maps and pointers refer to [`Shared`]
//! storage: cloning copies the reference, and writes through one clone are
//! seen by all others. This is the aliasing the duplication engine exists to
//! break.
//!
//! # Construction
//!
//! Values are built through the factory methods on `Value`. Collection
//! factories check every element against the declared element type,
//! wrapping concrete values into interface slots and turning absent elements
//! into typed nils, and return [`MetaResult`] so a mistyped element is
//! reported instead of stored.
//!
//! ```text
//! let v = Value::slice(&Type::int(), vec![Value::int(1), Value::int(2)])?;
//! let p = Value::pointer_to(Value::string("x"))?;
//! ```

mod convert;
mod heap;
mod map;
mod slot;

use std::fmt;

pub use heap::{Handle, Shared};
pub use map::{MapData, MapKey};

pub(crate) use convert::{assign, box_value};
use convert::{round_float, wrap_signed, wrap_unsigned};

use crate::errors::{MetaError, MetaResult};
use crate::types::{Kind, Type, TypeKind};

/// Payload of a typed value.
///
/// `None` in a nilable variant is that kind's typed nil.
#[derive(Clone)]
pub enum Data {
    Bool(bool),
    /// All signed widths, already wrapped to the declared width.
    Int(i64),
    /// All unsigned widths and `uintptr`.
    Uint(u64),
    /// Both float widths. `float32` values are rounded on construction.
    Float(f64),
    Str(String),
    Array(Vec<Value>),
    Slice(Option<Shared<Vec<Value>>>),
    Map(Option<Shared<MapData>>),
    /// Fields in declaration order.
    Struct(Vec<Value>),
    Pointer(Option<Shared<Value>>),
    /// The held value is never absent and never itself an interface.
    Interface(Option<Box<Value>>),
    Chan(Option<Handle>),
    Func(Option<Handle>),
    UnsafePointer(usize),
}

#[derive(Clone)]
struct Typed {
    ty: Type,
    data: Data,
}

/// A runtime value: absent, or a [`Type`] with matching [`Data`].
#[derive(Clone, Default)]
pub struct Value {
    inner: Option<Typed>,
}

// Factory methods

impl Value {
    /// The absent value: no type, no data.
    pub const fn absent() -> Self {
        Value { inner: None }
    }

    pub(crate) fn from_parts(ty: Type, data: Data) -> Self {
        Value {
            inner: Some(Typed { ty, data }),
        }
    }

    pub fn bool(b: bool) -> Self {
        Value::from_parts(Type::bool(), Data::Bool(b))
    }

    pub fn int(n: i64) -> Self {
        Value::from_parts(Type::int(), Data::Int(n))
    }

    pub fn uint(n: u64) -> Self {
        Value::from_parts(Type::uint(), Data::Uint(n))
    }

    pub fn float(x: f64) -> Self {
        Value::from_parts(Type::float64(), Data::Float(x))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::from_parts(Type::string(), Data::Str(s.into()))
    }

    /// A boolean of a named boolean type.
    pub fn typed_bool(ty: &Type, b: bool) -> MetaResult<Self> {
        expect_kind(ty, Kind::Bool, |kind| kind == Kind::Bool)?;
        Ok(Value::from_parts(ty.clone(), Data::Bool(b)))
    }

    /// A signed integer of `ty`, wrapped to the type's width.
    pub fn typed_int(ty: &Type, n: i64) -> MetaResult<Self> {
        expect_kind(ty, Kind::Int, Kind::is_signed)?;
        Ok(Value::from_parts(ty.clone(), Data::Int(wrap_signed(ty.kind(), n))))
    }

    /// An unsigned integer of `ty`, wrapped to the type's width.
    pub fn typed_uint(ty: &Type, n: u64) -> MetaResult<Self> {
        expect_kind(ty, Kind::Uint, Kind::is_unsigned)?;
        Ok(Value::from_parts(ty.clone(), Data::Uint(wrap_unsigned(ty.kind(), n))))
    }

    /// A float of `ty`, rounded to `float32` precision if needed.
    pub fn typed_float(ty: &Type, x: f64) -> MetaResult<Self> {
        expect_kind(ty, Kind::Float64, Kind::is_float)?;
        Ok(Value::from_parts(ty.clone(), Data::Float(round_float(ty.kind(), x))))
    }

    pub fn typed_string(ty: &Type, s: impl Into<String>) -> MetaResult<Self> {
        expect_kind(ty, Kind::String, |kind| kind == Kind::String)?;
        Ok(Value::from_parts(ty.clone(), Data::Str(s.into())))
    }

    /// A fixed-length array of `elem` holding `items`.
    pub fn array(elem: &Type, items: Vec<Value>) -> MetaResult<Self> {
        let items = assign_all(elem, items)?;
        let ty = Type::array(elem.clone(), items.len());
        Ok(Value::from_parts(ty, Data::Array(items)))
    }

    /// A slice of `elem` over fresh storage holding `items`.
    pub fn slice(elem: &Type, items: Vec<Value>) -> MetaResult<Self> {
        let items = assign_all(elem, items)?;
        let ty = Type::slice(elem.clone());
        Ok(Value::from_parts(ty, Data::Slice(Some(Shared::new(items)))))
    }

    /// A map from `key` to `value` over fresh storage.
    ///
    /// Later entries replace earlier ones with an equal key.
    pub fn map(
        key: &Type,
        value: &Type,
        entries: impl IntoIterator<Item = (Value, Value)>,
    ) -> MetaResult<Self> {
        let map = Value::make_map(&Type::map(key.clone(), value.clone()), 0)?;
        for (k, v) in entries {
            map.map_insert(k, v)?;
        }
        Ok(map)
    }

    /// An empty, non-nil map of map type `ty`.
    pub fn make_map(ty: &Type, capacity: usize) -> MetaResult<Self> {
        if ty.kind() != Kind::Map {
            return Err(MetaError::UnexpectedKind {
                expected: Kind::Map,
                got: ty.kind(),
            });
        }
        let storage = Shared::new(MapData::with_capacity(capacity));
        Ok(Value::from_parts(ty.clone(), Data::Map(Some(storage))))
    }

    /// A value of record type `ty` with `fields` in declaration order.
    ///
    /// Unexported fields are supplied like any other.
    pub fn record(ty: &Type, fields: Vec<Value>) -> MetaResult<Self> {
        if ty.kind() != Kind::Struct {
            return Err(MetaError::UnexpectedKind {
                expected: Kind::Struct,
                got: ty.kind(),
            });
        }
        let declared = ty.fields();
        if declared.len() != fields.len() {
            return Err(MetaError::FieldCount {
                type_name: ty.to_string(),
                expected: declared.len(),
                got: fields.len(),
            });
        }
        let fields = declared
            .iter()
            .zip(fields)
            .map(|(field, value)| assign(field.ty(), value))
            .collect::<MetaResult<Vec<_>>>()?;
        Ok(Value::from_parts(ty.clone(), Data::Struct(fields)))
    }

    /// A pointer to fresh storage holding `target`.
    pub fn pointer_to(target: Value) -> MetaResult<Self> {
        let ty = target.ty().ok_or(MetaError::UntypedNil)?.clone();
        Ok(Value::from_parts(
            Type::pointer(ty),
            Data::Pointer(Some(Shared::new(target))),
        ))
    }

    /// `held` wrapped into interface type `iface`.
    ///
    /// An absent `held` yields the nil interface. An interface `held` is
    /// unwrapped first, so interfaces never nest.
    pub fn boxed(iface: &Type, held: Value) -> MetaResult<Self> {
        if iface.kind() != Kind::Interface {
            return Err(MetaError::UnexpectedKind {
                expected: Kind::Interface,
                got: iface.kind(),
            });
        }
        Ok(box_value(iface, held))
    }

    /// A new, open channel of `elem`.
    pub fn chan(elem: &Type) -> Self {
        let ty = Type::chan(elem.clone());
        let handle = Handle::new(&ty.to_string());
        Value::from_parts(ty, Data::Chan(Some(handle)))
    }

    /// A function value of func type `ty`, identified by `label`.
    pub fn func(ty: &Type, label: &str) -> MetaResult<Self> {
        if ty.kind() != Kind::Func {
            return Err(MetaError::UnexpectedKind {
                expected: Kind::Func,
                got: ty.kind(),
            });
        }
        Ok(Value::from_parts(ty.clone(), Data::Func(Some(Handle::new(label)))))
    }

    pub fn unsafe_pointer(addr: usize) -> Self {
        Value::from_parts(Type::unsafe_pointer(), Data::UnsafePointer(addr))
    }

    /// The zero value of `ty`.
    ///
    /// Nilable kinds get their typed nil; arrays and records are filled with
    /// zero elements.
    pub fn zero(ty: &Type) -> Self {
        let data = match ty.type_kind() {
            TypeKind::Bool => Data::Bool(false),
            TypeKind::Int
            | TypeKind::Int8
            | TypeKind::Int16
            | TypeKind::Int32
            | TypeKind::Int64 => Data::Int(0),
            TypeKind::Uint
            | TypeKind::Uint8
            | TypeKind::Uint16
            | TypeKind::Uint32
            | TypeKind::Uint64
            | TypeKind::Uintptr => Data::Uint(0),
            TypeKind::Float32 | TypeKind::Float64 => Data::Float(0.0),
            TypeKind::String => Data::Str(String::new()),
            TypeKind::Array { elem, len } => {
                Data::Array((0..*len).map(|_| Value::zero(elem)).collect())
            }
            TypeKind::Struct(fields) => {
                Data::Struct(fields.iter().map(|field| Value::zero(field.ty())).collect())
            }
            TypeKind::Slice(_) => Data::Slice(None),
            TypeKind::Map { .. } => Data::Map(None),
            TypeKind::Pointer(_) => Data::Pointer(None),
            TypeKind::Interface(_) => Data::Interface(None),
            TypeKind::Chan(_) => Data::Chan(None),
            TypeKind::Func { .. } => Data::Func(None),
            TypeKind::UnsafePointer => Data::UnsafePointer(0),
        };
        Value::from_parts(ty.clone(), data)
    }
}

fn expect_kind(ty: &Type, expected: Kind, accepts: impl Fn(Kind) -> bool) -> MetaResult<()> {
    if accepts(ty.kind()) {
        Ok(())
    } else {
        Err(MetaError::UnexpectedKind {
            expected,
            got: ty.kind(),
        })
    }
}

fn assign_all(elem: &Type, items: Vec<Value>) -> MetaResult<Vec<Value>> {
    items.into_iter().map(|item| assign(elem, item)).collect()
}

// Accessors

impl Value {
    /// Whether this value has a type.
    pub fn is_valid(&self) -> bool {
        self.inner.is_some()
    }

    pub fn ty(&self) -> Option<&Type> {
        self.inner.as_ref().map(|typed| &typed.ty)
    }

    /// Kind of the value's type; `Invalid` when absent.
    pub fn kind(&self) -> Kind {
        self.inner.as_ref().map_or(Kind::Invalid, |typed| typed.ty.kind())
    }

    pub fn data(&self) -> Option<&Data> {
        self.inner.as_ref().map(|typed| &typed.data)
    }

    pub fn parts(&self) -> Option<(&Type, &Data)> {
        self.inner.as_ref().map(|typed| (&typed.ty, &typed.data))
    }

    pub(crate) fn data_mut(&mut self) -> Option<&mut Data> {
        self.inner.as_mut().map(|typed| &mut typed.data)
    }

    /// Rendered type, or `<nil>` when absent.
    pub fn type_name(&self) -> String {
        self.ty().map_or_else(|| "<nil>".to_string(), ToString::to_string)
    }

    /// Whether this is a typed nil. The absent value is not.
    pub fn is_nil(&self) -> bool {
        matches!(
            self.data(),
            Some(
                Data::Slice(None)
                    | Data::Map(None)
                    | Data::Pointer(None)
                    | Data::Interface(None)
                    | Data::Chan(None)
                    | Data::Func(None)
            )
        )
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.data() {
            Some(Data::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.data() {
            Some(Data::Int(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self.data() {
            Some(Data::Uint(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self.data() {
            Some(Data::Float(x)) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.data() {
            Some(Data::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Length of a string (in bytes), array, slice or map.
    ///
    /// Nil slices and maps have length zero.
    #[allow(clippy::len_without_is_empty, reason = "length is undefined for most kinds")]
    pub fn len(&self) -> Option<usize> {
        match self.data()? {
            Data::Str(s) => Some(s.len()),
            Data::Array(items) => Some(items.len()),
            Data::Slice(storage) => Some(storage.as_ref().map_or(0, |s| s.read().len())),
            Data::Map(storage) => Some(storage.as_ref().map_or(0, |m| m.read().len())),
            _ => None,
        }
    }

    /// Element `index` of an array or slice.
    pub fn index(&self, index: usize) -> Option<Value> {
        match self.data()? {
            Data::Array(items) => items.get(index).cloned(),
            Data::Slice(Some(storage)) => storage.read().get(index).cloned(),
            _ => None,
        }
    }

    /// Elements of an array or slice, copied out of the storage.
    pub fn items(&self) -> Option<Vec<Value>> {
        match self.data()? {
            Data::Array(items) => Some(items.clone()),
            Data::Slice(storage) => Some(storage.as_ref().map_or_else(Vec::new, |s| s.read().clone())),
            _ => None,
        }
    }

    /// Field `index` of a record, in declaration order.
    pub fn field(&self, index: usize) -> Option<Value> {
        match self.data()? {
            Data::Struct(fields) => fields.get(index).cloned(),
            _ => None,
        }
    }

    /// What a pointer points at or an interface holds.
    ///
    /// Absent for nil pointers, nil interfaces and every other kind.
    pub fn elem(&self) -> Value {
        match self.data() {
            Some(Data::Pointer(Some(target))) => target.read().clone(),
            Some(Data::Interface(Some(held))) => (**held).clone(),
            _ => Value::absent(),
        }
    }

    /// Pointee storage of a non-nil pointer.
    pub(crate) fn pointee(&self) -> Option<&Shared<Value>> {
        match self.data() {
            Some(Data::Pointer(Some(target))) => Some(target),
            _ => None,
        }
    }

    /// Value stored under `key` in a map.
    pub fn map_get(&self, key: &Value) -> Option<Value> {
        let Some(Data::Map(Some(storage))) = self.data() else {
            return None;
        };
        let projection = MapKey::of(key).ok()?;
        storage.read().get(&projection).cloned()
    }

    /// Key-value pairs of a map, in unspecified order.
    pub fn map_entries(&self) -> Vec<(Value, Value)> {
        match self.data() {
            Some(Data::Map(Some(storage))) => storage
                .read()
                .iter()
                .map(|(_, k, v)| (k.clone(), v.clone()))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Whether two reference values share storage.
    pub fn same_storage(&self, other: &Value) -> bool {
        match (self.data(), other.data()) {
            (Some(Data::Slice(Some(a))), Some(Data::Slice(Some(b)))) => a.ptr_eq(b),
            (Some(Data::Map(Some(a))), Some(Data::Map(Some(b)))) => a.ptr_eq(b),
            (Some(Data::Pointer(Some(a))), Some(Data::Pointer(Some(b)))) => a.ptr_eq(b),
            (Some(Data::Chan(Some(a))), Some(Data::Chan(Some(b))))
            | (Some(Data::Func(Some(a))), Some(Data::Func(Some(b)))) => a.ptr_eq(b),
            _ => false,
        }
    }
}

// Mutation

impl Value {
    /// Replace element `index` of an array or slice.
    ///
    /// Arrays are modified in place; slices write through to their storage.
    pub fn set_index(&mut self, index: usize, value: Value) -> MetaResult<()> {
        let kind = self.kind();
        let elem = match kind {
            Kind::Array | Kind::Slice => self.ty().and_then(Type::elem).cloned(),
            _ => None,
        };
        let Some(elem) = elem else {
            return Err(MetaError::UnexpectedKind {
                expected: Kind::Slice,
                got: kind,
            });
        };
        let value = assign(&elem, value)?;

        match self.data_mut() {
            Some(Data::Array(items)) => replace(items, index, value),
            Some(Data::Slice(Some(storage))) => replace(storage.write().as_mut_slice(), index, value),
            _ => Err(MetaError::IndexOutOfRange { index, len: 0 }),
        }
    }

    /// Append to a slice. A nil slice gets fresh storage.
    ///
    /// Appending never reallocates: existing aliases of the storage observe
    /// the new element.
    pub fn push(&mut self, value: Value) -> MetaResult<()> {
        let elem = match self.ty() {
            Some(ty) if ty.kind() == Kind::Slice => ty.elem().cloned(),
            _ => None,
        };
        let Some(elem) = elem else {
            return Err(MetaError::UnexpectedKind {
                expected: Kind::Slice,
                got: self.kind(),
            });
        };
        let value = assign(&elem, value)?;

        if let Some(Data::Slice(storage)) = self.data_mut() {
            match storage {
                Some(storage) => storage.write().push(value),
                None => *storage = Some(Shared::new(vec![value])),
            }
        }
        Ok(())
    }

    /// Insert into a map, replacing the value under an equal key.
    pub fn map_insert(&self, key: Value, value: Value) -> MetaResult<()> {
        let (key_ty, value_ty) = match self.ty().map(Type::type_kind) {
            Some(TypeKind::Map { key, value }) => (key, value),
            _ => {
                return Err(MetaError::UnexpectedKind {
                    expected: Kind::Map,
                    got: self.kind(),
                })
            }
        };
        let key = assign(key_ty, key)?;
        let value = assign(value_ty, value)?;
        let projection = MapKey::of(&key)?;

        match self.data() {
            Some(Data::Map(Some(storage))) => {
                storage.write().insert(projection, key, value);
                Ok(())
            }
            _ => Err(MetaError::NilWrite {
                type_name: self.type_name(),
            }),
        }
    }

    /// Overwrite what a pointer points at.
    pub fn store(&self, value: Value) -> MetaResult<()> {
        let elem = match self.ty().map(Type::type_kind) {
            Some(TypeKind::Pointer(elem)) => elem,
            _ => {
                return Err(MetaError::UnexpectedKind {
                    expected: Kind::Pointer,
                    got: self.kind(),
                })
            }
        };
        let value = assign(elem, value)?;
        let target = self.pointee().ok_or_else(|| MetaError::NilDereference {
            type_name: self.type_name(),
        })?;
        *target.write() = value;
        Ok(())
    }
}

fn replace(items: &mut [Value], index: usize, value: Value) -> MetaResult<()> {
    let len = items.len();
    let slot = items
        .get_mut(index)
        .ok_or(MetaError::IndexOutOfRange { index, len })?;
    *slot = value;
    Ok(())
}

// Equality delegates to the comparison engine.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        crate::compare::equal(self, other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(data) = self.data() else {
            return f.write_str("<nil>");
        };
        match data {
            Data::Bool(b) => write!(f, "{b}"),
            Data::Int(n) => write!(f, "{n}"),
            Data::Uint(n) => write!(f, "{n}"),
            Data::Float(x) => write!(f, "{x}"),
            Data::Str(s) => f.write_str(s),
            Data::Array(items) => write_seq(f, "[", items, "]"),
            Data::Slice(None) => f.write_str("[]"),
            Data::Slice(Some(storage)) => write_seq(f, "[", &storage.read(), "]"),
            Data::Struct(fields) => write_seq(f, "{", fields, "}"),
            Data::Map(None) => f.write_str("map[]"),
            Data::Map(Some(storage)) => {
                let mut entries: Vec<String> = storage
                    .read()
                    .iter()
                    .map(|(_, k, v)| format!("{k}:{v}"))
                    .collect();
                entries.sort();
                write!(f, "map[{}]", entries.join(" "))
            }
            Data::Interface(Some(held)) => write!(f, "{held}"),
            Data::Pointer(Some(target)) => write!(f, "{:#x}", target.addr()),
            Data::Chan(Some(handle)) | Data::Func(Some(handle)) => {
                write!(f, "{:#x}", handle.addr())
            }
            Data::UnsafePointer(addr) => write!(f, "{addr:#x}"),
            Data::Pointer(None) | Data::Interface(None) | Data::Chan(None) | Data::Func(None) => {
                f.write_str("<nil>")
            }
        }
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, open: &str, items: &[Value], close: &str) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(close)
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty() {
            Some(ty) => write!(f, "{ty}({self})"),
            None => f.write_str("Absent"),
        }
    }
}
