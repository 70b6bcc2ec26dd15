//! Type descriptors for runtime values.
//!
//! Every [`Value`](crate::Value) carries a [`Type`]: an immutable, shared
//! descriptor of its static shape. Equality of types is structural over the
//! declared name and the kind tree, so two descriptors built independently
//! for the same shape compare equal.
//!
//! # Named Types
//!
//! A named type (`Type::named("Celsius", Type::float64())`) has the same
//! kind tree as its underlying type plus a name. Named and unnamed types with
//! the same underlying shape are distinct, which is what makes the equality
//! engine reject `Celsius(1.0)` vs `1.0`.
//!
//! # Records
//!
//! Record types are an ordered list of [`Field`] descriptors. Each field
//! knows its [`Visibility`]; only the duplication engine writes unexported
//! fields.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::RangeInclusive;
use std::sync::Arc;

/// The structural kind of a value.
///
/// `Invalid` is the kind of the absent value; no [`Type`] has it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Invalid,
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    String,
    Array,
    Slice,
    Map,
    Struct,
    Pointer,
    Interface,
    Chan,
    Func,
    UnsafePointer,
}

impl Kind {
    /// Conventional lowercase name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Invalid => "invalid",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Int8 => "int8",
            Kind::Int16 => "int16",
            Kind::Int32 => "int32",
            Kind::Int64 => "int64",
            Kind::Uint => "uint",
            Kind::Uint8 => "uint8",
            Kind::Uint16 => "uint16",
            Kind::Uint32 => "uint32",
            Kind::Uint64 => "uint64",
            Kind::Uintptr => "uintptr",
            Kind::Float32 => "float32",
            Kind::Float64 => "float64",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Slice => "slice",
            Kind::Map => "map",
            Kind::Struct => "struct",
            Kind::Pointer => "ptr",
            Kind::Interface => "interface",
            Kind::Chan => "chan",
            Kind::Func => "func",
            Kind::UnsafePointer => "unsafe.Pointer",
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            Kind::Int | Kind::Int8 | Kind::Int16 | Kind::Int32 | Kind::Int64
        )
    }

    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            Kind::Uint | Kind::Uint8 | Kind::Uint16 | Kind::Uint32 | Kind::Uint64 | Kind::Uintptr
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, Kind::Float32 | Kind::Float64)
    }

    pub fn is_numeric(self) -> bool {
        self.is_signed() || self.is_unsigned() || self.is_float()
    }

    /// Kinds whose zero value is a typed nil.
    pub fn is_nilable(self) -> bool {
        matches!(
            self,
            Kind::Chan | Kind::Func | Kind::Interface | Kind::Map | Kind::Pointer | Kind::Slice
        )
    }

    /// Kinds that are indirection layers: stripped by normalization.
    pub fn is_indirection(self) -> bool {
        matches!(self, Kind::Pointer | Kind::Interface)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a record field is reachable through the ordinary field accessor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    Exported,
    Unexported,
}

/// Characters with the Unicode `Uppercase` property that are not uppercase
/// letters (general category `Lu`): Roman numerals and enclosed letters.
const OTHER_UPPERCASE: [RangeInclusive<char>; 5] = [
    '\u{2160}'..='\u{216F}',
    '\u{24B6}'..='\u{24CF}',
    '\u{1F130}'..='\u{1F149}',
    '\u{1F150}'..='\u{1F169}',
    '\u{1F170}'..='\u{1F189}',
];

/// Whether `c` is an uppercase letter (general category `Lu`).
fn is_upper_letter(c: char) -> bool {
    c.is_uppercase() && !OTHER_UPPERCASE.iter().any(|range| range.contains(&c))
}

/// Report whether `name` follows the exported-identifier convention.
///
/// A name is exported iff its first character is an uppercase letter.
/// `_x9`, `中文`, `Ⅸ` and the empty name are unexported.
pub fn is_exported_name(name: &str) -> bool {
    name.chars().next().is_some_and(is_upper_letter)
}

/// One field of a record type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Field {
    name: Box<str>,
    ty: Type,
    visibility: Visibility,
}

impl Field {
    /// Create a field whose visibility follows from its name.
    pub fn new(name: impl Into<Box<str>>, ty: Type) -> Self {
        let name = name.into();
        let visibility = if is_exported_name(&name) {
            Visibility::Exported
        } else {
            Visibility::Unexported
        };
        Field {
            name,
            ty,
            visibility,
        }
    }


    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_exported(&self) -> bool {
        self.visibility == Visibility::Exported
    }
}

/// Structural description of a type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    String,
    /// Fixed-length sequence, stored by value.
    Array {
        elem: Type,
        len: usize,
    },
    /// Variable-length sequence over shared storage.
    Slice(Type),
    Map {
        key: Type,
        value: Type,
    },
    /// Record with fields in declaration order.
    Struct(Box<[Field]>),
    Pointer(Type),
    /// Dynamically-typed wrapper. Carries the declared method names for
    /// display only; conformance is not checked.
    Interface(Box<[Box<str>]>),
    Chan(Type),
    Func {
        params: Box<[Type]>,
        results: Box<[Type]>,
    },
    UnsafePointer,
}

impl TypeKind {
    pub fn kind(&self) -> Kind {
        match self {
            TypeKind::Bool => Kind::Bool,
            TypeKind::Int => Kind::Int,
            TypeKind::Int8 => Kind::Int8,
            TypeKind::Int16 => Kind::Int16,
            TypeKind::Int32 => Kind::Int32,
            TypeKind::Int64 => Kind::Int64,
            TypeKind::Uint => Kind::Uint,
            TypeKind::Uint8 => Kind::Uint8,
            TypeKind::Uint16 => Kind::Uint16,
            TypeKind::Uint32 => Kind::Uint32,
            TypeKind::Uint64 => Kind::Uint64,
            TypeKind::Uintptr => Kind::Uintptr,
            TypeKind::Float32 => Kind::Float32,
            TypeKind::Float64 => Kind::Float64,
            TypeKind::String => Kind::String,
            TypeKind::Array { .. } => Kind::Array,
            TypeKind::Slice(_) => Kind::Slice,
            TypeKind::Map { .. } => Kind::Map,
            TypeKind::Struct(_) => Kind::Struct,
            TypeKind::Pointer(_) => Kind::Pointer,
            TypeKind::Interface(_) => Kind::Interface,
            TypeKind::Chan(_) => Kind::Chan,
            TypeKind::Func { .. } => Kind::Func,
            TypeKind::UnsafePointer => Kind::UnsafePointer,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct TypeData {
    name: Option<Box<str>>,
    kind: TypeKind,
}

/// Shared, immutable type descriptor.
///
/// Cloning is an `Arc` increment.
#[derive(Clone)]
pub struct Type(Arc<TypeData>);

impl Type {
    /// Create an unnamed type of the given shape.
    pub fn new(kind: TypeKind) -> Self {
        Type(Arc::new(TypeData { name: None, kind }))
    }

    /// Declare a named type over `underlying`.
    ///
    /// The name replaces any name `underlying` already had.
    pub fn named(name: impl Into<Box<str>>, underlying: &Type) -> Self {
        Type(Arc::new(TypeData {
            name: Some(name.into()),
            kind: underlying.0.kind.clone(),
        }))
    }

    pub fn bool() -> Self {
        Type::new(TypeKind::Bool)
    }

    pub fn int() -> Self {
        Type::new(TypeKind::Int)
    }

    pub fn int8() -> Self {
        Type::new(TypeKind::Int8)
    }

    pub fn int16() -> Self {
        Type::new(TypeKind::Int16)
    }

    pub fn int32() -> Self {
        Type::new(TypeKind::Int32)
    }

    pub fn int64() -> Self {
        Type::new(TypeKind::Int64)
    }

    pub fn uint() -> Self {
        Type::new(TypeKind::Uint)
    }

    pub fn uint8() -> Self {
        Type::new(TypeKind::Uint8)
    }

    pub fn uint16() -> Self {
        Type::new(TypeKind::Uint16)
    }

    pub fn uint32() -> Self {
        Type::new(TypeKind::Uint32)
    }

    pub fn uint64() -> Self {
        Type::new(TypeKind::Uint64)
    }

    pub fn uintptr() -> Self {
        Type::new(TypeKind::Uintptr)
    }

    pub fn float32() -> Self {
        Type::new(TypeKind::Float32)
    }

    pub fn float64() -> Self {
        Type::new(TypeKind::Float64)
    }

    pub fn string() -> Self {
        Type::new(TypeKind::String)
    }

    pub fn array(elem: Type, len: usize) -> Self {
        Type::new(TypeKind::Array { elem, len })
    }

    pub fn slice(elem: Type) -> Self {
        Type::new(TypeKind::Slice(elem))
    }

    pub fn map(key: Type, value: Type) -> Self {
        Type::new(TypeKind::Map { key, value })
    }

    /// Record type with fields in declaration order.
    pub fn record(fields: impl IntoIterator<Item = Field>) -> Self {
        Type::new(TypeKind::Struct(fields.into_iter().collect()))
    }

    pub fn pointer(elem: Type) -> Self {
        Type::new(TypeKind::Pointer(elem))
    }

    /// Interface type declaring the given method names.
    pub fn interface<S: Into<Box<str>>>(methods: impl IntoIterator<Item = S>) -> Self {
        Type::new(TypeKind::Interface(
            methods.into_iter().map(Into::into).collect(),
        ))
    }

    /// The empty interface: holds a value of any type.
    pub fn any() -> Self {
        Type::new(TypeKind::Interface(Box::default()))
    }

    pub fn chan(elem: Type) -> Self {
        Type::new(TypeKind::Chan(elem))
    }

    pub fn func(params: impl IntoIterator<Item = Type>, results: impl IntoIterator<Item = Type>) -> Self {
        Type::new(TypeKind::Func {
            params: params.into_iter().collect(),
            results: results.into_iter().collect(),
        })
    }

    pub fn unsafe_pointer() -> Self {
        Type::new(TypeKind::UnsafePointer)
    }

    /// Declared name, if this is a named type.
    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    pub fn kind(&self) -> Kind {
        self.0.kind.kind()
    }

    pub fn type_kind(&self) -> &TypeKind {
        &self.0.kind
    }

    /// The same shape without the declared name.
    pub fn underlying(&self) -> Type {
        if self.0.name.is_none() {
            self.clone()
        } else {
            Type::new(self.0.kind.clone())
        }
    }

    /// Element type of arrays, slices, pointers and channels; value type of maps.
    pub fn elem(&self) -> Option<&Type> {
        match &self.0.kind {
            TypeKind::Array { elem, .. }
            | TypeKind::Slice(elem)
            | TypeKind::Pointer(elem)
            | TypeKind::Chan(elem) => Some(elem),
            TypeKind::Map { value, .. } => Some(value),
            _ => None,
        }
    }



    /// Fields of a record type; empty for every other kind.
    pub fn fields(&self) -> &[Field] {
        match &self.0.kind {
            TypeKind::Struct(fields) => fields,
            _ => &[],
        }
    }

    /// Index of the field declared with exactly `name`.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields().iter().position(|field| field.name() == name)
    }

    pub fn is_nilable(&self) -> bool {
        self.kind().is_nilable()
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || *self.0 == *other.0
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({self})")
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, types: &[Type]) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{ty}")?;
    }
    Ok(())
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.name() {
            return f.write_str(name);
        }
        match &self.0.kind {
            TypeKind::Array { elem, len } => write!(f, "[{len}]{elem}"),
            TypeKind::Slice(elem) => write!(f, "[]{elem}"),
            TypeKind::Map { key, value } => write!(f, "map[{key}]{value}"),
            TypeKind::Struct(fields) => {
                if fields.is_empty() {
                    return write!(f, "struct {{}}");
                }
                write!(f, "struct {{ ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{} {}", field.name(), field.ty())?;
                }
                write!(f, " }}")
            }
            TypeKind::Pointer(elem) => write!(f, "*{elem}"),
            TypeKind::Interface(methods) => {
                if methods.is_empty() {
                    return write!(f, "interface {{}}");
                }
                write!(f, "interface {{ ")?;
                for (i, method) in methods.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{method}()")?;
                }
                write!(f, " }}")
            }
            TypeKind::Chan(elem) => write!(f, "chan {elem}"),
            TypeKind::Func { params, results } => {
                write!(f, "func(")?;
                write_list(f, params)?;
                write!(f, ")")?;
                match results.len() {
                    0 => Ok(()),
                    1 => write!(f, " {}", results[0]),
                    _ => {
                        write!(f, " (")?;
                        write_list(f, results)?;
                        write!(f, ")")
                    }
                }
            }
            other => f.write_str(other.kind().as_str()),
        }
    }
}

#[cfg(test)]
mod tests;
