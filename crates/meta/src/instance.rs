//! Reference-chain normalization.
//!
//! A value may reach its concrete content through any number of pointer
//! and interface layers (`**T`, `any` holding `*T`, ...). [`to_instance`]
//! strips those layers and records each one as a [`Layer`], outermost first;
//! [`origin_of`] replays a recorded chain around a (possibly rebuilt)
//! instance, restoring the exact outer shape.
//!
//! Nil pointers, nil interfaces and the absent value are terminal: they are
//! instances themselves and are never unwrapped.

use std::borrow::Cow;

use smallvec::SmallVec;

use crate::types::{Kind, Type};
use crate::value::{box_value, Data, Shared, Value};

/// What kind of indirection a [`Layer`] stripped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// A pointer.
    Reference,
    /// An interface box.
    Wrapper,
}

/// One stripped indirection and the exact type it had.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layer {
    pub kind: LayerKind,
    pub source: Type,
}

/// Stripped layers, outermost first.
pub type RefChain = SmallVec<[Layer; 4]>;

/// Nil classification of a value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NilState {
    /// The absent value: nil without a type.
    Absent,
    /// A nil slice, map, pointer, interface, channel or function.
    TypedNil,
    NotNil,
}

pub fn nil_state(value: &Value) -> NilState {
    if !value.is_valid() {
        NilState::Absent
    } else if value.is_nil() {
        NilState::TypedNil
    } else {
        NilState::NotNil
    }
}

/// Whether the value itself is a pointer. A nil pointer is.
pub fn is_pointer(value: &Value) -> bool {
    value.kind() == Kind::Pointer
}

/// Whether the value is a record, or reaches one through its layers.
pub fn is_struct(value: &Value) -> bool {
    instance_of(value.clone()).kind() == Kind::Struct
}

/// Whether normalization stops at this value.
pub fn is_instance(value: &Value) -> bool {
    !value.kind().is_indirection() || value.is_nil()
}

/// The concrete value behind one interface layer.
///
/// Every public entry point receives its operands as dynamically typed
/// arguments, so an interface box at the top level is looked through once.
/// A nil interface yields the absent value; pointers are left alone.
pub fn unbox(value: &Value) -> Cow<'_, Value> {
    match value.data() {
        Some(Data::Interface(held)) => Cow::Owned(held.as_deref().cloned().unwrap_or_default()),
        _ => Cow::Borrowed(value),
    }
}

/// Strip every pointer and interface layer from `value`.
///
/// Returns the innermost instance and the stripped layers, outermost first.
pub fn to_instance(mut value: Value) -> (Value, RefChain) {
    let mut chain = RefChain::new();

    while !is_instance(&value) {
        let (kind, source) = match value.parts() {
            Some((ty, Data::Pointer(_))) => (LayerKind::Reference, ty.clone()),
            Some((ty, _)) => (LayerKind::Wrapper, ty.clone()),
            None => break,
        };
        chain.push(Layer { kind, source });
        value = value.elem();
    }

    (value, chain)
}

/// The innermost instance of `value`.
pub fn instance_of(value: Value) -> Value {
    to_instance(value).0
}

/// Wrap `instance` back into the layers of `chain`.
///
/// Layers are applied innermost first, each with its recorded type, so
/// `origin_of(to_instance(v))` has the shape of `v`. A reference layer
/// always allocates a fresh pointer.
pub fn origin_of(instance: Value, chain: &[Layer]) -> Value {
    chain.iter().rev().fold(instance, |current, layer| match layer.kind {
        LayerKind::Reference => {
            let target = if current.is_valid() {
                current
            } else {
                layer.source.elem().map_or_else(Value::absent, Value::zero)
            };
            Value::from_parts(layer.source.clone(), Data::Pointer(Some(Shared::new(target))))
        }
        LayerKind::Wrapper => box_value(&layer.source, current),
    })
}

/// A fresh pointer to the zero value of `ty`.
pub fn new_pointer_of(ty: &Type) -> Value {
    Value::from_parts(
        Type::pointer(ty.clone()),
        Data::Pointer(Some(Shared::new(Value::zero(ty)))),
    )
}

#[cfg(test)]
mod tests;
