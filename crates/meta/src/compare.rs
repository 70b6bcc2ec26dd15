//! Structural equality.
//!
//! [`equal`] walks both values in lockstep. Types must match exactly at every
//! level (a named type never equals its underlying type), records are
//! compared field by field including unexported fields, and pointers and
//! interfaces are compared by what they reach, not by address.
//!
//! # Nil
//!
//! The absent value equals the absent value and every typed nil. Two typed
//! nils of the same type are equal.
//!
//! # Kinds Without Structure
//!
//! Channels never compare equal, not even to themselves. Functions and raw
//! pointers compare by identity.
//!
//! Cyclic values are not supported: comparing a value that reaches itself
//! recurses until the stack is exhausted.

use rustc_hash::FxHashSet;

use crate::instance::unbox;
use crate::stack::ensure_sufficient_stack;
use crate::value::{Data, Handle, MapData, Shared, Value};

/// Deep structural equality of `a` and `b`.
///
/// An interface box around either operand is looked through first, so
/// `any(1)` equals `1` and `any(nil *int)` equals the absent value.
pub fn equal(a: &Value, b: &Value) -> bool {
    value_equal(&unbox(a), &unbox(b))
}

/// Deep structural equality of `a` and `b` exactly as given.
///
/// Unlike [`equal`], the operands' own types must match: `any(1)` and `1`
/// differ.
pub fn value_equal(a: &Value, b: &Value) -> bool {
    ensure_sufficient_stack(|| equal_values(a, b))
}

fn is_nil_like(value: &Value) -> bool {
    !value.is_valid() || value.is_nil()
}

#[allow(clippy::float_cmp, reason = "native float comparison, NaN is unequal")]
fn equal_values(a: &Value, b: &Value) -> bool {
    let (Some((ta, da)), Some((tb, db))) = (a.parts(), b.parts()) else {
        return is_nil_like(a) && is_nil_like(b);
    };
    if ta != tb {
        tracing::trace!(left = %ta, right = %tb, "type mismatch");
        return false;
    }

    match (da, db) {
        (Data::Chan(_), Data::Chan(_)) => false,
        (Data::Func(x), Data::Func(y)) => same_handle(x.as_ref(), y.as_ref()),
        (Data::UnsafePointer(x), Data::UnsafePointer(y)) => x == y,
        (Data::Array(x), Data::Array(y)) | (Data::Struct(x), Data::Struct(y)) => {
            equal_sequences(x, y)
        }
        (Data::Slice(x), Data::Slice(y)) => {
            let (x, y) = (x.as_ref().map(Shared::read), y.as_ref().map(Shared::read));
            equal_sequences(
                x.as_deref().map_or(&[][..], Vec::as_slice),
                y.as_deref().map_or(&[][..], Vec::as_slice),
            )
        }
        (Data::Map(x), Data::Map(y)) => {
            let (x, y) = (x.as_ref().map(Shared::read), y.as_ref().map(Shared::read));
            let empty = MapData::default();
            equal_maps(x.as_deref().unwrap_or(&empty), y.as_deref().unwrap_or(&empty))
        }
        (Data::Pointer(x), Data::Pointer(y)) => match (x, y) {
            (Some(x), Some(y)) => value_equal(&x.read(), &y.read()),
            (Some(target), None) | (None, Some(target)) => is_nil_like(&target.read()),
            (None, None) => true,
        },
        (Data::Interface(x), Data::Interface(y)) => match (x, y) {
            (Some(x), Some(y)) => value_equal(x, y),
            (Some(held), None) | (None, Some(held)) => is_nil_like(held),
            (None, None) => true,
        },
        (Data::Bool(x), Data::Bool(y)) => x == y,
        (Data::Int(x), Data::Int(y)) => x == y,
        (Data::Uint(x), Data::Uint(y)) => x == y,
        (Data::Float(x), Data::Float(y)) => x == y,
        (Data::Str(x), Data::Str(y)) => x == y,
        _ => false,
    }
}

fn same_handle(x: Option<&Handle>, y: Option<&Handle>) -> bool {
    match (x, y) {
        (Some(x), Some(y)) => x.ptr_eq(y),
        (None, None) => true,
        _ => false,
    }
}

fn equal_sequences(x: &[Value], y: &[Value]) -> bool {
    if x.len() != y.len() {
        tracing::trace!(left = x.len(), right = y.len(), "length mismatch");
        return false;
    }
    x.iter().zip(y).all(|(x, y)| value_equal(x, y))
}

/// Every key of `x` is in `y` with an equal value, and every key of `y` is
/// among the keys of `x`.
fn equal_maps(x: &MapData, y: &MapData) -> bool {
    if x.len() != y.len() {
        tracing::trace!(left = x.len(), right = y.len(), "map size mismatch");
        return false;
    }

    let mut seen = FxHashSet::default();
    seen.reserve(x.len());
    for (projection, key, value) in x.iter() {
        let Some(other) = y.get(projection) else {
            tracing::trace!(%key, "key missing from right map");
            return false;
        };
        if !value_equal(value, other) {
            return false;
        }
        seen.insert(projection);
    }

    y.iter().all(|(projection, _, _)| seen.contains(projection))
}
