//! Deep duplication.
//!
//! [`duplicate`] normalizes its input, copies the instance and rebuilds the
//! stripped layers around the copy, so the result has the input's exact
//! outer shape and shares no storage with it at the top level.
//!
//! # Depth
//!
//! Below the top level, containers are copied recursively: slices, maps,
//! arrays, records and interface contents all get fresh storage. Pointers
//! found inside a value are copied as pointers: the copy points at the same
//! target as the original.
//!
//! ```text
//! wizard:   { Name, friends: []string, mentor: *Wizard }
//! copy:     { Name, friends: fresh []string, mentor: same *Wizard }
//! ```
//!
//! # Unexported Fields
//!
//! Every slot of a new record, array or slice is filled through
//! [`Value::force_write`], so unexported fields are copied like any other.

use crate::errors::{not_duplicatable, MetaError, MetaResult};
use crate::instance::{instance_of, origin_of, to_instance};
use crate::stack::ensure_sufficient_stack;
use crate::types::Type;
use crate::value::{box_value, Data, Shared, Value};

/// Deep-copy `value`, keeping its pointer and interface layers.
///
/// The absent value cannot be duplicated. A typed nil duplicates to the
/// typed nil of the same type.
#[tracing::instrument(level = "debug", skip_all, fields(ty = %value.type_name()))]
pub fn duplicate(value: &Value) -> MetaResult<Value> {
    if !value.is_valid() {
        tracing::debug!("untyped nil rejected");
        return Err(MetaError::UntypedNil);
    }

    let (instance, chain) = to_instance(value.clone());
    let copy = duplicate_value(&instance)?;
    Ok(origin_of(copy, &chain))
}

/// Deep-copy the innermost instance of `value`, without its layers.
pub fn duplicate_instance(value: &Value) -> MetaResult<Value> {
    duplicate_value(&instance_of(value.clone()))
}

fn duplicate_value(value: &Value) -> MetaResult<Value> {
    ensure_sufficient_stack(|| duplicate_inner(value))
}

fn duplicate_inner(value: &Value) -> MetaResult<Value> {
    let Some((ty, data)) = value.parts() else {
        tracing::debug!("untyped nil rejected");
        return Err(MetaError::UntypedNil);
    };

    match data {
        Data::Slice(None)
        | Data::Map(None)
        | Data::Pointer(None)
        | Data::Interface(None)
        | Data::Chan(None)
        | Data::Func(None) => Ok(Value::zero(ty)),

        Data::Array(items) | Data::Struct(items) => {
            let mut copy = Value::zero(ty);
            fill(&mut copy, items)?;
            Ok(copy)
        }
        Data::Slice(Some(storage)) => {
            let items = storage.read();
            let mut copy = new_slice(ty, items.len(), items.capacity());
            fill(&mut copy, &items)?;
            Ok(copy)
        }
        Data::Map(Some(storage)) => {
            let entries = storage.read();
            let copy = Value::make_map(ty, entries.len())?;
            for (_, key, item) in entries.iter() {
                copy.map_insert(duplicate_value(key)?, duplicate_value(item)?)?;
            }
            Ok(copy)
        }
        Data::Interface(Some(held)) => {
            let held = duplicate_value(held)?;
            Ok(box_value(ty, held))
        }
        // Shares the target.
        Data::Pointer(Some(_)) => Ok(value.clone()),

        Data::Bool(_) | Data::Int(_) | Data::Uint(_) | Data::Float(_) | Data::Str(_) => {
            Ok(Value::from_parts(ty.clone(), data.clone()))
        }

        Data::Chan(Some(_)) | Data::Func(Some(_)) | Data::UnsafePointer(_) => {
            tracing::debug!(kind = %ty.kind(), "not duplicatable");
            Err(not_duplicatable(ty.kind()))
        }
    }
}

/// A slice of type `ty` over fresh storage holding `len` zero elements.
fn new_slice(ty: &Type, len: usize, capacity: usize) -> Value {
    let mut items = Vec::with_capacity(capacity.max(len));
    if let Some(elem) = ty.elem() {
        items.resize(len, Value::zero(elem));
    }
    Value::from_parts(ty.clone(), Data::Slice(Some(Shared::new(items))))
}

fn fill(copy: &mut Value, items: &[Value]) -> MetaResult<()> {
    for (index, item) in items.iter().enumerate() {
        let item = duplicate_value(item)?;
        copy.force_write(index, item)?;
    }
    Ok(())
}
