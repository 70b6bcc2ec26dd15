//! Named field access on records.
//!
//! Only exported fields are reachable: an unexported field reports
//! `no field '<name>'` exactly like a missing one. One interface box and
//! then one pointer layer are followed automatically. Writing requires the
//! pointer, since a record passed by value has no storage a write could
//! reach. Field values come back out of their interface box.

use crate::errors::{field_not_found, MetaError, MetaResult};
use crate::instance::unbox;
use crate::types::{Kind, Type};
use crate::value::{Data, Shared, Value};

/// Where the record lives.
enum Holder<'a> {
    /// Passed by value.
    Direct(&'a Value),
    /// Behind a pointer.
    Behind(&'a Shared<Value>),
}

fn holder(record: &Value) -> MetaResult<Holder<'_>> {
    match record.data() {
        Some(Data::Pointer(Some(target))) => Ok(Holder::Behind(target)),
        Some(Data::Pointer(None)) => Err(MetaError::NilDereference {
            type_name: record.type_name(),
        }),
        _ => Ok(Holder::Direct(record)),
    }
}

/// Position and declared type of the exported field `name`.
fn lookup(record: &Value, name: &str) -> MetaResult<(usize, Type)> {
    let ty = record.ty().ok_or(MetaError::UntypedNil)?;
    if ty.kind() != Kind::Struct {
        return Err(MetaError::UnexpectedKind {
            expected: Kind::Struct,
            got: ty.kind(),
        });
    }

    ty.field_index(name)
        .and_then(|index| Some((index, ty.fields().get(index)?)))
        .filter(|(_, field)| field.is_exported())
        .map(|(index, field)| (index, field.ty().clone()))
        .ok_or_else(|| field_not_found(name))
}

/// Read field `name` of a record, or of the record a pointer points at.
pub fn get_field(record: &Value, name: &str) -> MetaResult<Value> {
    let read = |record: &Value| -> MetaResult<Value> {
        let (index, _) = lookup(record, name)?;
        let value = record.field(index).ok_or_else(|| field_not_found(name))?;
        Ok(unbox(&value).into_owned())
    };

    let record = unbox(record);
    match holder(&record)? {
        Holder::Direct(record) => read(record),
        Holder::Behind(target) => read(&target.read()),
    }
}

/// Write field `name` of the record `record` points at.
///
/// A value of a different type is converted to the field's type when a
/// conversion exists. Returns the value as stored.
pub fn set_field(record: &Value, name: &str, value: Value) -> MetaResult<Value> {
    let record = unbox(record);
    let target = match holder(&record)? {
        Holder::Direct(record) => {
            lookup(record, name)?;
            return Err(MetaError::FieldNotWritable {
                name: name.to_string(),
            });
        }
        Holder::Behind(target) => target,
    };

    let (index, field_ty) = lookup(&target.read(), name)?;
    let stored = coerce(name, &field_ty, unbox(&value).into_owned())?;

    let mut pointee = target.write();
    match pointee.data_mut() {
        Some(Data::Struct(fields)) => match fields.get_mut(index) {
            Some(slot) => *slot = stored.clone(),
            None => return Err(field_not_found(name)),
        },
        _ => return Err(field_not_found(name)),
    }
    Ok(unbox(&stored).into_owned())
}

fn coerce(name: &str, field_ty: &Type, value: Value) -> MetaResult<Value> {
    if value.ty() == Some(field_ty) {
        return Ok(value);
    }
    match value.convert(field_ty) {
        Some(converted) => {
            tracing::trace!(field = name, from = %value.type_name(), to = %field_ty, "converted");
            Ok(converted)
        }
        None => Err(MetaError::FieldTypeMismatch {
            name: name.to_string(),
            expected: field_ty.to_string(),
            got: value.type_name(),
        }),
    }
}
