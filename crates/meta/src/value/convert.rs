//! Type conversion and assignability.
//!
//! [`Value::convert`] is the explicit conversion used by the field accessor:
//! numeric width changes, retagging between types with the same underlying
//! shape, boxing into interfaces and the string/byte-slice pair.
//! [`assign`] is the narrower implicit rule used when a value is stored into
//! a typed slot.

use super::{Data, Shared, Value};
use crate::errors::{type_mismatch, MetaError, MetaResult};
use crate::types::{Kind, Type};

impl Value {
    /// Convert to `target`, or `None` when no conversion exists.
    ///
    /// An absent value converts to the typed nil of any nilable type.
    pub fn convert(&self, target: &Type) -> Option<Value> {
        let Some((ty, data)) = self.parts() else {
            return target.is_nilable().then(|| Value::zero(target));
        };
        if ty == target {
            return Some(self.clone());
        }
        if target.kind() == Kind::Interface {
            return Some(box_value(target, self.clone()));
        }

        let to = target.kind();
        if ty.kind().is_numeric() && to.is_numeric() {
            return convert_numeric(data, to).map(|data| Value::from_parts(target.clone(), data));
        }
        if ty.underlying() == target.underlying() {
            return Some(Value::from_parts(target.clone(), data.clone()));
        }

        let elem_kind = |t: &Type| t.elem().map(Type::kind);
        match data {
            Data::Str(s) if to == Kind::Slice && elem_kind(target) == Some(Kind::Uint8) => {
                let byte = target.elem()?;
                let items = s
                    .bytes()
                    .map(|b| Value::from_parts(byte.clone(), Data::Uint(u64::from(b))))
                    .collect();
                Some(Value::from_parts(
                    target.clone(),
                    Data::Slice(Some(Shared::new(items))),
                ))
            }
            Data::Slice(storage) if to == Kind::String && elem_kind(ty) == Some(Kind::Uint8) => {
                let bytes: Vec<u8> = storage
                    .as_ref()
                    .map(|s| {
                        s.read()
                            .iter()
                            .filter_map(Value::as_uint)
                            .map(|b| b.to_le_bytes()[0])
                            .collect()
                    })
                    .unwrap_or_default();
                let text = String::from_utf8_lossy(&bytes).into_owned();
                Some(Value::from_parts(target.clone(), Data::Str(text)))
            }
            _ => None,
        }
    }

    /// Whether [`Value::convert`] succeeds for `target`.
    pub fn can_convert(&self, target: &Type) -> bool {
        self.convert(target).is_some()
    }
}

/// Check `value` against a slot of type `target`.
///
/// Identical types pass through, interface slots box their value and absent
/// values become the slot's typed nil. Nothing else is converted.
pub(crate) fn assign(target: &Type, value: Value) -> MetaResult<Value> {
    match value.ty() {
        Some(ty) if ty == target => Ok(value),
        _ if target.kind() == Kind::Interface => Ok(box_value(target, value)),
        None if target.is_nilable() => Ok(Value::zero(target)),
        None => Err(MetaError::UntypedNil),
        Some(_) => Err(type_mismatch(target, &value)),
    }
}

/// Wrap `held` into interface type `iface` without checking `iface`.
pub(crate) fn box_value(iface: &Type, held: Value) -> Value {
    let held = if held.kind() == Kind::Interface {
        held.elem()
    } else {
        held
    };
    let data = if held.is_valid() {
        Data::Interface(Some(Box::new(held)))
    } else {
        Data::Interface(None)
    };
    Value::from_parts(iface.clone(), data)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "numeric conversion wraps and truncates"
)]
fn convert_numeric(data: &Data, to: Kind) -> Option<Data> {
    let converted = match *data {
        Data::Int(n) if to.is_signed() => Data::Int(wrap_signed(to, n)),
        Data::Int(n) if to.is_unsigned() => Data::Uint(wrap_unsigned(to, n as u64)),
        Data::Int(n) => Data::Float(round_float(to, n as f64)),
        Data::Uint(n) if to.is_signed() => Data::Int(wrap_signed(to, n as i64)),
        Data::Uint(n) if to.is_unsigned() => Data::Uint(wrap_unsigned(to, n)),
        Data::Uint(n) => Data::Float(round_float(to, n as f64)),
        Data::Float(x) if to.is_signed() => Data::Int(wrap_signed(to, x as i64)),
        Data::Float(x) if to.is_unsigned() => Data::Uint(wrap_unsigned(to, x as u64)),
        Data::Float(x) => Data::Float(round_float(to, x)),
        _ => return None,
    };
    Some(converted)
}

/// Wrap `n` to the width of signed kind `kind`.
#[allow(clippy::cast_possible_truncation, reason = "wrapping is the point")]
pub(super) fn wrap_signed(kind: Kind, n: i64) -> i64 {
    match kind {
        Kind::Int8 => i64::from(n as i8),
        Kind::Int16 => i64::from(n as i16),
        Kind::Int32 => i64::from(n as i32),
        _ => n,
    }
}

/// Wrap `n` to the width of unsigned kind `kind`.
#[allow(clippy::cast_possible_truncation, reason = "wrapping is the point")]
pub(super) fn wrap_unsigned(kind: Kind, n: u64) -> u64 {
    match kind {
        Kind::Uint8 => u64::from(n as u8),
        Kind::Uint16 => u64::from(n as u16),
        Kind::Uint32 => u64::from(n as u32),
        _ => n,
    }
}

#[allow(clippy::cast_possible_truncation, reason = "float32 rounding")]
pub(super) fn round_float(kind: Kind, x: f64) -> f64 {
    match kind {
        Kind::Float32 => f64::from(x as f32),
        _ => x,
    }
}

#[cfg(test)]
mod tests;
