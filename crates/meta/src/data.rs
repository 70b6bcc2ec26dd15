//! Comparison helpers over arrays, slices and normalized instances.
//!
//! The `*_info` functions report why two sequences differ; the plain
//! functions only answer whether they do. The `*_instance_*` variants
//! normalize every element through its pointer and interface layers before
//! comparing, so `[]int{1}` and `[]*int{&1}` are equal under them.

use crate::compare::{equal, value_equal};
use crate::errors::{element_mismatch, item_not_found, MetaError, MetaResult, Side};
use crate::instance::{instance_of, unbox};
use crate::types::Kind;
use crate::value::Value;

/// Equality of the innermost instances of `a` and `b`.
pub fn instance_equal(a: &Value, b: &Value) -> bool {
    equal(&instance_of(a.clone()), &instance_of(b.clone()))
}

/// Index-wise equality of two arrays or slices.
pub fn array_equal(a: &Value, b: &Value) -> bool {
    array_equal_info(a, b).is_ok()
}

/// Index-wise equality, reporting the first difference.
pub fn array_equal_info(a: &Value, b: &Value) -> MetaResult<()> {
    compare_in_order(a, b, false)
}

pub fn array_instance_equal(a: &Value, b: &Value) -> bool {
    array_instance_equal_info(a, b).is_ok()
}

pub fn array_instance_equal_info(a: &Value, b: &Value) -> MetaResult<()> {
    compare_in_order(a, b, true)
}

/// Order-insensitive equality of two arrays or slices.
pub fn array_item_equal(a: &Value, b: &Value) -> bool {
    array_item_equal_info(a, b).is_ok()
}

/// Order-insensitive equality, reporting the first element of `a` with no
/// partner in `b`.
///
/// Each element of `a` claims the first equal, unclaimed element of `b`.
/// Lengths are checked first, so once every element of `a` has claimed a
/// partner no element of `b` is left over.
pub fn array_item_equal_info(a: &Value, b: &Value) -> MetaResult<()> {
    compare_any_order(a, b, false)
}

pub fn array_item_instance_equal(a: &Value, b: &Value) -> bool {
    array_item_instance_equal_info(a, b).is_ok()
}

pub fn array_item_instance_equal_info(a: &Value, b: &Value) -> MetaResult<()> {
    compare_any_order(a, b, true)
}

fn sequence(value: &Value, side: Side) -> MetaResult<Vec<Value>> {
    let value = unbox(value);
    match value.kind() {
        Kind::Array | Kind::Slice => Ok(value.items().unwrap_or_default()),
        kind => Err(MetaError::NotSequence { side, kind }),
    }
}

/// Both sides as sequences of equal length, normalized if requested.
fn operands(a: &Value, b: &Value, normalize: bool) -> MetaResult<(Vec<Value>, Vec<Value>)> {
    let left = sequence(a, Side::Left)?;
    let right = sequence(b, Side::Right)?;
    if left.len() != right.len() {
        return Err(MetaError::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }

    if normalize {
        Ok((normalize_all(left), normalize_all(right)))
    } else {
        Ok((left, right))
    }
}

fn normalize_all(items: Vec<Value>) -> Vec<Value> {
    items.into_iter().map(instance_of).collect()
}

fn compare_in_order(a: &Value, b: &Value, normalize: bool) -> MetaResult<()> {
    let (left, right) = operands(a, b, normalize)?;
    for (index, (x, y)) in left.iter().zip(&right).enumerate() {
        if !value_equal(x, y) {
            return Err(element_mismatch(index, x, y));
        }
    }
    Ok(())
}

fn compare_any_order(a: &Value, b: &Value, normalize: bool) -> MetaResult<()> {
    let (left, right) = operands(a, b, normalize)?;
    let mut claimed = vec![false; right.len()];

    for (index, x) in left.iter().enumerate() {
        let partner = right
            .iter()
            .zip(claimed.iter_mut())
            .find(|(y, taken)| !**taken && value_equal(x, y));
        match partner {
            Some((_, taken)) => *taken = true,
            None => return Err(item_not_found(index, x)),
        }
    }
    Ok(())
}
