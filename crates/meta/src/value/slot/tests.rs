#![allow(clippy::unwrap_used)]

use super::*;
use crate::types::{Field, Type};
use pretty_assertions::assert_eq;

#[test]
fn test_writes_unexported_field() {
    let ty = Type::record([
        Field::new("Name", Type::string()),
        Field::new("secret", Type::int()),
    ]);
    let mut v = Value::zero(&ty);
    v.force_write(1, Value::int(42)).unwrap();

    assert_eq!(v.field(1).unwrap().as_int(), Some(42));
}

#[test]
fn test_writes_array_and_slice() {
    let mut array = Value::zero(&Type::array(Type::int(), 2));
    array.force_write(1, Value::int(5)).unwrap();
    assert_eq!(array.to_string(), "[0 5]");

    let mut slice = Value::slice(&Type::int(), vec![Value::int(0)]).unwrap();
    let alias = slice.clone();
    slice.force_write(0, Value::int(9)).unwrap();
    assert_eq!(alias.to_string(), "[9]");
}

#[test]
fn test_rejects_bad_targets() {
    let mut nil = Value::zero(&Type::slice(Type::int()));
    let err = nil.force_write(0, Value::int(1)).unwrap_err();
    assert_eq!(err.to_string(), "cannot write into nil []int");

    let mut scalar = Value::int(1);
    assert!(scalar.force_write(0, Value::int(2)).is_err());

    let mut short = Value::zero(&Type::array(Type::int(), 1));
    let err = short.force_write(3, Value::int(2)).unwrap_err();
    assert_eq!(err.to_string(), "index 3 out of range for length 1");
}
