#![allow(clippy::unwrap_used)]

use super::*;
use crate::errors::ErrorCategory;
use pretty_assertions::assert_eq;

#[test]
fn test_numeric_conversion() {
    let n = Value::typed_int(&Type::int64(), 1999).unwrap();
    let converted = n.convert(&Type::int()).unwrap();
    assert_eq!(converted.ty(), Some(&Type::int()));
    assert_eq!(converted.as_int(), Some(1999));

    let wrapped = Value::int(300).convert(&Type::uint8()).unwrap();
    assert_eq!(wrapped.as_uint(), Some(44));

    let truncated = Value::float(2.9).convert(&Type::int()).unwrap();
    assert_eq!(truncated.as_int(), Some(2));

    let negative = Value::int(-1).convert(&Type::int8()).unwrap();
    assert_eq!(negative.as_int(), Some(-1));
}

#[test]
fn test_named_retag() {
    let celsius = Type::named("Celsius", &Type::float64());
    let c = Value::float(21.5).convert(&celsius).unwrap();
    assert_eq!(c.ty(), Some(&celsius));
    assert_eq!(c.as_float(), Some(21.5));

    let wizard = Type::named("Wizard", &Type::record([crate::types::Field::new("Name", Type::string())]));
    let plain = Value::record(&wizard.underlying(), vec![Value::string("Harry")]).unwrap();
    let named = plain.convert(&wizard).unwrap();
    assert_eq!(named.ty(), Some(&wizard));
}

#[test]
fn test_string_bytes() {
    let bytes_ty = Type::slice(Type::uint8());
    let bytes = Value::string("hi").convert(&bytes_ty).unwrap();
    assert_eq!(bytes.len(), Some(2));
    assert_eq!(bytes.index(0).unwrap().as_uint(), Some(u64::from(b'h')));

    let back = bytes.convert(&Type::string()).unwrap();
    assert_eq!(back.as_str(), Some("hi"));
}

#[test]
fn test_impossible_conversions() {
    assert!(!Value::string("1999").can_convert(&Type::int()));
    assert!(!Value::int(1).can_convert(&Type::string()));
    assert!(!Value::absent().can_convert(&Type::int()));
    assert!(Value::absent().convert(&Type::pointer(Type::int())).unwrap().is_nil());
}

#[test]
fn test_convert_into_interface() {
    let boxed = Value::int(7).convert(&Type::any()).unwrap();
    assert_eq!(boxed.kind(), Kind::Interface);
    assert_eq!(boxed.elem().as_int(), Some(7));
}

#[test]
fn test_assign_rules() {
    let err = assign(&Type::int(), Value::string("x")).unwrap_err();
    assert_eq!(err.to_string(), "cannot use value of type string as int");

    let err = assign(&Type::int(), Value::absent()).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::UntypedNil);

    let nil = assign(&Type::slice(Type::int()), Value::absent()).unwrap();
    assert!(nil.is_nil());

    let held = assign(&Type::any(), Value::string("x")).unwrap();
    assert_eq!(held.kind(), Kind::Interface);
}

#[test]
fn test_interfaces_never_nest() {
    let inner = Value::boxed(&Type::any(), Value::int(1)).unwrap();
    let outer = box_value(&Type::interface(["Say"]), inner);
    assert_eq!(outer.elem().kind(), Kind::Int);
}

#[test]
fn test_widths() {
    assert_eq!(wrap_signed(Kind::Int16, 70_000), 4464);
    assert_eq!(wrap_unsigned(Kind::Uint32, u64::MAX), u64::from(u32::MAX));
    assert_eq!(round_float(Kind::Float32, 0.1), f64::from(0.1f32));
    assert_eq!(round_float(Kind::Float64, 0.1), 0.1);
}
