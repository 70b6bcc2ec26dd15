#![allow(clippy::unwrap_used)]

use super::*;
use crate::types::Field;
use pretty_assertions::assert_eq;

fn wizard() -> Type {
    Type::named("Wizard", &Type::record([Field::new("Name", Type::string())]))
}

fn harry() -> Value {
    Value::record(&wizard(), vec![Value::string("Harry")]).unwrap()
}

#[test]
fn test_nil_state() {
    assert_eq!(nil_state(&Value::absent()), NilState::Absent);
    assert_eq!(nil_state(&Value::zero(&Type::pointer(Type::int()))), NilState::TypedNil);
    assert_eq!(nil_state(&Value::zero(&Type::map(Type::int(), Type::int()))), NilState::TypedNil);
    assert_eq!(nil_state(&Value::int(0)), NilState::NotNil);
    assert_eq!(nil_state(&Value::zero(&Type::array(Type::int(), 0))), NilState::NotNil);
}

#[test]
fn test_is_pointer_and_struct() {
    let p = Value::pointer_to(harry()).unwrap();
    assert!(is_pointer(&p));
    assert!(is_pointer(&Value::zero(&Type::pointer(Type::int()))));
    assert!(!is_pointer(&Value::absent()));

    assert!(is_struct(&harry()));
    assert!(is_struct(&p));
    assert!(is_struct(&Value::boxed(&Type::any(), p).unwrap()));
    assert!(!is_struct(&Value::int(1)));
    assert!(!is_struct(&Value::zero(&Type::pointer(wizard()))));
}

#[test]
fn test_strips_every_layer() {
    let pp = Value::pointer_to(Value::pointer_to(harry()).unwrap()).unwrap();
    let boxed = Value::boxed(&Type::any(), pp).unwrap();

    let (instance, chain) = to_instance(boxed);
    assert_eq!(instance.to_string(), "{Harry}");
    assert_eq!(
        chain.iter().map(|layer| layer.kind).collect::<Vec<_>>(),
        vec![LayerKind::Wrapper, LayerKind::Reference, LayerKind::Reference]
    );
    assert_eq!(chain[0].source, Type::any());
    assert_eq!(chain[1].source, Type::pointer(Type::pointer(wizard())));
    assert_eq!(chain[2].source, Type::pointer(wizard()));
}

#[test]
fn test_nil_layers_are_terminal() {
    let nil = Value::zero(&Type::pointer(wizard()));
    let (instance, chain) = to_instance(nil);
    assert!(chain.is_empty());
    assert!(instance.is_nil());

    let to_nil = Value::pointer_to(Value::zero(&Type::pointer(wizard()))).unwrap();
    let (instance, chain) = to_instance(to_nil);
    assert_eq!(chain.len(), 1);
    assert_eq!(instance.type_name(), "*Wizard");

    let (instance, chain) = to_instance(Value::zero(&Type::any()));
    assert!(chain.is_empty());
    assert_eq!(instance.kind(), Kind::Interface);

    let (instance, chain) = to_instance(Value::absent());
    assert!(chain.is_empty());
    assert!(!instance.is_valid());
}

#[test]
fn test_origin_restores_shape() {
    let say = Type::interface(["Say"]);
    let source = Value::boxed(&say, Value::pointer_to(harry()).unwrap()).unwrap();

    let (instance, chain) = to_instance(source.clone());
    let restored = origin_of(instance, &chain);

    assert_eq!(restored.ty(), Some(&say));
    assert_eq!(restored.elem().type_name(), "*Wizard");
    assert_eq!(restored, source);
}

#[test]
fn test_origin_allocates_fresh_references() {
    let source = Value::pointer_to(Value::int(1)).unwrap();
    let (instance, chain) = to_instance(source.clone());
    let restored = origin_of(instance, &chain);

    restored.store(Value::int(2)).unwrap();
    assert_eq!(source.elem().as_int(), Some(1));
    assert!(!restored.same_storage(&source));
}

#[test]
fn test_origin_of_empty_chain() {
    assert_eq!(origin_of(Value::int(3), &[]).as_int(), Some(3));
}

#[test]
fn test_new_pointer_of() {
    let p = new_pointer_of(&wizard());
    assert_eq!(p.type_name(), "*Wizard");
    assert_eq!(p.elem().to_string(), "{}");
}

#[test]
fn test_unbox() {
    let any = Type::any();
    let boxed = Value::boxed(&any, Value::int(4)).unwrap();
    assert_eq!(unbox(&boxed).ty(), Some(&Type::int()));

    let nil = Value::zero(&any);
    assert!(!unbox(&nil).is_valid());

    let ptr = Value::boxed(&any, Value::pointer_to(harry()).unwrap()).unwrap();
    let once = unbox(&ptr);
    assert!(is_pointer(&once));
    assert!(matches!(unbox(&once), Cow::Borrowed(_)));
}

#[test]
fn test_is_instance() {
    assert!(is_instance(&harry()));
    assert!(is_instance(&Value::absent()));
    assert!(is_instance(&Value::zero(&Type::pointer(Type::int()))));
    assert!(!is_instance(&Value::pointer_to(Value::int(1)).unwrap()));
    assert!(!is_instance(&Value::boxed(&Type::any(), Value::int(1)).unwrap()));
}
