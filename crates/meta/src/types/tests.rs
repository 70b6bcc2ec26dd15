use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_exported_names() {
    let cases = [
        ("", false),
        ("a", false),
        ("A", true),
        ("_x9", false),
        ("ThisVariableIsExported", true),
        ("english", false),
        ("English", true),
        ("ελληνικά", false),
        ("Ελληνικά", true),
        ("русские", false),
        ("Русские", true),
        ("中文", false),
        ("日本語", false),
        ("にほんご", false),
        ("ニホンゴ", false),
        ("Ⅸ", false),
        ("Ⓐpple", false),
        ("ǅ", false),
    ];

    for (name, exported) in cases {
        assert_eq!(is_exported_name(name), exported, "is_exported_name({name:?})");
    }
}

#[test]
fn test_field_visibility_follows_name() {
    assert_eq!(Field::new("Name", Type::string()).visibility(), Visibility::Exported);
    assert_eq!(Field::new("age", Type::int()).visibility(), Visibility::Unexported);
    assert!(!Field::new("Ⅰ", Type::int()).is_exported());
}

#[test]
fn test_structural_equality() {
    assert_eq!(Type::slice(Type::int()), Type::slice(Type::int()));
    assert_ne!(Type::slice(Type::int()), Type::slice(Type::int32()));
    assert_ne!(Type::int(), Type::int64());

    let a = Type::record([Field::new("Name", Type::string())]);
    let b = Type::record([Field::new("Name", Type::string())]);
    assert_eq!(a, b);
}

#[test]
fn test_named_types_are_distinct() {
    let celsius = Type::named("Celsius", &Type::float64());
    assert_ne!(celsius, Type::float64());
    assert_eq!(celsius.kind(), Kind::Float64);
    assert_eq!(celsius.underlying(), Type::float64());
    assert_eq!(celsius.name(), Some("Celsius"));
}

#[test]
fn test_display() {
    let person = Type::record([
        Field::new("Name", Type::string()),
        Field::new("age", Type::int()),
    ]);

    assert_eq!(Type::int().to_string(), "int");
    assert_eq!(Type::array(Type::int(), 3).to_string(), "[3]int");
    assert_eq!(Type::slice(Type::string()).to_string(), "[]string");
    assert_eq!(
        Type::map(Type::string(), Type::int()).to_string(),
        "map[string]int"
    );
    assert_eq!(Type::pointer(person.clone()).to_string(), "*struct { Name string; age int }");
    assert_eq!(Type::record([]).to_string(), "struct {}");
    assert_eq!(Type::any().to_string(), "interface {}");
    assert_eq!(Type::interface(["Say"]).to_string(), "interface { Say() }");
    assert_eq!(Type::chan(Type::int()).to_string(), "chan int");
    assert_eq!(
        Type::func([Type::int()], [Type::string()]).to_string(),
        "func(int) string"
    );
    assert_eq!(
        Type::func([], [Type::int(), Type::bool()]).to_string(),
        "func() (int, bool)"
    );
    assert_eq!(Type::unsafe_pointer().to_string(), "unsafe.Pointer");
    assert_eq!(Type::pointer(Type::named("Wizard", &person)).to_string(), "*Wizard");
}

#[test]
fn test_kind_classes() {
    assert!(Kind::Int8.is_signed());
    assert!(Kind::Uintptr.is_unsigned());
    assert!(Kind::Float32.is_numeric());
    assert!(!Kind::String.is_numeric());
    assert!(Kind::Slice.is_nilable());
    assert!(!Kind::Array.is_nilable());
    assert!(Kind::Interface.is_indirection());
    assert_eq!(Kind::Pointer.to_string(), "ptr");
}

#[test]
fn test_accessors() {
    let map = Type::map(Type::string(), Type::int());
    assert_eq!(map.elem(), Some(&Type::int()));

    let record = Type::record([
        Field::new("Name", Type::string()),
        Field::new("age", Type::int()),
    ]);
    assert_eq!(record.field_index("age"), Some(1));
    assert_eq!(record.field_index("Age"), None);
    assert!(Type::int().fields().is_empty());
}
