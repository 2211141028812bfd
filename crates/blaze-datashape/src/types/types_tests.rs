use super::{Constructor, ConstructorSignature, PrimitiveKind, Type};

fn int32() -> Type {
    Type::Primitive(PrimitiveKind::Int32)
}

#[test]
fn components_dims_and_unit() {
    let ty = Type::DataShape(vec![Type::Fixed(2), Type::TypeVar("N".into()), int32()]);
    assert_eq!(ty.components().len(), 3);
    assert_eq!(ty.dims(), &[Type::Fixed(2), Type::TypeVar("N".into())]);
    assert_eq!(ty.unit(), Some(&int32()));

    let scalar = int32();
    assert_eq!(scalar.components(), std::slice::from_ref(&scalar));
    assert!(scalar.dims().is_empty());
    assert_eq!(scalar.unit(), Some(&scalar));
}

#[test]
fn empty_datashape_has_no_unit() {
    let empty = Type::DataShape(Vec::new());
    assert!(empty.components().is_empty());
    assert!(empty.dims().is_empty());
    assert_eq!(empty.unit(), None);
}

#[test]
fn from_components_collapses_once() {
    assert_eq!(Type::from_components(vec![int32()]), int32());
    assert_eq!(
        Type::from_components(vec![Type::Fixed(3), int32()]),
        Type::DataShape(vec![Type::Fixed(3), int32()])
    );
}

#[test]
fn primitive_registry() {
    assert_eq!(PrimitiveKind::from_name("int"), Some(PrimitiveKind::Int32));
    assert_eq!(PrimitiveKind::from_name("float"), Some(PrimitiveKind::Float64));
    assert_eq!(PrimitiveKind::from_name("uint16"), Some(PrimitiveKind::Uint16));
    assert_eq!(PrimitiveKind::from_name("Int32"), None);
    assert!(PrimitiveKind::is_primitive_name("timedelta64"));
    assert!(!PrimitiveKind::is_primitive_name("type"));
    for kind in PrimitiveKind::ALL {
        assert_eq!(PrimitiveKind::from_name(kind.name()), Some(kind));
    }
}

#[test]
fn constructor_names() {
    for constructor in Constructor::ALL {
        assert_eq!(Constructor::from_name(constructor.name()), Some(constructor));
    }
    assert_eq!(Constructor::from_name("String"), None);
    assert_eq!(Constructor::String.to_string(), "string");
}

#[test]
fn signature_accessors() {
    let sig = ConstructorSignature::new(["Pair", "a", "b"].map(String::from));
    assert_eq!(sig.name(), "Pair");
    assert_eq!(sig.params(), ["a", "b"]);
    assert!(sig.is_parametrized());

    let plain = ConstructorSignature::new(["Point".to_string()]);
    assert!(plain.params().is_empty());
    assert!(!plain.is_parametrized());
}

#[test]
fn render_hand_built_values() {
    let ty = Type::Either(
        Box::new(Type::DataShape(vec![Type::Fixed(3), int32()])),
        Box::new(Type::Record(vec![
            ("a".into(), Type::Range(0, 9)),
            ("b".into(), Type::Varchar(5)),
        ])),
    );
    insta::assert_snapshot!(ty, @"Either((3, int32), {a: Range(0, 9); b: Varchar(5)})");

    let bare = Type::String {
        length: None,
        encoding: None,
    };
    assert_eq!(bare.to_string(), "string");

    let quoted = Type::String {
        length: None,
        encoding: Some("a'b\\c\n".into()),
    };
    assert_eq!(quoted.to_string(), r"string('a\'b\\c\n')");

    assert_eq!(Type::Record(vec![]).to_string(), "{}");
    assert_eq!(
        Type::Union(vec![int32(), Type::Option(Box::new(Type::TypeVar("T".into())))]).to_string(),
        "Union(int32, Option(T))"
    );
}
