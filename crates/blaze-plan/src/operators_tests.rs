use blaze_datashape::parse_type;

use crate::operators::{
    ExecutorTable, OperatorCall, OperatorLookup, OperatorRef, OperatorTable, ResolvedOperator,
};

fn call(name: &str, operands: &[&str]) -> OperatorCall {
    OperatorCall {
        name: name.into(),
        operands: operands.iter().map(|s| parse_type(s).unwrap()).collect(),
    }
}

#[test]
fn call_display() {
    let c = call("Add", &["2, int32", "{x: float64}"]);
    insta::assert_snapshot!(c, @"Add(2, int32; {x: float64})");
    insta::assert_snapshot!(call("Now", &[]), @"Now()");
}

#[test]
fn arithmetic_table() {
    let table = OperatorTable::arithmetic();
    assert_eq!(table.len(), 6);

    let resolved: Vec<_> = ["Add", "Sub", "Mul", "Div", "Mod", "Pow"]
        .into_iter()
        .map(|name| {
            let found = table.lookup(&call(name, &["int32", "int32"])).unwrap();
            assert_eq!(found.cost, 1);
            found.operator.to_string()
        })
        .collect();
    assert_eq!(
        resolved,
        ["add", "subtract", "multiply", "divide", "mod", "power"]
    );
}

#[test]
fn arity_is_checked() {
    let table = OperatorTable::arithmetic();
    assert_eq!(table.lookup(&call("Add", &["int32"])), None);
    assert_eq!(table.lookup(&call("Add", &["int32"; 3])), None);
    assert_eq!(table.lookup(&call("Neg", &["int32"])), None);
}

#[test]
fn variadic_and_replaced_entries() {
    let table = OperatorTable::new()
        .with("Max", "maximum", 2)
        .with_arity("Neg", "negative", 1, 1)
        .with("Max", "fmax", 4);
    assert_eq!(table.len(), 2);

    assert_eq!(
        table.lookup(&call("Max", &["int8"; 5])),
        Some(ResolvedOperator {
            operator: OperatorRef::new("fmax"),
            cost: 4,
        })
    );
    assert_eq!(
        table
            .lookup(&call("Neg", &["float32"]))
            .map(|r| r.operator.name().to_owned()),
        Some("negative".to_owned())
    );
    assert!(OperatorTable::new().is_empty());
}

#[test]
fn closures_are_lookups() {
    let only_float = |call: &OperatorCall| {
        call.operands
            .iter()
            .all(|ty| ty.unit().is_some_and(|unit| unit.to_string().starts_with("float")))
            .then(|| ResolvedOperator {
                operator: OperatorRef::new(call.name.to_lowercase()),
                cost: 2,
            })
    };
    let lookup: &dyn OperatorLookup = &only_float;

    assert!(lookup.lookup(&call("Add", &["float32", "3, float64"])).is_some());
    assert!(lookup.lookup(&call("Add", &["float32", "int32"])).is_none());
}

#[test]
fn executor_table_registration() {
    let mut executors: ExecutorTable<u8> = [("e1", 1), ("e0", 0)].into_iter().collect();
    assert_eq!(executors.insert("e2", 2), None);
    assert_eq!(executors.insert("e1", 10), Some(1));

    assert_eq!(executors.len(), 3);
    assert!(executors.contains("e0"));
    assert!(!executors.contains("e3"));
    assert_eq!(executors.get("e1"), Some(&10));
    assert!(ExecutorTable::<u8>::new().is_empty());
}
