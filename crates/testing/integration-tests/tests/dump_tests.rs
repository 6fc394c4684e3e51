//! Rendered diagnostic dumps

use expect_test::expect;
use indexmap::IndexMap;
use integration_tests::Harness;
use ps_span::Line;
use ps_symbols::{
    ArraySymbol, Dimension, FileMode, FunctionSymbol, Param, Scope, StatementBlock, Type, TypeDefSymbol,
    Value, Variable,
};
use ps_vfs::MemoryFileStore;

#[test]
fn test_dump_global_scope() {
    let mut harness = Harness::new();
    let mut fields = IndexMap::new();
    fields.insert("name".to_string(), Type::String);
    fields.insert("age".to_string(), Type::Integer);
    harness
        .env
        .declare(TypeDefSymbol::composite("Person", fields, Line::new(1)))
        .unwrap();
    harness
        .env
        .declare(Variable::new("who", Type::named("Person"), Line::new(5)))
        .unwrap();

    let mut person = IndexMap::new();
    person.insert("name".to_string(), Value::from("Ada"));
    person.insert("age".to_string(), Value::Integer(36));
    harness
        .assign(
            "who",
            Value::Record {
                type_name: "Person".to_string(),
                fields: person,
            },
            6,
        )
        .unwrap();

    harness
        .env
        .declare(FunctionSymbol::new(
            "Age",
            vec![Param::new("p", Type::named("Person"))],
            Type::Integer,
            StatementBlock::new(()),
            Line::new(8),
        ))
        .unwrap();

    expect![[r#"
        FUNCTION symbol name=Age | args=(p: Person) | returns=INTEGER
        TYPE symbol name=Person | type=RECORD(name: STRING, age: INTEGER) | value=<none> | line 1
        VARIABLE symbol name=who | type=Person | value=Person { name: "Ada", age: 36 }"#]]
    .assert_eq(&harness.env.dump().join("\n"));
}

#[test]
fn test_dump_only_innermost_scope() {
    let mut harness =
        Harness::with_store(Box::new(MemoryFileStore::with_files([("data.txt", "a\nb\nc\n")])));
    harness.declare_with("hidden", Type::Integer, 1i64, 1).unwrap();

    harness.env.push(Scope::call());
    harness
        .env
        .declare(ArraySymbol::new("row", vec![Dimension::new(1, 3)], Type::Integer, Line::new(2)).unwrap())
        .unwrap();
    harness
        .env
        .assign_element("row", &[2], Value::Integer(5), &harness.checker, Line::new(3))
        .unwrap();
    let store = &*harness.store;
    harness
        .env
        .open_file("data.txt", FileMode::Read, store, Line::new(4))
        .unwrap();
    harness
        .env
        .file_mut("data.txt", Line::new(5))
        .unwrap()
        .read_line(Line::new(5))
        .unwrap();

    expect![[r#"
        FILE symbol name=data.txt | mode=READ | line=1/3
        ARRAY symbol name=row | type=INTEGER | dimensions=[1:3] | value=[_, 5, _]"#]]
    .assert_eq(&harness.env.dump().join("\n"));

    harness.env.pop().unwrap();
    expect![[r#"VARIABLE symbol name=hidden | type=INTEGER | value=1"#]]
        .assert_eq(&harness.env.dump().join("\n"));
}
