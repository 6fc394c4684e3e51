//! Array declaration and indexed access through the environment

use integration_tests::Harness;
use ps_span::Line;
use ps_symbols::{ArraySymbol, Dimension, SymbolError, Type, Value};

fn declare_array(harness: &mut Harness, name: &str, dims: &[(i64, i64)], element: Type) {
    let dimensions = dims.iter().copied().map(Dimension::from).collect();
    harness
        .env
        .declare(ArraySymbol::new(name, dimensions, element, Line::new(1)).unwrap())
        .unwrap();
}

/// ```text
/// DECLARE marks : ARRAY[1:5] OF INTEGER
/// FOR i <- 1 TO 5
///     marks[i] <- i * 10
/// NEXT i
/// ```
#[test]
fn test_fill_in_loop_then_sum() {
    let mut harness = Harness::new();
    declare_array(&mut harness, "marks", &[(1, 5)], Type::Integer);

    for i in 1..=5 {
        harness
            .env
            .assign_element("marks", &[i], Value::Integer(i * 10), &harness.checker, Line::new(3))
            .unwrap();
    }

    let total: i64 = (1..=5)
        .map(|i| {
            harness
                .env
                .read_element("marks", &[i], Line::new(5))
                .unwrap()
                .as_integer()
                .unwrap()
        })
        .sum();
    assert_eq!(total, 150);
}

#[test]
fn test_bounds_and_arity() {
    let mut harness = Harness::new();
    declare_array(&mut harness, "a", &[(1, 5)], Type::Integer);
    harness
        .env
        .assign_element("a", &[3], Value::Integer(7), &harness.checker, Line::new(2))
        .unwrap();

    assert_eq!(
        harness.env.read_element("a", &[3], Line::new(3)).unwrap(),
        &Value::Integer(7)
    );
    assert!(matches!(
        harness.env.read_element("a", &[6], Line::new(4)),
        Err(SymbolError::IndexOutOfRange { dimension: 1, index: 6, low: 1, high: 5, line, .. })
            if line == Line::new(4)
    ));
    assert!(matches!(
        harness.env.read_element("a", &[3, 1], Line::new(5)),
        Err(SymbolError::ArityMismatch { expected: 1, actual: 2, .. })
    ));
    assert!(matches!(
        harness.env.read_element("a", &[1], Line::new(6)),
        Err(SymbolError::UninitializedRead { .. })
    ));
}

/// ```text
/// DECLARE board : ARRAY[0:2, 0:2] OF CHAR
/// ```
#[test]
fn test_two_dimensional_board() {
    let mut harness = Harness::new();
    declare_array(&mut harness, "board", &[(0, 2), (0, 2)], Type::Char);

    let board = harness.env.lookup_mut("board").unwrap().as_array_mut().unwrap();
    board.fill(&Value::Char('.'), &harness.checker, Line::new(2)).unwrap();
    board.set(&[1, 1], Value::Char('X'), &harness.checker, Line::new(3)).unwrap();
    assert_eq!(board.rank(), 2);
    assert_eq!(board.len(), 9);

    assert_eq!(
        harness.env.read_element("board", &[1, 1], Line::new(4)).unwrap(),
        &Value::Char('X')
    );
    assert_eq!(
        harness.env.read_element("board", &[2, 0], Line::new(4)).unwrap(),
        &Value::Char('.')
    );
    assert!(matches!(
        harness.env.read_element("board", &[1, 3], Line::new(5)),
        Err(SymbolError::IndexOutOfRange { dimension: 2, index: 3, .. })
    ));
    assert!(matches!(
        harness.env.assign_element("board", &[0, 0], Value::from("XO"), &harness.checker, Line::new(6)),
        Err(SymbolError::TypeMismatch { .. })
    ));
}

#[test]
fn test_offset_lower_bounds() {
    let mut harness = Harness::new();
    declare_array(&mut harness, "years", &[(1990, 1999)], Type::Real);
    declare_array(&mut harness, "delta", &[(-2, 2)], Type::Integer);

    harness
        .env
        .assign_element("years", &[1999], Value::Integer(3), &harness.checker, Line::new(2))
        .unwrap();
    harness
        .env
        .assign_element("delta", &[-2], Value::Integer(-20), &harness.checker, Line::new(3))
        .unwrap();

    assert_eq!(
        harness.env.read_element("years", &[1999], Line::new(4)).unwrap(),
        &Value::Integer(3)
    );
    assert_eq!(
        harness.env.read_element("delta", &[-2], Line::new(4)).unwrap(),
        &Value::Integer(-20)
    );
    assert!(matches!(
        harness.env.read_element("years", &[1989], Line::new(5)),
        Err(SymbolError::IndexOutOfRange { low: 1990, high: 1999, .. })
    ));
}

#[test]
fn test_array_in_inner_scope_shadows() {
    let mut harness = Harness::new();
    declare_array(&mut harness, "buf", &[(1, 2)], Type::Integer);
    harness
        .call(|h| {
            declare_array(h, "buf", &[(1, 10)], Type::Integer);
            let array = h.env.lookup("buf")?.as_array().map(ArraySymbol::len);
            assert_eq!(array, Some(10));
            Ok(())
        })
        .unwrap();
    assert_eq!(
        harness.env.lookup("buf").unwrap().as_array().map(ArraySymbol::len),
        Some(2)
    );
}
