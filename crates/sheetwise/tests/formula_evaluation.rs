//! Tests for formula evaluation against a host grid

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sheetwise::{CellRef, Sheet};
use sheetwise::{evaluate, evaluate_formula, format_ref, normalize, parse_formula, parse_ref};
use sheetwise::{EvaluationContext, FormulaValue};
use std::collections::HashMap;

fn grid(cells: &[(&str, &str)]) -> HashMap<String, String> {
    cells
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Test SUM over literals
#[test]
fn test_sum_literals() {
    let cells = grid(&[]);
    assert_eq!(evaluate_formula("=SUM(1,2)", &cells), "3");
    assert_eq!(evaluate_formula("=SUM(1,2,3,4)", &cells), "10");
    assert_eq!(evaluate_formula("=SUM(1.5,2.5)", &cells), "4");
}

/// Test operator precedence and grouping
#[test]
fn test_precedence() {
    let cells = grid(&[]);
    assert_eq!(evaluate_formula("=(1+2)*3", &cells), "9");
    assert_eq!(evaluate_formula("=1+2*3", &cells), "7");
    assert_eq!(evaluate_formula("=10-4-3", &cells), "3");
    assert_eq!(evaluate_formula("=-2*-3", &cells), "6");
}

/// Test the AST-level API
#[test]
fn test_evaluate_ast() {
    let cells = grid(&[("A1", "4")]);
    let ast = parse_formula("=a1*2.5").unwrap();
    let result = evaluate(&ast, &EvaluationContext::new(&cells)).unwrap();
    assert_eq!(result, FormulaValue::Number(10.0));
}

/// Test division by zero
#[test]
fn test_division_by_zero() {
    let cells = grid(&[("A1", "")]);
    assert_eq!(evaluate_formula("=5/0", &cells), "#DIV/0!");
    assert_eq!(evaluate_formula("=5/A1", &cells), "#DIV/0!");
    assert_eq!(evaluate_formula("=0/5", &cells), "0");
}

/// A non-numeric cell poisons SUM but is skipped by the other aggregates
#[test]
fn test_non_numeric_cell_in_range() {
    let cells = grid(&[("A1", "1"), ("A2", "apple"), ("A3", "5")]);
    assert_eq!(evaluate_formula("=SUM(A1:A3)", &cells), "#ERROR!");
    assert_eq!(evaluate_formula("=AVERAGE(A1:A3)", &cells), "3");
    assert_eq!(evaluate_formula("=COUNT(A1:A3)", &cells), "2");
    assert_eq!(evaluate_formula("=MAX(A1:A3)", &cells), "5");
    assert_eq!(evaluate_formula("=MIN(A1:A3)", &cells), "1");
}

/// Test nested calls inside argument lists
#[test]
fn test_nested_function_arguments() {
    let cells = grid(&[("A1", "1"), ("A2", "2"), ("B1", "10"), ("C1", "1")]);
    assert_eq!(evaluate_formula("=SUM(MAX(A1,A2),MIN(3,4),1)", &cells), "6");
    assert_eq!(
        evaluate_formula("=SUM(A1:A2)*2+IF(C1,1,0)", &cells),
        "7"
    );
    assert_eq!(
        evaluate_formula("=IF(C1,CONCATENATE(\"max=\",MAX(A1:B1)),\"none\")", &cells),
        "max=10"
    );
    // A bare reference branch comes back as its own text
    assert_eq!(evaluate_formula("=IF(C1,B1,0)", &cells), "B1");
}

/// The leftmost error wins and errors pass through function calls
#[test]
fn test_error_propagation() {
    let cells = grid(&[("A1", "#API_ERROR!"), ("A2", "text")]);
    assert_eq!(evaluate_formula("=A1+1/0", &cells), "#API_ERROR!");
    assert_eq!(evaluate_formula("=1/0+A1", &cells), "#DIV/0!");
    assert_eq!(evaluate_formula("=A2*2", &cells), "#ERROR!");
    assert_eq!(evaluate_formula("=SUM(1,1/0)", &cells), "#DIV/0!");
    assert_eq!(evaluate_formula("=MAX(A1:A2)", &cells), "0");
}

/// Unknown functions and malformed formulas show #ERROR!
#[test]
fn test_faults_show_error() {
    let cells = grid(&[]);
    assert_eq!(evaluate_formula("=FOO(1)", &cells), "#ERROR!");
    assert_eq!(evaluate_formula("=SUM(1,", &cells), "#ERROR!");
    assert_eq!(evaluate_formula("=1+*2", &cells), "#ERROR!");
    assert_eq!(evaluate_formula("=$A$1", &cells), "#ERROR!");
}

/// Test reference formatting and normalization
#[test]
fn test_references_and_normalization() {
    assert_eq!(format_ref(0, 26), "AA1");
    assert_eq!(parse_ref("AA1"), Some(CellRef::new(0, 26)));
    assert_eq!(
        normalize("sum(a1,\"Hello World\")"),
        "SUM(A1,\"Hello World\")"
    );
}

/// Test formulas entered into a sheet see each other's values
#[test]
fn test_sheet_chain() {
    let mut sheet = Sheet::new();
    sheet.set_input("A1", "3").unwrap();
    sheet.set_input("A2", "=A1*A1").unwrap();
    sheet.set_input("A3", "=concatenate(\"square: \",a2)").unwrap();

    assert_eq!(sheet.value(CellRef::parse("A3").unwrap()), "square: 9");
}

/// Formulas past the size limits show #ERROR! instead of taking the host down
#[test]
fn test_oversized_formulas_show_error() {
    let mut sheet = Sheet::new();
    let long_sum = format!("={}", vec!["1"; 10_000].join("+"));
    sheet.set_input("A1", &long_sum).unwrap();
    sheet.set_input("A2", "=COUNT(A1:ZZZZZZ4294967295)").unwrap();

    assert_eq!(sheet.value(CellRef::parse("A1").unwrap()), "#ERROR!");
    assert_eq!(sheet.value(CellRef::parse("A2").unwrap()), "#ERROR!");
}

proptest! {
    #[test]
    fn prop_format_then_parse_ref(row in 0u32..1_000_000, col in 0u32..20_000) {
        prop_assert_eq!(parse_ref(&format_ref(row, col)), Some(CellRef::new(row, col)));
    }

    #[test]
    fn prop_sum_of_numeric_cells(values in proptest::collection::vec(
        proptest::option::of(-1_000_000i64..1_000_000),
        1..30,
    )) {
        let mut cells = HashMap::new();
        for (row, value) in values.iter().enumerate() {
            if let Some(v) = value {
                cells.insert(format_ref(row as u32, 0), v.to_string());
            }
        }
        let expected: i64 = values.iter().flatten().sum();
        let formula = format!("=SUM(A1:A{})", values.len());

        prop_assert_eq!(evaluate_formula(&formula, &cells), expected.to_string());
    }
}
