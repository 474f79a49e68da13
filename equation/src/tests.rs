//! FILENAME: equation/src/tests.rs
//! PURPOSE: Consolidated unit tests for the equation crate.

use crate::definition::{AliasDefinition, EquationDefinition};
use crate::equation::Equation;
use crate::error::{EquationBuildError, EquationError, ProblemType};
use crate::input::{EquationInput, Scalar};
use crate::lexer::tokenize;
use crate::library::OperationLibrary;
use crate::manager::EquationManager;
use crate::parser::{parse, EquationParser};
use crate::symbol::EquationSymbol;
use crate::token::{Span, TokenKind};
use registry::{AccessMode, VariableRegistry};

fn parse_problem(result: Result<Equation, EquationError>) -> ProblemType {
    match result {
        Err(error) => match error.problem() {
            Some(problem) => problem,
            None => panic!("expected a parse error, got {:?}", error),
        },
        Ok(_) => panic!("expected a parse error"),
    }
}

fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() < tolerance,
        "expected {} but got {}",
        expected,
        actual
    );
}

// ========================================
// LEXER TESTS
// ========================================

#[test]
fn lexer_tokenizes_an_assignment() {
    let tokens = tokenize("a = 1 + 2").unwrap();
    assert_eq!(tokens.len(), 5);
    assert!(matches!(&tokens[0].kind, TokenKind::Word(word) if word == "a"));
    assert!(tokens[1].is_symbol(EquationSymbol::Assign));
    assert!(matches!(tokens[2].kind, TokenKind::Input(EquationInput::IntegerConstant(1))));
    assert!(tokens[3].is_symbol(EquationSymbol::Plus));
    assert!(matches!(tokens[4].kind, TokenKind::Input(EquationInput::IntegerConstant(2))));
}

#[test]
fn lexer_records_token_spans() {
    let tokens = tokenize("1 + 20").unwrap();
    assert_eq!(tokens[0].span, Span::new(0, 1));
    assert_eq!(tokens[1].span, Span::new(2, 1));
    assert_eq!(tokens[2].span, Span::new(4, 2));
}

#[test]
fn lexer_binds_number_literals_by_kind() {
    let tokens = tokenize("5 + 5.0 + 2.0e-04").unwrap();
    assert!(matches!(tokens[0].kind, TokenKind::Input(EquationInput::IntegerConstant(5))));
    assert!(matches!(tokens[2].kind, TokenKind::Input(EquationInput::DoubleConstant(v)) if v == 5.0));
    assert!(matches!(tokens[4].kind, TokenKind::Input(EquationInput::DoubleConstant(v)) if v == 2.0e-4));
}

#[test]
fn lexer_widens_integer_literals_that_overflow() {
    let tokens = tokenize("3000000000 + 1").unwrap();
    assert!(matches!(tokens[0].kind, TokenKind::Input(EquationInput::DoubleConstant(v)) if v == 3.0e9));
}

#[test]
fn lexer_reads_leading_minus_as_a_sign() {
    let tokens = tokenize("-2.5").unwrap();
    assert_eq!(tokens.len(), 1);
    assert!(matches!(tokens[0].kind, TokenKind::Input(EquationInput::DoubleConstant(v)) if v == -2.5));
}

#[test]
fn lexer_reads_minus_after_operator_as_a_sign() {
    let tokens = tokenize("3 * -2").unwrap();
    assert_eq!(tokens.len(), 3);
    assert!(matches!(tokens[2].kind, TokenKind::Input(EquationInput::IntegerConstant(-2))));
}

#[test]
fn lexer_reads_minus_after_operand_as_subtraction() {
    let tokens = tokenize("3 - 2").unwrap();
    assert_eq!(tokens.len(), 3);
    assert!(tokens[1].is_symbol(EquationSymbol::Minus));
}

#[test]
fn lexer_keeps_digits_in_words() {
    let tokens = tokenize("atan2(y, x)").unwrap();
    assert!(matches!(&tokens[0].kind, TokenKind::Word(word) if word == "atan2"));
}

#[test]
fn lexer_rejects_unsupported_symbols() {
    let error = tokenize("a < b").unwrap_err();
    assert_eq!(error.problem, ProblemType::UnsupportedSymbol);

    let error = tokenize("a && b").unwrap_err();
    assert_eq!(error.problem, ProblemType::UnsupportedSymbol);
}

#[test]
fn lexer_rejects_adjacent_operators() {
    let error = tokenize("4 ** 2").unwrap_err();
    assert_eq!(error.problem, ProblemType::InvalidSymbolUse);

    let error = tokenize("4 // 2").unwrap_err();
    assert_eq!(error.problem, ProblemType::InvalidSymbolUse);
}

#[test]
fn lexer_rejects_malformed_numbers() {
    assert_eq!(tokenize("1 .. 2").unwrap_err().problem, ProblemType::InvalidNumberFormat);
    assert_eq!(tokenize("0.5.0").unwrap_err().problem, ProblemType::InvalidNumberFormat);
    assert_eq!(tokenize("2e").unwrap_err().problem, ProblemType::InvalidNumberFormat);
    assert_eq!(tokenize("2e1.5").unwrap_err().problem, ProblemType::InvalidNumberFormat);
}

// ========================================
// PARSER TESTS
// ========================================

#[test]
fn parser_applies_operator_precedence() {
    assert_eq!(parse("2 + 3 * 4").unwrap().compute(), Scalar::Integer(14));
}

#[test]
fn parser_applies_parentheses() {
    assert_eq!(parse("(2 + 3) * 4").unwrap().compute(), Scalar::Integer(20));
}

#[test]
fn parser_handles_redundant_parentheses() {
    assert_eq!(parse("(((5)) + 1)").unwrap().compute(), Scalar::Integer(6));
}

#[test]
fn parser_binds_function_calls() {
    let result = parse("pow(2, 3) + 1").unwrap().compute();
    assert_eq!(result, Scalar::Double(9.0));
}

#[test]
fn parser_binds_nested_function_calls() {
    let result = parse("sqrt(pow(3, 2) + pow(4, 2))").unwrap().compute();
    assert_close(result.as_double(), 5.0, 1e-12);
}

#[test]
fn parser_records_operations_in_evaluation_order() {
    let mut parser = EquationParser::new();
    parser.alias_manager_mut().add_double_variable("x", 0.0).unwrap();
    parser.alias_manager_mut().add_double_variable("y", 2.0).unwrap();

    let equation = parser.parse("x = sin(y) + 2 * y").unwrap();
    let names: Vec<&str> = equation.operations().iter().map(|op| op.name()).collect();
    assert_eq!(names, vec!["sin-d", "multiply-dd", "add-dd", "assign-dd"]);
}

#[test]
fn parser_compiles_assignments() {
    let mut parser = EquationParser::new();
    let a = parser.alias_manager_mut().add_double_variable("a", 0.0).unwrap();

    let equation = parser.parse("a = 1 + 2").unwrap();
    assert_eq!(equation.compute(), Scalar::Double(3.0));
    assert_eq!(a.get_double(AccessMode::Live), 3.0);
}

#[test]
fn parse_assignment_rejects_bare_expressions() {
    let parser = EquationParser::new();
    assert_eq!(
        parse_problem(parser.parse_assignment("1 + 2")),
        ProblemType::UnexpectedTokenType
    );
}

#[test]
fn parser_rejects_dangling_parenthesis() {
    let mut parser = EquationParser::new();
    parser.alias_manager_mut().add_double_variable("a", 0.0).unwrap();
    parser.alias_manager_mut().add_double_variable("b", 0.0).unwrap();

    let error = parser.parse("a = (b").unwrap_err();
    match &error {
        EquationError::Parse(parse_error) => {
            assert_eq!(parse_error.problem, ProblemType::ParenthesesMismatch);
            assert_eq!(parse_error.span, Some(Span::new(4, 1)));
        }
        other => panic!("expected a parse error, got {:?}", other),
    }
}

#[test]
fn parser_rejects_unopened_parenthesis() {
    assert_eq!(parse_problem(parse("1 + 2)")), ProblemType::ParenthesesMismatch);
}

#[test]
fn parser_rejects_trailing_operator() {
    assert_eq!(parse_problem(parse("1 + ")), ProblemType::InvalidSymbolUse);
}

#[test]
fn parser_rejects_too_short_input() {
    assert_eq!(parse_problem(parse("5")), ProblemType::TooFewTokens);
    assert_eq!(parse_problem(parse("")), ProblemType::TooFewTokens);
}

#[test]
fn parser_rejects_function_without_inputs() {
    assert_eq!(parse_problem(parse("sin()")), ProblemType::FunctionMissingInputs);
}

#[test]
fn parser_rejects_function_without_argument_list() {
    assert_eq!(parse_problem(parse("sin + 1")), ProblemType::UnexpectedTokenType);
}

#[test]
fn parser_rejects_comma_outside_function_call() {
    assert_eq!(parse_problem(parse("1 , 2")), ProblemType::InvalidSymbolUse);
    assert_eq!(parse_problem(parse("(1 , 2) + 1")), ProblemType::InvalidSymbolUse);
}

#[test]
fn parser_rejects_chained_assignment() {
    let mut parser = EquationParser::new();
    parser.alias_manager_mut().add_double_variable("a", 0.0).unwrap();
    parser.alias_manager_mut().add_double_variable("b", 0.0).unwrap();

    assert_eq!(parse_problem(parser.parse("a = b = 1")), ProblemType::InvalidSymbolUse);
}

#[test]
fn parser_rejects_unknown_variables() {
    let error = parse("q + 1").unwrap_err();
    assert!(matches!(
        error,
        EquationError::Build(EquationBuildError::UnknownVariable(name)) if name == "q"
    ));
}

#[test]
fn parser_rejects_double_into_integer_assignment() {
    let mut parser = EquationParser::new();
    parser.alias_manager_mut().add_integer_variable("n", 0).unwrap();

    let error = parser.parse("n = 1.5 + 1").unwrap_err();
    assert!(matches!(
        error,
        EquationError::Build(EquationBuildError::UnsupportedOperandKinds { .. })
    ));
}

// ========================================
// OPERATION TESTS
// ========================================

#[test]
fn bound_operations_share_their_variable_inputs() {
    let library = OperationLibrary::new();
    let a = EquationInput::double_variable(2.0);
    let b = EquationInput::double_variable(3.0);

    let factory = library.operator(EquationSymbol::Times).unwrap();
    let operation = factory.build(vec![a.clone(), b]).unwrap();
    assert_eq!(operation.inputs().len(), 2);

    operation.execute(AccessMode::Live);
    assert_eq!(operation.result().get_double(AccessMode::Live), 6.0);

    // The operation reads the same cell the caller still holds.
    a.set_double(AccessMode::Live, 5.0);
    operation.execute(AccessMode::Live);
    assert_eq!(operation.result().get_double(AccessMode::Live), 15.0);
}

// ========================================
// EVALUATION TESTS
// ========================================

#[test]
fn evaluation_follows_live_variable_changes() {
    let mut parser = EquationParser::new();
    let a = parser.alias_manager_mut().add_double_variable("a", 2.0).unwrap();

    let equation = parser.parse("3 * a + 1").unwrap();
    assert_eq!(equation.compute(), Scalar::Double(7.0));
    // Re-evaluating without changes is stable.
    assert_eq!(equation.compute(), Scalar::Double(7.0));

    a.set_double(AccessMode::Live, 10.0);
    assert_eq!(equation.compute(), Scalar::Double(31.0));
}

#[test]
fn evaluation_matches_mixed_precision_references() {
    let mut parser = EquationParser::new();
    parser.alias_manager_mut().add_double_variable("a", 0.2).unwrap();
    parser.alias_manager_mut().add_double_variable("b", 10.0).unwrap();
    parser.alias_manager_mut().add_double_variable("x", 0.0).unwrap();

    let cases: [(&str, f64); 6] = [
        ("x = 2.0*a+b", 10.4),
        ("x = -2.0*a+b", 9.6),
        ("x = 2.0e-04*a+b", 10.00004),
        ("x = 1-2.0e-04*a+b", 10.99996),
        ("x = 1-2.0e-04*a+b/2", 5.99996),
        ("x = 0.5 * (2.0 *a + 2*b)", 10.2),
    ];

    for (text, expected) in cases {
        let equation = parser.parse(text).unwrap();
        assert_close(equation.compute().as_double(), expected, 1e-10);
    }
}

#[test]
fn evaluation_matches_integer_chain_references() {
    let mut parser = EquationParser::new();
    parser.alias_manager_mut().add_integer_variable("x", 0).unwrap();

    let cases: [(&str, i32); 4] = [
        ("x = 1 - 2 * 2 + 4", 1),
        ("x = 4 / 4 * 4", 4),
        ("x = 4 / 4 * 4 / 4", 1),
        ("x = 4 * 4 / 4 - 2 + 3 - 3 + 2", 4),
    ];

    for (text, expected) in cases {
        let equation = parser.parse(text).unwrap();
        assert_eq!(equation.compute(), Scalar::Integer(expected), "{}", text);
    }
}

#[test]
fn evaluation_computes_atan2() {
    let mut parser = EquationParser::new();
    parser.alias_manager_mut().add_double_variable("a", 0.2).unwrap();
    parser.alias_manager_mut().add_double_variable("b", 10.0).unwrap();

    let equation = parser.parse("atan2(a, b)").unwrap();
    assert_close(equation.compute().as_double(), 0.019997333973150535, 1e-15);
}

#[test]
fn evaluation_promotes_integer_power_to_double() {
    assert_eq!(parse("2 ^ 3").unwrap().compute(), Scalar::Double(8.0));
}

#[test]
fn evaluation_keeps_integer_max_integer() {
    assert_eq!(parse("max(1, 2)").unwrap().compute(), Scalar::Integer(2));
    assert_eq!(parse("max(1.5, 2)").unwrap().compute(), Scalar::Double(2.0));
}

#[test]
fn evaluation_applies_unary_functions() {
    assert_eq!(parse("abs(-5) + 0").unwrap().compute(), Scalar::Integer(5));
    assert_eq!(parse("sign(-2.5) + 0").unwrap().compute(), Scalar::Double(-1.0));
    assert_close(parse("log(e) + 0").unwrap().compute().as_double(), 1.0, 1e-12);
}

#[test]
fn integer_division_by_zero_yields_zero() {
    assert_eq!(parse("4 / 0").unwrap().compute(), Scalar::Integer(0));
}

#[test]
fn integer_arithmetic_wraps() {
    assert_eq!(
        parse("2147483647 + 1").unwrap().compute(),
        Scalar::Integer(i32::MIN)
    );
}

#[test]
fn double_division_by_zero_follows_ieee() {
    assert_eq!(parse("4.0 / 0.0").unwrap().compute(), Scalar::Double(f64::INFINITY));
    assert!(parse("0.0 / 0.0").unwrap().compute().as_double().is_nan());
}

#[test]
fn nan_flows_through_evaluation() {
    let mut parser = EquationParser::new();
    let a = parser.alias_manager_mut().add_double_variable("a", f64::NAN).unwrap();

    let equation = parser.parse("2 * a + 1").unwrap();
    assert!(equation.compute().as_double().is_nan());

    a.set_double(AccessMode::Live, 1.0);
    assert_eq!(equation.compute(), Scalar::Double(3.0));
}

// ========================================
// ALIAS TESTS
// ========================================

#[test]
fn builtin_constants_resolve() {
    let result = parse("2 * pi").unwrap().compute();
    assert_close(result.as_double(), 2.0 * std::f64::consts::PI, 1e-15);
}

#[test]
fn user_aliases_shadow_builtins() {
    let mut parser = EquationParser::new();
    parser.alias_manager_mut().add_double_constant("pi", 3.0).unwrap();
    assert_eq!(parser.parse("2 * pi").unwrap().compute(), Scalar::Double(6.0));
}

#[test]
fn duplicate_aliases_are_rejected() {
    let mut parser = EquationParser::new();
    parser.alias_manager_mut().add_double_variable("v", 1.0).unwrap();

    let error = parser.alias_manager_mut().add_integer_constant("v", 2).unwrap_err();
    assert!(matches!(error, EquationBuildError::DuplicateAlias(name) if name == "v"));
}

#[test]
fn duplicated_alias_tables_share_variable_cells() {
    let mut parser = EquationParser::new();
    let v = parser.alias_manager_mut().add_double_variable("v", 1.0).unwrap();

    let copy = parser.alias_manager().duplicate();
    v.set_double(AccessMode::Live, 7.0);
    let seen = copy.get("v").unwrap();
    assert_eq!(seen.get_double(AccessMode::Live), 7.0);
}

// ========================================
// REGISTRY AND HISTORY TESTS
// ========================================

#[test]
fn registry_variables_bind_by_path_or_simple_name() {
    let registry = VariableRegistry::new();
    let x = registry.register_double("robot.x", 1.5);

    let mut parser = EquationParser::new();
    parser.alias_manager_mut().add_registry(&registry);
    parser.alias_manager_mut().add_registry_variable("x", "robot.x").unwrap();
    parser.alias_manager_mut().add_registry_variable("also_x", "x").unwrap();

    let equation = parser.parse("x + also_x").unwrap();
    assert_eq!(equation.compute(), Scalar::Double(3.0));

    x.set(AccessMode::Live, 2.0);
    assert_eq!(equation.compute(), Scalar::Double(4.0));
}

#[test]
fn missing_registry_variables_are_rejected() {
    let registry = VariableRegistry::new();
    let mut parser = EquationParser::new();
    parser.alias_manager_mut().add_registry(&registry);

    let error = parser.alias_manager_mut().add_registry_variable("x", "robot.x").unwrap_err();
    assert!(matches!(error, EquationBuildError::VariableNotFound(path) if path == "robot.x"));
}

#[test]
fn compute_at_reads_and_writes_recorded_history() {
    let registry = VariableRegistry::new();
    let x = registry.register_double("robot.x", 0.0);
    let out = registry.register_double("robot.out", 0.0);

    x.set(AccessMode::Live, 1.0);
    registry.record_all();
    x.set(AccessMode::Live, 2.0);
    registry.record_all();

    let mut parser = EquationParser::new();
    parser.alias_manager_mut().add_registry(&registry);
    parser.alias_manager_mut().add_registry_variable("x", "robot.x").unwrap();
    parser.alias_manager_mut().add_registry_variable("out", "robot.out").unwrap();

    let equation = parser.parse("out = 2 * x + 1").unwrap();
    assert_eq!(equation.compute_at(0), Scalar::Double(3.0));
    assert_eq!(equation.compute_at(1), Scalar::Double(5.0));
    assert_eq!(out.get(AccessMode::History(0)), 3.0);
    assert_eq!(out.get(AccessMode::History(1)), 5.0);
    // The live value is untouched by history evaluation.
    assert_eq!(out.get(AccessMode::Live), 0.0);
}

#[test]
fn parser_state_is_debug_printable() {
    let registry = VariableRegistry::new();
    registry.register_double("robot.x", 1.0);

    let mut parser = EquationParser::new();
    parser.alias_manager_mut().add_registry(&registry);

    let printed = format!("{:?}", parser);
    assert!(printed.contains("EquationParser"));
}

#[test]
fn out_of_range_history_reads_are_inert() {
    let registry = VariableRegistry::new();
    let x = registry.register_double("x", 1.0);
    assert!(x.get(AccessMode::History(5)).is_nan());
}

// ========================================
// MANAGER TESTS
// ========================================

fn doubler_definition() -> EquationDefinition {
    EquationDefinition::new("doubler", "out = 2 * x + 1")
        .with_alias(AliasDefinition::RegistryVariable {
            name: "x".to_string(),
            path: "robot.x".to_string(),
        })
        .with_alias(AliasDefinition::RegistryVariable {
            name: "out".to_string(),
            path: "robot.out".to_string(),
        })
}

#[test]
fn manager_computes_equations_each_tick() {
    let registry = VariableRegistry::new();
    let x = registry.register_double("robot.x", 0.0);
    let out = registry.register_double("robot.out", 0.0);

    let mut manager = EquationManager::new(registry.clone());
    manager.add_equation(doubler_definition()).unwrap();
    assert_eq!(manager.len(), 1);

    x.set(AccessMode::Live, 3.0);
    manager.compute_all();
    assert_eq!(out.get(AccessMode::Live), 7.0);

    x.set(AccessMode::Live, 4.0);
    manager.compute_all();
    assert_eq!(out.get(AccessMode::Live), 9.0);
}

#[test]
fn manager_backfills_history() {
    let registry = VariableRegistry::new();
    let x = registry.register_double("robot.x", 0.0);
    let out = registry.register_double("robot.out", 0.0);

    let mut manager = EquationManager::new(registry.clone());
    manager.add_equation(doubler_definition()).unwrap();

    x.set(AccessMode::Live, 1.0);
    registry.record_all();
    x.set(AccessMode::Live, 2.0);
    registry.record_all();

    manager.update_history();
    assert_eq!(out.get(AccessMode::History(0)), 3.0);
    assert_eq!(out.get(AccessMode::History(1)), 5.0);
}

#[test]
fn manager_chains_equations_in_insertion_order() {
    let registry = VariableRegistry::new();
    let a = registry.register_double("a", 1.0);
    registry.register_double("b", 0.0);
    let c = registry.register_double("c", 0.0);

    let mut manager = EquationManager::new(registry.clone());
    manager
        .add_equation(
            EquationDefinition::new("first", "b = a + 1").with_alias(
                AliasDefinition::RegistryVariable { name: "a".to_string(), path: "a".to_string() },
            )
            .with_alias(AliasDefinition::RegistryVariable {
                name: "b".to_string(),
                path: "b".to_string(),
            }),
        )
        .unwrap();
    manager
        .add_equation(
            EquationDefinition::new("second", "c = 2 * b").with_alias(
                AliasDefinition::RegistryVariable { name: "b".to_string(), path: "b".to_string() },
            )
            .with_alias(AliasDefinition::RegistryVariable {
                name: "c".to_string(),
                path: "c".to_string(),
            }),
        )
        .unwrap();

    a.set(AccessMode::Live, 5.0);
    manager.compute_all();
    assert_eq!(c.get(AccessMode::Live), 12.0);
}

#[test]
fn manager_replaces_equations_with_the_same_name() {
    let registry = VariableRegistry::new();
    registry.register_double("robot.x", 0.0);
    let out = registry.register_double("robot.out", 0.0);

    let mut manager = EquationManager::new(registry.clone());
    manager.add_equation(doubler_definition()).unwrap();

    let mut replacement = doubler_definition();
    replacement.equation = "out = 100".to_string();
    manager.add_equation(replacement).unwrap();
    assert_eq!(manager.len(), 1);

    manager.compute_all();
    assert_eq!(out.get(AccessMode::Live), 100.0);
}

#[test]
fn manager_skips_definitions_that_fail_to_compile() {
    let registry = VariableRegistry::new();
    registry.register_double("robot.x", 0.0);
    registry.register_double("robot.out", 0.0);

    let mut manager = EquationManager::new(registry);
    manager.add_equations(vec![
        doubler_definition(),
        EquationDefinition::new("broken", "1 + "),
        EquationDefinition::new("unbound", "y + 1"),
    ]);

    assert_eq!(manager.len(), 1);
    assert!(manager.get("doubler").is_some());
    assert!(manager.get("broken").is_none());
}

// ========================================
// DEFINITION TESTS
// ========================================

#[test]
fn definitions_round_trip_through_json() {
    let definition = EquationDefinition::new("energy", "e = 0.5 * m * v ^ 2")
        .with_description("kinetic energy")
        .with_alias(AliasDefinition::DoubleVariable { name: "m".to_string(), initial: 1.0 })
        .with_alias(AliasDefinition::DoubleVariable { name: "v".to_string(), initial: 0.0 })
        .with_alias(AliasDefinition::DoubleVariable { name: "e".to_string(), initial: 0.0 });

    let json = definition.to_json();
    assert_eq!(EquationDefinition::from_json(&json), Some(definition));
}

#[test]
fn definitions_without_aliases_deserialize() {
    let json = r#"{"name":"plain","description":null,"equation":"1 + 2"}"#;
    let definition = EquationDefinition::from_json(json).unwrap();
    assert!(definition.aliases.is_empty());
}

// ========================================
// CONCURRENCY TESTS
// ========================================

#[test]
fn parsers_work_independently_across_threads() {
    let library = OperationLibrary::new();

    let handles: Vec<_> = (0..2)
        .map(|n| {
            let library = library.clone();
            std::thread::spawn(move || {
                let mut parser = EquationParser::with_library(library);
                parser
                    .alias_manager_mut()
                    .add_double_variable("a", n as f64)
                    .unwrap();
                parser.parse("a + 1").unwrap().compute().as_double()
            })
        })
        .collect();

    let mut results: Vec<f64> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();
    results.sort_by(f64::total_cmp);
    assert_eq!(results, vec![1.0, 2.0]);
}
