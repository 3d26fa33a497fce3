// tests/parser_tests.rs

use reckon::{Component, GroupKind, Number, OperatorSymbol, ParsingError, UnaryOp, parse, tokenize};

fn components(input: &str) -> Vec<Component> {
    parse(&tokenize(input).unwrap()).unwrap()
}

fn parse_err(input: &str) -> ParsingError {
    parse(&tokenize(input).unwrap()).unwrap_err()
}

fn number(n: i128) -> Component {
    Component::Number(Number::integer(n))
}

fn variable(name: &str) -> Component {
    Component::Variable(name.to_string())
}

// ============================================================================
// Operands
// ============================================================================

#[test]
fn test_literal_operands() {
    let test_cases = vec![
        ("42", number(42)),
        ("'hi'", Component::String("hi".to_string())),
        ("true", Component::Boolean(true)),
        ("false", Component::Boolean(false)),
        ("null", Component::Null),
        ("x", variable("x")),
    ];

    for (input, expected) in test_cases {
        assert_eq!(
            components(input),
            vec![expected],
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_juxtaposition_inserts_multiplication() {
    assert_eq!(
        components("2x"),
        vec![
            number(2),
            Component::Operator(OperatorSymbol::Times),
            variable("x"),
        ]
    );

    // A group after an operand multiplies the same way
    let parsed = components("2(3)");
    assert_eq!(parsed.len(), 3);
    assert_eq!(parsed[0], number(2));
    assert_eq!(parsed[1], Component::Operator(OperatorSymbol::Times));
    assert!(matches!(
        &parsed[2],
        Component::Group { kind: GroupKind::Round, .. }
    ));
}

#[test]
fn test_word_followed_by_round_group_is_a_call() {
    let parsed = components("f(1, 2)");
    assert_eq!(parsed.len(), 1);
    match &parsed[0] {
        Component::Function { name, args } => {
            assert_eq!(name, "f");
            assert_eq!(args.len(), 2);
            assert_eq!(args[0], vec![number(1)]);
            assert_eq!(args[1], vec![number(2)]);
        }
        other => panic!("Expected a function component, got {:?}", other),
    }

    // Zero arguments parse to an empty argument list
    match &components("f()")[0] {
        Component::Function { args, .. } => assert!(args.is_empty()),
        other => panic!("Expected a function component, got {:?}", other),
    }
}

// ============================================================================
// Square Groups: Lists and Indexing
// ============================================================================

#[test]
fn test_square_group_position_decides_list_or_indexing() {
    // Fresh position: a list literal
    match &components("[1, 2]")[0] {
        Component::List(elements) => {
            assert_eq!(elements.len(), 2);
            assert_eq!(elements[0], vec![number(1)]);
        }
        other => panic!("Expected a list component, got {:?}", other),
    }

    // After an operand: an index access
    let parsed = components("x[0]");
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0], variable("x"));
    match &parsed[1] {
        Component::Indexing(args) => assert_eq!(args[0], vec![number(0)]),
        other => panic!("Expected an indexing component, got {:?}", other),
    }
}

#[test]
fn test_indexing_chains_attach_in_sequence() {
    let parsed = components("[1, 2][0]");
    assert_eq!(parsed.len(), 2);
    assert!(matches!(parsed[0], Component::List(_)));
    assert!(matches!(parsed[1], Component::Indexing(_)));

    let parsed = components("f(x)[1][2]");
    assert_eq!(parsed.len(), 3);
    assert!(matches!(parsed[0], Component::Function { .. }));
    assert!(matches!(parsed[1], Component::Indexing(_)));
    assert!(matches!(parsed[2], Component::Indexing(_)));
}

// ============================================================================
// Curly Groups: Hashes and Blocks
// ============================================================================

#[test]
fn test_curly_group_with_top_level_colon_is_a_hash() {
    match &components("{'a': 1, 'b': 2}")[0] {
        Component::Hash(pairs) => {
            assert_eq!(pairs.len(), 2);
            assert_eq!(pairs[0].0, vec![Component::String("a".to_string())]);
            assert_eq!(pairs[0].1, vec![number(1)]);
        }
        other => panic!("Expected a hash component, got {:?}", other),
    }

    assert_eq!(components("{}"), vec![Component::Hash(Vec::new())]);
}

#[test]
fn test_curly_group_without_colon_is_a_block() {
    match &components("{x = 1; x}")[0] {
        Component::Group { kind, components } => {
            assert_eq!(*kind, GroupKind::Curly);
            assert!(components.contains(&Component::LineSeparator));
        }
        other => panic!("Expected a curly group, got {:?}", other),
    }
}

#[test]
fn test_nested_colons_do_not_make_a_hash() {
    // The colon sits inside an inner hash, so the outer braces are a block
    match &components("{h = {'a': 1}; h}")[0] {
        Component::Group { kind, .. } => assert_eq!(*kind, GroupKind::Curly),
        other => panic!("Expected a curly group, got {:?}", other),
    }
}

// ============================================================================
// Dot Calls
// ============================================================================

#[test]
fn test_dot_word_and_dot_operator() {
    let parsed = components("x.size");
    assert_eq!(
        parsed,
        vec![variable("x"), Component::DotWord("size".to_string())]
    );

    let parsed = components("x.round(2)");
    assert_eq!(parsed.len(), 2);
    match &parsed[1] {
        Component::DotOperator { name, args } => {
            assert_eq!(name, "round");
            assert_eq!(args.len(), 1);
        }
        other => panic!("Expected a dot operator, got {:?}", other),
    }
}

#[test]
fn test_dot_calls_chain() {
    let parsed = components("4.f.g");
    assert_eq!(
        parsed,
        vec![
            number(4),
            Component::DotWord("f".to_string()),
            Component::DotWord("g".to_string()),
        ]
    );
}

#[test]
fn test_dot_requires_an_operand_and_a_name() {
    assert!(matches!(parse_err(".x"), ParsingError::UnexpectedToken(_)));
    assert!(matches!(parse_err("x."), ParsingError::UnexpectedToken(_)));
    assert!(matches!(parse_err("x.(1)"), ParsingError::UnexpectedToken(_)));
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_binary_position_resolves_symbols() {
    let test_cases = vec![
        ("a + b", OperatorSymbol::Plus),
        ("a - b", OperatorSymbol::Minus),
        ("a * b", OperatorSymbol::Times),
        ("a / b", OperatorSymbol::Divide),
        ("a % b", OperatorSymbol::Modulo),
        ("a ** b", OperatorSymbol::Exponent),
        ("a & b", OperatorSymbol::BitwiseAnd),
        ("a | b", OperatorSymbol::BitwiseOr),
        ("a ^ b", OperatorSymbol::BitwiseXor),
        ("a && b", OperatorSymbol::LogicalAnd),
        ("a || b", OperatorSymbol::LogicalOr),
        ("a == b", OperatorSymbol::Equal),
        ("a != b", OperatorSymbol::NotEqual),
        ("a < b", OperatorSymbol::LessThan),
        ("a > b", OperatorSymbol::GreaterThan),
        ("a <= b", OperatorSymbol::LessThanOrEqual),
        ("a >= b", OperatorSymbol::GreaterThanOrEqual),
    ];

    for (input, symbol) in test_cases {
        assert_eq!(
            components(input),
            vec![variable("a"), Component::Operator(symbol), variable("b")],
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_prefix_position_resolves_unary_operators() {
    let test_cases = vec![
        ("-x", UnaryOp::Minus),
        ("+x", UnaryOp::Plus),
        ("!x", UnaryOp::LogicalNot),
        ("~x", UnaryOp::BitwiseNot),
        ("!!x", UnaryOp::Identity),
        ("!!!x", UnaryOp::LogicalNot),
        ("~~x", UnaryOp::Identity),
        ("~~~x", UnaryOp::BitwiseNot),
    ];

    for (input, op) in test_cases {
        assert_eq!(
            components(input),
            vec![Component::UnaryOperator(op), variable("x")],
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_binary_then_prefix() {
    assert_eq!(
        components("1 - -2"),
        vec![
            number(1),
            Component::Operator(OperatorSymbol::Minus),
            Component::UnaryOperator(UnaryOp::Minus),
            number(2),
        ]
    );
}

#[test]
fn test_operators_that_cannot_be_prefix() {
    for input in ["* 2", "/ 2", "&& x", "== 1", "% 3"] {
        assert!(
            matches!(parse_err(input), ParsingError::UnexpectedToken(_)),
            "Expected an error for input: {}",
            input
        );
    }
}

// ============================================================================
// Assignment
// ============================================================================

#[test]
fn test_assignment_components() {
    assert_eq!(
        components("x = 1"),
        vec![variable("x"), Component::Assignment, number(1)]
    );

    let test_cases = vec![
        ("x += 1", OperatorSymbol::Plus),
        ("x -= 1", OperatorSymbol::Minus),
        ("x *= 2", OperatorSymbol::Times),
        ("x /= 2", OperatorSymbol::Divide),
        ("x **= 2", OperatorSymbol::Exponent),
        ("x &&= true", OperatorSymbol::LogicalAnd),
        ("x ||= false", OperatorSymbol::LogicalOr),
    ];

    for (input, symbol) in test_cases {
        let parsed = components(input);
        assert_eq!(parsed.len(), 3, "Failed for input: {}", input);
        assert_eq!(parsed[0], variable("x"), "Failed for input: {}", input);
        assert_eq!(
            parsed[1],
            Component::CompoundAssignment(symbol),
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_assignment_requires_a_target() {
    assert!(matches!(
        parse_err("= 1"),
        ParsingError::UnexpectedToken(_)
    ));
    assert!(matches!(
        parse_err("+ = 1"),
        ParsingError::UnexpectedToken(_)
    ));
}

// ============================================================================
// Balance and Argument Shapes
// ============================================================================

#[test]
fn test_unbalanced_groups_are_rejected() {
    for input in ["(1", "1)", "[1, 2", "x[1", "{a", "f(1", "(1]", "[1)"] {
        assert!(
            matches!(parse_err(input), ParsingError::UnbalancedGroup(_)),
            "Expected an unbalanced-group error for input: {}",
            input
        );
    }
}

#[test]
fn test_empty_arguments_are_rejected() {
    for input in ["f(,)", "f(1,)", "f(, 1)", "[1, , 2]", "[,]"] {
        assert!(
            matches!(parse_err(input), ParsingError::InvalidArguments(_)),
            "Expected an invalid-arguments error for input: {}",
            input
        );
    }
}

#[test]
fn test_malformed_hash_entries_are_rejected() {
    let test_cases = vec![
        ("{'a': 1, 'b'}", "missing a colon"),
        ("{'a': 1: 2}", "second colon"),
        ("{: 1}", "missing a key or value"),
        ("{'a':}", "missing a key or value"),
    ];

    for (input, fragment) in test_cases {
        let err = parse_err(input);
        assert!(
            err.to_string().contains(fragment),
            "Expected \"{}\" in the error for input: {}, got: {}",
            fragment,
            input,
            err
        );
    }
}
