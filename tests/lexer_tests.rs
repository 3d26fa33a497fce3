// tests/lexer_tests.rs

use reckon::{Number, TokenKind, Tokenizer, tokenize};

fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize(input)
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

// ============================================================================
// Normalization
// ============================================================================

#[test]
fn test_whitespace_is_removed_outside_strings() {
    let test_cases = vec![
        ("1 + 2", "1+2"),
        ("  x  =  5  ", "x=5"),
        ("'a b' + \"c  d\"", "'a b'+\"c  d\""),
        ("f( 1 ,\t2 )", "f(1,2)"),
    ];

    for (input, expected) in test_cases {
        assert_eq!(
            Tokenizer::normalize(input),
            expected,
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_line_breaks_become_separators() {
    assert_eq!(Tokenizer::normalize("a\nb"), "a;b");
    assert_eq!(Tokenizer::normalize("a\r\nb\rc"), "a;b;c");
    assert_eq!(Tokenizer::normalize("x = 1\ny = 2\nx + y"), "x=1;y=2;x+y");
}

#[test]
fn test_comments_run_to_end_of_statement() {
    let test_cases = vec![
        ("2 + 3 # the rest is ignored", "2+3"),
        ("x = 1 # note\ny = 2", "x=1;y=2"),
        ("# only a comment", ""),
        ("1 # a; 2 # b", "1;2"),
    ];

    for (input, expected) in test_cases {
        assert_eq!(
            Tokenizer::normalize(input),
            expected,
            "Failed for input: {}",
            input
        );
    }
}

// ============================================================================
// Number Literals
// ============================================================================

#[test]
fn test_integer_literals_are_exact() {
    let test_cases = vec![
        ("0", 0),
        ("42", 42),
        ("1000000", 1_000_000),
    ];

    for (input, expected) in test_cases {
        let tokens = kinds(input);
        assert_eq!(
            tokens,
            vec![TokenKind::Number(Number::integer(expected))],
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_decimal_literals_are_exact_rationals() {
    let test_cases = vec![
        ("0.5", Number::rational(1, 2)),
        ("3.25", Number::rational(13, 4)),
        ("0.1", Number::rational(1, 10)),
        ("2.0", Number::integer(2)),
    ];

    for (input, expected) in test_cases {
        let tokens = kinds(input);
        assert_eq!(
            tokens,
            vec![TokenKind::Number(expected)],
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_scientific_notation_is_floating_point() {
    let test_cases = vec![("1e3", 1000.0), ("2.5e-1", 0.25), ("1E2", 100.0)];

    for (input, expected) in test_cases {
        let tokens = kinds(input);
        assert_eq!(
            tokens,
            vec![TokenKind::Number(Number::float(expected))],
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_number_stops_before_a_dot_call() {
    // "4.f" is the word call f(4), not a malformed float
    assert_eq!(
        kinds("4.f"),
        vec![
            TokenKind::Number(Number::integer(4)),
            TokenKind::Dot,
            TokenKind::Word("f".to_string()),
        ]
    );
}

// ============================================================================
// String Literals
// ============================================================================

#[test]
fn test_string_literals_drop_their_quotes() {
    let test_cases = vec![
        ("'hello'", "hello"),
        ("\"hello\"", "hello"),
        ("''", ""),
        ("'say \"hi\"'", "say \"hi\""),
        ("\"it's\"", "it's"),
        ("'spaces kept  here'", "spaces kept  here"),
    ];

    for (input, expected) in test_cases {
        let tokens = kinds(input);
        assert_eq!(
            tokens,
            vec![TokenKind::String(expected.to_string())],
            "Failed for input: {}",
            input
        );
    }
}

// ============================================================================
// Words and Keywords
// ============================================================================

#[test]
fn test_keywords() {
    let test_cases = vec![
        ("true", TokenKind::Boolean(true)),
        ("false", TokenKind::Boolean(false)),
        ("null", TokenKind::Null),
    ];

    for (input, expected) in test_cases {
        assert_eq!(kinds(input), vec![expected], "Failed for input: {}", input);
    }
}

#[test]
fn test_keywords_versus_words() {
    let test_cases = vec!["truex", "nullable", "x", "foo_bar", "_private", "f2"];

    for input in test_cases {
        assert_eq!(
            kinds(input),
            vec![TokenKind::Word(input.to_string())],
            "Failed for input: {}",
            input
        );
    }
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_operator_classes() {
    let test_cases = vec![
        ("+", TokenKind::ArithmeticOperator("+".to_string())),
        ("-", TokenKind::ArithmeticOperator("-".to_string())),
        ("*", TokenKind::ArithmeticOperator("*".to_string())),
        ("/", TokenKind::ArithmeticOperator("/".to_string())),
        ("%", TokenKind::ArithmeticOperator("%".to_string())),
        ("**", TokenKind::ArithmeticOperator("**".to_string())),
        ("&", TokenKind::BitwiseOperator("&".to_string())),
        ("|", TokenKind::BitwiseOperator("|".to_string())),
        ("^", TokenKind::BitwiseOperator("^".to_string())),
        ("&&", TokenKind::LogicalOperator("&&".to_string())),
        ("||", TokenKind::LogicalOperator("||".to_string())),
        ("==", TokenKind::LogicalOperator("==".to_string())),
        ("!=", TokenKind::LogicalOperator("!=".to_string())),
        ("<", TokenKind::LogicalOperator("<".to_string())),
        (">", TokenKind::LogicalOperator(">".to_string())),
        ("<=", TokenKind::LogicalOperator("<=".to_string())),
        (">=", TokenKind::LogicalOperator(">=".to_string())),
    ];

    for (input, expected) in test_cases {
        assert_eq!(kinds(input), vec![expected], "Failed for input: {}", input);
    }
}

#[test]
fn test_not_runs_lex_as_single_tokens() {
    assert_eq!(
        kinds("!!!"),
        vec![TokenKind::LogicalOperator("!!!".to_string())]
    );
    assert_eq!(
        kinds("~~"),
        vec![TokenKind::BitwiseOperator("~~".to_string())]
    );
    // Whitespace removal joins separated runs before the scan
    assert_eq!(
        kinds("~ ~"),
        vec![TokenKind::BitwiseOperator("~~".to_string())]
    );
}

#[test]
fn test_multi_character_operators_win_over_prefixes() {
    assert_eq!(
        kinds("2**3"),
        vec![
            TokenKind::Number(Number::integer(2)),
            TokenKind::ArithmeticOperator("**".to_string()),
            TokenKind::Number(Number::integer(3)),
        ]
    );
    assert_eq!(
        kinds("a&&b"),
        vec![
            TokenKind::Word("a".to_string()),
            TokenKind::LogicalOperator("&&".to_string()),
            TokenKind::Word("b".to_string()),
        ]
    );
}

// ============================================================================
// Assignment Forms
// ============================================================================

#[test]
fn test_assignment_forms() {
    let test_cases = vec![
        ("=", TokenKind::Assignment(None)),
        ("+=", TokenKind::Assignment(Some("+".to_string()))),
        ("-=", TokenKind::Assignment(Some("-".to_string()))),
        ("*=", TokenKind::Assignment(Some("*".to_string()))),
        ("/=", TokenKind::Assignment(Some("/".to_string()))),
        ("%=", TokenKind::Assignment(Some("%".to_string()))),
        ("**=", TokenKind::Assignment(Some("**".to_string()))),
        ("&=", TokenKind::Assignment(Some("&".to_string()))),
        ("|=", TokenKind::Assignment(Some("|".to_string()))),
        ("^=", TokenKind::Assignment(Some("^".to_string()))),
        ("&&=", TokenKind::Assignment(Some("&&".to_string()))),
        ("||=", TokenKind::Assignment(Some("||".to_string()))),
    ];

    for (input, expected) in test_cases {
        assert_eq!(kinds(input), vec![expected], "Failed for input: {}", input);
    }
}

#[test]
fn test_equality_is_not_assignment() {
    assert_eq!(
        kinds("x==1"),
        vec![
            TokenKind::Word("x".to_string()),
            TokenKind::LogicalOperator("==".to_string()),
            TokenKind::Number(Number::integer(1)),
        ]
    );
}

// ============================================================================
// Punctuation
// ============================================================================

#[test]
fn test_punctuation() {
    let test_cases = vec![
        (",", TokenKind::Comma),
        (":", TokenKind::Colon),
        (".", TokenKind::Dot),
        (";", TokenKind::LineSeparator),
        ("(", TokenKind::LeftRound),
        (")", TokenKind::RightRound),
        ("[", TokenKind::LeftSquare),
        ("]", TokenKind::RightSquare),
        ("{", TokenKind::LeftCurly),
        ("}", TokenKind::RightCurly),
    ];

    for (input, expected) in test_cases {
        assert_eq!(kinds(input), vec![expected], "Failed for input: {}", input);
    }
}

// ============================================================================
// Errors and Reassembly
// ============================================================================

#[test]
fn test_unknown_characters_are_errors() {
    for input in ["1 @ 2", "a $ b", "x?"] {
        let result = tokenize(input);
        assert!(result.is_err(), "Expected an error for input: {}", input);
    }

    let err = tokenize("1 + 2 @ 3").unwrap_err();
    assert_eq!(err.token, "@");
    assert!(err.to_string().contains("Unexpected token"));
}

#[test]
fn test_lexemes_reassemble_the_normalized_input() {
    let inputs = vec![
        "x = 2 * (y + 1)",
        "f(a, b)[0].size",
        "{'key': [1, 2.5]}",
        "a && !b || c != d",
        "count += 1; count",
    ];

    for input in inputs {
        let tokenizer = Tokenizer::new(input).unwrap();
        let joined: String = tokenizer.tokens().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(
            joined,
            tokenizer.normalized(),
            "Failed for input: {}",
            input
        );
    }
}
