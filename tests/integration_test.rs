// Integration tests for the lexer → parser → evaluator pipeline

use calctty::error::CalcError;
use calctty::evaluator::engine::{eval, Evaluator};
use calctty::parser::lexer::{Lexer, Token, TokenKind};
use calctty::parser::parse::{ParseError, Parser, MAX_NESTING_DEPTH};
use calctty::{evaluate, parse, tokenize};

#[test]
fn test_token_stream_ends_once() {
    let tokens = tokenize("1 + (2 * 3)");
    let kinds: Vec<TokenKind> = tokens.iter().map(Token::kind).collect();

    assert_eq!(
        kinds,
        vec![
            TokenKind::Number,
            TokenKind::Plus,
            TokenKind::LParen,
            TokenKind::Number,
            TokenKind::Star,
            TokenKind::Number,
            TokenKind::RParen,
            TokenKind::EndOfInput,
        ]
    );
}

#[test]
fn test_lexer_repeats_end_marker() {
    let mut lexer = Lexer::new("5");
    lexer.next_token();

    let end = lexer.next_token();
    for _ in 0..5 {
        let again = lexer.next_token();
        assert_eq!(again.kind(), TokenKind::EndOfInput);
        assert_eq!(again.location(), end.location());
    }
}

#[test]
fn test_parser_over_explicit_lexer() {
    let mut parser = Parser::from_lexer(Lexer::new("6 * 7"));
    let expr = parser.parse().expect("Parsing failed");
    assert_eq!(eval(&expr), Ok(42));
}

#[test]
fn test_trailing_operator() {
    let err = evaluate("3 + ").unwrap_err();

    match err {
        CalcError::Parse(ParseError::UnexpectedToken {
            found, location, ..
        }) => {
            assert_eq!(found, TokenKind::EndOfInput);
            assert_eq!(location.offset, 4);
        }
        _ => panic!("Expected unexpected token, got {:?}", err),
    }
}

#[test]
fn test_unexpected_character() {
    let err = evaluate("3 # 2").unwrap_err();

    match err {
        CalcError::Parse(ParseError::UnexpectedCharacter { ch, location }) => {
            assert_eq!(ch, '#');
            assert_eq!(location.column, 3);
        }
        _ => panic!("Expected unexpected character, got {:?}", err),
    }
    assert_eq!(
        err.to_string(),
        "Parse error at line 1, column 3: unexpected character '#'"
    );
}

#[test]
fn test_malformed_inputs() {
    for source in ["", "+", "(", "()", "1 +* 2", "(1 + 2", "1 + 2)", "2 3", "(4) 5"] {
        assert!(
            matches!(
                evaluate(source),
                Err(CalcError::Parse(ParseError::UnexpectedToken { .. }))
            ),
            "expected a parse error for {:?}",
            source
        );
    }
}

#[test]
fn test_stepping_agrees_with_eval() {
    for source in [
        "3 + 5 * 2",
        "10 - 2 - 3",
        "(1 + 2) * (3 + 4) - 5 / 2",
        "((2))",
        "9 / (1 - 1) + 4",
    ] {
        let expr = parse(source).expect("Parsing failed");
        let direct = eval(&expr);

        let operations = expr.operation_count();
        let mut evaluator = Evaluator::new(expr, 1024 * 1024);
        let stepped = evaluator.run();

        assert_eq!(direct, stepped, "evaluating {:?}", source);
        if stepped.is_ok() {
            assert_eq!(evaluator.total_snapshots(), operations + 1);
        }
    }
}

#[test]
fn test_step_back_and_forth_restores_state() {
    let expr = parse("1 + 2 * 3 - 4").expect("Parsing failed");
    let mut evaluator = Evaluator::new(expr, 1024 * 1024);
    evaluator.run().expect("Evaluation failed");

    evaluator.rewind_to_start().unwrap();
    let mut forward = Vec::new();
    loop {
        forward.push(evaluator.rendered());
        if evaluator.step_forward().is_err() {
            break;
        }
    }

    let mut backward = Vec::new();
    loop {
        backward.push(evaluator.rendered());
        if evaluator.step_backward().is_err() {
            break;
        }
    }
    backward.reverse();

    assert_eq!(forward, vec!["1 + 2 * 3 - 4", "1 + 6 - 4", "7 - 4", "3"]);
    assert_eq!(forward, backward);
}

#[test]
fn test_pretty_print_roundtrip() {
    let expr = parse(" ( 1+2 ) *3 - (4 - 5)").expect("Parsing failed");
    let printed = expr.to_string();

    assert_eq!(printed, "(1 + 2) * 3 - (4 - 5)");
    assert_eq!(parse(&printed).map(|e| e.to_string()), Ok(printed));
}

#[test]
fn test_long_operator_chain() {
    let source = vec!["2"; 150_000].join("+");
    assert_eq!(evaluate(&source), Ok(300_000));

    let mixed = vec!["7 * 3 - 20"; 50_000].join(" + ");
    assert_eq!(evaluate(&mixed), Ok(50_000));
}

#[test]
fn test_stepping_long_chain() {
    let expr = parse(&vec!["1"; 5_000].join(" - ")).expect("Parsing failed");
    let mut evaluator = Evaluator::new(expr, 64 * 1024 * 1024);

    assert_eq!(evaluator.run(), Ok(1 - 4_999));
    assert_eq!(evaluator.total_snapshots(), 5_000);
    assert_eq!(evaluator.rendered(), "(-4998)");

    evaluator.rewind_to_start().unwrap();
    evaluator.step_forward().unwrap();
    assert!(evaluator.rendered().starts_with("0 - 1 - 1"));
}

#[test]
fn test_deep_nesting_is_rejected() {
    let depth = 50_000;
    let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));

    match evaluate(&source) {
        Err(CalcError::Parse(ParseError::NestingTooDeep { limit, location })) => {
            assert_eq!(limit, MAX_NESTING_DEPTH);
            assert_eq!(location.offset, MAX_NESTING_DEPTH);
        }
        other => panic!("Expected nesting error, got {:?}", other),
    }

    let nested = format!("{}1 + 2{}", "(".repeat(100), ")".repeat(100));
    assert_eq!(evaluate(&nested), Ok(3));
}
