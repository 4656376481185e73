use approx::assert_abs_diff_eq;
use calctty::{evaluate, parse, ComputeError, Error};

fn steps(source: &str) -> Vec<String> {
    let mut ast = parse(source).expect("Parsing failed");
    evaluate(&mut ast).steps
}

#[test]
fn test_arithmetic_results() {
    let cases = [("2+3*4", 14.0), ("2^3^2", 512.0), ("3!", 6.0), ("(1+2)*(3+4)", 21.0)];
    for (source, expected) in cases {
        let mut ast = parse(source).expect("Parsing failed");
        let value = evaluate(&mut ast).value.expect("numeric result");
        assert_abs_diff_eq!(value, expected, epsilon = 1e-9);
    }
}

#[test]
fn test_first_step_is_the_expression() {
    for source in ["2+3*4", "2x+4=10", "sin(30)", "7"] {
        let trace = steps(source);
        assert!(trace[0].starts_with("Expression: "), "{:?}", trace);
        assert!(trace.len() >= 2);
    }
}

#[test]
fn test_steps_are_distinct() {
    let trace = steps("2x+4=10");
    for pair in trace.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
}

#[test]
fn test_intermediate_rendering_replays_the_rest() {
    let sources = [
        "2x+4=10",
        "1-2-3-4",
        "-x=3",
        "5=x",
        "x=2x-3",
        "2^-1",
        "3*(4-6)-1",
        "-(2+3)*4",
        "sin(10+20)*2",
        "(x+1)^2",
        "1/3+1/6",
    ];
    for source in sources {
        let full = steps(source);
        for i in 1..full.len().saturating_sub(1) {
            let replay = steps(&full[i]);
            assert_eq!(
                replay[0],
                format!("Expression: {}", full[i]),
                "{} at step {}",
                source,
                i
            );
            assert_eq!(&replay[1..], &full[i + 1..], "{} at step {}", source, i);
        }
    }
}

#[test]
fn test_variable_on_the_right_side() {
    let mut ast = parse("5=x").expect("Parsing failed");
    let evaluation = evaluate(&mut ast);
    assert_eq!(
        evaluation.steps,
        vec![
            "Expression: 5 = x",
            "5-x = 0",
            "-x+5 = 0",
            "-x = 0-5",
            "-x = -5",
            "x = (-5)/(-1)",
            "x = 5"
        ]
    );
    assert_eq!(evaluation.value, Ok(5.0));
}

#[test]
fn test_non_finite_results_are_errors() {
    for source in ["log(0)", "log(-1)", "0^-1", "sqrt(0-4)"] {
        let mut ast = parse(source).expect("Parsing failed");
        assert!(
            matches!(
                evaluate(&mut ast).value,
                Err(Error::Compute(ComputeError::NonFinite { .. }))
            ),
            "{}",
            source
        );
    }
}

#[test]
fn test_long_chains_do_not_exhaust_the_stack() {
    let source = vec!["1"; 200_000].join("+");
    let ast = parse(&source).expect("Parsing failed");
    assert_eq!(ast.render().len(), source.len());

    let mut ast = parse(&vec!["1"; 2_000].join("+")).expect("Parsing failed");
    assert_eq!(evaluate(&mut ast).value, Ok(2000.0));
}

#[test]
fn test_exact_fraction_result() {
    let mut ast = parse("1/3+1/6").expect("Parsing failed");
    let evaluation = evaluate(&mut ast);
    assert_eq!(evaluation.steps.last().map(String::as_str), Some("1/2"));
    assert_eq!(evaluation.value, Ok(0.5));
}

#[test]
fn test_factorial_limit() {
    let mut ast = parse("13!").expect("Parsing failed");
    assert!(matches!(
        evaluate(&mut ast).value,
        Err(Error::Compute(ComputeError::FactorialTooLarge { .. }))
    ));
}

#[test]
fn test_invalid_input_is_a_parse_error() {
    assert!(parse("2+$").is_err());
    assert!(parse("(1+2").is_err());
}
