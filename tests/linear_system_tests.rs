use calctty::interpreter::constants::NO_SOLUTION_MESSAGE;
use calctty::{solve_linear_system, ComputeError, Error};

#[test]
fn test_unique_solution_in_three_variables() {
    let lines = solve_linear_system(&["x+y+z=6", "2y+5z=-4", "2x+5y-z=27"])
        .expect("Solving failed");
    assert_eq!(lines, vec!["x = 5", "y = 3", "z = -2"]);
}

#[test]
fn test_variables_may_appear_on_either_side() {
    let lines = solve_linear_system(&["x = y + 1", "y = 3"]).expect("Solving failed");
    assert_eq!(lines, vec!["x = 4", "y = 3"]);
}

#[test]
fn test_inconsistent_system() {
    let lines = solve_linear_system(&["x+y=1", "2x+2y=5"]).expect("Solving failed");
    assert_eq!(lines, vec![NO_SOLUTION_MESSAGE]);
}

#[test]
fn test_free_parameter() {
    let lines = solve_linear_system(&["x+y=2"]).expect("Solving failed");
    assert_eq!(lines, vec!["x = -z + 2", "y = z"]);
}

#[test]
fn test_non_linear_equation_is_rejected() {
    assert!(matches!(
        solve_linear_system(&["x^2=4"]),
        Err(Error::Compute(ComputeError::NonLinear { .. }))
    ));
}
