use calctty::sets::SetRequest;
use calctty::{format_set, set_op, SetOp};

const A: [f64; 3] = [1.0, 2.0, 3.0];
const B: [f64; 3] = [2.0, 3.0, 4.0];

#[test]
fn test_set_operations() {
    assert_eq!(format_set(&set_op(&A, &B, SetOp::Union)), "1, 2, 3, 4");
    assert_eq!(format_set(&set_op(&A, &B, SetOp::Intersection)), "2, 3");
    assert_eq!(format_set(&set_op(&A, &B, SetOp::Difference)), "1");
}

#[test]
fn test_textual_request() {
    let request: SetRequest = "{1,2,3} - {2}".parse().expect("Request parsing failed");
    assert_eq!(request.op, SetOp::Difference);
    assert_eq!(request.apply(), vec![1.0, 3.0]);
}

#[test]
fn test_disjoint_sets() {
    assert!(set_op(&[1.0], &[2.0], SetOp::Intersection).is_empty());
    assert_eq!(set_op(&[1.0], &[], SetOp::Union), vec![1.0]);
}

#[test]
fn test_symbol_operators() {
    let request: SetRequest = "{1,2,3} ∩ {3,2,5}".parse().expect("Request parsing failed");
    assert_eq!(request.op, SetOp::Intersection);
    assert_eq!(format_set(&request.apply()), "3, 2");

    let request: SetRequest = "{1} ∪ {2}".parse().expect("Request parsing failed");
    assert_eq!(format_set(&request.apply()), "1, 2");
}
