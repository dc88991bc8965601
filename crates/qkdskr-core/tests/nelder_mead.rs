use qkdskr_core::optim::{Bounds, Constraint, MinimizeOptions, Minimizer, NelderMead};

fn unbounded<const D: usize>() -> Bounds<D> {
    Bounds::new([f64::NEG_INFINITY; D], [None; D])
}

#[test]
fn converges_on_a_quadratic() {
    let nm = NelderMead::default();
    let mut f = |x: &[f64; 2]| (x[0] - 3.0).powi(2) + 2.0 * (x[1] + 1.0).powi(2);
    let out = nm.minimize(&mut f, [0.0, 0.0], &unbounded(), &[]);
    assert!(out.success, "{}", out.message);
    assert!((out.x[0] - 3.0).abs() < 1e-4, "x={:?}", out.x);
    assert!((out.x[1] + 1.0).abs() < 1e-4, "x={:?}", out.x);
    assert!(out.evaluations > out.iterations);
}

#[test]
fn respects_box_bounds() {
    let nm = NelderMead::default();
    let bounds = Bounds::new([0.5, 0.0], [Some(1.0), Some(0.25)]);
    let mut f = |x: &[f64; 2]| x[0] * x[0] + (x[1] - 1.0).powi(2);
    let out = nm.minimize(&mut f, [0.9, 0.1], &bounds, &[]);
    assert!(out.success, "{}", out.message);
    assert!(bounds.contains(&out.x));
    assert!((out.x[0] - 0.5).abs() < 1e-4, "x={:?}", out.x);
    assert!((out.x[1] - 0.25).abs() < 1e-4, "x={:?}", out.x);
}

#[test]
fn never_evaluates_infeasible_points() {
    let nm = NelderMead::default();
    // Unconstrained minimum at (0, 1) violates x0 - x1 >= 0.1.
    let constraints = [Constraint::new("x0 - x1 >= 0.1", |x: &[f64; 2]| x[0] - x[1] - 0.1)];
    let mut seen_infeasible = false;
    let mut f = |x: &[f64; 2]| {
        if x[0] - x[1] < 0.1 {
            seen_infeasible = true;
        }
        x[0] * x[0] + (x[1] - 1.0).powi(2)
    };
    let out = nm.minimize(&mut f, [1.0, 0.5], &unbounded(), &constraints);
    assert!(!seen_infeasible);
    assert!(out.x[0] - out.x[1] >= 0.1);
}

#[test]
fn infeasible_start_is_a_failure() {
    let nm = NelderMead::default();
    let constraints = [Constraint::new("x0 >= 1", |x: &[f64; 1]| x[0] - 1.0)];
    let mut f = |x: &[f64; 1]| x[0] * x[0];
    let out = nm.minimize(&mut f, [0.0], &unbounded(), &constraints);
    assert!(!out.success);
    assert_eq!(out.evaluations, 0);
    assert!(out.message.contains("x0 >= 1"));
}

#[test]
fn iteration_cap_is_a_failure() {
    let nm = NelderMead::new(MinimizeOptions {
        max_iterations: 3,
        ..MinimizeOptions::default()
    });
    let mut f = |x: &[f64; 2]| (x[0] - 30.0).powi(2) + (x[1] - 30.0).powi(2);
    let out = nm.minimize(&mut f, [0.0, 1.0], &unbounded(), &[]);
    assert!(!out.success);
    assert_eq!(out.iterations, 3);
}

#[test]
fn non_finite_objective_at_start_is_a_failure() {
    let nm = NelderMead::default();
    let mut f = |_: &[f64; 2]| f64::NAN;
    let out = nm.minimize(&mut f, [1.0, 1.0], &unbounded(), &[]);
    assert!(!out.success);
    assert_eq!(out.iterations, 0);
}

#[test]
fn zero_dimensional_problem_is_rejected() {
    let nm = NelderMead::default();
    let mut calls = 0usize;
    let mut f = |_: &[f64; 0]| {
        calls += 1;
        0.0
    };
    let out = nm.minimize(&mut f, [], &Bounds::new([], []), &[]);
    assert!(!out.success);
    assert_eq!(out.evaluations, 0);
    assert!(out.message.contains("zero-dimensional"), "{}", out.message);
    assert_eq!(calls, 0);
}
