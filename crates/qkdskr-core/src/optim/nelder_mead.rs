// crates/qkdskr-core/src/optim/nelder_mead.rs

use crate::optim::{Bounds, Constraint, MinimizeOptions, Minimizer, Outcome};

// Standard reflection / expansion / contraction / shrink coefficients.
const RHO: f64 = 1.0;
const CHI: f64 = 2.0;
const PSI: f64 = 0.5;
const SIGMA: f64 = 0.5;

/// Used for a zero start coordinate, where a relative step is meaningless.
const ZERO_COORD_STEP: f64 = 0.00025;

/// Derivative-free simplex search.
///
/// Every trial point is projected into the box first. Points that violate a
/// constraint are never passed to the objective; they score `+inf` and the
/// simplex contracts away from them. Non-finite objective values score
/// `+inf` as well.
#[derive(Clone, Copy, Debug, Default)]
pub struct NelderMead {
    pub options: MinimizeOptions,
}

impl NelderMead {
    pub fn new(options: MinimizeOptions) -> Self {
        Self { options }
    }
}

struct Probe<'o, 'c, const D: usize> {
    objective: &'o mut dyn FnMut(&[f64; D]) -> f64,
    constraints: &'c [Constraint<D>],
    evaluations: usize,
}

impl<const D: usize> Probe<'_, '_, D> {
    fn eval(&mut self, x: &[f64; D]) -> f64 {
        if !self.constraints.iter().all(|c| c.satisfied(x)) {
            return f64::INFINITY;
        }
        self.evaluations += 1;
        let v = (self.objective)(x);
        if v.is_finite() {
            v
        } else {
            f64::INFINITY
        }
    }
}

fn affine<const D: usize>(from: &[f64; D], to: &[f64; D], t: f64) -> [f64; D] {
    let mut out = [0.0; D];
    for i in 0..D {
        out[i] = from[i] + t * (to[i] - from[i]);
    }
    out
}

impl<const D: usize> Minimizer<D> for NelderMead {
    fn minimize(
        &self,
        objective: &mut dyn FnMut(&[f64; D]) -> f64,
        x0: [f64; D],
        bounds: &Bounds<D>,
        constraints: &[Constraint<D>],
    ) -> Outcome<D> {
        if D == 0 {
            return Outcome {
                success: false,
                x: x0,
                fun: f64::NAN,
                iterations: 0,
                evaluations: 0,
                message: "zero-dimensional problem".into(),
            };
        }

        let opts = self.options;
        let mut probe = Probe {
            objective,
            constraints,
            evaluations: 0,
        };

        let start = bounds.clip(x0);
        if let Some(c) = constraints.iter().find(|c| !c.satisfied(&start)) {
            return Outcome {
                success: false,
                x: start,
                fun: f64::INFINITY,
                iterations: 0,
                evaluations: 0,
                message: format!("starting point violates constraint `{}`", c.label()),
            };
        }
        let f_start = probe.eval(&start);
        if !f_start.is_finite() {
            return Outcome {
                success: false,
                x: start,
                fun: f_start,
                iterations: 0,
                evaluations: probe.evaluations,
                message: "objective is not finite at the starting point".into(),
            };
        }

        let mut simplex: Vec<([f64; D], f64)> = Vec::with_capacity(D + 1);
        simplex.push((start, f_start));
        for i in 0..D {
            let mut y = start;
            y[i] = if start[i] != 0.0 {
                start[i] * (1.0 + opts.initial_step)
            } else {
                ZERO_COORD_STEP
            };
            y = bounds.clip(y);
            if y == start {
                // Pinned against the upper bound: step inwards instead.
                y[i] = start[i] * (1.0 - opts.initial_step);
                y = bounds.clip(y);
            }
            let fy = probe.eval(&y);
            simplex.push((y, fy));
        }

        let mut iterations = 0usize;
        loop {
            simplex.sort_by(|a, b| a.1.total_cmp(&b.1));

            if converged(&simplex, &opts) {
                return Outcome {
                    success: true,
                    x: simplex[0].0,
                    fun: simplex[0].1,
                    iterations,
                    evaluations: probe.evaluations,
                    message: "converged".into(),
                };
            }
            if iterations >= opts.max_iterations {
                return Outcome {
                    success: false,
                    x: simplex[0].0,
                    fun: simplex[0].1,
                    iterations,
                    evaluations: probe.evaluations,
                    message: format!("maximum number of iterations ({}) exceeded", opts.max_iterations),
                };
            }
            iterations += 1;

            let mut centroid = [0.0; D];
            for (x, _) in simplex.iter().take(D) {
                for i in 0..D {
                    centroid[i] += x[i] / D as f64;
                }
            }

            let last = simplex.len() - 1;
            let (worst, f_worst) = simplex[last];
            let f_best = simplex[0].1;
            let f_second_worst = simplex[last - 1].1;

            let xr = bounds.clip(affine(&centroid, &worst, -RHO));
            let fr = probe.eval(&xr);

            if fr < f_best {
                let xe = bounds.clip(affine(&centroid, &worst, -RHO * CHI));
                let fe = probe.eval(&xe);
                simplex[last] = if fe < fr { (xe, fe) } else { (xr, fr) };
                continue;
            }
            if fr < f_second_worst {
                simplex[last] = (xr, fr);
                continue;
            }

            // Contraction, outside if the reflection beat the worst vertex.
            let (xc, fc, accepted) = if fr < f_worst {
                let xc = bounds.clip(affine(&centroid, &xr, PSI));
                let fc = probe.eval(&xc);
                (xc, fc, fc <= fr)
            } else {
                let xc = bounds.clip(affine(&centroid, &worst, PSI));
                let fc = probe.eval(&xc);
                (xc, fc, fc < f_worst)
            };
            if accepted {
                simplex[last] = (xc, fc);
                continue;
            }

            let best = simplex[0].0;
            for vertex in simplex.iter_mut().skip(1) {
                let x = bounds.clip(affine(&best, &vertex.0, SIGMA));
                let f = probe.eval(&x);
                *vertex = (x, f);
            }
        }
    }
}

fn converged<const D: usize>(simplex: &[([f64; D], f64)], opts: &MinimizeOptions) -> bool {
    let (best, f_best) = simplex[0];
    let mut x_spread: f64 = 0.0;
    let mut f_spread: f64 = 0.0;
    for (x, f) in &simplex[1..] {
        if !f.is_finite() {
            return false;
        }
        for i in 0..D {
            x_spread = x_spread.max((x[i] - best[i]).abs());
        }
        f_spread = f_spread.max((f - f_best).abs());
    }
    x_spread <= opts.x_tolerance && f_spread <= opts.f_tolerance * f_best.abs().max(1.0)
}
