//! Bounded, inequality-constrained local minimization over `[f64; D]`.

pub mod nelder_mead;

pub use nelder_mead::NelderMead;

/// Box bounds. `upper[i] == None` leaves coordinate `i` unbounded above.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds<const D: usize> {
    pub lower: [f64; D],
    pub upper: [Option<f64>; D],
}

impl<const D: usize> Bounds<D> {
    pub fn new(lower: [f64; D], upper: [Option<f64>; D]) -> Self {
        Self { lower, upper }
    }

    /// Project `x` into the box.
    pub fn clip(&self, mut x: [f64; D]) -> [f64; D] {
        for (i, v) in x.iter_mut().enumerate() {
            if *v < self.lower[i] {
                *v = self.lower[i];
            }
            if let Some(hi) = self.upper[i] {
                if *v > hi {
                    *v = hi;
                }
            }
        }
        x
    }

    pub fn contains(&self, x: &[f64; D]) -> bool {
        x.iter().enumerate().all(|(i, &v)| {
            v >= self.lower[i] && self.upper[i].map_or(true, |hi| v <= hi)
        })
    }
}

/// Inequality constraint `g(x) >= 0`.
pub struct Constraint<const D: usize> {
    label: String,
    fun: Box<dyn Fn(&[f64; D]) -> f64>,
}

impl<const D: usize> Constraint<D> {
    pub fn new(label: impl Into<String>, fun: impl Fn(&[f64; D]) -> f64 + 'static) -> Self {
        Self {
            label: label.into(),
            fun: Box::new(fun),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self, x: &[f64; D]) -> f64 {
        (self.fun)(x)
    }

    /// NaN counts as violated.
    pub fn satisfied(&self, x: &[f64; D]) -> bool {
        self.value(x) >= 0.0
    }
}

impl<const D: usize> std::fmt::Debug for Constraint<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Constraint").field("label", &self.label).finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinimizeOptions {
    /// Iteration cap. Hitting it is reported as failure.
    pub max_iterations: usize,
    /// Largest coordinate spread of the simplex at convergence.
    pub x_tolerance: f64,
    /// Largest objective spread at convergence, relative to `max(1, |f_best|)`.
    pub f_tolerance: f64,
    /// Relative size of the initial simplex around the start point.
    pub initial_step: f64,
}

impl Default for MinimizeOptions {
    fn default() -> Self {
        Self {
            max_iterations: 100_000,
            x_tolerance: 1e-6,
            f_tolerance: 1e-9,
            initial_step: 0.05,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Outcome<const D: usize> {
    pub success: bool,
    pub x: [f64; D],
    /// Objective at `x`.
    pub fun: f64,
    pub iterations: usize,
    pub evaluations: usize,
    pub message: String,
}

/// A local minimizer. Infeasible points (outside `bounds` or violating a
/// constraint) must never be reported as the solution.
pub trait Minimizer<const D: usize> {
    fn minimize(
        &self,
        objective: &mut dyn FnMut(&[f64; D]) -> f64,
        x0: [f64; D],
        bounds: &Bounds<D>,
        constraints: &[Constraint<D>],
    ) -> Outcome<D>;
}
