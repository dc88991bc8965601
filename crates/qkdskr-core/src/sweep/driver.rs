// crates/qkdskr-core/src/sweep/driver.rs

use tracing::{debug, info, warn};

use crate::error::{Result, SkrError};
use crate::optim::{Minimizer, NelderMead};
use crate::params::format::params_id_hex;
use crate::params::model::QkdParameters;
use crate::rate::SecurityRateEvaluator;
use crate::sample::{SampleAxis, SampleRegime, SampleSize};
use crate::sweep::candidate::Candidate;
use crate::sweep::config::SweepConfig;
use crate::sweep::series::{PointOutcome, PointTrace, SweepPoint, SweepSeries};

/// Progress of one sweep run.
///
/// `Idle -> Sweeping(L0) -> Recorded(L0) | Skipped(L0) -> Sweeping(L1) -> ... -> Done`.
/// Lengths only increase; nothing is retried.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SweepState {
    Idle,
    Sweeping(f64),
    Recorded(f64),
    Skipped(f64),
    Done,
}

impl SweepState {
    pub fn can_advance_to(self, next: SweepState) -> bool {
        use SweepState::*;
        match (self, next) {
            (Idle, Sweeping(_)) | (Idle, Done) => true,
            (Sweeping(a), Recorded(b)) | (Sweeping(a), Skipped(b)) => a == b,
            (Recorded(a), Sweeping(b)) | (Skipped(a), Sweeping(b)) => b > a,
            (Recorded(_), Done) | (Skipped(_), Done) => true,
            _ => false,
        }
    }
}

/// Converged result at one length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointOptimum {
    pub optimum: Candidate,
    pub skr: f64,
    pub iterations: usize,
    pub evaluations: usize,
}

/// Sweeps channel length for one base model and one evaluator.
///
/// The driver owns the warm-start candidate. Every objective evaluation
/// builds a fresh snapshot from (base model at the current length,
/// candidate); the evaluator never sees a model the driver later mutates.
pub struct SweepDriver<'e, E: ?Sized, M = NelderMead> {
    evaluator: &'e E,
    minimizer: M,
    config: SweepConfig,
    state: SweepState,
}

impl<'e, E> SweepDriver<'e, E, NelderMead>
where
    E: SecurityRateEvaluator + ?Sized,
{
    pub fn new(evaluator: &'e E, config: SweepConfig) -> Self {
        Self::with_minimizer(evaluator, NelderMead::new(config.options), config)
    }
}

impl<'e, E, M> SweepDriver<'e, E, M>
where
    E: SecurityRateEvaluator + ?Sized,
    M: Minimizer<4>,
{
    pub fn with_minimizer(evaluator: &'e E, minimizer: M, config: SweepConfig) -> Self {
        Self {
            evaluator,
            minimizer,
            config,
            state: SweepState::Idle,
        }
    }

    pub fn state(&self) -> SweepState {
        self.state
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    fn advance(&mut self, next: SweepState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal sweep transition {:?} -> {:?}",
            self.state,
            next
        );
        self.state = next;
    }

    /// Run the whole sweep for `base` (its own channel length is ignored).
    ///
    /// Per-point optimizer failures are logged and skipped; only a bad
    /// configuration aborts the run.
    pub fn run(&mut self, base: &QkdParameters) -> Result<SweepSeries> {
        self.config.validate()?;
        self.state = SweepState::Idle;

        let regime = base.sample_regime();
        let label = regime.label();
        let params_id = params_id_hex(base);
        let lengths = self.config.lengths();

        info!(
            label = %label,
            params_id = %params_id,
            points = lengths.len(),
            "sweep started"
        );

        let mut model = base.clone();
        let mut warm = self.config.initial;
        let mut points = Vec::with_capacity(lengths.len());
        let mut trace = Vec::with_capacity(lengths.len());

        for length_km in lengths {
            self.advance(SweepState::Sweeping(length_km));
            model.set_channel_length(length_km)?;

            let start = warm;
            match self.optimize_point(&model, start) {
                Ok(opt) => {
                    let attenuation_db = model.attenuation_db();
                    debug!(
                        length_km,
                        attenuation_db,
                        skr = opt.skr,
                        iterations = opt.iterations,
                        "point recorded"
                    );
                    points.push(SweepPoint {
                        length_km,
                        attenuation_db,
                        skr: opt.skr,
                        optimum: opt.optimum,
                        refined: false,
                    });
                    trace.push(PointTrace {
                        length_km,
                        start,
                        outcome: PointOutcome::Recorded {
                            optimum: opt.optimum,
                            skr: opt.skr,
                            iterations: opt.iterations,
                            evaluations: opt.evaluations,
                        },
                    });
                    warm = opt.optimum;
                    self.advance(SweepState::Recorded(length_km));
                }
                Err(e) if e.is_recoverable() => {
                    warn!(length_km, error = %e, "unsuccessful optimization, point skipped");
                    trace.push(PointTrace {
                        length_km,
                        start,
                        outcome: PointOutcome::Skipped {
                            reason: e.to_string(),
                        },
                    });
                    self.advance(SweepState::Skipped(length_km));
                }
                Err(e) => return Err(e),
            }
        }

        let refined = if self.config.refine_backward {
            self.refine_backward(base, &mut points)?
        } else {
            0
        };

        self.advance(SweepState::Done);
        info!(
            label = %label,
            recorded = points.len(),
            skipped = trace.len() - points.len(),
            refined,
            "sweep finished"
        );

        Ok(SweepSeries {
            label,
            regime,
            params_id,
            points,
            trace,
        })
    }

    /// Maximize the key rate for `model` at its current channel length.
    ///
    /// Starts from `start`, plus `config.initial` when `cold_seed` is set,
    /// and keeps the higher rate. Fails only when every seed fails; the
    /// error reported is the one from `start`.
    pub fn optimize_point(&self, model: &QkdParameters, start: Candidate) -> Result<PointOptimum> {
        let warm = self.minimize_from(model, start);
        if !self.config.cold_seed || start == self.config.initial {
            return warm;
        }
        let cold = self.minimize_from(model, self.config.initial);
        match (warm, cold) {
            (Ok(w), Ok(c)) if c.skr > w.skr => {
                debug!(
                    length_km = model.channel_length(),
                    warm = w.skr,
                    cold = c.skr,
                    "cold seed beat warm start"
                );
                Ok(c)
            }
            (Ok(w), _) => Ok(w),
            (Err(_), Ok(c)) => Ok(c),
            (Err(e), Err(_)) => Err(e),
        }
    }

    /// One minimizer run from `start`.
    fn minimize_from(&self, model: &QkdParameters, start: Candidate) -> Result<PointOptimum> {
        let length_km = model.channel_length();
        let bounds = self.config.bounds();
        let constraints = self.config.constraints();
        let evaluator = self.evaluator;

        let mut degenerate = 0usize;
        let mut last_degenerate = f64::NAN;
        let mut objective = |x: &[f64; 4]| -> f64 {
            // Candidates the model rejects count as infeasible.
            let snapshot = match model.with_candidate(&Candidate::from_array(*x)) {
                Ok(s) => s,
                Err(_) => return f64::INFINITY,
            };
            let rate = evaluator.evaluate(&snapshot);
            if rate.is_finite() && rate >= 0.0 {
                -rate
            } else {
                degenerate += 1;
                last_degenerate = rate;
                f64::INFINITY
            }
        };

        let outcome =
            self.minimizer
                .minimize(&mut objective, start.to_array(), &bounds, &constraints);

        if degenerate > 0 {
            debug!(length_km, degenerate, "evaluator returned non-finite or negative rates");
        }

        if !outcome.success {
            if outcome.iterations == 0 && degenerate > 0 {
                return Err(SkrError::DegenerateObjective {
                    length_km,
                    value: last_degenerate,
                });
            }
            return Err(SkrError::OptimizerFailure {
                length_km,
                message: outcome.message,
            });
        }

        // A zero rate comes back as -0.0; report it as 0.0.
        let skr = if outcome.fun == 0.0 { 0.0 } else { -outcome.fun };
        if !(skr.is_finite() && skr >= 0.0) {
            return Err(SkrError::DegenerateObjective {
                length_km,
                value: skr,
            });
        }

        Ok(PointOptimum {
            optimum: Candidate::from_array(outcome.x),
            skr,
            iterations: outcome.iterations,
            evaluations: outcome.evaluations,
        })
    }

    /// Backward pass over recorded points (ascending length). Each point is
    /// compared with its successor's optimum evaluated at its own length;
    /// if that scores higher, the minimizer is rerun from it and the better
    /// of the two replaces the point. Returns how many points changed.
    ///
    /// Skipped lengths stay skipped; the trace keeps the forward results.
    fn refine_backward(&self, base: &QkdParameters, points: &mut [SweepPoint]) -> Result<usize> {
        let mut refined = 0;
        for i in (0..points.len().saturating_sub(1)).rev() {
            let here = points[i];
            let next = points[i + 1].optimum;
            let model = base.with_channel_length(here.length_km)?;

            let carried = match model.with_candidate(&next) {
                Ok(snapshot) => self.evaluator.evaluate(&snapshot),
                Err(_) => continue,
            };
            if !(carried.is_finite() && carried > here.skr) {
                continue;
            }

            let (optimum, skr) = match self.minimize_from(&model, next) {
                Ok(opt) if opt.skr >= carried => (opt.optimum, opt.skr),
                _ => (next, carried),
            };
            debug!(
                length_km = here.length_km,
                forward = here.skr,
                updated = skr,
                "point refined from successor optimum"
            );
            points[i].optimum = optimum;
            points[i].skr = skr;
            points[i].refined = true;
            refined += 1;
        }
        Ok(refined)
    }
}

/// One independent sweep per sample size on `axis`, each on a private copy
/// of `base`.
pub fn run_sample_sweep<E>(
    base: &QkdParameters,
    evaluator: &E,
    axis: SampleAxis,
    sizes: &[SampleSize],
    config: &SweepConfig,
) -> Result<Vec<SweepSeries>>
where
    E: SecurityRateEvaluator + ?Sized,
{
    let mut out = Vec::with_capacity(sizes.len());
    for &size in sizes {
        let mut model = base.clone();
        model.set_sample_regime(SampleRegime::new(axis, size))?;
        let mut driver = SweepDriver::new(evaluator, *config);
        out.push(driver.run(&model)?);
    }
    Ok(out)
}
