// crates/qkdskr-core/src/rate/decoy.rs

use crate::params::model::QkdParameters;
use crate::rate::bounds::{
    binary_entropy, concentration_delta, phase_error_gamma, photon_number_weight,
};
use crate::rate::SecurityRateEvaluator;
use crate::sample::{SampleAxis, SampleSize};

/// Error-correction inefficiency relative to the Shannon limit.
pub const DEFAULT_EC_EFFICIENCY: f64 = 1.16;

/// Two-intensity ("1-decoy") BB84 with key from the X basis and the phase
/// error estimated from Z.
#[derive(Clone, Copy, Debug)]
pub struct DecoyStateEvaluator {
    pub ec_efficiency: f64,
}

impl Default for DecoyStateEvaluator {
    fn default() -> Self {
        Self {
            ec_efficiency: DEFAULT_EC_EFFICIENCY,
        }
    }
}

/// Bounds for one basis.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasisBounds {
    /// Detections (both intensities).
    pub detections: f64,
    /// Errors (both intensities).
    pub errors: f64,
    /// Lower bound on vacuum events.
    pub vacuum_lower: f64,
    /// Upper bound on vacuum events.
    pub vacuum_upper: f64,
    /// Lower bound on single-photon events.
    pub single_photon: f64,
    /// Upper bound on single-photon errors.
    pub single_photon_errors: f64,
}

/// Intermediate quantities of one evaluation, mostly for reporting.
#[derive(Clone, Copy, Debug)]
pub struct KeyBreakdown {
    /// Pulses sent for this block.
    pub total_pulses: f64,
    pub x: BasisBounds,
    pub z: BasisBounds,
    pub qber_x: f64,
    pub phase_error_x: f64,
    pub leak_ec: f64,
    /// Secret key length before clamping; may be negative.
    pub key_length: f64,
    /// Bits per second, `>= 0`.
    pub rate: f64,
}

impl DecoyStateEvaluator {
    pub fn new(ec_efficiency: f64) -> Self {
        Self { ec_efficiency }
    }

    /// Full evaluation. `None` when a quantity the bound needs is not
    /// finite or not positive (no key can be extracted).
    pub fn breakdown(&self, p: &QkdParameters) -> Option<KeyBreakdown> {
        let asymptotic = p.is_asymptotic();
        let method = p.concentration_method();
        let intensities = [(p.mu_1(), p.p_mu_1()), (p.mu_2(), p.p_mu_2())];
        let (mu_1, mu_2) = (p.mu_1(), p.mu_2());

        let p_dc = p.dark_count_rate() / p.repetition_rate();
        let eta = p.eta_sys();

        // Per-pulse detection and error probabilities for each intensity.
        let mut detect = [0.0; 2];
        let mut error = [0.0; 2];
        for (k, &(mu, _)) in intensities.iter().enumerate() {
            let click = 1.0 - (-eta * mu).exp();
            detect[k] = 1.0 - (1.0 - 2.0 * p_dc) * (-eta * mu).exp();
            error[k] = p.p_err() * click + p_dc;
        }

        let regime = p.sample_regime();
        let total_pulses = match (regime.axis, regime.size) {
            (SampleAxis::FixedTotal, SampleSize::Finite(n)) => n,
            (SampleAxis::FixedBlock, SampleSize::Finite(n_block)) => {
                let sift = p.p_x_alice() * p.p_x_bob();
                let per_pulse: f64 = intensities
                    .iter()
                    .zip(detect.iter())
                    .map(|(&(_, pk), &d)| pk * d)
                    .sum();
                n_block / (sift * per_pulse)
            }
            // The rate per second no longer depends on N; any positive
            // count gives the same result.
            (_, SampleSize::Asymptotic) => p.pulse_count(),
        };
        if !(total_pulses.is_finite() && total_pulses > 0.0) {
            return None;
        }

        let tau_0 = photon_number_weight(0, &intensities);
        let tau_1 = photon_number_weight(1, &intensities);

        let delta = |n: f64, eps: f64| {
            if asymptotic {
                0.0
            } else {
                concentration_delta(method, n, eps)
            }
        };

        let basis = |pa: f64, pb: f64| -> BasisBounds {
            let weight = total_pulses * pa * pb;
            let n = [
                weight * intensities[0].1 * detect[0],
                weight * intensities[1].1 * detect[1],
            ];
            let m = [
                weight * intensities[0].1 * error[0],
                weight * intensities[1].1 * error[1],
            ];
            let n_sum = n[0] + n[1];
            let m_sum = m[0] + m[1];
            let dn = delta(n_sum, p.epsilon_1());
            let dm = delta(m_sum, p.epsilon_2());

            let scale = |k: usize| intensities[k].0.exp() / intensities[k].1;
            let n_plus = |k: usize| scale(k) * (n[k] + dn);
            let n_minus = |k: usize| scale(k) * (n[k] - dn);
            let m_plus = |k: usize| scale(k) * (m[k] + dm);
            let m_minus = |k: usize| scale(k) * (m[k] - dm);

            let vacuum_lower =
                (tau_0 / (mu_1 - mu_2) * (mu_1 * n_minus(1) - mu_2 * n_plus(0))).max(0.0);
            let vacuum_upper = 2.0 * tau_0 * m_plus(1);

            let ratio = mu_2 / mu_1;
            let single_photon = (tau_1 * mu_1 / (mu_2 * (mu_1 - mu_2))
                * (n_minus(1)
                    - ratio * ratio * n_plus(0)
                    - (mu_1 * mu_1 - mu_2 * mu_2) / (mu_1 * mu_1) * vacuum_upper / tau_0))
                .max(0.0);
            let single_photon_errors = (tau_1 / (mu_1 - mu_2) * (m_plus(0) - m_minus(1))).max(0.0);

            BasisBounds {
                detections: n_sum,
                errors: m_sum,
                vacuum_lower,
                vacuum_upper,
                single_photon,
                single_photon_errors,
            }
        };

        let x = basis(p.p_x_alice(), p.p_x_bob());
        let z = basis(p.p_z_alice(), p.p_z_bob());

        if !(x.single_photon > 0.0 && z.single_photon > 0.0 && x.detections > 0.0) {
            return None;
        }

        let estimated = z.single_photon_errors / z.single_photon;
        let gamma = if asymptotic {
            0.0
        } else {
            phase_error_gamma(p.epsilon_sec(), estimated, z.single_photon, x.single_photon)
        };
        let phase_error_x = (estimated + gamma).clamp(0.0, 0.5);

        let qber_x = x.errors / x.detections;
        let leak_ec = self.ec_efficiency * x.detections * binary_entropy(qber_x);

        let mut key_length =
            x.vacuum_lower + x.single_photon * (1.0 - binary_entropy(phase_error_x)) - leak_ec;
        if !asymptotic {
            key_length -= 6.0 * (19.0 / p.epsilon_sec()).log2() + (2.0 / p.epsilon_cor()).log2();
        }

        let rate = key_length.max(0.0) * p.repetition_rate() / total_pulses;
        if key_length.is_nan() || !rate.is_finite() {
            return None;
        }

        Some(KeyBreakdown {
            total_pulses,
            x,
            z,
            qber_x,
            phase_error_x,
            leak_ec,
            key_length,
            rate,
        })
    }
}

impl SecurityRateEvaluator for DecoyStateEvaluator {
    fn evaluate(&self, params: &QkdParameters) -> f64 {
        match self.breakdown(params) {
            Some(b) if b.rate.is_finite() && b.rate >= 0.0 => b.rate,
            _ => 0.0,
        }
    }
}
