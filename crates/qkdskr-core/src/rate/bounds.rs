// crates/qkdskr-core/src/rate/bounds.rs

use crate::params::model::ConcentrationMethod;

/// Binary entropy `h(p)` in bits; 0 outside (0, 1).
pub fn binary_entropy(p: f64) -> f64 {
    if p <= 0.0 || p >= 1.0 {
        0.0
    } else {
        -p * p.log2() - (1.0 - p) * (1.0 - p).log2()
    }
}

/// Deviation allowed between an observed count `n` and its expectation
/// with failure probability `epsilon`.
///
/// Hoeffding: `sqrt(n/2 * ln(1/eps))`. Azuma: `sqrt(2n * ln(1/eps))`.
pub fn concentration_delta(method: ConcentrationMethod, n: f64, epsilon: f64) -> f64 {
    if n <= 0.0 {
        return 0.0;
    }
    let log_term = (1.0 / epsilon).ln();
    match method {
        ConcentrationMethod::Hoeffding => (n / 2.0 * log_term).sqrt(),
        ConcentrationMethod::Azuma => (2.0 * n * log_term).sqrt(),
    }
}

/// Random-sampling correction to the phase error rate:
///
/// `gamma(a, b, c, d) = sqrt((c+d)(1-b)b / (c d ln2) * log2((c+d) / (c d (1-b) b) * 21^2 / a^2))`
///
/// with `a` the secrecy parameter, `b` the estimated error rate, `c` and `d`
/// the single-photon counts in the test and key bases. Degenerate inputs
/// give 0.
pub fn phase_error_gamma(a: f64, b: f64, c: f64, d: f64) -> f64 {
    if !(b > 0.0 && b < 1.0 && c > 0.0 && d > 0.0) {
        return 0.0;
    }
    let inner = (c + d) / (c * d * (1.0 - b) * b) * 21.0 * 21.0 / (a * a);
    if inner <= 1.0 {
        return 0.0;
    }
    let v = (c + d) * (1.0 - b) * b / (c * d * std::f64::consts::LN_2) * inner.log2();
    if v > 0.0 {
        v.sqrt()
    } else {
        0.0
    }
}

/// Probability that a pulse carries exactly `photons` photons, averaged
/// over the intensity choice: `sum_k P_k e^{-mu_k} mu_k^n / n!`.
pub fn photon_number_weight(photons: u32, intensities: &[(f64, f64)]) -> f64 {
    let mut factorial = 1.0;
    for i in 2..=photons {
        factorial *= i as f64;
    }
    intensities
        .iter()
        .map(|&(mu, p)| p * (-mu).exp() * mu.powi(photons as i32) / factorial)
        .sum()
}
