use qkdskr_core::params::defaults::default_parameters;
use qkdskr_core::rate::bounds::{binary_entropy, concentration_delta, phase_error_gamma};
use qkdskr_core::{
    Candidate, ConcentrationMethod, DecoyStateEvaluator, QkdParameters, SampleAxis, SampleRegime,
    SampleSize, SecurityRateEvaluator,
};

fn at(length_km: f64, regime: SampleRegime) -> QkdParameters {
    let mut p = default_parameters();
    p.set_sample_regime(regime).unwrap();
    p.set_channel_length(length_km).unwrap();
    p
}

fn total(size: SampleSize) -> SampleRegime {
    SampleRegime::new(SampleAxis::FixedTotal, size)
}

#[test]
fn entropy_and_deltas_behave() {
    assert_eq!(binary_entropy(0.0), 0.0);
    assert_eq!(binary_entropy(1.0), 0.0);
    assert!((binary_entropy(0.5) - 1.0).abs() < 1e-12);

    let h = concentration_delta(ConcentrationMethod::Hoeffding, 1e6, 1e-10);
    let a = concentration_delta(ConcentrationMethod::Azuma, 1e6, 1e-10);
    assert!((a / h - 2.0).abs() < 1e-12);
    assert_eq!(concentration_delta(ConcentrationMethod::Hoeffding, 0.0, 1e-10), 0.0);

    assert_eq!(phase_error_gamma(1e-12, 0.0, 1e4, 1e4), 0.0);
    assert!(phase_error_gamma(1e-12, 0.02, 1e4, 1e4) > 0.0);
}

#[test]
fn default_link_produces_positive_finite_rate() {
    let ev = DecoyStateEvaluator::default();
    for &l in &[0.0, 10.0, 50.0, 100.0] {
        let r = ev.evaluate(&at(l, total(SampleSize::Finite(1e10))));
        assert!(r.is_finite() && r > 0.0, "L={l} rate={r}");
    }
}

#[test]
fn rate_is_never_negative_or_nan() {
    let ev = DecoyStateEvaluator::default();
    for &l in &[0.0, 150.0, 300.0, 1000.0] {
        for &n in &[1e3, 1e6, 1e10] {
            let r = ev.evaluate(&at(l, total(SampleSize::Finite(n))));
            assert!(r.is_finite() && r >= 0.0, "L={l} N={n} rate={r}");
        }
    }
}

#[test]
fn rate_does_not_increase_with_distance_for_fixed_candidate() {
    let ev = DecoyStateEvaluator::default();
    for regime in [
        total(SampleSize::Finite(1e10)),
        total(SampleSize::Asymptotic),
        SampleRegime::new(SampleAxis::FixedBlock, SampleSize::Finite(1e7)),
    ] {
        let mut prev_db = f64::NEG_INFINITY;
        let mut prev_rate = f64::INFINITY;
        for l in 0..=60 {
            let p = at(l as f64 * 2.5, regime);
            let r = ev.evaluate(&p);
            assert!(p.attenuation_db() > prev_db);
            assert!(r <= prev_rate, "{regime:?} L={} rate {r} > {prev_rate}", l as f64 * 2.5);
            prev_db = p.attenuation_db();
            prev_rate = r;
        }
    }
}

#[test]
fn asymptotic_rate_bounds_every_finite_rate() {
    let ev = DecoyStateEvaluator::default();
    let candidates = [
        Candidate::default(),
        Candidate::new(0.5, 0.15, 0.9, 0.9),
        Candidate::new(0.74, 0.1, 0.9, 0.96),
        Candidate::new(0.6, 0.2, 0.45, 0.75),
    ];
    for c in candidates {
        for &l in &[0.0, 5.0, 25.0, 80.0] {
            let asym = ev.evaluate(&at(l, total(SampleSize::Asymptotic)).with_candidate(&c).unwrap());
            for &n in &[1e6, 1e8, 1e10, 1e12] {
                for axis in [SampleAxis::FixedTotal, SampleAxis::FixedBlock] {
                    let p = at(l, SampleRegime::new(axis, SampleSize::Finite(n)))
                        .with_candidate(&c)
                        .unwrap();
                    let fin = ev.evaluate(&p);
                    assert!(fin <= asym, "{c:?} L={l} N={n} {axis:?}: {fin} > {asym}");
                }
            }
        }
    }
}

#[test]
fn azuma_is_more_conservative_than_hoeffding() {
    let ev = DecoyStateEvaluator::default();
    let mut p = at(20.0, total(SampleSize::Finite(1e9)));
    let hoeffding = ev.evaluate(&p);
    p.set_concentration_method(ConcentrationMethod::Azuma);
    let azuma = ev.evaluate(&p);
    assert!(azuma <= hoeffding);
}

#[test]
fn breakdown_matches_evaluate() {
    let ev = DecoyStateEvaluator::default();
    let p = at(10.0, total(SampleSize::Finite(1e10)));
    let b = ev.breakdown(&p).unwrap();
    assert_eq!(b.rate, ev.evaluate(&p));
    assert_eq!(b.total_pulses, 1e10);
    assert!(b.qber_x > 0.0 && b.qber_x < 0.5);
    assert!(b.phase_error_x >= 0.0 && b.phase_error_x <= 0.5);
    assert!(b.x.single_photon > 0.0);
}

#[test]
fn fixed_block_axis_derives_total_pulses_from_detections() {
    let ev = DecoyStateEvaluator::default();
    let p = at(10.0, SampleRegime::new(SampleAxis::FixedBlock, SampleSize::Finite(1e7)));
    let b = ev.breakdown(&p).unwrap();
    // The block is the X-basis detection count.
    assert!((b.x.detections - 1e7).abs() / 1e7 < 1e-9);
}

#[test]
fn closures_are_evaluators() {
    let flat = |_: &QkdParameters| 42.0;
    assert_eq!(flat.evaluate(&default_parameters()), 42.0);
}
