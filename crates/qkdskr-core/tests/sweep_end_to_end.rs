use qkdskr_core::params::defaults::default_parameters;
use qkdskr_core::sweep::run_sample_sweep;
use qkdskr_core::{
    DecoyStateEvaluator, SampleAxis, SampleRegime, SampleSize, SecurityRateEvaluator, SweepConfig,
    SweepDriver, SweepSeries,
};

fn sweep_to(max_km: f64) -> SweepConfig {
    SweepConfig {
        max_length_km: max_km,
        ..SweepConfig::default()
    }
}

fn run_total(size: SampleSize, max_km: f64) -> SweepSeries {
    let ev = DecoyStateEvaluator::default();
    let mut p = default_parameters();
    p.set_sample_regime(SampleRegime::new(SampleAxis::FixedTotal, size))
        .unwrap();
    SweepDriver::new(&ev, sweep_to(max_km)).run(&p).unwrap()
}

#[test]
fn default_ten_km_sweep_is_well_formed() {
    let series = run_total(SampleSize::Finite(1e10), 10.0);

    let recorded = series.trace.iter().filter(|t| t.is_recorded()).count();
    assert_eq!(series.points.len(), recorded);
    assert_eq!(series.trace.len(), 11);
    assert!(!series.points.is_empty());

    for w in series.points.windows(2) {
        assert!(w[1].attenuation_db > w[0].attenuation_db);
        assert!(w[1].length_km > w[0].length_km);
    }
    for p in &series.points {
        assert!(p.skr.is_finite() && p.skr >= 0.0, "{p:?}");
        assert!(p.optimum.mu_1 - p.optimum.mu_2 >= 1e-4 - 1e-12);
        assert!(p.optimum.p_x > 0.0 && p.optimum.p_x < 1.0);
        assert!(p.optimum.p_mu_1 > 0.0 && p.optimum.p_mu_1 < 1.0);
    }
    assert_eq!(series.points[0].attenuation_db, 0.0);
    assert_eq!(series.label, "N = 10^10");
    assert_eq!(series.params_id.len(), 32);
}

#[test]
fn optimal_rate_does_not_increase_with_distance() {
    let series = run_total(SampleSize::Finite(1e10), 10.0);
    for w in series.points.windows(2) {
        assert!(
            w[1].skr <= w[0].skr * (1.0 + 1e-9),
            "rate rose from {} to {} at L={}",
            w[0].skr,
            w[1].skr,
            w[1].length_km
        );
    }
}

#[test]
fn optimization_beats_the_starting_guess() {
    let ev = DecoyStateEvaluator::default();
    let series = run_total(SampleSize::Finite(1e10), 2.0);
    let mut p = default_parameters();
    for point in &series.points {
        p.set_channel_length(point.length_km).unwrap();
        let guess = ev.evaluate(&p.with_candidate(&SweepConfig::default().initial).unwrap());
        assert!(point.skr >= guess);
    }
}

#[test]
fn asymptotic_bounds_finite_key_at_same_candidate() {
    let ev = DecoyStateEvaluator::default();
    let finite = run_total(SampleSize::from_exponent(8), 10.0);
    let asym = run_total(SampleSize::Asymptotic, 10.0);

    let mut model = default_parameters();
    model
        .set_sample_regime(SampleRegime::new(SampleAxis::FixedTotal, SampleSize::Asymptotic))
        .unwrap();
    for point in &finite.points {
        let snapshot = model
            .with_channel_length(point.length_km)
            .unwrap()
            .with_candidate(&point.optimum)
            .unwrap();
        assert!(ev.evaluate(&snapshot) >= point.skr, "L={}", point.length_km);
    }

    for (a, f) in asym.points.iter().zip(finite.points.iter()) {
        assert_eq!(a.length_km, f.length_km);
        assert!(a.skr >= f.skr, "L={} asym={} finite={}", a.length_km, a.skr, f.skr);
    }
    assert_eq!(asym.label, "N = inf");
}

#[test]
fn sample_sweep_runs_one_series_per_size() {
    let ev = DecoyStateEvaluator::default();
    let sizes = [
        SampleSize::from_exponent(6),
        SampleSize::from_exponent(8),
        SampleSize::Asymptotic,
    ];
    let out = run_sample_sweep(
        &default_parameters(),
        &ev,
        SampleAxis::FixedTotal,
        &sizes,
        &sweep_to(3.0),
    )
    .unwrap();

    let labels: Vec<&str> = out.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["N = 10^6", "N = 10^8", "N = inf"]);
    for s in &out {
        assert_eq!(s.trace.len(), 4);
    }
    // Distinct regimes give distinct parameter-set ids.
    assert_ne!(out[0].params_id, out[1].params_id);
}

#[test]
fn block_axis_sweep_is_labelled_and_positive() {
    let ev = DecoyStateEvaluator::default();
    let out = run_sample_sweep(
        &default_parameters(),
        &ev,
        SampleAxis::FixedBlock,
        &[SampleSize::Finite(1e5)],
        &sweep_to(3.0),
    )
    .unwrap();
    assert_eq!(out[0].label, "N_block = 10^5");
    assert!(out[0].points.iter().all(|p| p.skr > 0.0));
}

/// Over 0..=280 km on both axes, every recorded point scores at least as
/// high as its successor's optimum evaluated at its own length, and the
/// recorded rate never increases with distance.
#[test]
fn full_range_rate_never_increases_on_either_axis() {
    let ev = DecoyStateEvaluator::default();
    let config = SweepConfig::default();
    assert_eq!(config.max_length_km, 280.0);

    let cases = [
        (SampleAxis::FixedTotal, SampleSize::from_exponent(8)),
        (SampleAxis::FixedTotal, SampleSize::from_exponent(12)),
        (SampleAxis::FixedBlock, SampleSize::from_exponent(7)),
        (SampleAxis::FixedBlock, SampleSize::from_exponent(9)),
    ];
    for (axis, size) in cases {
        let mut base = default_parameters();
        base.set_sample_regime(SampleRegime::new(axis, size)).unwrap();
        let series = SweepDriver::new(&ev, config).run(&base).unwrap();
        assert_eq!(series.trace.len(), 281, "{}", series.label);

        for w in series.points.windows(2) {
            let (here, next) = (&w[0], &w[1]);
            let carried = ev.evaluate(
                &base
                    .with_channel_length(here.length_km)
                    .unwrap()
                    .with_candidate(&next.optimum)
                    .unwrap(),
            );
            assert!(
                here.skr >= carried,
                "{} L={}: recorded {} but successor optimum gives {}",
                series.label,
                here.length_km,
                here.skr,
                carried
            );
            assert!(
                next.skr <= here.skr * (1.0 + 1e-9),
                "{}: rate rose from {} at L={} to {} at L={}",
                series.label,
                here.skr,
                here.length_km,
                next.skr,
                next.length_km
            );
        }
    }
}

#[test]
fn refined_points_keep_a_consistent_rate() {
    let ev = DecoyStateEvaluator::default();
    let mut base = default_parameters();
    base.set_sample_regime(SampleRegime::new(SampleAxis::FixedBlock, SampleSize::from_exponent(9)))
        .unwrap();
    let config = SweepConfig {
        start_km: 230.0,
        max_length_km: 245.0,
        ..SweepConfig::default()
    };
    let series = SweepDriver::new(&ev, config).run(&base).unwrap();

    // The recorded rate is the evaluator's value at the recorded optimum,
    // whether or not the backward pass replaced it.
    for p in &series.points {
        let again = ev.evaluate(
            &base
                .with_channel_length(p.length_km)
                .unwrap()
                .with_candidate(&p.optimum)
                .unwrap(),
        );
        assert_eq!(p.skr, again, "L={} refined={}", p.length_km, p.refined);
    }
}
