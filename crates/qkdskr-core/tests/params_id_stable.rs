use qkdskr_core::params::defaults::default_parameters;
use qkdskr_core::params::format;
use qkdskr_core::{ConcentrationMethod, SampleAxis, SampleRegime, SampleSize};

#[test]
fn params_id_is_stable_for_same_model() {
    let a = format::params_id_16(&default_parameters());
    let b = format::params_id_16(&default_parameters());
    assert_eq!(a, b);
    assert_eq!(format::params_id_hex(&default_parameters()).len(), 32);
}

#[test]
fn params_id_changes_with_any_root() {
    let base = default_parameters();
    let id0 = format::params_id_16(&base);

    let mut variants = Vec::new();

    let mut p = base.clone();
    p.set_channel_length(99.0).unwrap();
    variants.push(p);

    let mut p = base.clone();
    p.set_security_params(1e-12, 1e-10).unwrap();
    variants.push(p);

    let mut p = base.clone();
    p.set_concentration_method(ConcentrationMethod::Azuma);
    variants.push(p);

    let mut p = base.clone();
    p.set_sample_regime(SampleRegime::new(SampleAxis::FixedTotal, SampleSize::Asymptotic))
        .unwrap();
    variants.push(p);

    let mut p = base.clone();
    p.set_detector(201.0, 0.01).unwrap();
    variants.push(p);

    for (i, v) in variants.iter().enumerate() {
        assert_ne!(format::params_id_16(v), id0, "variant {i} kept the base id");
    }
}

#[test]
fn encoding_starts_with_magic() {
    let enc = format::encode(&default_parameters());
    assert_eq!(&enc[0..4], b"QKP1");
}
