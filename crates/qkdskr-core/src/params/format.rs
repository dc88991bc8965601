// crates/qkdskr-core/src/params/format.rs

use crate::params::model::{ConcentrationMethod, QkdParameters};
use crate::sample::{SampleAxis, SampleSize};

const MAGIC: &[u8; 4] = b"QKP1";
const VERSION: u16 = 1;

/// Canonical byte layout of the root fields (little-endian).
/// MAGIC[4]
/// version:u16
/// P_X_alice P_X_bob mu_1 mu_2 P_mu_1 R_0 N eta_bob alpha L
/// epsilon_cor epsilon_sec DCR P_err          (f64 each)
/// method:u8 axis:u8 size_tag:u8 size:f64     (size is 0.0 when asymptotic)
///
/// Derived fields are not encoded; they follow from the roots.
pub fn encode(p: &QkdParameters) -> Vec<u8> {
    let mut b = Vec::with_capacity(4 + 2 + 15 * 8 + 3);
    b.extend_from_slice(MAGIC);
    b.extend_from_slice(&VERSION.to_le_bytes());

    for v in [
        p.p_x_alice(),
        p.p_x_bob(),
        p.mu_1(),
        p.mu_2(),
        p.p_mu_1(),
        p.repetition_rate(),
        p.pulse_count(),
        p.eta_bob(),
        p.alpha(),
        p.channel_length(),
        p.epsilon_cor(),
        p.epsilon_sec(),
        p.dark_count_rate(),
        p.p_err(),
    ] {
        b.extend_from_slice(&v.to_le_bytes());
    }

    b.push(match p.concentration_method() {
        ConcentrationMethod::Hoeffding => 0,
        ConcentrationMethod::Azuma => 1,
    });

    let regime = p.sample_regime();
    b.push(match regime.axis {
        SampleAxis::FixedTotal => 0,
        SampleAxis::FixedBlock => 1,
    });
    let (tag, size) = match regime.size {
        SampleSize::Finite(n) => (0u8, n),
        SampleSize::Asymptotic => (1u8, 0.0),
    };
    b.push(tag);
    b.extend_from_slice(&size.to_le_bytes());

    b
}

/// First 16 bytes of BLAKE3 over the canonical encoding.
pub fn params_id_16(p: &QkdParameters) -> [u8; 16] {
    let hash = blake3::hash(&encode(p));
    let mut out = [0u8; 16];
    out.copy_from_slice(&hash.as_bytes()[0..16]);
    out
}

pub fn params_id_hex(p: &QkdParameters) -> String {
    hex16(&params_id_16(p))
}

fn hex16(id: &[u8; 16]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut s = String::with_capacity(32);
    for &b in id {
        s.push(HEX[(b >> 4) as usize] as char);
        s.push(HEX[(b & 0x0F) as usize] as char);
    }
    s
}
