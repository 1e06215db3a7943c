// ─────────────────────────────────────────────────────────────────────
// Galkin Dynamics — Fixed-Order Quadrature
// ─────────────────────────────────────────────────────────────────────
//! Order-10 Gauss–Legendre rule. The order is fixed: combined with the
//! angular substitution in the action integrals the integrand is
//! smooth, and ten nodes reproduce reference actions to well below the
//! adiabatic approximation's own error.
//!
//! Node/weight values from Abramowitz & Stegun, Table 25.4.

/// Quadrature order.
pub const N_QUAD: usize = 10;

/// Positive Gauss–Legendre abscissae on [-1, 1] (symmetric rule).
const GL_X: [f64; N_QUAD / 2] = [
    0.148_874_338_981_631_2,
    0.433_395_394_129_247_2,
    0.679_409_568_299_024_4,
    0.865_063_366_688_984_5,
    0.973_906_528_517_171_7,
];

/// Weights paired with `GL_X`.
const GL_W: [f64; N_QUAD / 2] = [
    0.295_524_224_714_752_9,
    0.269_266_719_309_996_3,
    0.219_086_362_515_982_0,
    0.149_451_349_150_580_6,
    0.066_671_344_308_688_14,
];

/// ∫_a^b f(x) dx by the fixed 10-point rule.
pub fn gauss_legendre<F>(mut f: F, a: f64, b: f64) -> f64
where
    F: FnMut(f64) -> f64,
{
    let mid = 0.5 * (a + b);
    let half = 0.5 * (b - a);
    let mut sum = 0.0;
    for (&x, &w) in GL_X.iter().zip(GL_W.iter()) {
        let dx = half * x;
        sum += w * (f(mid + dx) + f(mid - dx));
    }
    half * sum
}
