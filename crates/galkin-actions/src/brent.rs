// ─────────────────────────────────────────────────────────────────────
// Galkin Dynamics — Bracketed Root Finder
// ─────────────────────────────────────────────────────────────────────
//! Brent's method: inverse quadratic interpolation with secant and
//! bisection fallbacks. Used to pin down turning points and the
//! equatorial extremum once a sign change is bracketed.
//!
//! Reference: Brent, R.P. (1973). "Algorithms for Minimization without
//! Derivatives". Prentice-Hall.

/// Errors from the root finder.
#[derive(Debug, Clone)]
pub enum RootError {
    /// f(a) and f(b) have the same sign.
    NotBracketed { a: f64, b: f64, fa: f64, fb: f64 },
    /// Iteration cap reached; carries the best estimate so far.
    MaxIterations { best: f64, f_best: f64 },
}

impl std::fmt::Display for RootError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RootError::NotBracketed { a, b, fa, fb } => write!(
                f,
                "root not bracketed: f({a}) = {fa}, f({b}) = {fb} (same sign)"
            ),
            RootError::MaxIterations { best, f_best } => write!(
                f,
                "root iteration cap reached, best estimate {best} with f = {f_best}"
            ),
        }
    }
}

impl std::error::Error for RootError {}

/// Bracketed Brent solver with fixed tolerance and iteration cap.
#[derive(Debug, Clone, Copy)]
pub struct BrentSolver {
    pub tol: f64,
    pub max_iter: usize,
}

impl BrentSolver {
    pub fn new(tol: f64, max_iter: usize) -> Self {
        Self { tol, max_iter }
    }

    /// Find the root of `f` in `[a, b]`, assuming f(a)·f(b) ≤ 0.
    ///
    /// Returns the root and the function value there.
    pub fn find_root<F>(&self, mut f: F, mut a: f64, mut b: f64) -> Result<(f64, f64), RootError>
    where
        F: FnMut(f64) -> f64,
    {
        let mut fa = f(a);
        let mut fb = f(b);

        if fa * fb > 0.0 {
            return Err(RootError::NotBracketed { a, b, fa, fb });
        }

        if fa.abs() < fb.abs() {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut fa, &mut fb);
        }

        let mut c = a;
        let mut fc = fa;
        let mut bisected = true;
        let mut d = b - a;

        for _ in 0..self.max_iter {
            if fa.abs() < fb.abs() {
                std::mem::swap(&mut a, &mut b);
                std::mem::swap(&mut fa, &mut fb);
            }

            if fb == 0.0 || (b - a).abs() <= self.tol {
                return Ok((b, fb));
            }

            let s = if fa != fc && fb != fc && fa != fb {
                // Inverse quadratic interpolation
                a * fb * fc / ((fa - fb) * (fa - fc))
                    + b * fa * fc / ((fb - fa) * (fb - fc))
                    + c * fa * fb / ((fc - fa) * (fc - fb))
            } else if fb != fa {
                // Secant step
                b - fb * (b - a) / (fb - fa)
            } else {
                0.5 * (a + b)
            };

            // Reject the interpolated step when it strays or stalls.
            let use_bisection = (s - (3.0 * a + b) / 4.0) * (s - b) > 0.0
                || (bisected && (s - b).abs() >= (b - c).abs() / 2.0)
                || (!bisected && (s - b).abs() >= (c - d).abs() / 2.0)
                || (bisected && (b - c).abs() < self.tol)
                || (!bisected && (c - d).abs() < self.tol);

            let s = if use_bisection {
                bisected = true;
                0.5 * (a + b)
            } else {
                bisected = false;
                s
            };

            let fs = f(s);
            d = c;
            c = b;
            fc = fb;

            if fa * fs < 0.0 {
                b = s;
                fb = fs;
            } else {
                a = s;
                fa = fs;
            }
        }

        Err(RootError::MaxIterations { best: b, f_best: fb })
    }
}
